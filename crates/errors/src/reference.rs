//! Addon reference parsing errors

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    #[error("invalid addon ref {reference:?}: {reason}")]
    InvalidReference { reference: String, reason: String },

    #[error("invalid addon ref {reference:?}: version must start with 'v'")]
    InvalidVersion { reference: String },
}

impl UserFacingError for ReferenceError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::InvalidReference { .. } => {
                Some("Use the form addon-team/addon-type/addon-name@v1.0.0.")
            }
            Self::InvalidVersion { .. } => Some("Prefix the version with 'v', e.g. @v1.0.0."),
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::InvalidReference { .. } => "reference.invalid",
            Self::InvalidVersion { .. } => "reference.invalid_version",
        };
        Some(code)
    }
}
