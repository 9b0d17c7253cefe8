use serde::{Deserialize, Serialize};

/// Operation lifecycle events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeneralEvent {
    OperationStarted { operation: String },

    OperationCompleted { operation: String, success: bool },
}
