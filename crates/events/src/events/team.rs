use serde::{Deserialize, Serialize};

/// Team scope resolution
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TeamEvent {
    /// The team every registry call of this invocation is scoped to
    Resolved { team: String, source: String },

    /// `switch` persisted a new current team
    Switched { team: String },
}
