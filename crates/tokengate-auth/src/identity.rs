use serde::{Deserialize, Serialize};

/// The authenticated subject
///
/// Produced by a successful credential check or recovered from verified
/// token claims. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    /// Stable, opaque subject id
    pub subject_id: String,
    /// Human readable name
    pub display_name: String,
}

impl Identity {
    pub fn new(subject_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            subject_id: subject_id.into(),
            display_name: display_name.into(),
        }
    }
}
