//! Ordered spoken lines ready to be rendered into a document

use serde::{Deserialize, Serialize};

/// The lines a voice consumer will speak, plus an optional follow-up URL
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceScript {
    /// Sanitized lines in speaking order
    pub lines: Vec<String>,
    /// Where the consumer should go after speaking, if anywhere
    pub redirect_url: Option<String>,
}
