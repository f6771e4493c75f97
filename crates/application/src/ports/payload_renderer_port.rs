//! Payload rendering port

use domain::VoiceScript;
#[cfg(test)]
use mockall::automock;

/// Port for turning spoken lines into the document served to the telephony
/// platform
#[cfg_attr(test, automock)]
pub trait PayloadRendererPort: Send + Sync {
    /// Render the script; must escape every line so any text is safe
    fn render(&self, script: &VoiceScript) -> String;

    /// MIME type of the rendered document
    fn content_type(&self) -> &'static str;
}
