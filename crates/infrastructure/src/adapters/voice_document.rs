//! Voice document renderer - Implements PayloadRendererPort
//!
//! Produces the XML document telephony platforms fetch to read text aloud:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <Response><Say language="es-ES">El tiempo en Madrid.</Say></Response>
//! ```

use application::ports::PayloadRendererPort;
use domain::VoiceScript;
use quick_xml::escape::escape;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Content type of the rendered document
pub const VOICE_DOCUMENT_CONTENT_TYPE: &str = "application/xml; charset=utf-8";

/// Renders a [`VoiceScript`] as one `<Say>` element per line
#[derive(Debug, Clone)]
pub struct VoiceDocumentRenderer {
    language: String,
}

impl Default for VoiceDocumentRenderer {
    fn default() -> Self {
        Self::new("es-ES")
    }
}

impl VoiceDocumentRenderer {
    /// Create a renderer speaking in `language` (BCP 47 tag)
    #[must_use]
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
        }
    }

    /// Language tag written on every `<Say>`
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }
}

impl PayloadRendererPort for VoiceDocumentRenderer {
    fn render(&self, script: &VoiceScript) -> String {
        let language = escape(self.language.as_str());
        let mut document = String::from(XML_DECLARATION);
        document.push_str("<Response>");

        for line in &script.lines {
            document.push_str(&format!(
                r#"<Say language="{language}">{}</Say>"#,
                escape(line.as_str())
            ));
        }

        if let Some(url) = &script.redirect_url {
            document.push_str(&format!(
                r#"<Redirect method="POST">{}</Redirect>"#,
                escape(url.as_str())
            ));
        }

        document.push_str("</Response>");
        document
    }

    fn content_type(&self) -> &'static str {
        VOICE_DOCUMENT_CONTENT_TYPE
    }
}
