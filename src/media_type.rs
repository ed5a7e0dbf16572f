use crate::error::TemplatingError;
use std::fmt;
use std::str::FromStr;

/// Output formats the templating service can render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    Pdf,
    Png,
    Html,
}

impl MediaType {
    /// All supported media types
    pub const ALL: [MediaType; 3] = [MediaType::Pdf, MediaType::Png, MediaType::Html];

    /// Canonical MIME string, used as the `Accept` header value
    pub fn mime(&self) -> &'static str {
        match self {
            MediaType::Pdf => "application/pdf",
            MediaType::Png => "image/png",
            MediaType::Html => "text/html",
        }
    }

    /// Usual file extension for artifacts of this type
    pub fn file_extension(&self) -> &'static str {
        match self {
            MediaType::Pdf => "pdf",
            MediaType::Png => "png",
            MediaType::Html => "html",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}

impl FromStr for MediaType {
    type Err = TemplatingError;

    /// Accepts either the MIME string or the short name, case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        MediaType::ALL
            .into_iter()
            .find(|m| m.mime() == wanted || m.file_extension() == wanted)
            .ok_or_else(|| TemplatingError::Configuration(format!("unknown media type: {}", s)))
    }
}
