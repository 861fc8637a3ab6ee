/// Cleans visitor-supplied text (chat questions, forum posts, contact
/// messages) before it is matched, stored or logged.
///
/// Control characters are dropped except newline and tab, and Windows or
/// old-Mac line endings become `\n`.
#[derive(Debug, Clone)]
pub struct Sanitizer {
    max_bytes: usize,
}

/// Longest header value kept by [`Sanitizer::sanitize_header`].
const MAX_HEADER_CHARS: usize = 256;

impl Default for Sanitizer {
    fn default() -> Self {
        Self { max_bytes: 10_000 }
    }
}

fn keep(c: char) -> bool {
    !c.is_control() || c == '\n' || c == '\t'
}

impl Sanitizer {
    /// Sanitizer accepting inputs up to `max_bytes` (UTF-8) long.
    pub fn new(max_bytes: usize) -> Self {
        Self { max_bytes }
    }

    /// Clean `input`, or reject it if it is too long or nothing but control
    /// characters.
    pub fn sanitize(&self, input: &str) -> SanitizeResult {
        if input.len() > self.max_bytes {
            return SanitizeResult::Rejected(format!(
                "Input exceeds maximum length of {} bytes",
                self.max_bytes
            ));
        }

        let cleaned: String = input
            .replace("\r\n", "\n")
            .replace('\r', "\n")
            .chars()
            .filter(|c| keep(*c))
            .collect();

        match (cleaned.is_empty(), cleaned == input) {
            (true, false) => {
                SanitizeResult::Rejected("Input contains only control characters".to_string())
            }
            (_, true) => SanitizeResult::Clean(cleaned),
            (false, false) => SanitizeResult::Cleaned(cleaned),
        }
    }

    /// Printable-ASCII rendering of a header value, safe to log.
    pub fn sanitize_header(&self, value: &str) -> String {
        value
            .chars()
            .filter(|c| c.is_ascii_graphic() || *c == ' ')
            .take(MAX_HEADER_CHARS)
            .collect()
    }
}

/// Outcome of [`Sanitizer::sanitize`].
#[derive(Debug, PartialEq, Eq)]
pub enum SanitizeResult {
    /// Input needed no changes.
    Clean(String),
    /// Input was usable after cleaning.
    Cleaned(String),
    /// Input is unusable; carries the reason.
    Rejected(String),
}

impl SanitizeResult {
    /// Returns `true` for [`SanitizeResult::Rejected`].
    pub fn is_rejected(&self) -> bool {
        matches!(self, SanitizeResult::Rejected(_))
    }

    /// The usable text, or the rejection reason as the error.
    pub fn into_result(self) -> Result<String, String> {
        match self {
            SanitizeResult::Clean(s) | SanitizeResult::Cleaned(s) => Ok(s),
            SanitizeResult::Rejected(reason) => Err(reason),
        }
    }
}
