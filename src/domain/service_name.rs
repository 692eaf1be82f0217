use unicode_segmentation::UnicodeSegmentation;

const MAX_CHAR_LENGTH: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceName(String);

impl ServiceName {
    /// Trims the given name and rejects it when nothing is left or when it is longer than
    /// 256 graphemes.
    pub fn parse(name: String) -> Result<ServiceName, String> {
        let trimmed = name.trim();
        let is_empty = trimmed.is_empty();
        let is_too_long = trimmed.graphemes(true).count() > MAX_CHAR_LENGTH;

        if is_empty || is_too_long {
            return Err(format!("{} is not a valid service name", name));
        }

        Ok(Self(trimmed.to_string()))
    }
}

impl AsRef<str> for ServiceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
