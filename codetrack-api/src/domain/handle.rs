use unicode_segmentation::UnicodeSegmentation;

/// A validated user id or platform handle.
///
/// Handles end up inside request URLs and store file names, so anything
/// that could escape those contexts is rejected up front. Real platform
/// handles contain no whitespace, which keeps the rule simple.
#[derive(Debug)]
pub struct Handle(String);

impl Handle {
    pub fn parse(s: String) -> Result<Self, String> {
        let forbidden_characters = [
            '/', '\\', '?', '&', '#', '%', '(', ')', '"', '<', '>', '{', '}',
        ];

        if s.is_empty() {
            Err("handle must not be empty".to_string())
        } else if s.graphemes(true).count() > 64 {
            Err(format!("handle {} is longer than 64 characters", s))
        } else if s
            .chars()
            .any(|c| c.is_whitespace() || forbidden_characters.contains(&c))
        {
            Err(format!("handle {} contains forbidden characters", s))
        } else {
            Ok(Self(s))
        }
    }
}

impl AsRef<str> for Handle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
