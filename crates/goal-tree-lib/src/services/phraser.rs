/// Turns raw question text into fluent phrasing (grammar correction and
/// the like). Must not change meaning.
pub trait TextPhraser {
    fn phrase(&self, text: &str) -> String;
}

/// Leaves text as it is
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityPhraser;

impl TextPhraser for IdentityPhraser {
    fn phrase(&self, text: &str) -> String {
        text.to_string()
    }
}

impl<F> TextPhraser for F
where
    F: Fn(&str) -> String,
{
    fn phrase(&self, text: &str) -> String {
        self(text)
    }
}
