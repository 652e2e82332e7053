/// Foundation — the story's starting state and framing text.
///
/// Every field is individually defaultable: a missing value in
/// `foundation.toml` is replaced by the corresponding fallback here and
/// reported as a data-quality diagnostic, never an error.

pub const DEFAULT_START_CHAPTER: &str = "chapter1";
pub const DEFAULT_CHARACTER_NAME: &str = "Stranger";
pub const DEFAULT_INTRO: &str = "The story begins.";

#[derive(Debug, Clone, PartialEq)]
pub struct Foundation {
    pub start_chapter: String,
    pub start_pad: f64,
    pub character_name: String,
    pub intro: String,
}

impl Default for Foundation {
    fn default() -> Self {
        Self {
            start_chapter: DEFAULT_START_CHAPTER.to_string(),
            start_pad: 0.0,
            character_name: DEFAULT_CHARACTER_NAME.to_string(),
            intro: DEFAULT_INTRO.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_documented_fallbacks() {
        let f = Foundation::default();
        assert_eq!(f.start_chapter, "chapter1");
        assert_eq!(f.start_pad, 0.0);
        assert_eq!(f.character_name, "Stranger");
    }
}
