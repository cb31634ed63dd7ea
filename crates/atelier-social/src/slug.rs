//! URL slugs for tags and posts

use regex::Regex;
use std::sync::OnceLock;

fn separators() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("static regex"))
}

/// Lowercase ASCII slug with runs of other characters collapsed to `-`
#[must_use]
pub fn slugify(input: &str) -> String {
    let lower = input.to_lowercase();
    separators()
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Sunset Over Lake"), "sunset-over-lake");
        assert_eq!(slugify("  Oil & Water!! "), "oil-water");
        assert_eq!(slugify("portrait"), "portrait");
        assert_eq!(slugify("***"), "");
    }
}
