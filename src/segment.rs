//! Builds URL-safe path segments from record titles.
//!
//! Segments are lowercase, keep alphanumeric characters, and use a single `-`
//! wherever the title had whitespace or punctuation.

/// Normalize a title into a path segment.
///
/// Empty, whitespace-only and punctuation-only titles yield an empty segment.
/// Normalizing an already-normalized segment returns it unchanged.
pub fn normalize_segment(title: &str) -> String {
    // Lowercase first: some characters expand into several (e.g. 'İ'), and
    // mapping after the expansion keeps a second pass stable.
    let lowered = title.trim().to_lowercase();

    let mut segment = String::with_capacity(lowered.len());
    let mut pending_dash = false;
    for c in lowered.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !segment.is_empty() {
                segment.push('-');
            }
            segment.push(c);
            pending_dash = false;
        } else {
            pending_dash = true;
        }
    }
    segment
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_title() {
        assert_eq!(normalize_segment("Home"), "home");
    }

    #[test]
    fn test_spaces_become_dashes() {
        assert_eq!(normalize_segment("About Us"), "about-us");
    }

    #[test]
    fn test_collapse_runs() {
        assert_eq!(normalize_segment("News  &   Events"), "news-events");
        assert_eq!(normalize_segment("a -- b"), "a-b");
    }

    #[test]
    fn test_trim_edges() {
        assert_eq!(normalize_segment("  Team!  "), "team");
        assert_eq!(normalize_segment("--draft--"), "draft");
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(normalize_segment("John's Page"), "john-s-page");
        assert_eq!(normalize_segment("v1.2/beta"), "v1-2-beta");
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(normalize_segment(""), "");
        assert_eq!(normalize_segment("   "), "");
        assert_eq!(normalize_segment("?!/"), "");
    }

    #[test]
    fn test_non_ascii_letters_kept() {
        assert_eq!(normalize_segment("Über Uns"), "über-uns");
        assert_eq!(normalize_segment("Café Menu"), "café-menu");
    }

    #[test]
    fn test_idempotent() {
        for title in [
            "Home",
            "About Us",
            "  Team!  ",
            "İstanbul Office",
            "ΣΙΣΥΦΟΣ",
            "v1.2/beta",
            "___",
            "",
        ] {
            let once = normalize_segment(title);
            assert_eq!(normalize_segment(&once), once, "not idempotent for {title:?}");
        }
    }
}
