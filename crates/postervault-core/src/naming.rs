use regex::Regex;
use std::sync::LazyLock;

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\W+").expect("static pattern"));

/// Collapse every run of non-word characters into a single space.
pub fn sanitize_title(raw: &str) -> String {
    NON_WORD.replace_all(raw, " ").into_owned()
}

/// File-name stem for a video item: sanitized title, year-suffixed when the
/// year is known.
pub fn display_name(title: &str, year: Option<u32>) -> String {
    let name = sanitize_title(title);
    match year {
        Some(year) => format!("{name} ({year})"),
        None => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_punctuation_runs() {
        assert_eq!(
            sanitize_title("Spider-Man: Far From Home"),
            "Spider Man Far From Home"
        );
    }

    #[test]
    fn test_sanitize_collapses_adjacent_symbols() {
        // ": " is one maximal run, so it becomes one space, not two.
        assert_eq!(sanitize_title("Mission: Impossible!!!"), "Mission Impossible ");
    }

    #[test]
    fn test_sanitize_keeps_unicode_letters() {
        assert_eq!(sanitize_title("Amélie"), "Amélie");
    }

    #[test]
    fn test_sanitize_empty() {
        assert_eq!(sanitize_title(""), "");
    }

    #[test]
    fn test_display_name_with_year() {
        assert_eq!(
            display_name("Spider-Man: Far From Home", Some(2019)),
            "Spider Man Far From Home (2019)"
        );
    }

    #[test]
    fn test_display_name_without_year() {
        assert_eq!(display_name("Untitled Project", None), "Untitled Project");
    }
}
