use reqwest::Url;

const GOODREADS_SEARCH_URL: &str = "https://www.goodreads.com/search";

/// Maps a raw book title to its comparison key.
///
/// Two titles are the same book iff their keys are equal. The key is the
/// trimmed, lowercased title with every whitespace run collapsed to a single
/// space. Any input yields a key; empty titles yield the empty key.
pub fn normalize_title(title: &str) -> String {
    title
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Builds a Goodreads search link for a book
pub fn goodreads_search_url(title: &str, author: &str) -> String {
    let query = format!("{} {}", title, author);
    match Url::parse_with_params(GOODREADS_SEARCH_URL, &[("q", query.trim())]) {
        Ok(url) => url.to_string(),
        Err(_) => GOODREADS_SEARCH_URL.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_case_and_whitespace() {
        let variants = ["Dune", "dune", "  DUNE  ", "DuNe\n", "\tdune "];
        for variant in variants {
            assert_eq!(normalize_title(variant), "dune", "variant {:?}", variant);
        }
    }

    #[test]
    fn test_normalize_collapses_internal_whitespace() {
        assert_eq!(
            normalize_title("  The   Left Hand\tof\n Darkness "),
            "the left hand of darkness"
        );
        assert_eq!(
            normalize_title("the left hand of darkness"),
            normalize_title("THE LEFT  HAND OF DARKNESS")
        );
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize_title("  Kürk Mantolu   Madonna ");
        assert_eq!(normalize_title(&once), once);
        assert_eq!(once, "kürk mantolu madonna");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize_title(""), "");
        assert_eq!(normalize_title("   \t "), "");
        assert_eq!(normalize_title(""), normalize_title("  "));
    }

    #[test]
    fn test_normalize_keeps_punctuation() {
        assert_ne!(normalize_title("Dune!"), normalize_title("Dune"));
    }

    #[test]
    fn test_goodreads_search_url() {
        assert_eq!(
            goodreads_search_url("Dune", "Frank Herbert"),
            "https://www.goodreads.com/search?q=Dune+Frank+Herbert"
        );
    }

    #[test]
    fn test_goodreads_search_url_without_author() {
        assert_eq!(
            goodreads_search_url("Solaris", ""),
            "https://www.goodreads.com/search?q=Solaris"
        );
    }

    #[test]
    fn test_goodreads_search_url_encodes_special_characters() {
        let url = goodreads_search_url("Kürk & Madonna", "");
        assert_eq!(
            url,
            "https://www.goodreads.com/search?q=K%C3%BCrk+%26+Madonna"
        );
    }
}
