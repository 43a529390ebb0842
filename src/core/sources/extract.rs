//! Shared scraping helpers: URL slugs, CSS selectors and ordered
//! extraction strategies.

use scraper::{ElementRef, Html, Selector};
use tracing::trace;

use crate::core::text::normalize;

/// A named way of pulling lyrics out of a page.
pub type Strategy<'a> = (&'static str, &'a dyn Fn(&str) -> Option<String>);

/// Run `strategies` in order and return the first non-empty result.
pub fn first_non_empty(document: &str, strategies: &[Strategy<'_>]) -> Option<String> {
    strategies.iter().find_map(|(name, strategy)| {
        let found = strategy(document).filter(|text| !text.trim().is_empty());
        if found.is_some() {
            trace!("Extraction strategy '{}' matched", name);
        }
        found
    })
}

/// Lowercase ASCII letters and digits only: "Beyond Awareness" → "beyondawareness".
pub fn compact_slug(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Every character outside ASCII letters and digits becomes `-`, then the
/// result is lowercased and stripped of leading and trailing hyphens.
/// Inner hyphen runs are kept: "AC/DC" → "ac-dc", "Guns N' Roses" → "guns-n--roses".
pub fn hyphen_slug(input: &str) -> String {
    let replaced: String = input
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    replaced.trim_matches('-').to_string()
}

pub fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

/// Attribute value of the first element matching `css`.
pub fn first_attr(document: &Html, css: &'static str, attr: &str) -> Option<String> {
    document
        .select(&selector(css))
        .find_map(|element| element.value().attr(attr))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Inner HTML of every element matching `css`, normalized after joining.
pub fn joined_inner_html(document: &Html, css: &'static str, separator: &str) -> Option<String> {
    let parts: Vec<String> = document
        .select(&selector(css))
        .map(|element| element.inner_html())
        .collect();

    if parts.is_empty() {
        return None;
    }

    Some(normalize(&parts.join(separator))).filter(|text| !text.is_empty())
}

pub fn attr_contains_ignore_case(element: &ElementRef<'_>, attr: &str, needle: &str) -> bool {
    element
        .value()
        .attr(attr)
        .is_some_and(|value| value.to_lowercase().contains(&needle.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_slug() {
        assert_eq!(compact_slug("Beyond Awareness"), "beyondawareness");
        assert_eq!(compact_slug("Crime"), "crime");
        assert_eq!(compact_slug("Beyoncé & Jay-Z"), "beyoncjayz");
    }

    #[test]
    fn test_hyphen_slug() {
        assert_eq!(hyphen_slug("Linkin Park"), "linkin-park");
        assert_eq!(hyphen_slug("AC/DC"), "ac-dc");
        assert_eq!(hyphen_slug("  (Intro)  "), "intro");
        assert_eq!(hyphen_slug("Guns N' Roses"), "guns-n--roses");
    }

    #[test]
    fn test_first_non_empty_respects_order() {
        let empty = |_: &str| Some("   ".to_string());
        let missing = |_: &str| -> Option<String> { None };
        let first = |doc: &str| Some(format!("first:{}", doc));
        let second = |_: &str| Some("second".to_string());

        let strategies: [Strategy<'_>; 4] = [
            ("empty", &empty),
            ("missing", &missing),
            ("first", &first),
            ("second", &second),
        ];

        assert_eq!(first_non_empty("doc", &strategies), Some("first:doc".to_string()));
        assert_eq!(first_non_empty("doc", &strategies[..2]), None);
    }

    #[test]
    fn test_joined_inner_html() {
        let doc = Html::parse_document(
            "<html><body><span class=\"lyrics__content\">one<br>two</span>\
             <span class=\"lyrics__content\">three</span></body></html>",
        );
        assert_eq!(
            joined_inner_html(&doc, "span[class*=\"lyrics\"]", "\n"),
            Some("one\ntwo\nthree".to_string())
        );
        assert_eq!(joined_inner_html(&doc, "div.none", "\n"), None);
    }
}
