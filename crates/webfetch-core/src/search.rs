//! Term search over extracted text with bounded context windows.
//!
//! Positions are character offsets, not byte offsets, so they stay meaningful
//! for multi-byte text. Case-insensitive search folds case per character
//! (keeping offsets aligned with the original text) and the returned context
//! always preserves original casing.

use crate::types::SearchMatch;
use crate::{Error, Result};

/// Scan `text` for every non-overlapping occurrence of each term.
///
/// Results are ordered by position ascending, with the term as a tie-break
/// for distinct terms matching at the same offset. The context window extends
/// `context_chars` characters on each side of the match, clamped at text
/// boundaries.
///
/// An empty `terms` slice yields an empty result. A term that is itself the
/// empty string is rejected with [`Error::InvalidSearchTerm`] since it would
/// match at every position.
pub fn search(
    text: &str,
    terms: &[String],
    case_sensitive: bool,
    context_chars: usize,
) -> Result<Vec<SearchMatch>> {
    if terms.is_empty() {
        return Ok(Vec::new());
    }
    if terms.iter().any(String::is_empty) {
        return Err(Error::InvalidSearchTerm(
            "empty search term would match at every position".to_string(),
        ));
    }

    let original: Vec<char> = text.chars().collect();
    let haystack: Vec<char> = if case_sensitive {
        original.clone()
    } else {
        original.iter().map(|&c| fold_char(c)).collect()
    };

    let mut matches = Vec::new();
    for term in terms {
        let needle: Vec<char> = if case_sensitive {
            term.chars().collect()
        } else {
            term.chars().map(fold_char).collect()
        };

        let mut cursor = 0;
        while cursor + needle.len() <= haystack.len() {
            let Some(offset) = find(&haystack[cursor..], &needle) else {
                break;
            };
            let position = cursor + offset;
            matches.push(SearchMatch {
                term: term.clone(),
                position,
                context: context_window(&original, position, needle.len(), context_chars),
                case_sensitive,
            });
            // Non-overlapping: advance past the matched occurrence.
            cursor = position + needle.len();
        }
    }

    matches.sort_by(|a, b| {
        a.position
            .cmp(&b.position)
            .then_with(|| a.term.cmp(&b.term))
    });
    Ok(matches)
}

/// Per-character simple case folding. Keeps the folded text the same length
/// in characters as the original so match offsets line up.
fn fold_char(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

fn find(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn context_window(chars: &[char], position: usize, term_len: usize, half_width: usize) -> String {
    let start = position.saturating_sub(half_width);
    let end = (position + term_len + half_width).min(chars.len());
    chars[start..end].iter().collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const TEXT: &str = "the API is great, see the api docs";

    fn terms(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_case_insensitive_finds_both_occurrences() {
        let matches = search(TEXT, &terms(&["api"]), false, 5).unwrap();
        assert_eq!(matches.len(), 2);

        assert_eq!(matches[0].position, 4);
        assert_eq!(matches[0].context, "the API is g");
        assert!(!matches[0].case_sensitive);

        assert!(matches[1].position > matches[0].position);
        // Context preserves the original casing of the second occurrence
        assert!(matches[1].context.contains("api docs"));
    }

    #[test]
    fn test_case_sensitive_matches_exact_casing_only() {
        let matches = search(TEXT, &terms(&["api"]), true, 5).unwrap();
        assert_eq!(matches.len(), 1);
        assert!(matches[0].context.contains("api docs"));

        let matches = search(TEXT, &terms(&["API"]), true, 5).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].position, 4);
    }

    #[test]
    fn test_context_clamped_at_boundaries() {
        let matches = search("abc", &terms(&["abc"]), true, 50).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].context, "abc");
        assert_eq!(matches[0].position, 0);
    }

    #[test]
    fn test_non_overlapping_scan() {
        let matches = search("aaaa", &terms(&["aa"]), true, 0).unwrap();
        let positions: Vec<_> = matches.iter().map(|m| m.position).collect();
        assert_eq!(positions, vec![0, 2]);
    }

    #[test]
    fn test_ordered_by_position_then_term() {
        let matches = search("xy", &terms(&["xy", "x"]), true, 2).unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].position, 0);
        assert_eq!(matches[1].position, 0);
        // Same offset: tie-break on term
        assert_eq!(matches[0].term, "x");
        assert_eq!(matches[1].term, "xy");
    }

    #[test]
    fn test_char_offsets_with_multibyte_text() {
        let matches = search("héllo wörld wörld", &terms(&["wörld"]), false, 2).unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].position, 6);
        assert_eq!(matches[1].position, 12);
    }

    #[test]
    fn test_empty_terms_yield_empty_result() {
        let matches = search(TEXT, &[], false, 10).unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn test_empty_term_rejected() {
        let result = search(TEXT, &terms(&["api", ""]), false, 10);
        assert!(matches!(result, Err(Error::InvalidSearchTerm(_))));
    }

    #[test]
    fn test_no_matches() {
        let matches = search(TEXT, &terms(&["zebra"]), false, 10).unwrap();
        assert!(matches.is_empty());
    }
}
