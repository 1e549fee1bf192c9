use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tashabuh_corpus::VerseKey;

use crate::span::Span;
use crate::ImportError;

/// `matching-ayah.json`: source verse key to its match entries.
pub type MatchList = HashMap<VerseKey, Vec<MatchEntry>>;

/// One entry of the match list.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchEntry {
    #[serde(default)]
    pub matched_ayah_key: Option<VerseKey>,
    #[serde(default)]
    pub match_words: Option<MatchWords>,
}

/// The known shapes of `match_words`, validated at the boundary.
///
/// The dataset grew several encodings over time; anything that fits
/// none of them fails deserialization of the whole file instead of
/// silently contributing no span.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MatchWords {
    /// `[{ "source": [s, e], "target": [t1, t2] }, ...]`
    Labeled(Vec<LabeledSpans>),
    /// `[[[s, e], [t1, t2]], ...]`
    SpanPairs(Vec<[[i64; 2]; 2]>),
    /// `[[s, e], [t1, t2]?, ...]` — first span is the source, an
    /// optional second span the target
    Spans(Vec<[i64; 2]>),
    /// `[5, 6, 7]` — bare word indices, spanning (min, max) in the source
    WordIndices(Vec<i64>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct LabeledSpans {
    #[serde(default)]
    pub source: Option<Vec<i64>>,
    #[serde(default)]
    pub target: Option<Vec<i64>>,
}

impl MatchWords {
    /// Extract the (source, target) spans, either possibly absent.
    pub fn spans(&self) -> (Option<Span>, Option<Span>) {
        match self {
            MatchWords::Labeled(entries) => match entries.first() {
                Some(entry) => (
                    span_from_list(entry.source.as_deref()),
                    span_from_list(entry.target.as_deref()),
                ),
                None => (None, None),
            },
            MatchWords::SpanPairs(pairs) => match pairs.first() {
                Some([source, target]) => {
                    (Some((source[0], source[1])), Some((target[0], target[1])))
                }
                None => (None, None),
            },
            MatchWords::Spans(spans) => {
                let source = spans.first().map(|s| (s[0], s[1]));
                let target = spans.get(1).map(|s| (s[0], s[1]));
                (source, target)
            }
            MatchWords::WordIndices(indices) => {
                let min = indices.iter().min().copied();
                let max = indices.iter().max().copied();
                match (min, max) {
                    (Some(min), Some(max)) => (Some((min, max)), None),
                    _ => (None, None),
                }
            }
        }
    }
}

fn span_from_list(list: Option<&[i64]>) -> Option<Span> {
    match list {
        Some([start, end, ..]) => Some((*start, *end)),
        _ => None,
    }
}

/// Load and validate a `matching-ayah.json` file.
pub fn load_matches(path: &Path) -> Result<MatchList, ImportError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: serde_json::Value) -> MatchWords {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn parses_labeled_shape() {
        let mw = parse(serde_json::json!([{ "source": [3, 5], "target": [1, 3] }]));
        assert_eq!(mw.spans(), (Some((3, 5)), Some((1, 3))));
    }

    #[test]
    fn parses_nested_pair_shape() {
        let mw = parse(serde_json::json!([[[3, 5], [1, 3]]]));
        assert_eq!(mw.spans(), (Some((3, 5)), Some((1, 3))));
    }

    #[test]
    fn parses_flat_span_shape() {
        let mw = parse(serde_json::json!([[3, 5]]));
        assert_eq!(mw.spans(), (Some((3, 5)), None));

        let mw = parse(serde_json::json!([[3, 5], [1, 3]]));
        assert_eq!(mw.spans(), (Some((3, 5)), Some((1, 3))));
    }

    #[test]
    fn parses_word_index_shape() {
        let mw = parse(serde_json::json!([7, 5, 6]));
        assert_eq!(mw.spans(), (Some((5, 7)), None));
    }

    #[test]
    fn labeled_shape_tolerates_missing_sides() {
        let mw = parse(serde_json::json!([{ "target": [1, 3] }]));
        assert_eq!(mw.spans(), (None, Some((1, 3))));
    }

    #[test]
    fn rejects_unrecognized_shape() {
        let result: Result<MatchWords, _> =
            serde_json::from_value(serde_json::json!([ "a", "b" ]));
        assert!(result.is_err());

        let result: Result<MatchWords, _> = serde_json::from_value(serde_json::json!("3-5"));
        assert!(result.is_err());
    }

    #[test]
    fn entry_fields_are_optional() {
        let entry: MatchEntry = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(entry.matched_ayah_key.is_none());
        assert!(entry.match_words.is_none());
    }
}
