//! Match-List Import
//!
//! ETL over an externally supplied "matching ayah" dataset: pairs of
//! verses already known to share a matching span. Phrases are
//! get-or-created by normalized text with no subset pruning, so this is
//! deliberately *not* the discovery pipeline — the two never share
//! output semantics. The `match_words` field of the input arrives in
//! several historical shapes; they deserialize into one sum type and an
//! unrecognized shape fails the run at parse time.

mod matches;
mod span;

pub use matches::{load_matches, MatchEntry, MatchList, MatchWords};
pub use span::{find_span, sanitize_span, Span};

use std::collections::{BTreeSet, HashMap};

use tashabuh_corpus::{Verse, VerseKey};
use tashabuh_store::{PhraseWriter, StoreError};
use tashabuh_text::QuranNormalizer;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("match list error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Counts reported after a successful import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub phrases: usize,
    pub occurrences: usize,
}

#[derive(Debug)]
struct PhraseDraft {
    text: String,
    normalized: String,
    length_words: usize,
    occurrences: BTreeSet<(VerseKey, usize, usize)>,
}

/// Build phrases and occurrences from the match list and persist them.
///
/// Each usable match contributes the source span's phrase; the matched
/// verse gets an occurrence from its own span when one is supplied, or
/// from an exact normalized-window scan otherwise. Occurrences are
/// deduplicated per (phrase, verse, span); a phrase's global frequency
/// is its final occurrence count.
pub fn run_import(
    verses: &[Verse],
    matches: &MatchList,
    normalizer: &QuranNormalizer,
    writer: &mut dyn PhraseWriter,
) -> Result<ImportSummary, ImportError> {
    let mut cache: HashMap<VerseKey, (Vec<String>, Vec<String>)> = HashMap::new();
    for verse in verses {
        let raw: Vec<String> = verse.words().iter().map(|w| w.to_string()).collect();
        let norm: Vec<String> = raw.iter().map(|w| normalizer.normalize(w)).collect();
        cache.insert(verse.key, (raw, norm));
    }

    let mut drafts: Vec<PhraseDraft> = Vec::new();
    let mut by_normalized: HashMap<String, usize> = HashMap::new();

    // Iterate verses in canonical order so draft creation order (and
    // therefore phrase ids) is reproducible; the match map itself has
    // no stable order.
    for verse in verses {
        let Some(entries) = matches.get(&verse.key) else {
            continue;
        };
        let (raw_words, _) = &cache[&verse.key];

        for entry in entries {
            let Some(match_words) = &entry.match_words else {
                continue;
            };
            let (src_span, tgt_span) = match_words.spans();
            let Some((start, end)) = src_span.and_then(|s| sanitize_span(s, raw_words.len()))
            else {
                debug!(verse = %verse.key, "match without a usable source span, skipped");
                continue;
            };

            let text = raw_words[start - 1..end].join(" ");
            let normalized = normalizer.normalize(&text);
            let length_words = normalized.split_whitespace().count();
            if length_words < 2 {
                continue;
            }

            let draft_idx = match by_normalized.get(&normalized) {
                Some(&idx) => idx,
                None => {
                    drafts.push(PhraseDraft {
                        text,
                        normalized: normalized.clone(),
                        length_words,
                        occurrences: BTreeSet::new(),
                    });
                    by_normalized.insert(normalized.clone(), drafts.len() - 1);
                    drafts.len() - 1
                }
            };
            drafts[draft_idx].occurrences.insert((verse.key, start, end));

            let Some(target_key) = entry.matched_ayah_key else {
                continue;
            };
            let Some((target_raw, target_norm)) = cache.get(&target_key) else {
                continue;
            };
            let phrase_norm_words: Vec<&str> = drafts[draft_idx]
                .normalized
                .split_whitespace()
                .collect();
            let span = tgt_span
                .and_then(|s| sanitize_span(s, target_raw.len()))
                .or_else(|| find_span(target_norm, &phrase_norm_words));
            if let Some((t_start, t_end)) = span {
                drafts[draft_idx]
                    .occurrences
                    .insert((target_key, t_start, t_end));
            }
        }
    }

    writer.clear()?;
    let mut occurrences = 0;
    for draft in &drafts {
        let id = writer.save_phrase(
            &draft.text,
            &draft.normalized,
            draft.length_words,
            draft.occurrences.len(),
        )?;
        for &(verse, start, end) in &draft.occurrences {
            writer.save_occurrence(id, verse, start, end)?;
            occurrences += 1;
        }
    }

    let summary = ImportSummary {
        phrases: drafts.len(),
        occurrences,
    };
    info!(
        phrases = summary.phrases,
        occurrences = summary.occurrences,
        "match-list import complete"
    );
    Ok(summary)
}
