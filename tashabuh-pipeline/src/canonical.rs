use rayon::prelude::*;
use std::collections::{BTreeSet, HashMap};

use tashabuh_corpus::VerseKey;

use crate::extract::{PhraseGroups, RawOccurrence};

/// The single phrase kept for one verse-set group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalPhrase {
    /// Raw surface form of the first occurrence, for display
    pub display_text: String,
    pub normalized_text: String,
    pub length_words: usize,
    pub occurrences: Vec<RawOccurrence>,
}

impl CanonicalPhrase {
    /// Distinct verses this phrase occurs in.
    pub fn verse_set(&self) -> BTreeSet<VerseKey> {
        self.occurrences.iter().map(|occ| occ.verse).collect()
    }
}

/// Collapse phrases sharing an identical verse set down to one
/// representative each.
///
/// Phrases are grouped by the exact set of verses they occur in; within
/// a group the representative is the longest phrase, tie-broken by
/// occurrence count and then lexicographic normalized text, so the
/// choice is deterministic regardless of map iteration order. Groups
/// whose verse sets stand in a strict subset relation to another group
/// are left alone: only exact-set duplicates are pruned.
pub fn canonicalize(groups: PhraseGroups) -> Vec<CanonicalPhrase> {
    let mut by_verse_set: HashMap<BTreeSet<VerseKey>, Vec<(String, Vec<RawOccurrence>)>> =
        HashMap::new();
    for (normalized, occurrences) in groups {
        let verse_set: BTreeSet<VerseKey> = occurrences.iter().map(|occ| occ.verse).collect();
        by_verse_set
            .entry(verse_set)
            .or_default()
            .push((normalized, occurrences));
    }

    let mut phrases = Vec::with_capacity(by_verse_set.len());
    for (_, mut candidates) in by_verse_set {
        candidates.sort_by(|(norm_a, occs_a), (norm_b, occs_b)| {
            let len_a = norm_a.split_whitespace().count();
            let len_b = norm_b.split_whitespace().count();
            len_b
                .cmp(&len_a)
                .then(occs_b.len().cmp(&occs_a.len()))
                .then(norm_a.cmp(norm_b))
        });
        let (normalized_text, occurrences) = candidates.swap_remove(0);
        let Some(first) = occurrences.first() else {
            continue;
        };
        phrases.push(CanonicalPhrase {
            display_text: first.raw_text.clone(),
            length_words: normalized_text.split_whitespace().count(),
            normalized_text,
            occurrences,
        });
    }

    phrases.par_sort_by(|a, b| a.normalized_text.cmp(&b.normalized_text));
    phrases
}
