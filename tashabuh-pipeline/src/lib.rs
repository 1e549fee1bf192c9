//! Phrase Discovery Pipeline
//!
//! Offline batch pipeline that discovers repeated near-identical phrases
//! (mutashabihat) in a verse corpus: enumerate word n-grams, group them
//! by normalized text, keep the groups whose occurrence count falls in a
//! configured band, then collapse groups sharing an identical verse set
//! down to one canonical phrase each. Results go to a
//! [`PhraseWriter`](tashabuh_store::PhraseWriter) after a full clear;
//! a rebuild is idempotent, never incremental.

mod canonical;
mod extract;

pub use canonical::{canonicalize, CanonicalPhrase};
pub use extract::{extract, filter_frequency, PhraseGroups, RawOccurrence};

use serde::{Deserialize, Serialize};
use tashabuh_corpus::Verse;
use tashabuh_store::{PhraseWriter, StoreError};
use tashabuh_text::QuranNormalizer;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("invalid n-gram window range {min_n}..={max_n}")]
    InvalidWindowRange { min_n: usize, max_n: usize },

    #[error("invalid frequency range {min_freq}..={max_freq}")]
    InvalidFrequencyRange { min_freq: usize, max_freq: usize },

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Knobs of the discovery pipeline.
///
/// `min_n`/`max_n` bound the window length in raw words; `min_freq`/
/// `max_freq` bound how often a normalized phrase must repeat to count
/// as similar without being stock boilerplate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhraseConfig {
    pub min_n: usize,
    pub max_n: usize,
    pub min_freq: usize,
    pub max_freq: usize,
}

impl Default for PhraseConfig {
    fn default() -> Self {
        Self {
            min_n: 3,
            max_n: 7,
            min_freq: 2,
            max_freq: 60,
        }
    }
}

impl PhraseConfig {
    /// Reject nonsensical ranges before any processing starts.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.min_n == 0 || self.min_n > self.max_n {
            return Err(PipelineError::InvalidWindowRange {
                min_n: self.min_n,
                max_n: self.max_n,
            });
        }
        if self.min_freq == 0 || self.min_freq > self.max_freq {
            return Err(PipelineError::InvalidFrequencyRange {
                min_freq: self.min_freq,
                max_freq: self.max_freq,
            });
        }
        Ok(())
    }
}

/// Counts reported after a successful rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineSummary {
    pub phrases: usize,
    pub occurrences: usize,
}

/// Run the full discovery pipeline and persist the result.
///
/// Pure function of `(verses, config)` up to the final writes: extract,
/// filter, canonicalize, then clear the store and write every canonical
/// phrase with its occurrences.
pub fn build_phrases(
    verses: &[Verse],
    normalizer: &QuranNormalizer,
    config: &PhraseConfig,
    writer: &mut dyn PhraseWriter,
) -> Result<PipelineSummary, PipelineError> {
    config.validate()?;

    let groups = extract(verses, normalizer, config);
    debug!(groups = groups.len(), "extracted n-gram groups");

    let kept = filter_frequency(groups, config);
    debug!(groups = kept.len(), "groups within frequency band");

    let phrases = canonicalize(kept);

    writer.clear()?;
    let mut occurrences = 0;
    for phrase in &phrases {
        let id = writer.save_phrase(
            &phrase.display_text,
            &phrase.normalized_text,
            phrase.length_words,
            phrase.occurrences.len(),
        )?;
        for occ in &phrase.occurrences {
            writer.save_occurrence(id, occ.verse, occ.start_word, occ.end_word)?;
            occurrences += 1;
        }
    }

    let summary = PipelineSummary {
        phrases: phrases.len(),
        occurrences,
    };
    info!(
        phrases = summary.phrases,
        occurrences = summary.occurrences,
        "phrase rebuild complete"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(PhraseConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_inverted_window_range() {
        let config = PhraseConfig {
            min_n: 5,
            max_n: 3,
            ..PhraseConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PipelineError::InvalidWindowRange { min_n: 5, max_n: 3 })
        ));
    }

    #[test]
    fn rejects_zero_min_n() {
        let config = PhraseConfig {
            min_n: 0,
            ..PhraseConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_inverted_frequency_range() {
        let config = PhraseConfig {
            min_freq: 10,
            max_freq: 2,
            ..PhraseConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PipelineError::InvalidFrequencyRange {
                min_freq: 10,
                max_freq: 2
            })
        ));
    }
}
