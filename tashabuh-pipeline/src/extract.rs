use std::collections::HashMap;

use tashabuh_corpus::{Verse, VerseKey};
use tashabuh_text::QuranNormalizer;

use crate::PhraseConfig;

/// One raw n-gram window, word indices 1-based inclusive.
///
/// The normalized text of the window is the key of the [`PhraseGroups`]
/// map owning the occurrence, so it is not repeated here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOccurrence {
    pub verse: VerseKey,
    pub start_word: usize,
    pub end_word: usize,
    pub raw_text: String,
}

/// Normalized phrase text to every window it covers.
pub type PhraseGroups = HashMap<String, Vec<RawOccurrence>>;

/// Enumerate all word windows of length `min_n..=max_n` over every verse
/// and group them by normalized text.
///
/// A window is dropped when normalization collapses it below `min_n`
/// words (e.g. a window of diacritic-only artifacts). Verses shorter
/// than `min_n` words yield nothing.
pub fn extract(
    verses: &[Verse],
    normalizer: &QuranNormalizer,
    config: &PhraseConfig,
) -> PhraseGroups {
    let mut groups = PhraseGroups::new();

    for verse in verses {
        let words = verse.words();
        let word_count = words.len();

        for n in config.min_n..=config.max_n {
            if n > word_count {
                break;
            }
            for start in 0..=word_count - n {
                let raw = words[start..start + n].join(" ");
                let normalized = normalizer.normalize(&raw);
                if normalized.split_whitespace().count() < config.min_n {
                    continue;
                }
                groups.entry(normalized).or_default().push(RawOccurrence {
                    verse: verse.key,
                    start_word: start + 1,
                    end_word: start + n,
                    raw_text: raw,
                });
            }
        }
    }

    groups
}

/// Keep only groups whose occurrence count lies in
/// `min_freq..=max_freq`.
pub fn filter_frequency(mut groups: PhraseGroups, config: &PhraseConfig) -> PhraseGroups {
    groups.retain(|_, occurrences| {
        (config.min_freq..=config.max_freq).contains(&occurrences.len())
    });
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(min_n: usize, max_n: usize, min_freq: usize, max_freq: usize) -> PhraseConfig {
        PhraseConfig {
            min_n,
            max_n,
            min_freq,
            max_freq,
        }
    }

    fn verse(surah: u16, ayah: u16, text: &str) -> Verse {
        Verse::new(VerseKey::new(surah, ayah), text)
    }

    #[test]
    fn emits_expected_window_count() {
        // L = 6 distinct words, n in [2, 3]: (6-2+1) + (6-3+1) = 9 windows
        let verses = vec![verse(1, 1, "ا ب ج د ه و")];
        let normalizer = QuranNormalizer::new();
        let groups = extract(&verses, &normalizer, &config(2, 3, 1, 100));

        let total: usize = groups.values().map(Vec::len).sum();
        assert_eq!(total, 9);
    }

    #[test]
    fn windows_carry_one_based_inclusive_indices() {
        let verses = vec![verse(2, 5, "قال الذين كفروا")];
        let normalizer = QuranNormalizer::new();
        let groups = extract(&verses, &normalizer, &config(3, 3, 1, 100));

        assert_eq!(groups.len(), 1);
        let occs = groups.values().next().unwrap();
        assert_eq!(occs.len(), 1);
        assert_eq!(occs[0].start_word, 1);
        assert_eq!(occs[0].end_word, 3);
        assert_eq!(occs[0].raw_text, "قال الذين كفروا");
    }

    #[test]
    fn short_and_empty_verses_yield_nothing() {
        let verses = vec![verse(1, 1, "قال الذين"), verse(1, 2, ""), verse(1, 3, "   ")];
        let normalizer = QuranNormalizer::new();
        let groups = extract(&verses, &normalizer, &config(3, 7, 1, 100));
        assert!(groups.is_empty());
    }

    #[test]
    fn surface_variants_land_in_one_group() {
        // Same phrase with and without tashkeel
        let verses = vec![
            verse(1, 1, "قَالَ الَّذِينَ كَفَرُوا"),
            verse(9, 4, "قال الذين كفروا"),
        ];
        let normalizer = QuranNormalizer::new();
        let groups = extract(&verses, &normalizer, &config(3, 3, 1, 100));

        assert_eq!(groups.len(), 1);
        let occs = &groups["قال الذين كفروا"];
        assert_eq!(occs.len(), 2);
        // raw surface forms stay distinct
        assert_ne!(occs[0].raw_text, occs[1].raw_text);
    }

    #[test]
    fn drops_windows_collapsed_by_normalization() {
        // Middle token is pure tashkeel and vanishes, leaving 2 < min_n words
        let verses = vec![verse(1, 1, "قال ًٌ الذين")];
        let normalizer = QuranNormalizer::new();
        let groups = extract(&verses, &normalizer, &config(3, 3, 1, 100));
        assert!(groups.is_empty());
    }

    #[test]
    fn frequency_filter_boundaries() {
        let normalizer = QuranNormalizer::new();
        // "قال الذين كفروا" twice, "من قبلهم وذاقوا" once
        let verses = vec![
            verse(1, 1, "قال الذين كفروا"),
            verse(2, 2, "قال الذين كفروا"),
            verse(3, 3, "من قبلهم وذاقوا"),
        ];
        let groups = extract(&verses, &normalizer, &config(3, 3, 2, 60));
        let kept = filter_frequency(groups, &config(3, 3, 2, 60));
        assert_eq!(kept.len(), 1);
        assert!(kept.contains_key("قال الذين كفروا"));

        // min_freq - 1 occurrences: dropped
        let groups = extract(&verses[..1], &normalizer, &config(3, 3, 2, 60));
        let kept = filter_frequency(groups, &config(3, 3, 2, 60));
        assert!(kept.is_empty());

        // max_freq + 1 occurrences: dropped
        let many: Vec<Verse> = (1..=4)
            .map(|i| verse(1, i, "قال الذين كفروا"))
            .collect();
        let groups = extract(&many, &normalizer, &config(3, 3, 2, 3));
        let kept = filter_frequency(groups, &config(3, 3, 2, 3));
        assert!(kept.is_empty());
    }
}
