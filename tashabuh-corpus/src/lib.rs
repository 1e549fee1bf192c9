//! Corpus Input Layer
//!
//! Verse identity and text types plus loaders for the Qur'an metadata
//! files (ayah text and juz verse mappings). The loaders restrict the
//! corpus to a juz range and return verses in canonical order
//! (surah, then ayah number) so downstream tie-breaks are reproducible.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("invalid verse key {0:?}, expected \"surah:ayah\"")]
    InvalidVerseKey(String),

    #[error("invalid ayah range {0:?}, expected \"first-last\"")]
    InvalidAyahRange(String),

    #[error("invalid juz range {from}..={to}, juz numbers run 1..=30")]
    InvalidJuzRange { from: u32, to: u32 },
}

/// Identifier of a single verse, ordered by surah then ayah number.
///
/// Serialized as the conventional `"surah:ayah"` key string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VerseKey {
    pub surah: u16,
    pub ayah: u16,
}

impl VerseKey {
    pub fn new(surah: u16, ayah: u16) -> Self {
        Self { surah, ayah }
    }
}

impl fmt::Display for VerseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.surah, self.ayah)
    }
}

impl FromStr for VerseKey {
    type Err = CorpusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (surah, ayah) = s
            .split_once(':')
            .ok_or_else(|| CorpusError::InvalidVerseKey(s.to_string()))?;
        let surah = surah
            .trim()
            .parse()
            .map_err(|_| CorpusError::InvalidVerseKey(s.to_string()))?;
        let ayah = ayah
            .trim()
            .parse()
            .map_err(|_| CorpusError::InvalidVerseKey(s.to_string()))?;
        Ok(Self { surah, ayah })
    }
}

impl Serialize for VerseKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for VerseKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(|_| {
            D::Error::custom(format!("invalid verse key {raw:?}, expected \"surah:ayah\""))
        })
    }
}

/// A verse of the input corpus: immutable text plus its key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Verse {
    pub key: VerseKey,
    pub text: String,
}

impl Verse {
    pub fn new(key: VerseKey, text: impl Into<String>) -> Self {
        Self {
            key,
            text: text.into(),
        }
    }

    /// Whitespace-separated words of the verse text.
    pub fn words(&self) -> Vec<&str> {
        self.text.split_whitespace().collect()
    }
}

/// Inclusive juz range restricting which verses are loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JuzRange {
    pub from: u32,
    pub to: u32,
}

impl JuzRange {
    pub fn new(from: u32, to: u32) -> Self {
        Self { from, to }
    }

    pub fn validate(&self) -> Result<(), CorpusError> {
        if self.from == 0 || self.to > 30 || self.from > self.to {
            return Err(CorpusError::InvalidJuzRange {
                from: self.from,
                to: self.to,
            });
        }
        Ok(())
    }

    pub fn contains(&self, juz: u32) -> bool {
        (self.from..=self.to).contains(&juz)
    }
}

/// One verse record of `quran-metadata-ayah.json` (keyed by ayah id).
#[derive(Debug, Deserialize)]
struct AyahMeta {
    verse_key: VerseKey,
    text: String,
}

/// One juz record of `quran-metadata-juz.json`: surah number (as a
/// string key) to an inclusive `"first-last"` ayah range.
#[derive(Debug, Deserialize)]
struct JuzMeta {
    #[serde(default)]
    verse_mapping: HashMap<String, String>,
}

fn parse_ayah_range(raw: &str) -> Result<(u16, u16), CorpusError> {
    let (first, last) = raw
        .split_once('-')
        .ok_or_else(|| CorpusError::InvalidAyahRange(raw.to_string()))?;
    let first = first
        .trim()
        .parse()
        .map_err(|_| CorpusError::InvalidAyahRange(raw.to_string()))?;
    let last = last
        .trim()
        .parse()
        .map_err(|_| CorpusError::InvalidAyahRange(raw.to_string()))?;
    Ok((first, last))
}

/// Expand the juz metadata into the set of verse keys belonging to the
/// given juz range.
pub fn verse_keys_in_range(
    juz_path: &Path,
    range: JuzRange,
) -> Result<HashSet<VerseKey>, CorpusError> {
    range.validate()?;
    let raw = fs::read_to_string(juz_path)?;
    let juz_data: HashMap<String, JuzMeta> = serde_json::from_str(&raw)?;

    let mut keys = HashSet::new();
    for (juz_no, meta) in &juz_data {
        let juz_no: u32 = match juz_no.trim().parse() {
            Ok(n) => n,
            Err(_) => continue,
        };
        if !range.contains(juz_no) {
            continue;
        }
        for (surah, ayah_range) in &meta.verse_mapping {
            let surah: u16 = surah
                .trim()
                .parse()
                .map_err(|_| CorpusError::InvalidVerseKey(surah.clone()))?;
            let (first, last) = parse_ayah_range(ayah_range)?;
            for ayah in first..=last {
                keys.insert(VerseKey::new(surah, ayah));
            }
        }
    }
    Ok(keys)
}

/// Load the verses of the given juz range, sorted by verse key.
pub fn load_corpus(
    ayah_path: &Path,
    juz_path: &Path,
    range: JuzRange,
) -> Result<Vec<Verse>, CorpusError> {
    let keys = verse_keys_in_range(juz_path, range)?;

    let raw = fs::read_to_string(ayah_path)?;
    let ayah_data: HashMap<String, AyahMeta> = serde_json::from_str(&raw)?;

    let mut verses: Vec<Verse> = ayah_data
        .into_values()
        .filter(|meta| keys.contains(&meta.verse_key))
        .map(|meta| Verse::new(meta.verse_key, meta.text))
        .collect();
    verses.sort_by_key(|verse| verse.key);
    Ok(verses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn verse_key_roundtrip() {
        let key: VerseKey = "2:255".parse().unwrap();
        assert_eq!(key, VerseKey::new(2, 255));
        assert_eq!(key.to_string(), "2:255");

        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"2:255\"");
        let back: VerseKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }

    #[test]
    fn verse_key_rejects_garbage() {
        assert!("255".parse::<VerseKey>().is_err());
        assert!("a:b".parse::<VerseKey>().is_err());
        assert!("".parse::<VerseKey>().is_err());
    }

    #[test]
    fn verse_keys_order_by_surah_then_ayah() {
        let mut keys = vec![
            VerseKey::new(2, 1),
            VerseKey::new(1, 7),
            VerseKey::new(1, 2),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                VerseKey::new(1, 2),
                VerseKey::new(1, 7),
                VerseKey::new(2, 1),
            ]
        );
    }

    #[test]
    fn juz_range_validation() {
        assert!(JuzRange::new(1, 4).validate().is_ok());
        assert!(JuzRange::new(0, 4).validate().is_err());
        assert!(JuzRange::new(5, 4).validate().is_err());
        assert!(JuzRange::new(1, 31).validate().is_err());
    }

    #[test]
    fn loads_verses_in_scope_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let juz_path = dir.path().join("juz.json");
        let ayah_path = dir.path().join("ayah.json");

        let juz_json = serde_json::json!({
            "1": { "verse_mapping": { "1": "1-2" } },
            "2": { "verse_mapping": { "2": "142-143" } }
        });
        let ayah_json = serde_json::json!({
            "1": { "verse_key": "1:1", "text": "بسم الله" },
            "2": { "verse_key": "1:2", "text": "الحمد لله" },
            "3": { "verse_key": "2:142", "text": "سيقول السفهاء" }
        });

        let mut f = std::fs::File::create(&juz_path).unwrap();
        write!(f, "{juz_json}").unwrap();
        let mut f = std::fs::File::create(&ayah_path).unwrap();
        write!(f, "{ayah_json}").unwrap();

        let verses = load_corpus(&ayah_path, &juz_path, JuzRange::new(1, 1)).unwrap();
        assert_eq!(verses.len(), 2);
        assert_eq!(verses[0].key, VerseKey::new(1, 1));
        assert_eq!(verses[1].key, VerseKey::new(1, 2));

        let all = load_corpus(&ayah_path, &juz_path, JuzRange::new(1, 2)).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[2].key, VerseKey::new(2, 142));
    }

    #[test]
    fn malformed_ayah_range_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let juz_path = dir.path().join("juz.json");
        let mut f = std::fs::File::create(&juz_path).unwrap();
        write!(f, "{}", serde_json::json!({"1": {"verse_mapping": {"1": "seven"}}})).unwrap();

        let err = verse_keys_in_range(&juz_path, JuzRange::new(1, 1)).unwrap_err();
        assert!(matches!(err, CorpusError::InvalidAyahRange(_)));
    }
}
