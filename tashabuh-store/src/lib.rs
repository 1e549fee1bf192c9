//! Phrase Persistence
//!
//! The writer contract the pipeline emits into, plus two implementations:
//! an in-memory store for tests and frequency passes, and a JSONL store
//! writing one record per line. A full rebuild calls [`PhraseWriter::clear`]
//! first; there is no incremental upsert.

use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tashabuh_corpus::VerseKey;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("unknown phrase id {0}")]
    UnknownPhrase(PhraseId),
}

/// Opaque identifier handed out by [`PhraseWriter::save_phrase`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhraseId(pub u64);

impl std::fmt::Display for PhraseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stored form of one canonical phrase.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhraseRecord {
    pub id: PhraseId,
    /// Raw surface form chosen for display
    pub text: String,
    pub normalized: String,
    pub length_words: usize,
    pub global_freq: usize,
}

/// Stored form of one phrase occurrence, word indices 1-based inclusive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OccurrenceRecord {
    pub phrase_id: PhraseId,
    pub verse: VerseKey,
    pub start_word: usize,
    pub end_word: usize,
}

/// Write-side contract of the phrase store.
///
/// The pipeline calls `clear` once, then `save_phrase` once per canonical
/// phrase and `save_occurrence` once per surviving occurrence.
pub trait PhraseWriter {
    /// Drop all previously stored phrases and occurrences.
    fn clear(&mut self) -> Result<(), StoreError>;

    fn save_phrase(
        &mut self,
        text: &str,
        normalized: &str,
        length_words: usize,
        global_freq: usize,
    ) -> Result<PhraseId, StoreError>;

    fn save_occurrence(
        &mut self,
        phrase_id: PhraseId,
        verse: VerseKey,
        start_word: usize,
        end_word: usize,
    ) -> Result<(), StoreError>;
}

/// In-memory store, mainly for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    phrases: Vec<PhraseRecord>,
    occurrences: Vec<OccurrenceRecord>,
    next_id: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phrases(&self) -> &[PhraseRecord] {
        &self.phrases
    }

    pub fn occurrences(&self) -> &[OccurrenceRecord] {
        &self.occurrences
    }

    pub fn occurrences_of(&self, phrase_id: PhraseId) -> Vec<&OccurrenceRecord> {
        self.occurrences
            .iter()
            .filter(|occ| occ.phrase_id == phrase_id)
            .collect()
    }
}

impl PhraseWriter for MemoryStore {
    fn clear(&mut self) -> Result<(), StoreError> {
        self.phrases.clear();
        self.occurrences.clear();
        self.next_id = 0;
        Ok(())
    }

    fn save_phrase(
        &mut self,
        text: &str,
        normalized: &str,
        length_words: usize,
        global_freq: usize,
    ) -> Result<PhraseId, StoreError> {
        let id = PhraseId(self.next_id);
        self.next_id += 1;
        self.phrases.push(PhraseRecord {
            id,
            text: text.to_string(),
            normalized: normalized.to_string(),
            length_words,
            global_freq,
        });
        Ok(id)
    }

    fn save_occurrence(
        &mut self,
        phrase_id: PhraseId,
        verse: VerseKey,
        start_word: usize,
        end_word: usize,
    ) -> Result<(), StoreError> {
        if !self.phrases.iter().any(|ph| ph.id == phrase_id) {
            return Err(StoreError::UnknownPhrase(phrase_id));
        }
        self.occurrences.push(OccurrenceRecord {
            phrase_id,
            verse,
            start_word,
            end_word,
        });
        Ok(())
    }
}

/// Line-oriented JSON store: `phrases.jsonl` and `occurrences.jsonl`
/// under one directory.
#[derive(Debug)]
pub struct JsonlStore {
    root: PathBuf,
    phrases: BufWriter<File>,
    occurrences: BufWriter<File>,
    next_id: u64,
    saved_phrases: u64,
}

impl JsonlStore {
    pub fn open(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        let phrases = Self::open_append(&root.join("phrases.jsonl"))?;
        let occurrences = Self::open_append(&root.join("occurrences.jsonl"))?;
        Ok(Self {
            root,
            phrases,
            occurrences,
            next_id: 0,
            saved_phrases: 0,
        })
    }

    fn open_append(path: &Path) -> Result<BufWriter<File>, StoreError> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(BufWriter::new(file))
    }

    fn open_truncate(path: &Path) -> Result<BufWriter<File>, StoreError> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        Ok(BufWriter::new(file))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Flush buffered lines to disk.
    pub fn flush(&mut self) -> Result<(), StoreError> {
        self.phrases.flush()?;
        self.occurrences.flush()?;
        Ok(())
    }
}

impl PhraseWriter for JsonlStore {
    fn clear(&mut self) -> Result<(), StoreError> {
        self.phrases = Self::open_truncate(&self.root.join("phrases.jsonl"))?;
        self.occurrences = Self::open_truncate(&self.root.join("occurrences.jsonl"))?;
        self.next_id = 0;
        self.saved_phrases = 0;
        Ok(())
    }

    fn save_phrase(
        &mut self,
        text: &str,
        normalized: &str,
        length_words: usize,
        global_freq: usize,
    ) -> Result<PhraseId, StoreError> {
        let id = PhraseId(self.next_id);
        self.next_id += 1;
        let record = PhraseRecord {
            id,
            text: text.to_string(),
            normalized: normalized.to_string(),
            length_words,
            global_freq,
        };
        let line = serde_json::to_string(&record)?;
        writeln!(self.phrases, "{line}")?;
        self.saved_phrases = self.next_id;
        Ok(id)
    }

    fn save_occurrence(
        &mut self,
        phrase_id: PhraseId,
        verse: VerseKey,
        start_word: usize,
        end_word: usize,
    ) -> Result<(), StoreError> {
        if phrase_id.0 >= self.saved_phrases {
            return Err(StoreError::UnknownPhrase(phrase_id));
        }
        let record = OccurrenceRecord {
            phrase_id,
            verse,
            start_word,
            end_word,
        };
        let line = serde_json::to_string(&record)?;
        writeln!(self.occurrences, "{line}")?;
        Ok(())
    }
}
