//! Arabic Text Normalization
//!
//! Canonicalizes Qur'anic Arabic so that surface variants of the same
//! phrase compare equal:
//! - NFKD decomposition
//! - Diacritics (tashkeel) removal, including small high marks
//! - Tatweel (kashida) removal
//! - Character unification (alef, taa marbuta, alef maqsura)
//! - Punctuation stripping and whitespace collapsing

mod normalizer;

pub use normalizer::QuranNormalizer;
