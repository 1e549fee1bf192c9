use unicode_normalization::UnicodeNormalization;

/// Qur'anic Arabic text normalizer.
///
/// The output of [`QuranNormalizer::normalize`] is used as a dictionary key:
/// two spans of text that differ only in orthography (diacritics, hamza
/// carriers, taa marbuta spelling) normalize to the same string.
pub struct QuranNormalizer {
    /// Remove diacritical marks (tashkeel and small high marks)
    pub remove_diacritics: bool,
    /// Remove tatweel (kashida)
    pub remove_tatweel: bool,
    /// Remap superscript alef (dagger alef) to bare alef instead of
    /// stripping it with the other diacritics. It marks a long vowel,
    /// not a decoration.
    pub remap_superscript_alef: bool,
    /// Unify alef variants, taa marbuta and alef maqsura
    pub unify_letters: bool,
}

impl Default for QuranNormalizer {
    fn default() -> Self {
        Self {
            remove_diacritics: true,
            remove_tatweel: true,
            remap_superscript_alef: true,
            unify_letters: true,
        }
    }
}

impl QuranNormalizer {
    /// Create a normalizer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize a string of Arabic text.
    ///
    /// Processing order matters: NFKD decomposition first (so composed
    /// hamza/madda alef forms become bare alef plus a combining mark),
    /// then mark removal and letter unification, then punctuation
    /// replacement and whitespace collapsing.
    pub fn normalize(&self, text: &str) -> String {
        let mut result = String::with_capacity(text.len());
        let mut pending_space = false;

        for ch in text.nfkd() {
            // Superscript alef carries a long-vowel sound; remap it
            // before the diacritic strip would swallow it.
            if self.remap_superscript_alef && ch == '\u{0670}' {
                self.push_word_char(&mut result, &mut pending_space, '\u{0627}');
                continue;
            }

            if self.remove_diacritics && is_quran_diacritic(ch) {
                continue;
            }

            if self.remove_tatweel && ch == '\u{0640}' {
                continue;
            }

            if self.unify_letters {
                if let Some(unified) = unify_letter(ch) {
                    self.push_word_char(&mut result, &mut pending_space, unified);
                    continue;
                }
            }

            if !is_word_char(ch) {
                // Punctuation and whitespace both become a single
                // separating space.
                if !result.is_empty() {
                    pending_space = true;
                }
                continue;
            }

            self.push_word_char(&mut result, &mut pending_space, ch);
        }

        result
    }

    fn push_word_char(&self, result: &mut String, pending_space: &mut bool, ch: char) {
        if *pending_space {
            result.push(' ');
            *pending_space = false;
        }
        result.push(ch);
    }
}

/// Check if a character is a mark stripped during normalization.
///
/// Covers the tashkeel block, the combining marks NFKD produces when
/// decomposing hamza/madda alef forms, the superscript alef, and the
/// Qur'anic small high marks.
fn is_quran_diacritic(ch: char) -> bool {
    matches!(ch,
        '\u{064B}'..='\u{0652}' | // Fathatan to Sukun
        '\u{0653}'..='\u{0655}' | // Maddah, Hamza above/below
        '\u{065F}' |              // Wavy hamza below
        '\u{0670}' |              // Superscript alef
        '\u{06DF}'..='\u{06ED}'   // Qur'anic small high marks
    )
}

/// Unify letter variants to one canonical letter. The hamza/madda alef
/// forms also arrive decomposed after NFKD; those reduce to bare alef
/// through the diacritic strip instead.
fn unify_letter(ch: char) -> Option<char> {
    match ch {
        '\u{0622}' | '\u{0623}' | '\u{0625}' => Some('\u{0627}'), // alef variants -> bare alef
        '\u{0629}' => Some('\u{0647}'),                           // taa marbuta -> haa
        '\u{0649}' => Some('\u{064A}'),                           // alef maqsura -> yaa
        _ => None,
    }
}

/// Word characters survive normalization; everything else separates words.
fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}
