/// Raw span bounds as they appear in the match list, before sanitation.
pub type Span = (i64, i64);

/// Coerce a raw span to 1-based inclusive word indices within a verse
/// of `word_count` words.
///
/// A bound of 0 marks the span as 0-based and shifts both bounds up;
/// inverted bounds are swapped; out-of-range bounds are clamped. An
/// empty verse or a negative bound yields `None`.
pub fn sanitize_span(span: Span, word_count: usize) -> Option<(usize, usize)> {
    if word_count == 0 {
        return None;
    }
    let (mut start, mut end) = span;
    if start < 0 || end < 0 {
        return None;
    }
    if start == 0 || end == 0 {
        start += 1;
        end += 1;
    }
    if start > end {
        std::mem::swap(&mut start, &mut end);
    }
    let clamp = |v: i64| (v.max(1) as usize).min(word_count);
    Some((clamp(start), clamp(end)))
}

/// Locate the first exact occurrence of `phrase_words` in the
/// normalized words of a verse, returning 1-based inclusive bounds.
pub fn find_span(verse_words: &[String], phrase_words: &[&str]) -> Option<(usize, usize)> {
    let len = phrase_words.len();
    if len == 0 || len > verse_words.len() {
        return None;
    }
    verse_words
        .windows(len)
        .position(|window| window.iter().map(String::as_str).eq(phrase_words.iter().copied()))
        .map(|start| (start + 1, start + len))
}
