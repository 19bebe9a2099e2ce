//! Progress and word-index math for boundary events.
//!
//! Engines report boundaries as character offsets into the utterance text.
//! All offsets here count Unicode scalar values, never bytes.
//!
//! The word index is an approximation: it names the word whose start is the
//! last one at or before the reported offset, which is as precise as the
//! engine's boundary granularity allows.

/// Length of `text` in Unicode scalar values.
#[must_use]
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Percentage of a `text_len`-character text spoken once `char_index` is reached.
///
/// Capped at 100. Returns `None` for empty text, where progress is undefined.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn progress_percent(char_index: usize, text_len: usize) -> Option<f64> {
    if text_len == 0 {
        return None;
    }
    let percent = char_index as f64 / text_len as f64 * 100.0;
    Some(percent.min(100.0))
}

/// Whitespace-delimited words of `text`, in order.
///
/// `words(text)[i]` is the word a `current_word_index` of `i` designates.
#[must_use]
pub fn words(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Character offsets at which each word of `text` starts.
#[must_use]
pub fn word_starts(text: &str) -> Vec<usize> {
    let mut starts = Vec::new();
    let mut in_word = false;
    for (offset, ch) in text.chars().enumerate() {
        let is_word_char = !ch.is_whitespace();
        if is_word_char && !in_word {
            starts.push(offset);
        }
        in_word = is_word_char;
    }
    starts
}

/// Index of the word being spoken when the engine reports `char_index`.
///
/// Counts the words that start at or before `char_index`, minus one, floored
/// at zero. Offsets past the end of the text resolve to the last word.
#[must_use]
pub fn word_index(text: &str, char_index: usize) -> usize {
    word_starts(text)
        .into_iter()
        .take_while(|&start| start <= char_index)
        .count()
        .saturating_sub(1)
}
