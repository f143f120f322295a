//! Fitting generated text to a platform's length limit.

const ELLIPSIS: char = '…';

/// Trim `text` and cut it to at most `max_chars` characters.
///
/// Text that has to be cut ends in an ellipsis, which counts toward the limit.
/// Cuts prefer the last whitespace in the kept part so words stay whole.
///
/// # Examples
///
/// ```
/// use herald_social::fit_to_limit;
///
/// assert_eq!(fit_to_limit("  short  ", 280), "short");
/// assert_eq!(fit_to_limit("one two three", 9), "one two…");
/// ```
pub fn fit_to_limit(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }

    let keep = max_chars - 1;
    let end = trimmed
        .char_indices()
        .nth(keep)
        .map(|(idx, _)| idx)
        .unwrap_or(trimmed.len());
    let head = &trimmed[..end];

    let cut = match head.rfind(char::is_whitespace) {
        Some(space) if space > 0 => head[..space].trim_end(),
        _ => head,
    };

    let mut fitted = String::with_capacity(cut.len() + ELLIPSIS.len_utf8());
    fitted.push_str(cut);
    fitted.push(ELLIPSIS);
    fitted
}
