//! Display-width-aware word wrapping.
//!
//! The transcript needs exact row counts for bottom-anchored scrolling, so
//! wrapping happens here rather than inside `Paragraph`.

use unicode_width::UnicodeWidthStr;

/// Wrap one logical line into rows no wider than `width` columns.
///
/// Breaks at spaces where possible; a single word wider than the row is
/// split hard. Always yields at least one (possibly empty) row.
pub(crate) fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();
    let mut current = String::new();
    let mut current_width = 0usize;

    for word in text.split(' ') {
        let mut word = word;
        loop {
            let word_width = word.width();
            let sep = usize::from(!current.is_empty());
            if current_width + sep + word_width <= width {
                if sep == 1 {
                    current.push(' ');
                }
                current.push_str(word);
                current_width += sep + word_width;
                break;
            }
            if current.is_empty() {
                // Word alone is too wide: split at the last fitting char.
                let mut split = word.len();
                let mut acc = 0usize;
                for (offset, c) in word.char_indices() {
                    let w = c.to_string().width();
                    if acc + w > width {
                        split = offset;
                        break;
                    }
                    acc += w;
                }
                let split = split.max(word.chars().next().map_or(0, char::len_utf8));
                rows.push(word[..split].to_string());
                word = &word[split..];
                if word.is_empty() {
                    break;
                }
            } else {
                rows.push(std::mem::take(&mut current));
                current_width = 0;
            }
        }
    }

    rows.push(current);
    rows
}

#[cfg(test)]
mod tests {
    use super::wrap_text;

    #[test]
    fn short_line_is_one_row() {
        assert_eq!(wrap_text("hello there", 20), vec!["hello there"]);
    }

    #[test]
    fn breaks_at_spaces() {
        assert_eq!(
            wrap_text("apply for a pan card", 9),
            vec!["apply for", "a pan", "card"]
        );
    }

    #[test]
    fn splits_overlong_words() {
        assert_eq!(wrap_text("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn empty_line_is_one_empty_row() {
        assert_eq!(wrap_text("", 10), vec![""]);
    }
}
