//! Helvetica metrics, word wrapping, and WinAnsi encoding.

/// Advance widths (1/1000 em) of Helvetica for ASCII 32..=126.
const HELVETICA_ASCII_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

const DEFAULT_WIDTH: u16 = 556;

/// Helvetica ascent as a fraction of the font size.
pub(crate) const ASCENT: f32 = 0.718;

fn char_width(c: char) -> u16 {
    match c {
        ' '..='~' => HELVETICA_ASCII_WIDTHS[c as usize - 32],
        '\u{2018}' | '\u{2019}' => 222,
        '\u{201C}' | '\u{201D}' => 333,
        '\u{2026}' | '\u{2014}' => 1000,
        _ => DEFAULT_WIDTH,
    }
}

/// Rendered width of `text` at `size` points.
pub(crate) fn text_width(text: &str, size: f32) -> f32 {
    let units: u32 = text.chars().map(|c| u32::from(char_width(c))).sum();
    #[allow(clippy::cast_precision_loss)]
    let units = units as f32;
    units * size / 1000.0
}

/// Greedy word wrap. Explicit newlines start a new line; words wider than
/// `max_width` are broken between characters.
pub(crate) fn wrap(text: &str, max_width: f32, size: f32) -> Vec<String> {
    let mut lines = Vec::new();
    if text.trim().is_empty() {
        return lines;
    }

    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_owned()
            } else {
                format!("{current} {word}")
            };
            if text_width(&candidate, size) <= max_width {
                current = candidate;
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if text_width(word, size) <= max_width {
                current = word.to_owned();
            } else {
                for piece in break_word(word, max_width, size) {
                    if !current.is_empty() {
                        lines.push(std::mem::take(&mut current));
                    }
                    current = piece;
                }
            }
        }
        lines.push(current);
    }
    lines
}

fn break_word(word: &str, max_width: f32, size: f32) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    for c in word.chars() {
        current.push(c);
        if text_width(&current, size) > max_width && current.chars().count() > 1 {
            current.pop();
            pieces.push(std::mem::take(&mut current));
            current.push(c);
        }
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

/// Encodes `text` for a WinAnsiEncoding font. Characters with no WinAnsi code
/// become `?`.
pub(crate) fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{2026}' => 0x85,
            ' '..='~' | '\u{A0}'..='\u{FF}' => u8::try_from(u32::from(c)).unwrap_or(b'?'),
            _ => b'?',
        })
        .collect()
}

/// Encodes `text` as a PDF text string: UTF-16BE behind a byte order mark,
/// for document metadata outside any font encoding.
pub(crate) fn encode_text_string(text: &str) -> Vec<u8> {
    let mut bytes = vec![0xFE, 0xFF];
    bytes.extend(text.encode_utf16().flat_map(u16::to_be_bytes));
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_uses_helvetica_metrics() {
        // "Hi" = H(722) + i(222) = 944 units.
        assert!((text_width("Hi", 10.0) - 9.44).abs() < 0.001);
    }

    #[test]
    fn test_short_text_is_a_single_line() {
        assert_eq!(wrap("Ana shares her toy.", 500.0, 14.0), vec!["Ana shares her toy."]);
    }

    #[test]
    fn test_wrap_respects_max_width() {
        let text = "Tucked in and cozy, Ana dreams of tomorrow and more kindness with her friends.";

        let lines = wrap(text, 150.0, 14.0);

        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, 14.0) <= 150.0, "line too wide: {line}");
        }
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn test_overlong_word_is_broken() {
        let lines = wrap(&"W".repeat(40), 100.0, 14.0);

        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), "W".repeat(40));
    }

    #[test]
    fn test_blank_text_has_no_lines() {
        assert!(wrap("   ", 100.0, 14.0).is_empty());
    }

    #[test]
    fn test_win_ansi_maps_typographic_quotes() {
        assert_eq!(encode_win_ansi("Ana\u{2019}s"), b"Ana\x92s".to_vec());
        assert_eq!(encode_win_ansi("caf\u{e9}"), b"caf\xe9".to_vec());
        assert_eq!(encode_win_ansi("\u{1F319}"), b"?".to_vec());
    }

    #[test]
    fn test_text_string_is_utf16_with_byte_order_mark() {
        assert_eq!(
            encode_text_string("A\u{2019}"),
            vec![0xFE, 0xFF, 0x00, 0x41, 0x20, 0x19]
        );
    }
}
