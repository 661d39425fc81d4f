//! Option letter normalization for Latin (a-d) and Arabic (أ ب ج د) labels.

pub const LATIN_LETTERS: [char; 4] = ['a', 'b', 'c', 'd'];
pub const ARABIC_LETTERS: [char; 4] = ['أ', 'ب', 'ج', 'د'];

/// Maps an option letter to its zero-based index. Latin letters are case-insensitive.
pub fn letter_index(letter: char) -> Option<usize> {
    let lower = letter.to_ascii_lowercase();
    LATIN_LETTERS
        .iter()
        .position(|c| *c == lower)
        .or_else(|| ARABIC_LETTERS.iter().position(|c| *c == letter))
}

/// Maps the first character of a captured letter group.
pub fn parse_letter(captured: &str) -> Option<usize> {
    let mut chars = captured.trim().chars();
    let letter = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    letter_index(letter)
}

/// Label used when rendering option `index`, `None` past the fourth option.
pub fn option_label(index: usize, arabic: bool) -> Option<char> {
    if arabic {
        ARABIC_LETTERS.get(index).copied()
    } else {
        LATIN_LETTERS.get(index).copied()
    }
}
