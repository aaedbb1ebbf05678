//! Text helpers for terminal output.
//!
//! All lengths are counted in `char`s, so multi-byte text is never cut in the
//! middle of a UTF-8 sequence.

use unicode_general_category::{get_general_category, GeneralCategory};

/// Character classes used to find word boundaries in camel-case text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Lower,
    Upper,
    Digit,
    Other,
}

impl CharClass {
    fn of(c: char) -> Self {
        if c.is_lowercase() {
            Self::Lower
        } else if c.is_uppercase() {
            Self::Upper
        } else if get_general_category(c) == GeneralCategory::DecimalNumber {
            Self::Digit
        } else {
            Self::Other
        }
    }
}

/// Split words that were glued together in camel case.
///
/// Characters are grouped into runs of the same class (lowercase, uppercase,
/// digit, other). An uppercase run followed by a lowercase run gives up its
/// last letter to the lowercase run, so acronyms stay intact.
///
/// ```
/// use cliutil::text::split_camel_case;
///
/// assert_eq!(split_camel_case("PDFLoader"), "PDF Loader");
/// assert_eq!(split_camel_case("netIncome2021"), "net Income 2021");
/// ```
pub fn split_camel_case(src: &str) -> String {
    let mut runs: Vec<Vec<char>> = Vec::new();
    let mut last_class = None;
    for c in src.chars() {
        let class = CharClass::of(c);
        if last_class == Some(class) {
            if let Some(run) = runs.last_mut() {
                run.push(c);
            }
        } else {
            runs.push(vec![c]);
        }
        last_class = Some(class);
    }

    // "PDFL", "oader" -> "PDF", "Loader"
    for i in 1..runs.len() {
        let (head, tail) = runs.split_at_mut(i);
        let prev = &mut head[i - 1];
        let next = &mut tail[0];
        let upper_then_lower = matches!(prev.first(), Some(c) if c.is_uppercase())
            && matches!(next.first(), Some(c) if c.is_lowercase());
        if upper_then_lower {
            if let Some(c) = prev.pop() {
                next.insert(0, c);
            }
        }
    }

    runs.iter()
        .map(|run| run.iter().collect::<String>())
        .filter_map(|word| {
            let word = word.trim();
            (!word.is_empty()).then(|| word.to_string())
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Cut `s` to its first `n` characters and append `"..."`.
///
/// `n == 0` disables trimming; strings of at most `n` characters are returned
/// unchanged.
pub fn trim_str(s: &str, n: usize) -> String {
    if n == 0 {
        return s.to_string();
    }
    match s.char_indices().nth(n) {
        Some((cut, _)) => format!("{}...", &s[..cut]),
        None => s.to_string(),
    }
}

/// Hard-wrap `s` every `line_len` characters, then trim the result to
/// `total_len` characters (see [`trim_str`]).
///
/// Strings that already fit on one line are returned unchanged, as is
/// everything when `line_len` is 0.
pub fn break_long_str(s: &str, line_len: usize, total_len: usize) -> String {
    if line_len == 0 || s.chars().count() <= line_len {
        return s.to_string();
    }

    let chars: Vec<char> = s.chars().collect();
    let wrapped = chars
        .chunks(line_len)
        .map(|line| line.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n");
    trim_str(&wrapped, total_len)
}

/// Apply [`break_long_str`] to every line of a paragraph.
///
/// Lines are trimmed of surrounding whitespace first.
///
/// ```
/// use cliutil::text::break_long_paragraph;
///
/// let wrapped = break_long_paragraph("  abcdef\nxy ", 4, 0);
/// assert_eq!(wrapped, "abcd\nef\nxy");
/// ```
pub fn break_long_paragraph(p: &str, line_len: usize, total_len: usize) -> String {
    p.split('\n')
        .map(|line| break_long_str(line.trim(), line_len, total_len))
        .collect::<Vec<_>>()
        .join("\n")
}
