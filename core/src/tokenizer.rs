use lazy_static::lazy_static;
use std::collections::HashSet;

lazy_static! {
    /// Czech letters that count as word characters besides ASCII alphanumerics.
    static ref DIACRITICS: HashSet<char> = "áčďéěíňóřšťúůýž".chars().collect();
}

fn is_word_char(c: char) -> bool {
    if c.is_ascii_alphanumeric() {
        return true;
    }
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => DIACRITICS.contains(&l),
        _ => false,
    }
}

/// Strip delimiter characters from both ends of `word`.
///
/// Only ASCII alphanumerics and the Czech diacritic letters (either case) stop
/// the stripping, so `"(Dobrý)."` becomes `"Dobrý"` while `"über"` becomes `"ber"`.
/// A word made only of delimiters collapses to the empty string.
pub fn remove_delimiters(word: &str) -> String {
    word.trim_matches(|c: char| !is_word_char(c)).to_string()
}

/// Split a line on whitespace and strip delimiters from every piece.
///
/// Empty tokens are kept in place; callers decide whether they matter.
pub fn tokenize_line(line: &str) -> Vec<String> {
    line.split_whitespace().map(remove_delimiters).collect()
}
