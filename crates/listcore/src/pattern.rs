//! Recognition of list markers at the start of a line.
//!
//! A marker line looks like `[opener] token [closer] [separator] rest`, where
//! the opener is one of `( [ 【 （`, the closer one of `) ] 】 ）` and the
//! separator `.` or `、`. Either a closer or a separator must end the token.
//! Opener and closer are matched by position only, so `(a] foo` is accepted.

use crate::codec::MarkerFamily;

pub const OPENING_BRACKETS: [char; 4] = ['(', '[', '【', '（'];
pub const CLOSING_BRACKETS: [char; 4] = [')', ']', '】', '）'];
pub const SEPARATORS: [char; 2] = ['.', '、'];

/// Full-width separator; continuation does not add a space after it.
pub const IDEOGRAPHIC_COMMA: char = '、';

/// A line split into bracket decoration, marker token, separator and the
/// remaining text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineDecomposition<'a> {
    pub left_bracket: Option<char>,
    pub marker: &'a str,
    pub right_bracket: Option<char>,
    pub separator: Option<char>,
    pub rest: &'a str,
    /// Length in chars of everything before `rest`.
    pub prefix_len: usize,
}

impl<'a> LineDecomposition<'a> {
    /// The decomposition of a line that does not follow the marker grammar.
    pub fn plain(line: &'a str) -> Self {
        Self {
            left_bracket: None,
            marker: "",
            right_bracket: None,
            separator: None,
            rest: line,
            prefix_len: 0,
        }
    }

    pub fn is_plain(&self) -> bool {
        self.marker.is_empty()
    }

    pub fn has_brackets(&self) -> bool {
        self.left_bracket.is_some() || self.right_bracket.is_some()
    }

    /// Marker token, separator and rest of the line, without brackets.
    pub fn body(&self) -> String {
        let mut body = String::with_capacity(self.marker.len() + self.rest.len() + 3);
        body.push_str(self.marker);
        if let Some(sep) = self.separator {
            body.push(sep);
        }
        body.push_str(self.rest);
        body
    }

    /// Whether nothing but whitespace follows the marker.
    pub fn rest_is_blank(&self) -> bool {
        self.rest.trim().is_empty()
    }

    /// Rebuilds the marker prefix around a new token, keeping this line's
    /// brackets and separator.
    pub fn with_token(&self, token: &str) -> String {
        let mut prefix = String::new();
        if let Some(open) = self.left_bracket {
            prefix.push(open);
        }
        prefix.push_str(token);
        if let Some(close) = self.right_bracket {
            prefix.push(close);
        }
        if let Some(sep) = self.separator {
            prefix.push(sep);
        }
        prefix
    }
}

/// Splits `line` into its marker parts, or returns [`LineDecomposition::plain`]
/// when the grammar does not match.
pub fn decompose(line: &str) -> LineDecomposition<'_> {
    let left_bracket = line.chars().next().filter(|c| OPENING_BRACKETS.contains(c));
    let marker_start = left_bracket.map_or(0, char::len_utf8);
    let after_open = &line[marker_start..];

    let Some(marker_len) =
        after_open.find(|c: char| CLOSING_BRACKETS.contains(&c) || SEPARATORS.contains(&c))
    else {
        return LineDecomposition::plain(line);
    };
    let marker = &after_open[..marker_len];
    if marker.is_empty() {
        return LineDecomposition::plain(line);
    }

    let mut pos = marker_start + marker_len;
    let right_bracket = take_one(line, &mut pos, &CLOSING_BRACKETS);
    let separator = take_one(line, &mut pos, &SEPARATORS);

    LineDecomposition {
        left_bracket,
        marker,
        right_bracket,
        separator,
        rest: &line[pos..],
        prefix_len: line[..pos].chars().count(),
    }
}

fn take_one(line: &str, pos: &mut usize, set: &[char]) -> Option<char> {
    let c = line[*pos..].chars().next().filter(|c| set.contains(c))?;
    *pos += c.len_utf8();
    Some(c)
}

/// Finds the family whose marker grammar, followed by `.` or `、`, matches the
/// start of `text`. Families are tried in [`MarkerFamily::ALL`] order and the
/// first match wins, so `C.` is an uppercase letter rather than a roman 100.
pub fn identify(text: &str) -> Option<MarkerFamily> {
    identify_in(text, &MarkerFamily::ALL)
}

/// [`identify`] restricted to `families`, keeping their priority order.
pub fn identify_in(text: &str, families: &[MarkerFamily]) -> Option<MarkerFamily> {
    MarkerFamily::ALL
        .into_iter()
        .filter(|family| families.contains(family))
        .find(|&family| {
            let run_len: usize = text
                .chars()
                .take_while(|&c| family.is_marker_char(c))
                .map(char::len_utf8)
                .sum();
            let (run, tail) = text.split_at(run_len);
            family.matches(run) && tail.starts_with(&SEPARATORS[..])
        })
}

/// Classifies a decomposed line. Bracketed markers are judged on their token
/// alone; bare markers go through [`identify`] on the line body.
pub fn classify(line: &LineDecomposition<'_>) -> Option<MarkerFamily> {
    classify_in(line, &MarkerFamily::ALL)
}

pub fn classify_in(line: &LineDecomposition<'_>, families: &[MarkerFamily]) -> Option<MarkerFamily> {
    if line.is_plain() {
        return None;
    }
    if line.has_brackets() {
        MarkerFamily::ALL
            .into_iter()
            .filter(|family| families.contains(family))
            .find(|family| family.matches(line.marker))
    } else {
        identify_in(&line.body(), families)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decompose_dot_marker() {
        let d = decompose("1. first");
        assert_eq!(d.left_bracket, None);
        assert_eq!(d.marker, "1");
        assert_eq!(d.right_bracket, None);
        assert_eq!(d.separator, Some('.'));
        assert_eq!(d.rest, " first");
        assert_eq!(d.prefix_len, 2);
        assert_eq!(d.body(), "1. first");
    }

    #[test]
    fn test_decompose_brackets() {
        let d = decompose("(a) foo");
        assert_eq!(d.left_bracket, Some('('));
        assert_eq!(d.marker, "a");
        assert_eq!(d.right_bracket, Some(')'));
        assert_eq!(d.separator, None);
        assert_eq!(d.rest, " foo");
        assert_eq!(d.prefix_len, 3);

        let d = decompose("【三】、内容");
        assert_eq!(d.left_bracket, Some('【'));
        assert_eq!(d.marker, "三");
        assert_eq!(d.right_bracket, Some('】'));
        assert_eq!(d.separator, Some('、'));
        assert_eq!(d.rest, "内容");
        assert_eq!(d.prefix_len, 4);
    }

    #[test]
    fn test_decompose_accepts_mismatched_brackets() {
        let d = decompose("(a] foo");
        assert_eq!(d.left_bracket, Some('('));
        assert_eq!(d.right_bracket, Some(']'));
        assert_eq!(classify(&d), Some(MarkerFamily::LowercaseLetter));

        let d = decompose("b) bar");
        assert_eq!(d.left_bracket, None);
        assert_eq!(d.right_bracket, Some(')'));
        assert_eq!(classify(&d), Some(MarkerFamily::LowercaseLetter));
    }

    #[test]
    fn test_decompose_plain_lines() {
        assert!(decompose("no marker here").is_plain());
        assert!(decompose("").is_plain());
        assert!(decompose(". leading separator").is_plain());
        assert_eq!(decompose("plain").rest, "plain");
    }

    #[test]
    fn test_identify_priority() {
        assert_eq!(identify("1. x"), Some(MarkerFamily::Arabic));
        assert_eq!(identify("C. x"), Some(MarkerFamily::UppercaseLetter));
        assert_eq!(identify("CD. x"), Some(MarkerFamily::RomanNumeral));
        assert_eq!(identify("i. x"), Some(MarkerFamily::LowercaseLetter));
        assert_eq!(identify("iv、x"), Some(MarkerFamily::RomanNumeral));
        assert_eq!(identify("三、x"), Some(MarkerFamily::ChineseNumeral));
        assert_eq!(identify("a) x"), None);
        assert_eq!(identify("12a. x"), None);
        assert_eq!(identify("Hello. x"), None);
    }

    #[test]
    fn test_identify_in_respects_filter() {
        let no_letters = [MarkerFamily::Arabic, MarkerFamily::RomanNumeral];
        assert_eq!(identify_in("C. x", &no_letters), Some(MarkerFamily::RomanNumeral));
        assert_eq!(identify_in("b. x", &no_letters), None);
    }

    #[test]
    fn test_classify_sentence_is_not_marker() {
        assert_eq!(classify(&decompose("Wrap it up.")), None);
        assert_eq!(classify(&decompose("see (a) below")), None);
    }
}
