//! Conversion between marker text and ordinals for each marker family.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The numbering systems a list marker can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerFamily {
    Arabic,
    UppercaseLetter,
    LowercaseLetter,
    RomanNumeral,
    ChineseNumeral,
}

impl MarkerFamily {
    /// All families in recognition priority order.
    pub const ALL: [MarkerFamily; 5] = [
        MarkerFamily::Arabic,
        MarkerFamily::UppercaseLetter,
        MarkerFamily::LowercaseLetter,
        MarkerFamily::RomanNumeral,
        MarkerFamily::ChineseNumeral,
    ];

    /// Whether `c` can appear inside a marker token of this family.
    pub fn is_marker_char(self, c: char) -> bool {
        match self {
            MarkerFamily::Arabic => c.is_ascii_digit(),
            MarkerFamily::UppercaseLetter => c.is_ascii_uppercase(),
            MarkerFamily::LowercaseLetter => c.is_ascii_lowercase(),
            MarkerFamily::RomanNumeral => roman_value(c).is_some(),
            MarkerFamily::ChineseNumeral => CHINESE_ORDINALS.contains_key(&c),
        }
    }

    /// Whether the whole of `token` is a marker of this family.
    pub fn matches(self, token: &str) -> bool {
        if token.is_empty() || !token.chars().all(|c| self.is_marker_char(c)) {
            return false;
        }
        match self {
            MarkerFamily::UppercaseLetter | MarkerFamily::LowercaseLetter => {
                token.chars().count() == 1
            }
            // "Iv" is not a numeral
            MarkerFamily::RomanNumeral => {
                token.chars().all(|c| c.is_ascii_uppercase())
                    || token.chars().all(|c| c.is_ascii_lowercase())
            }
            MarkerFamily::Arabic | MarkerFamily::ChineseNumeral => true,
        }
    }
}

const ROMAN_TABLE: [(u32, &str); 13] = [
    (1000, "M"),
    (900, "CM"),
    (500, "D"),
    (400, "CD"),
    (100, "C"),
    (90, "XC"),
    (50, "L"),
    (40, "XL"),
    (10, "X"),
    (9, "IX"),
    (5, "V"),
    (4, "IV"),
    (1, "I"),
];

const ROMAN_MAX: u32 = 3999;

const CHINESE_NUMERALS: [&str; 11] = ["零", "一", "二", "三", "四", "五", "六", "七", "八", "九", "十"];

lazy_static! {
    static ref CHINESE_ORDINALS: HashMap<char, u32> = "一二三四五六七八九十"
        .chars()
        .zip(1..)
        .collect();
}

fn roman_value(c: char) -> Option<u32> {
    match c.to_ascii_uppercase() {
        'I' => Some(1),
        'V' => Some(5),
        'X' => Some(10),
        'L' => Some(50),
        'C' => Some(100),
        'D' => Some(500),
        'M' => Some(1000),
        _ => None,
    }
}

/// Parses a marker token into its ordinal.
///
/// `None` means the sequence cannot be continued from this token: the text is
/// not a marker of `family`, or it denotes zero.
pub fn decode(text: &str, family: MarkerFamily) -> Option<u32> {
    let ordinal = match family {
        MarkerFamily::Arabic => text.parse::<u32>().ok()?,
        MarkerFamily::UppercaseLetter => letter_ordinal(text, b'A')?,
        MarkerFamily::LowercaseLetter => letter_ordinal(text, b'a')?,
        MarkerFamily::RomanNumeral => decode_roman(text)?,
        MarkerFamily::ChineseNumeral => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => CHINESE_ORDINALS.get(&c).copied()?,
                _ => return None,
            }
        }
    };
    (ordinal > 0).then_some(ordinal)
}

/// Renders `ordinal` as a marker token of `family`.
///
/// Returns `None` outside the family's range: letters cover 1..=26, roman
/// numerals 1..=3999 and Chinese numerals 0..=10.
pub fn encode(ordinal: u32, family: MarkerFamily) -> Option<String> {
    match family {
        MarkerFamily::Arabic => Some(ordinal.to_string()),
        MarkerFamily::UppercaseLetter => letter(ordinal, b'A'),
        MarkerFamily::LowercaseLetter => letter(ordinal, b'a'),
        MarkerFamily::RomanNumeral => encode_roman(ordinal),
        MarkerFamily::ChineseNumeral => CHINESE_NUMERALS
            .get(ordinal as usize)
            .map(|s| s.to_string()),
    }
}

fn letter_ordinal(text: &str, base: u8) -> Option<u32> {
    match text.as_bytes() {
        [b] if (base..base + 26).contains(b) => Some(u32::from(b - base) + 1),
        _ => None,
    }
}

fn letter(ordinal: u32, base: u8) -> Option<String> {
    if !(1..=26).contains(&ordinal) {
        return None;
    }
    Some(char::from(base + (ordinal - 1) as u8).to_string())
}

fn decode_roman(text: &str) -> Option<u32> {
    let mut total: u32 = 0;
    let mut right = 0;
    for c in text.chars().rev() {
        let value = roman_value(c)?;
        if value < right {
            total = total.checked_sub(value)?;
        } else {
            total = total.checked_add(value)?;
        }
        right = value;
    }
    Some(total)
}

fn encode_roman(ordinal: u32) -> Option<String> {
    if ordinal == 0 || ordinal > ROMAN_MAX {
        return None;
    }
    let mut remaining = ordinal;
    let mut out = String::new();
    for (value, symbol) in ROMAN_TABLE {
        while remaining >= value {
            out.push_str(symbol);
            remaining -= value;
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    #[test]
    fn test_decode_arabic() {
        assert_eq!(decode("1", MarkerFamily::Arabic), Some(1));
        assert_eq!(decode("42", MarkerFamily::Arabic), Some(42));
        assert_eq!(decode("0", MarkerFamily::Arabic), None);
        assert_eq!(decode("x", MarkerFamily::Arabic), None);
    }

    #[test]
    fn test_decode_letters() {
        assert_eq!(decode("A", MarkerFamily::UppercaseLetter), Some(1));
        assert_eq!(decode("Z", MarkerFamily::UppercaseLetter), Some(26));
        assert_eq!(decode("c", MarkerFamily::LowercaseLetter), Some(3));
        assert_eq!(decode("c", MarkerFamily::UppercaseLetter), None);
        assert_eq!(decode("ab", MarkerFamily::LowercaseLetter), None);
    }

    #[test]
    fn test_decode_roman_subtractive() {
        assert_eq!(decode("III", MarkerFamily::RomanNumeral), Some(3));
        assert_eq!(decode("IV", MarkerFamily::RomanNumeral), Some(4));
        assert_eq!(decode("IX", MarkerFamily::RomanNumeral), Some(9));
        assert_eq!(decode("XLII", MarkerFamily::RomanNumeral), Some(42));
        assert_eq!(decode("MCMXCIV", MarkerFamily::RomanNumeral), Some(1994));
        assert_eq!(decode("xiv", MarkerFamily::RomanNumeral), Some(14));
        assert_eq!(decode("IIII", MarkerFamily::RomanNumeral), Some(4));
        assert_eq!(decode("IA", MarkerFamily::RomanNumeral), None);
    }

    #[test]
    fn test_decode_chinese() {
        assert_eq!(decode("一", MarkerFamily::ChineseNumeral), Some(1));
        assert_eq!(decode("十", MarkerFamily::ChineseNumeral), Some(10));
        assert_eq!(decode("零", MarkerFamily::ChineseNumeral), None);
        assert_eq!(decode("十一", MarkerFamily::ChineseNumeral), None);
    }

    #[test]
    fn test_encode_roman() {
        assert_snapshot!(encode(4, MarkerFamily::RomanNumeral).unwrap(), @"IV");
        assert_snapshot!(encode(1994, MarkerFamily::RomanNumeral).unwrap(), @"MCMXCIV");
        assert_snapshot!(encode(3999, MarkerFamily::RomanNumeral).unwrap(), @"MMMCMXCIX");
        assert_eq!(encode(0, MarkerFamily::RomanNumeral), None);
        assert_eq!(encode(4000, MarkerFamily::RomanNumeral), None);
    }

    #[test]
    fn test_encode_bounds() {
        assert_eq!(encode(26, MarkerFamily::UppercaseLetter).as_deref(), Some("Z"));
        assert_eq!(encode(27, MarkerFamily::UppercaseLetter), None);
        assert_eq!(encode(27, MarkerFamily::LowercaseLetter), None);
        assert_eq!(encode(0, MarkerFamily::LowercaseLetter), None);
        assert_eq!(encode(0, MarkerFamily::ChineseNumeral).as_deref(), Some("零"));
        assert_eq!(encode(10, MarkerFamily::ChineseNumeral).as_deref(), Some("十"));
        assert_eq!(encode(11, MarkerFamily::ChineseNumeral), None);
        assert_eq!(encode(100, MarkerFamily::Arabic).as_deref(), Some("100"));
    }

    #[test]
    fn test_round_trip_within_ranges() {
        let ranges = [
            (MarkerFamily::Arabic, 1..=500),
            (MarkerFamily::UppercaseLetter, 1..=26),
            (MarkerFamily::LowercaseLetter, 1..=26),
            (MarkerFamily::RomanNumeral, 1..=3999),
            (MarkerFamily::ChineseNumeral, 1..=10),
        ];
        for (family, range) in ranges {
            for n in range {
                let text = encode(n, family).unwrap();
                assert_eq!(decode(&text, family), Some(n), "{family:?} {text}");
                assert_eq!(encode(decode(&text, family).unwrap(), family).as_deref(), Some(text.as_str()));
            }
        }
    }

    #[test]
    fn test_matches_requires_whole_token() {
        assert!(MarkerFamily::UppercaseLetter.matches("C"));
        assert!(!MarkerFamily::UppercaseLetter.matches("CD"));
        assert!(MarkerFamily::RomanNumeral.matches("CD"));
        assert!(MarkerFamily::RomanNumeral.matches("iii"));
        assert!(!MarkerFamily::RomanNumeral.matches("Iv"));
        assert!(!MarkerFamily::Arabic.matches(""));
        assert!(MarkerFamily::ChineseNumeral.matches("三"));
    }
}
