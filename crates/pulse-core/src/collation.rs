//! Russian-locale string collation.
//!
//! Approximates the ordering a browser gives `a.localeCompare(b, "ru")` for the
//! lower-cased strings the task list sorts on:
//!
//! - whitespace and punctuation sort before digits, digits before letters
//! - Cyrillic letters sort before Latin letters, other scripts last
//! - `ё` is folded onto `е` at the primary level
//! - a proper prefix sorts before the longer string
//!
//! Strings equal at the primary level are ordered by code point so the result
//! is a total order.

use std::cmp::Ordering;

/// Compare two strings with Russian-locale collation.
#[must_use]
pub fn compare(a: &str, b: &str) -> Ordering {
    a.chars()
        .map(primary_key)
        .cmp(b.chars().map(primary_key))
        .then_with(|| a.cmp(b))
}

fn primary_key(ch: char) -> (u8, char) {
    let folded = match ch {
        'ё' => 'е',
        'Ё' => 'Е',
        other => other,
    };

    let class = if folded.is_whitespace() || folded.is_ascii_punctuation() {
        0
    } else if folded.is_numeric() {
        1
    } else if is_cyrillic(folded) {
        2
    } else if folded.is_ascii_alphabetic() {
        3
    } else if folded.is_alphabetic() {
        4
    } else {
        0
    };

    (class, folded)
}

const fn is_cyrillic(ch: char) -> bool {
    matches!(ch, '\u{0400}'..='\u{04FF}' | '\u{0500}'..='\u{052F}')
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("алиса", "борис", Ordering::Less)]
    #[case("яблоко", "apple", Ordering::Less)]
    #[case("2 задачи", "задача", Ordering::Less)]
    #[case("ёлка", "ель", Ordering::Less)]
    #[case("ель", "ёлка", Ordering::Greater)]
    #[case("отчёт", "отчет", Ordering::Greater)]
    #[case("high", "low", Ordering::Less)]
    #[case("low", "medium", Ordering::Less)]
    #[case("ab", "abc", Ordering::Less)]
    #[case("", "a", Ordering::Less)]
    #[case("same", "same", Ordering::Equal)]
    fn orders_like_russian_locale(#[case] a: &str, #[case] b: &str, #[case] expected: Ordering) {
        assert_eq!(compare(a, b), expected);
    }

    #[test]
    fn is_antisymmetric() {
        let words = ["ёж", "еж", "zebra", "яма", "1", " пробел", "абв"];
        for a in words {
            for b in words {
                assert_eq!(compare(a, b), compare(b, a).reverse(), "{a} vs {b}");
            }
        }
    }
}
