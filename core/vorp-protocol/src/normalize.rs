use alloc::string::String;

/// A character survives normalization when it is a Unicode letter or number,
/// or an underscore. Hangul, Han and Kana are letters here.
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Strips everything that is not a word character. Case and diacritics are kept.
pub fn normalize(surface: &str) -> String {
    surface.chars().filter(|c| is_word_char(*c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_keeps_non_latin_scripts() {
        assert_eq!(normalize("안녕"), "안녕");
        assert_eq!(normalize("「東京」"), "東京");
        assert_eq!(normalize("ひらがな。"), "ひらがな");
    }

    #[test]
    fn test_strips_punctuation_only() {
        assert_eq!(normalize("«Café!»"), "Café");
        assert_eq!(normalize("snake_case,"), "snake_case");
        assert_eq!(normalize("¿...?"), "");
        assert_eq!(normalize("42%"), "42");
    }

    proptest! {
        #[test]
        fn test_normalize_is_idempotent(s in "\\PC*") {
            let once = normalize(&s);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn test_hangul_words_survive(s in "[가-힣]{1,8}") {
            prop_assert_eq!(normalize(&s), s);
        }
    }
}
