use bitflags::bitflags;

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

bitflags! {
    /// Scripts observed in a piece of text.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
    pub struct ScriptFlags: u8 {
        const LATIN = 1;
        const HAN = 2;
        // Hiragana and Katakana
        const KANA = 4;
        const HANGUL = 8;
        // Any other letter or number (Cyrillic, Greek, Arabic, ...)
        const OTHER = 16;

        /// Scripts written without spaces between words.
        const CHARACTER_SEGMENTED = Self::HAN.bits() | Self::KANA.bits();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
pub enum SegmentationMode {
    /// Whitespace-delimited tokens.
    Token,
    /// One segment per character.
    Character,
}

impl ScriptFlags {
    /// Classifies a single character. Whitespace, punctuation and symbols
    /// belong to no script.
    pub fn of_char(c: char) -> ScriptFlags {
        match c {
            // CJK Unified Ideographs, Extension A, Compatibility Ideographs
            '\u{4E00}'..='\u{9FFF}' | '\u{3400}'..='\u{4DBF}' | '\u{F900}'..='\u{FAFF}' => {
                ScriptFlags::HAN
            }
            // Extensions B..F
            '\u{20000}'..='\u{2EBEF}' => ScriptFlags::HAN,
            // Iteration mark and ideographic zero
            '\u{3005}' | '\u{3007}' => ScriptFlags::HAN,
            '\u{3040}'..='\u{309F}' | '\u{30A0}'..='\u{30FF}' | '\u{31F0}'..='\u{31FF}' => {
                ScriptFlags::KANA
            }
            // Halfwidth Katakana
            '\u{FF66}'..='\u{FF9D}' => ScriptFlags::KANA,
            '\u{AC00}'..='\u{D7AF}' | '\u{1100}'..='\u{11FF}' | '\u{3130}'..='\u{318F}' => {
                ScriptFlags::HANGUL
            }
            _ if c.is_ascii_alphabetic() => ScriptFlags::LATIN,
            // Latin-1 Supplement letters through Latin Extended-B, plus Latin Extended Additional
            '\u{00C0}'..='\u{024F}' | '\u{1E00}'..='\u{1EFF}' if c.is_alphabetic() => {
                ScriptFlags::LATIN
            }
            _ if c.is_alphanumeric() => ScriptFlags::OTHER,
            _ => ScriptFlags::empty(),
        }
    }

    /// Collects the scripts of every character in `text`.
    pub fn detect(text: &str) -> ScriptFlags {
        text.chars()
            .fold(ScriptFlags::empty(), |acc, c| acc | ScriptFlags::of_char(c))
    }

    /// Han or Kana anywhere in the text switches the whole text to character mode.
    pub fn segmentation_mode(self) -> SegmentationMode {
        if self.intersects(ScriptFlags::CHARACTER_SEGMENTED) {
            SegmentationMode::Character
        } else {
            SegmentationMode::Token
        }
    }
}

impl SegmentationMode {
    pub fn detect(text: &str) -> Self {
        ScriptFlags::detect(text).segmentation_mode()
    }
}
