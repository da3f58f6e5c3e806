use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::anychar,
    combinator::map,
    IResult,
};
use serde::Serialize;
use vorp_protocol::SegmentationMode;

/// Byte range of a segment within the annotated text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// A run of whitespace, kept verbatim.
    Whitespace,
    /// A whitespace-free token, or a single character in character mode.
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    pub range: ByteRange,
    pub text: &'a str,
    pub kind: SegmentKind,
}

fn whitespace_run(input: &str) -> IResult<&str, SegmentKind> {
    map(take_while1(char::is_whitespace), |_| SegmentKind::Whitespace)(input)
}

fn token_run(input: &str) -> IResult<&str, SegmentKind> {
    map(take_while1(|c: char| !c.is_whitespace()), |_| SegmentKind::Text)(input)
}

fn single_char(input: &str) -> IResult<&str, SegmentKind> {
    map(anychar, |_| SegmentKind::Text)(input)
}

/// Splits `source` into a lossless sequence of segments: concatenating every
/// segment's text gives back `source`.
pub fn segment(source: &str, mode: SegmentationMode) -> Vec<Segment<'_>> {
    let mut input = source;
    let mut result = Vec::new();

    while !input.is_empty() {
        let parsed = match mode {
            SegmentationMode::Token => alt((whitespace_run, token_run))(input),
            SegmentationMode::Character => alt((whitespace_run, single_char))(input),
        };

        let (rest, kind) = match parsed {
            Ok(res) => res,
            // Both alternatives together accept any non-empty input
            Err(_) => break,
        };

        let start = source.len() - input.len();
        let end = source.len() - rest.len();
        result.push(Segment {
            range: ByteRange::new(start, end),
            text: &source[start..end],
            kind,
        });
        input = rest;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn texts<'a>(segments: &[Segment<'a>]) -> Vec<&'a str> {
        segments.iter().map(|s| s.text).collect()
    }

    #[test]
    fn test_token_mode_keeps_whitespace_runs() {
        let segments = segment("  Hello,\n\tworld! ", SegmentationMode::Token);
        assert_eq!(texts(&segments), vec!["  ", "Hello,", "\n\t", "world!", " "]);
        assert_eq!(segments[0].kind, SegmentKind::Whitespace);
        assert_eq!(segments[1].kind, SegmentKind::Text);
        assert_eq!(segments[1].range, ByteRange::new(2, 8));
    }

    #[test]
    fn test_character_mode_splits_every_char() {
        let segments = segment("风急 天高。", SegmentationMode::Character);
        assert_eq!(texts(&segments), vec!["风", "急", " ", "天", "高", "。"]);
        assert_eq!(segments[1].range, ByteRange::new(3, 6));
    }

    #[test]
    fn test_empty_input() {
        assert!(segment("", SegmentationMode::Token).is_empty());
        assert!(segment("", SegmentationMode::Character).is_empty());
    }

    proptest! {
        #[test]
        fn test_token_segmentation_is_lossless(s in "\\PC*") {
            let joined: String = segment(&s, SegmentationMode::Token).iter().map(|seg| seg.text).collect();
            prop_assert_eq!(joined, s);
        }

        #[test]
        fn test_character_segmentation_is_lossless(s in "[a-z 风急。\n안녕]*") {
            let segments = segment(&s, SegmentationMode::Character);
            let joined: String = segments.iter().map(|seg| seg.text).collect();
            prop_assert_eq!(&joined, &s);
            for seg in segments.iter().filter(|seg| seg.kind == SegmentKind::Text) {
                prop_assert_eq!(seg.text.chars().count(), 1);
            }
        }
    }
}
