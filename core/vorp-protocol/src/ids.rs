use alloc::string::{String, ToString};
use core::fmt;

/// Identity of a pinned gloss: the surface form plus the creation timestamp
/// in milliseconds. Rendered as `"{surface}-{millis}"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GlossId {
    surface: String,
    created_at: u64,
}

impl GlossId {
    pub fn new(surface: impl Into<String>, created_at: u64) -> Self {
        Self {
            surface: surface.into(),
            created_at,
        }
    }

    pub fn surface(&self) -> &str {
        &self.surface
    }

    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    /// Parses the rendered form. The timestamp is the text after the last `-`,
    /// so surface forms containing dashes survive.
    pub fn parse(rendered: &str) -> Option<Self> {
        let (surface, millis) = rendered.rsplit_once('-')?;
        let created_at = millis.parse().ok()?;
        Some(Self::new(surface, created_at))
    }
}

impl fmt::Display for GlossId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.surface, self.created_at)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for GlossId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for GlossId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rendered = String::deserialize(deserializer)?;
        GlossId::parse(&rendered)
            .ok_or_else(|| serde::de::Error::custom("expected `<surface>-<millis>`"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_and_parse() {
        let id = GlossId::new("well-known", 1_700_000_000_123);
        let rendered = id.to_string();
        assert_eq!(rendered, "well-known-1700000000123");
        assert_eq!(GlossId::parse(&rendered), Some(id));
    }

    #[test]
    fn test_parse_rejects_missing_timestamp() {
        assert_eq!(GlossId::parse("hello"), None);
        assert_eq!(GlossId::parse("hello-now"), None);
    }
}
