use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use rkyv::ser::{serializers::AllocSerializer, Serializer};
use serde::Deserialize;
use vorp_annotator::{align, compile_lexicon, LexiconView};
use vorp_protocol::{AnalyzedWord, Lexicon};

#[derive(Parser)]
#[command(author, version, about = "Compiles a JSON gloss list into an offline rkyv lexicon")]
struct Cli {
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,
}

/// `{"version": 1, "entries": [{"word": "风", "meaning": "wind", ...}]}`
#[derive(Deserialize)]
struct LexiconSource {
    #[serde(default = "default_version")]
    version: u32,
    entries: Vec<AnalyzedWord>,
}

fn default_version() -> u32 {
    1
}

fn compile(json: &str) -> anyhow::Result<(Lexicon, Vec<u8>)> {
    let source: LexiconSource = serde_json::from_str(json).context("malformed lexicon source")?;
    let lexicon = compile_lexicon(source.version, source.entries);

    let mut serializer = AllocSerializer::<256>::default();
    serializer
        .serialize_value(&lexicon)
        .map_err(|e| anyhow::anyhow!("rkyv serialization failed: {e:?}"))?;
    let bytes = serializer.into_serializer().into_inner().to_vec();

    // Reopen the archive the way the readers will
    LexiconView::from_bytes(&align(&bytes))?;
    Ok((lexicon, bytes))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    println!("Reading JSON from {:?}...", cli.input);
    let json = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;

    let (lexicon, bytes) = compile(&json)?;
    println!(
        "Compiled lexicon version {} with {} entries ({} bytes)",
        lexicon.version,
        lexicon.entries.len(),
        bytes.len()
    );

    fs::write(&cli.output, bytes)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;
    println!("Binary written to {:?}", cli.output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_source() {
        let json = r#"{
            "version": 3,
            "entries": [
                {"word": "Hello!", "meaning": "greeting", "baseForm": "hello"},
                {"word": "hello", "meaning": "duplicate"},
                {"word": "...", "meaning": "dropped"}
            ]
        }"#;
        let (lexicon, bytes) = compile(json).unwrap();
        assert_eq!(lexicon.entries.len(), 2);

        let aligned = align(&bytes);
        let view = LexiconView::from_bytes(&aligned).unwrap();
        assert_eq!(view.version(), 3);
        assert_eq!(view.lookup("Hello").unwrap().meaning, "greeting");
        assert_eq!(view.lookup("hello").unwrap().meaning, "duplicate");
    }

    #[test]
    fn test_version_defaults() {
        let (lexicon, _) = compile(r#"{"entries": []}"#).unwrap();
        assert_eq!(lexicon.version, 1);
    }

    #[test]
    fn test_rejects_malformed_source() {
        assert!(compile(r#"{"version": 1}"#).is_err());
    }
}
