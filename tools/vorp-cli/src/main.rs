use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vorp_annotator::{
    align, fallback_analysis, vocabulary_stats, AnalysisTable, Annotator, Interaction,
    KnownVocabulary, LexiconView, Reaction, ReadingView, Span, VocabularyStats,
};
use vorp_client::{
    AnalysisSource, AnalysisWorkspace, ApiClient, AuthContext, ClientConfig, LoginForm,
};
use vorp_protocol::normalize;

mod store;

use store::FileCredentials;

#[derive(Parser)]
#[command(author, version, about = "Read foreign-language text with word glosses")]
struct Cli {
    /// Backend base URL (overrides VORP_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    /// Credentials file (overrides VORP_CREDENTIALS_PATH)
    #[arg(long, global = true, value_name = "FILE")]
    credentials: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and keep the session cookie
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },
    /// Show the logged-in user
    Whoami,
    /// End the session and forget stored credentials
    Logout,
    /// Analyze text through the backend, falling back to offline glosses
    Analyze {
        /// Text to read; stdin when omitted
        text: Option<String>,
        /// Print HTML markup instead of a gloss list
        #[arg(long)]
        html: bool,
        /// Pin every token of this word (repeatable)
        #[arg(long, value_name = "WORD")]
        pin: Vec<String>,
        /// Send the pinned words to the vocabulary endpoint
        #[arg(long)]
        submit: bool,
        /// Compiled lexicon used when the backend is unavailable
        #[arg(long, value_name = "FILE")]
        lexicon: Option<PathBuf>,
    },
    /// Gloss text locally without contacting the backend
    Offline {
        text: Option<String>,
        #[arg(long)]
        html: bool,
        #[arg(long, value_name = "FILE")]
        lexicon: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vorp_cli=info,vorp_client=info,vorp_annotator=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    match cli.command {
        Command::Offline { text, html, lexicon } => offline(&read_text(text)?, html, lexicon.as_deref()),
        command => {
            let client = connect(cli.api_url, cli.credentials)?;
            run(client, command).await
        }
    }
}

fn connect(api_url: Option<String>, credentials: Option<PathBuf>) -> anyhow::Result<Arc<ApiClient>> {
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = api_url {
        config = config.with_api_url(url)?;
    }
    let path = credentials
        .or_else(|| config.credentials_path.clone())
        .unwrap_or_else(store::default_path);
    let store = FileCredentials::open(&path)?;
    tracing::debug!(api_url = %config.api_url, credentials = %store.path().display(), "client configured");

    Ok(Arc::new(ApiClient::new(config, Arc::new(store))?))
}

async fn run(client: Arc<ApiClient>, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Login { email, password } => {
            let mut auth = AuthContext::new(client);
            match auth.login(&LoginForm::new(email, password)).await {
                Ok(user) => println!("Welcome back, {}!", user.username),
                Err(e) => anyhow::bail!("{}: {e}", e.title()),
            }
        }
        Command::Whoami => {
            let auth = AuthContext::initialize(client).await;
            match auth.user() {
                Some(user) => {
                    println!("{} <{}>", user.username, user.email);
                    println!("  {} -> {} ({})", user.mother_language, user.target_language, user.fluency_level);
                    println!("  {} known words", user.known_words.len());
                }
                None => println!("Not logged in."),
            }
        }
        Command::Logout => {
            let mut auth = AuthContext::new(client);
            auth.logout().await;
            println!("Logged out.");
        }
        Command::Analyze { text, html, pin, submit, lexicon } => {
            analyze(client, &read_text(text)?, html, &pin, submit, lexicon.as_deref()).await?
        }
        Command::Offline { text, html, lexicon } => offline(&read_text(text)?, html, lexicon.as_deref())?,
    }
    Ok(())
}

async fn analyze(
    client: Arc<ApiClient>,
    text: &str,
    html: bool,
    pins: &[String],
    submit: bool,
    lexicon: Option<&Path>,
) -> anyhow::Result<()> {
    let known = match client.profile().await {
        Ok(user) => KnownVocabulary::from_known_words(user.known_words),
        Err(_) => KnownVocabulary::new(),
    };

    let mut workspace = AnalysisWorkspace::new(client).with_known_vocabulary(known);
    if let Some(path) = lexicon {
        workspace = workspace.with_lexicon(&read_lexicon(path)?)?;
    }
    workspace.set_content(text);

    let source = workspace.analyze().await.map_err(|e| anyhow::anyhow!("{}: {e}", e.title()))?;
    if source == AnalysisSource::Fallback {
        eprintln!("Backend unavailable, showing offline glosses.");
    }

    for word in pins {
        let index = workspace.view().and_then(|view| view.find_token(&normalize(word)));
        match index.map(|i| workspace.interact(i, Interaction::Click)) {
            Some(Reaction::Pinned(id)) => eprintln!("Pinned {id}"),
            Some(Reaction::AlreadyPinned(id)) => eprintln!("{id} is already pinned"),
            _ => eprintln!("No glossed token matches '{word}'"),
        }
    }

    if html {
        println!("{}", workspace.render_html().unwrap_or_default());
    } else if let Some(view) = workspace.view() {
        print_glosses(view.spans());
    }
    if let Some(stats) = workspace.stats() {
        print_stats(&stats);
    }

    if submit {
        let count = workspace
            .submit_for_learning()
            .await
            .map_err(|e| anyhow::anyhow!("{}: {e}", e.title()))?;
        println!("Submitted {count} word(s) for learning.");
    }
    Ok(())
}

fn offline(text: &str, html: bool, lexicon: Option<&Path>) -> anyhow::Result<()> {
    let bytes = lexicon.map(read_lexicon).transpose()?;
    let view = bytes
        .as_deref()
        .map(LexiconView::from_bytes)
        .transpose()?;

    let table = AnalysisTable::from_words(fallback_analysis(text, view.as_ref()));
    let reading = ReadingView::new(&Annotator::new(table), text);
    let known = KnownVocabulary::new();

    if html {
        println!("{}", reading.render_html(&known));
    } else {
        print_glosses(reading.spans());
    }
    print_stats(&vocabulary_stats(reading.spans(), &known));
    Ok(())
}

fn read_text(text: Option<String>) -> anyhow::Result<String> {
    match text {
        Some(text) => Ok(text),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read text from stdin")?;
            Ok(buffer)
        }
    }
}

fn read_lexicon(path: &Path) -> anyhow::Result<rkyv::AlignedVec> {
    let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let aligned = align(&bytes);
    LexiconView::from_bytes(&aligned)?;
    Ok(aligned)
}

fn print_glosses(spans: &[Span]) {
    for token in spans.iter().filter_map(Span::as_token) {
        let word = &token.analysis;
        let mut line = format!("{}\t{}", token.text, word.meaning);
        match (&word.base_form, &word.part_of_speech) {
            (Some(base), Some(pos)) => line.push_str(&format!(" ({base}, {pos})")),
            (Some(base), None) => line.push_str(&format!(" ({base})")),
            (None, Some(pos)) => line.push_str(&format!(" ({pos})")),
            (None, None) => {}
        }
        println!("{line}");
    }
}

fn print_stats(stats: &VocabularyStats) {
    eprintln!(
        "learned: {}, learning: {}, unknown: {}",
        stats.learned, stats.learning, stats.unknown
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analyze_flags() {
        let cli = Cli::try_parse_from([
            "vorp", "--api-url", "http://localhost:9000", "analyze", "风急", "--pin", "风", "--pin", "急",
            "--submit",
        ])
        .unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("http://localhost:9000"));
        match cli.command {
            Command::Analyze { text, pin, submit, html, .. } => {
                assert_eq!(text.as_deref(), Some("风急"));
                assert_eq!(pin, vec!["风".to_string(), "急".to_string()]);
                assert!(submit);
                assert!(!html);
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_login_requires_email() {
        assert!(Cli::try_parse_from(["vorp", "login", "--password", "x"]).is_err());
    }

    #[test]
    fn test_offline_without_lexicon() {
        offline("Hello world", false, None).unwrap();
    }
}
