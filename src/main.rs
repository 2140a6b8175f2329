use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use starlight_kiosk::input::{self, InputGate, InputSource};
use starlight_kiosk::render::ConsoleRenderer;
use starlight_kiosk::speech::{SpeechCapture, SpeechOutput, Speaker};
use starlight_kiosk::terminal::{self, PrintedSpeech, TerminalRenderer};
use starlight_kiosk::{Config, Daemon, KnowledgeStore, MatchEngine, MatchResult, Navigator, SearchScope};

/// Starlight - voice-driven question and answer kiosk
#[derive(Parser)]
#[command(name = "starlight", version, about)]
struct Cli {
    /// Knowledge base directory (one folder per topic, one JSON file per subtopic)
    #[arg(short = 'd', long)]
    knowledge_dir: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Skip the spoken introduction
    #[arg(long)]
    no_intro: bool,

    /// Use microphone and speakers instead of the terminal
    #[arg(long)]
    voice: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// List topics and subtopics
    Topics,
    /// Match one question against the knowledge base
    Ask {
        /// Question text
        question: String,
        /// Topic to search
        #[arg(short, long)]
        topic: String,
        /// Subtopic searched first
        #[arg(short, long)]
        subtopic: Option<String>,
    },
    /// Print suggested questions
    Suggest {
        /// Prefer questions from this topic
        #[arg(short, long)]
        topic: Option<String>,
        /// How many suggestions
        #[arg(short = 'n', long, default_value = "2")]
        count: usize,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity; RUST_LOG wins when set
    let filter = match cli.verbose {
        0 => "warn,starlight_kiosk=info",
        1 => "info,starlight_kiosk=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

#[allow(clippy::future_not_send)]
async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load()?;
    if let Some(dir) = cli.knowledge_dir {
        config.knowledge_dir = dir;
    }
    if cli.no_intro {
        config.session.show_intro = false;
    }
    if cli.voice {
        config.voice.enabled = true;
    }

    let store = KnowledgeStore::open(&config.knowledge_dir);

    if let Some(cmd) = cli.command {
        match cmd {
            Command::Topics => cmd_topics(&store),
            Command::Ask {
                question,
                topic,
                subtopic,
            } => cmd_ask(&store, &question, &topic, subtopic.as_deref()),
            Command::Suggest { topic, count } => cmd_suggest(&store, topic.as_deref(), count),
        }
        return Ok(());
    }

    tracing::info!(
        knowledge_dir = %config.knowledge_dir.display(),
        topics = store.index().len(),
        voice = config.voice.enabled,
        "starting starlight kiosk"
    );

    let (keyboard, typed) = terminal::open();
    let (capture, output) = speech_collaborators(&config, typed)?;

    let speaker = Speaker::new(output);
    let gate = InputGate::with_windows(speaker.lock(), config.input.debounce, config.input.cooldown);
    let (sink, inbox) = input::channel(gate);
    let source: Box<dyn InputSource> = Box::new(keyboard);
    source.subscribe(sink)?;

    let renderer: Box<dyn ConsoleRenderer> = Box::new(TerminalRenderer::new());
    let navigator = Navigator::new(store, speaker, capture, renderer, config.session);

    Daemon::new(navigator, inbox).run().await?;
    Ok(())
}

type SpeechPair = (Box<dyn SpeechCapture>, Box<dyn SpeechOutput>);

#[cfg(feature = "audio")]
fn speech_collaborators(config: &Config, typed: terminal::TypedCapture) -> anyhow::Result<SpeechPair> {
    if config.voice.enabled {
        let (capture, output) = starlight_kiosk::voice::open(config)?;
        return Ok((Box::new(capture), Box::new(output)));
    }
    Ok((Box::new(typed), Box::new(PrintedSpeech::new())))
}

#[cfg(not(feature = "audio"))]
fn speech_collaborators(config: &Config, typed: terminal::TypedCapture) -> anyhow::Result<SpeechPair> {
    if config.voice.enabled {
        anyhow::bail!("voice mode needs a build with the `audio` feature");
    }
    Ok((Box::new(typed), Box::new(PrintedSpeech::new())))
}

fn cmd_topics(store: &KnowledgeStore) {
    if store.index().is_empty() {
        println!("No topics found in {}", store.root().display());
        return;
    }

    for topic in store.index().topics() {
        println!("{topic}");
        for subtopic in store.list_subtopics(topic) {
            println!("  {subtopic}");
        }
    }
}

fn cmd_ask(store: &KnowledgeStore, question: &str, topic: &str, subtopic: Option<&str>) {
    let scope = subtopic.map_or_else(|| SearchScope::topic(topic), |s| SearchScope::subtopic(topic, s));

    match MatchEngine::new().find(store, question, Some(&scope)) {
        MatchResult::Found(found) => {
            println!("Question: {}", found.record.question);
            println!("From:     {} / {}", found.topic, found.subtopic);
            println!("Score:    {} ({:?})", found.score, found.tier());
            println!();
            println!("{}", found.record.answer);
        }
        MatchResult::NoMatch => {
            println!("No match.");
            cmd_suggest(store, Some(topic), 2);
        }
    }
}

fn cmd_suggest(store: &KnowledgeStore, topic: Option<&str>, count: usize) {
    let suggestions = store.suggest_questions(topic, count);
    if suggestions.is_empty() {
        println!("No suggestions available.");
        return;
    }

    for (position, suggestion) in (1..).zip(&suggestions) {
        println!("{position}. {}", suggestion.question);
        println!("   {} / {}", suggestion.topic, suggestion.subtopic);
    }
}
