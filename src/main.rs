//! # Codeview - Documentation Code-Example Viewer
//!
//! Shows the documentation snippets with lightweight highlighting, switches
//! between them the way the page's tabs do, and copies them to the clipboard.
//!
//! ## Quick Start
//!
//! ```bash
//! # List the available tabs
//! cargo run -- list
//!
//! # Render a tab as highlighted markup
//! cargo run -- show insert
//!
//! # Highlight any file with the legacy pass pipeline
//! cargo run -- --mode passes highlight main.go
//!
//! # Copy a tab to the system clipboard
//! cargo run -- copy select
//! ```

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use codeview_core::{
    ClipboardGateway, Config, EventHandler, MemoryClipboard, SnippetStore, SwitchOutcome,
    SystemClipboard, ViewController, ViewEvent,
};
use codeview_syntax::{HighlightMode, Highlighter, escape_html};

/// Codeview - code-example viewer with highlighting and copy support
#[derive(Parser, Debug)]
#[command(name = "codeview")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file (defaults to the user config directory)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Highlighting strategy, overriding the config
    #[arg(short, long, value_name = "MODE", global = true)]
    mode: Option<HighlightMode>,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the available tabs
    List,

    /// Switch to a tab and print the rendered surface
    Show {
        /// Tab identifier
        tab: String,

        /// Print plain text instead of markup
        #[arg(long)]
        plain: bool,
    },

    /// Highlight a file (or stdin) and print the markup
    Highlight {
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Print the lexer tokens of a file (or stdin)
    Tokens {
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Switch to a tab and copy it to the clipboard
    Copy {
        /// Tab identifier
        tab: String,

        /// Clipboard to write to
        #[arg(long, value_enum, default_value_t = ClipboardChoice::System)]
        clipboard: ClipboardChoice,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ClipboardChoice {
    System,
    Memory,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    tracing::info!("Starting Codeview v{}", env!("CARGO_PKG_VERSION"));

    let mut config = match &args.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::load(),
    };
    if let Some(mode) = args.mode {
        config.view.highlight_mode = mode;
    }

    // Everything runs on one thread; deferred steps interleave cooperatively.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;

    runtime.block_on(run(args.command, config))
}

async fn run(command: Command, config: Config) -> anyhow::Result<()> {
    let store = Arc::new(SnippetStore::builtin());

    match command {
        Command::List => {
            for snippet in store.iter() {
                let marker = if snippet.name == config.view.default_snippet {
                    "*"
                } else {
                    " "
                };
                println!("{} {:<8} {} lines", marker, snippet.name, snippet.text.lines().count());
            }
        }
        Command::Show { tab, plain } => {
            let view = ViewController::new(store, MemoryClipboard::new(), config)?;
            show(&view, &tab).await?;
            let surface = view.surface();
            if plain {
                println!("{}", surface.text_content());
            } else {
                println!("{}", surface.markup());
            }
        }
        Command::Highlight { file } => {
            let source = read_input(file.as_deref())?;
            let highlighter = Highlighter::new(config.view.highlight_mode);
            println!("{}", highlighter.highlight(&escape_html(&source)));
        }
        Command::Tokens { file } => {
            let source = read_input(file.as_deref())?;
            let escaped = escape_html(&source);
            for token in Highlighter::default().tokenize(&escaped) {
                println!(
                    "{:>5}..{:<5} {:<8?} {:?}",
                    token.span.start,
                    token.span.end,
                    token.kind,
                    token.text(&escaped)
                );
            }
        }
        Command::Copy { tab, clipboard } => match clipboard {
            ClipboardChoice::System => {
                let view = ViewController::new(store, SystemClipboard, config)?;
                copy(&view, &tab).await?;
            }
            ClipboardChoice::Memory => {
                let memory = MemoryClipboard::new();
                let view = ViewController::new(store, memory.clone(), config)?;
                copy(&view, &tab).await?;
                if let Some(text) = memory.contents() {
                    println!("{text}");
                }
            }
        },
    }

    Ok(())
}

/// Switches to `tab` and waits until the swap lands.
async fn show<C: ClipboardGateway>(view: &ViewController<C>, tab: &str) -> anyhow::Result<()> {
    let mut events = EventHandler::new(view.subscribe());

    if view.switch_to(tab)? == SwitchOutcome::Unchanged {
        return Ok(());
    }

    while let Some(event) = events.next().await {
        if event == ViewEvent::SwapCompleted(tab.to_string()) {
            break;
        }
    }
    Ok(())
}

async fn copy<C: ClipboardGateway>(view: &ViewController<C>, tab: &str) -> anyhow::Result<()> {
    show(view, tab).await?;

    match view.copy().await {
        Ok(()) => eprintln!("{}", view.confirmation().label()),
        Err(err) => tracing::warn!("Copy failed: {}", err),
    }
    Ok(())
}

fn read_input(file: Option<&Path>) -> anyhow::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .context("failed to read stdin")?;
            Ok(source)
        }
    }
}
