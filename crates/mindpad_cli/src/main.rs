//! MindPad command-line entry point.
//!
//! # Responsibility
//! - Drive core note and AI-action use-cases from a terminal.
//! - Keep `ping`/`version` as a linkage smoke probe independent of storage.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use mindpad_core::{
    init_logging, open_note_store, AiActionClient, AiActionKind, CoreConfig, GeminiGenerator,
    Note, Selection, Session, SqliteKvStore,
};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "mindpad", version, about = "Notes with AI rewriting")]
struct Cli {
    /// Database file; overrides MINDPAD_DB_PATH.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print core linkage info.
    Ping,
    /// List notes, newest first.
    List {
        /// Case-insensitive filter on title or content.
        #[arg(short, long, default_value = "")]
        query: String,
    },
    /// Print one note.
    Show { id: String },
    /// Create a note and print its id.
    New {
        #[arg(short, long, default_value = "")]
        title: String,
        #[arg(short, long, default_value = "")]
        content: String,
    },
    /// Replace title and/or content of a note.
    Edit {
        id: String,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        content: Option<String>,
    },
    /// Delete a note.
    Delete { id: String },
    /// Run an AI action over a note (fix_grammar, summarize,
    /// continue_writing, make_longer).
    Ai {
        action: AiActionKind,
        id: String,
        /// Selection start, in characters.
        #[arg(long, requires = "end")]
        start: Option<usize>,
        /// Selection end, in characters (exclusive).
        #[arg(long, requires = "start")]
        end: Option<usize>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = CoreConfig::from_env().context("invalid environment configuration")?;

    let log_dir = config.log_dir.to_string_lossy().into_owned();
    if let Err(err) = init_logging(config.log_level.as_str(), log_dir.as_str()) {
        eprintln!("warning: logging disabled: {err}");
    }

    if let Command::Ping = cli.command {
        println!("mindpad_core ping={}", mindpad_core::ping());
        println!("mindpad_core version={}", mindpad_core::core_version());
        return Ok(());
    }

    let db_path = cli.db.clone().unwrap_or_else(|| config.db_path.clone());
    let store = open_note_store(&db_path)
        .with_context(|| format!("failed to open notes at `{}`", db_path.display()))?;
    let mut session = Session::new(store);

    run(cli.command, &mut session, &config)
}

fn run(command: Command, session: &mut Session<SqliteKvStore>, config: &CoreConfig) -> Result<()> {
    match command {
        Command::Ping => {}
        Command::List { query } => {
            session.set_search_query(query);
            for item in session.view().items {
                println!("{}\t{}\t{}", item.id, item.last_modified, item.display_title);
            }
        }
        Command::Show { id } => print_note(select(session, &id)?),
        Command::New { title, content } => {
            let created = session.create_note()?;
            if !title.is_empty() || !content.is_empty() {
                session.edit_active(title, content)?;
            }
            println!("{}", created.id);
        }
        Command::Edit { id, title, content } => {
            let current = select(session, &id)?.clone();
            let note = session.edit_active(
                title.unwrap_or(current.title),
                content.unwrap_or(current.content),
            )?;
            print_note(&note);
        }
        Command::Delete { id } => {
            if !session.delete_note(&id)? {
                bail!("note not found: {id}");
            }
        }
        Command::Ai {
            action,
            id,
            start,
            end,
        } => {
            select(session, &id)?;
            let generator = GeminiGenerator::new(config.ai.clone())?;
            let client = AiActionClient::new(generator);
            let selection = start.zip(end).map(|(start, end)| Selection::new(start, end));
            let note = session
                .run_ai_action(&client, action, selection)
                .with_context(|| format!("{action} failed"))?;
            print_note(&note);
        }
    }
    Ok(())
}

fn select<'a>(session: &'a mut Session<SqliteKvStore>, id: &str) -> Result<&'a Note> {
    if !session.select(id) {
        bail!("note not found: {id}");
    }
    session
        .active_note()
        .with_context(|| format!("note not found: {id}"))
}

fn print_note(note: &Note) {
    println!("# {}", note.display_title());
    println!();
    println!("{}", note.content);
}
