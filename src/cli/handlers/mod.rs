use std::io::IsTerminal;
use std::path::PathBuf;

use tracing::info;

use crate::cli::commands::{AddArgs, Cli, Commands, ListArgs};
use crate::cli::output::{add_outcome_to_json, entry_to_json, format_add_summary};
use crate::io::config_io::{read_config, resolve_todo_file};
use crate::io::lock::FileLock;
use crate::io::todo_io::{ensure_todo_file, load_store, save_store};
use crate::model::config::Config;
use crate::parse::{ParseContext, serialize_entry};
use crate::render::{Theme, colorize};

/// Everything a command needs once the todo file has been chosen
struct Session {
    path: PathBuf,
    config: Config,
    ctx: ParseContext,
    json: bool,
}

/// Main dispatch: resolve config and todo file, then run the subcommand
pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = read_config()?;
    let ctx = ParseContext::now().with_urgency_days(config.urgency_days);
    let path = resolve_todo_file(cli.file.as_deref(), &config);

    ensure_todo_file(&path)?;
    info!(path = %path.display(), "using todo file");

    let session = Session {
        path,
        config,
        ctx,
        json: cli.json,
    };

    match cli.command {
        Commands::Add(args) => cmd_add(&session, args),
        Commands::List(args) => cmd_list(&session, args),
        Commands::Correct => cmd_correct(&session),
    }
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(session: &Session, args: AddArgs) -> Result<(), Box<dyn std::error::Error>> {
    let _lock = FileLock::acquire_default(&session.path)?;
    let mut store = load_store(&session.path, &session.ctx)?;

    let outcome = store.add(&args.tasks, &session.ctx);
    save_store(&session.path, &store)?;

    if session.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&add_outcome_to_json(&outcome))?
        );
    } else {
        for text in &outcome.rejected {
            eprintln!("skipped malformed task: {}", text.trim());
        }
        println!("{}", format_add_summary(&outcome));
    }
    Ok(())
}

fn cmd_correct(session: &Session) -> Result<(), Box<dyn std::error::Error>> {
    let _lock = FileLock::acquire_default(&session.path)?;
    let store = load_store(&session.path, &session.ctx)?;
    save_store(&session.path, &store)?;

    let comments = store.iter().filter(|e| e.is_comment()).count();
    if session.json {
        println!(
            "{}",
            serde_json::json!({ "entries": store.len(), "comments": comments })
        );
    } else {
        println!(
            "rewrote {} ({} entries, {} comments)",
            session.path.display(),
            store.len(),
            comments
        );
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(session: &Session, args: ListArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = load_store(&session.path, &session.ctx)?;
    let entries = store.list(&args.tags)?;

    if session.json {
        let rows = entries
            .iter()
            .map(|e| entry_to_json(e))
            .collect::<Result<Vec<_>, _>>()?;
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if use_color(&session.config) {
        let theme = Theme::from_config(&session.config.colors);
        for entry in entries {
            println!("{}", colorize(entry, &theme)?);
        }
    } else {
        for entry in entries {
            println!("{}", serialize_entry(entry)?);
        }
    }
    Ok(())
}

/// Color only when enabled in config, `NO_COLOR` is unset and stdout is a terminal
fn use_color(config: &Config) -> bool {
    config.color && std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
}
