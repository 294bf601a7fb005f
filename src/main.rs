use std::env;
use std::io::IsTerminal;

use clap::Parser;
use todo_txt::cli::commands::Cli;
use todo_txt::cli::handlers;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn init_tracing() {
    let filter = EnvFilter::try_from_env("TODO_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "todo_txt=debug,warn"
        } else {
            "warn"
        })
    });

    let format = env::var("TODO_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(
                    fmt::layer()
                        .compact()
                        .without_time()
                        .with_target(false)
                        .with_ansi(std::io::stderr().is_terminal())
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    }
}

fn main() {
    init_tracing();

    if let Err(e) = ctrlc::set_handler(|| {
        eprintln!("\nInterrupted!");
        std::process::exit(2);
    }) {
        tracing::debug!("could not install interrupt handler: {}", e);
    }

    let cli = Cli::parse();
    if let Err(e) = handlers::dispatch(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
