use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "todo", about = concat!("todo v", env!("CARGO_PKG_VERSION"), " - organize your todos"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use a different todo file
    #[arg(short = 'f', long = "file", global = true)]
    pub file: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add one or more tasks
    Add(AddArgs),
    /// List tasks, sorted
    List(ListArgs),
    /// Rewrite the todo file in canonical form
    Correct,
}

#[derive(Args)]
pub struct AddArgs {
    /// Task text, e.g. "(B) .2024-06-01 renew passport +admin :ERRANDS"
    #[arg(short = 't', long = "task", required = true)]
    pub tasks: Vec<String>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Only show tasks with this tag (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add_with_multiple_tasks() {
        let cli = Cli::try_parse_from(["todo", "add", "-t", "buy milk", "--task", "call bank"]).unwrap();
        match cli.command {
            Commands::Add(args) => assert_eq!(args.tasks, vec!["buy milk", "call bank"]),
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn test_add_requires_a_task() {
        assert!(Cli::try_parse_from(["todo", "add"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["todo", "list", "--tag", "home", "-f", "/tmp/t.txt", "--json"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.file.as_deref(), Some("/tmp/t.txt"));
        match cli.command {
            Commands::List(args) => assert_eq!(args.tags, vec!["home"]),
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["todo"]).is_err());
    }
}
