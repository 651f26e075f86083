use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "lote")]
#[command(about = "Split a project's sources into categorized, size-bounded text bundles")]
#[command(version)]
pub struct Cli {
    /// Verbose output (list members and unreadable files)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet output (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Project root to scan (default: $LOTE_ROOT or current directory)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Directory receiving the artifacts (default: $LOTE_OUT_DIR or current directory)
    #[arg(long, global = true)]
    pub out_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show buckets and artifacts without writing anything
    Plan {
        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the classification rules in evaluation order
    Rules,

    /// Generate shell completions
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_arguments_means_bundle() {
        let cli = Cli::try_parse_from(["lote"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.root.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn plan_accepts_global_flags() {
        let cli = Cli::try_parse_from(["lote", "plan", "--json", "--root", "web", "-q"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Plan { json: true })));
        assert_eq!(cli.root, Some(PathBuf::from("web")));
        assert!(cli.quiet);
    }
}
