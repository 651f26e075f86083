use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use colored::Colorize;

use lote_core::{ArtifactOutcome, BundleConfig, BundlePlan, Bundler, Result};

mod args;
use args::{Cli, Commands, Shell};

/// Console verbosity derived from `--verbose` / `--quiet`
#[derive(Clone, Copy)]
struct Output {
    verbose: bool,
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let output = Output {
        verbose: cli.verbose && !cli.quiet,
        quiet: cli.quiet,
    };

    let root = resolve_dir(cli.root, "LOTE_ROOT");
    let out_dir = resolve_dir(cli.out_dir, "LOTE_OUT_DIR");
    let bundler = Bundler::new(BundleConfig::with_defaults());

    let result = match cli.command {
        None => handle_bundle(&bundler, &root, &out_dir, output),
        Some(Commands::Plan { json }) => handle_plan(&bundler, &root, json, output),
        Some(Commands::Rules) => {
            handle_rules(bundler.config());
            Ok(())
        }
        Some(Commands::Completions { shell }) => {
            handle_completions(shell);
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "[ERROR]".red().bold(), e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn handle_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let shell = match shell {
        Shell::Bash => clap_complete::Shell::Bash,
        Shell::Zsh => clap_complete::Shell::Zsh,
        Shell::Fish => clap_complete::Shell::Fish,
        Shell::PowerShell => clap_complete::Shell::PowerShell,
        Shell::Elvish => clap_complete::Shell::Elvish,
    };
    generate(shell, &mut cmd, "lote", &mut io::stdout());
}

/// CLI option > environment variable > current directory
fn resolve_dir(cli_value: Option<PathBuf>, env_var: &str) -> PathBuf {
    if let Some(dir) = cli_value {
        return dir;
    }

    if let Ok(dir) = std::env::var(env_var) {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }

    PathBuf::from(".")
}

fn handle_bundle(bundler: &Bundler, root: &Path, out_dir: &Path, output: Output) -> Result<()> {
    if output.verbose {
        println!("Root: {}", root.display().to_string().cyan());
        println!("Output: {}", out_dir.display().to_string().cyan());
        println!();
    }
    if !output.quiet {
        println!("🔍 Escaneando diretórios...");
    }

    let collection = bundler.collect(root)?;

    if !output.quiet {
        println!(
            "📦 Organizando e dividindo arquivos (Máx {} por parte)...",
            bundler.config().batch_size
        );
    }

    let on_artifact = |outcome: &ArtifactOutcome| {
        let line = outcome_line(outcome);
        if outcome.is_written() {
            if !output.quiet {
                println!("{}", line.green());
            }
        } else {
            eprintln!("{}", line.red());
        }
        if output.verbose {
            for failure in outcome.failures() {
                println!(
                    "   {}",
                    format!("[ERRO AO LER {}: {}]", failure.relative, failure.message).dimmed()
                );
            }
        }
    };

    let report = bundler.write(&collection, out_dir, Some(&on_artifact))?;

    if output.verbose {
        println!();
        println!("Summary:");
        println!("  Files seen: {}", report.stats.files_seen);
        println!("  Filtered: {}", report.stats.filtered);
        println!("  Unclassified: {}", report.stats.unclassified);
        println!("  Artifacts written: {}", report.written());
        println!("  Artifacts failed: {}", report.failed());
        println!("  Unreadable members: {}", report.member_failures().len());
    }

    Ok(())
}

/// Console line announcing one artifact
fn outcome_line(outcome: &ArtifactOutcome) -> String {
    match outcome {
        ArtifactOutcome::Written {
            artifact, members, ..
        } => format!("✅ Gerado: {} ({} arquivos)", artifact, members),
        ArtifactOutcome::Failed {
            artifact, message, ..
        } => format!("❌ Erro fatal ao criar {}: {}", artifact, message),
    }
}

fn handle_plan(bundler: &Bundler, root: &Path, json: bool, output: Output) -> Result<()> {
    let collection = bundler.collect(root)?;
    let plan = bundler.plan(&collection);

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    print_plan(&plan, output);
    Ok(())
}

fn print_plan(plan: &BundlePlan, output: Output) {
    if plan.buckets.is_empty() {
        println!("{}", "No files matched any bucket.".yellow());
        return;
    }

    for bucket in &plan.buckets {
        println!(
            "{} ({} files)",
            bucket.name.cyan().bold(),
            bucket.files
        );
        for artifact in &bucket.artifacts {
            println!("  {} ({})", artifact.name, artifact.members.len());
            if output.verbose {
                for member in &artifact.members {
                    println!("    {}", member.dimmed());
                }
            }
        }
    }

    if !output.quiet {
        println!();
        println!(
            "{} artifacts, max {} files each ({} seen, {} filtered, {} unclassified)",
            plan.artifact_count(),
            plan.batch_size,
            plan.stats.files_seen,
            plan.stats.filtered,
            plan.stats.unclassified
        );
    }
}

fn handle_rules(config: &BundleConfig) {
    println!("{}", "Rules (first match wins):".cyan().bold());
    for (i, rule) in config.rules.iter().enumerate() {
        println!("  {}. {}", i + 1, rule.name.bold());
        for key in &rule.keys {
            println!("       {}", key);
        }
    }

    println!();
    println!(
        "{} {} (outside paths containing \"{}\")",
        "Fallback:".cyan().bold(),
        config.config_bucket,
        config.source_root_marker
    );
    println!("       {}", config.root_config_files.join(", "));

    println!();
    println!(
        "{} {}",
        "Extensions:".cyan().bold(),
        config.allowed_extensions.join(" ")
    );
    println!(
        "{} {}",
        "Ignored files:".cyan().bold(),
        config.ignored_files.join(", ")
    );
    println!(
        "{} {}",
        "Ignored dirs:".cyan().bold(),
        config.ignored_dirs.join(", ")
    );
    println!(
        "{} {}",
        "Batch size:".cyan().bold(),
        config.batch_size
    );
}
