use clap::{ArgAction, Args, Parser, Subcommand};
use colored::Colorize;
use graytone_core::{FsStore, Preset, RuleSet, RunMode, ScanConfig};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

type CliResult = Result<i32, Box<dyn std::error::Error>>;

/// graytone: normalize gray text-color classes for light/dark themes
///
/// Rewrites bare and legacy gray text classes to
/// `text-gray-500 dark:text-gray-400` across a source tree.
#[derive(Parser)]
#[command(name = "graytone", version, about, long_about = None)]
struct Cli {
    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite files in place
    Fix(ScanArgs),

    /// Report files that would change, exit 1 if any
    Check(ScanArgs),

    /// Print the normalized text of one file
    Normalize {
        /// Path to a file, or - for stdin
        file: PathBuf,
        /// Rule preset to apply
        #[arg(long, default_value_t = Preset::Standard)]
        preset: Preset,
    },

    /// List the rules of a preset in application order
    Rules {
        /// Rule preset to list
        #[arg(long, default_value_t = Preset::Standard)]
        preset: Preset,
    },

    /// Show version information
    Version,
}

#[derive(Args)]
struct ScanArgs {
    /// Directory to scan [default: src]
    #[arg(long)]
    root: Option<PathBuf>,
    /// File suffix to include, repeatable [default: .tsx .ts]
    #[arg(long = "ext")]
    extensions: Vec<String>,
    /// Directory name to skip, repeatable
    #[arg(long)]
    exclude: Vec<String>,
    /// Config file [default: ./graytone.toml when present]
    #[arg(long)]
    config: Option<PathBuf>,
    /// Rule preset to apply
    #[arg(long, default_value_t = Preset::Standard)]
    preset: Preset,
    /// Output a JSON report instead of one line per file
    #[arg(long)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Fix(args) => cmd_scan(&args, RunMode::Write),
        Commands::Check(args) => cmd_scan(&args, RunMode::DryRun),
        Commands::Normalize { file, preset } => cmd_normalize(&file, preset),
        Commands::Rules { preset } => cmd_rules(preset),
        Commands::Version => {
            println!(
                "graytone {} (graytone-core {})",
                env!("CARGO_PKG_VERSION"),
                graytone_core::VERSION
            );
            Ok(0)
        }
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            2
        }
    };

    process::exit(exit_code);
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// ── Commands ──────────────────────────────────────────────

fn cmd_scan(args: &ScanArgs, mode: RunMode) -> CliResult {
    let config = resolve_config(args)?;
    let verb = match mode {
        RunMode::Write => args.preset.verb(),
        RunMode::DryRun => "Would change",
    };

    let report = graytone_core::run(&config, args.preset, &mut FsStore, mode, |path| {
        if !args.json {
            println!("{} {}", verb, path.display());
        }
    })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if mode == RunMode::DryRun && report.has_changes() {
        eprintln!(
            "{} {} of {} files need normalization",
            "check:".yellow().bold(),
            report.changed.len(),
            report.scanned
        );
    }

    Ok(if mode == RunMode::DryRun && report.has_changes() {
        1
    } else {
        0
    })
}

fn cmd_normalize(file: &Path, preset: Preset) -> CliResult {
    let text = if file == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(file)
            .map_err(|e| format!("cannot read {}: {}", file.display(), e))?
    };

    let out = graytone_core::normalize_with(&text, preset);
    print!("{}", out.text);
    Ok(0)
}

fn cmd_rules(preset: Preset) -> CliResult {
    for (i, rule) in RuleSet::preset(preset).rules().iter().enumerate() {
        let marker = if rule.is_fixpoint() { " (fixpoint)" } else { "" };
        println!("{:>2}. {}{}", i + 1, rule.name().bold(), marker);
        println!("    {}", rule.description());
    }
    Ok(0)
}

// ── Config resolution ─────────────────────────────────────

/// Config file (explicit or discovered) first, then flag overrides
fn resolve_config(args: &ScanArgs) -> graytone_core::Result<ScanConfig> {
    let mut config = match &args.config {
        Some(path) => ScanConfig::load(path)?,
        None => ScanConfig::discover(Path::new("."))?,
    };
    if let Some(root) = &args.root {
        config.root_dir = root.clone();
    }
    if !args.extensions.is_empty() {
        config.set_extensions(&args.extensions);
    }
    if !args.exclude.is_empty() {
        config.exclude = args.exclude.clone();
    }
    tracing::debug!(?config, "resolved scan config");
    Ok(config)
}
