use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use artifact_buckets_core::{
    categorize, verify_samples, BucketsError, Config, RawLogMapper, Result,
};

mod args;
use args::{Cli, Commands, ConfigAction, Shell};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let base_dir = resolve_base_dir(cli.base_dir);

    let result = match cli.command {
        Some(Commands::Map {
            paths,
            strict,
            no_release_tag,
            stats,
        }) => handle_map(&base_dir, &paths, strict, no_release_tag, stats),
        Some(Commands::Categorize {
            names,
            default_version,
            json,
        }) => handle_categorize(&names, default_version.as_deref(), json),
        Some(Commands::Verify { samples }) => handle_verify(&samples),
        Some(Commands::Config { action }) => handle_config(action, &base_dir),
        Some(Commands::Completions { shell }) => {
            handle_completions(shell);
            Ok(())
        }
        None => {
            Cli::command().print_help().ok();
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

/// Log to stderr; stdout carries the mapped data
fn init_tracing(verbose: bool, quiet: bool) {
    let default_level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn resolve_base_dir(cli_base: Option<PathBuf>) -> PathBuf {
    if let Some(base) = cli_base {
        return base;
    }

    dirs::home_dir()
        .map(|h| h.join(".artifact-buckets"))
        .unwrap_or_else(|| PathBuf::from(".artifact-buckets"))
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
    generate(shell, &mut cmd, "artifact-buckets", &mut io::stdout());
}

fn handle_map(
    base_dir: &Path,
    paths: &[PathBuf],
    strict: bool,
    no_release_tag: bool,
    show_stats: bool,
) -> Result<()> {
    let mut map_config = Config::load(base_dir)?.map;
    if strict {
        map_config.strict = true;
    }
    if no_release_tag {
        map_config.use_release_tag = false;
    }

    let mapper = RawLogMapper::new(map_config);
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let stats = mapper.map_paths(paths, &mut out)?;

    if show_stats {
        eprintln!(
            "{} files={} lines={} emitted={} warnings={} skipped={} (malformed={} uncategorizable={})",
            "[STATS]".cyan().bold(),
            stats.files,
            stats.lines,
            stats.emitted,
            stats.warnings,
            stats.skipped(),
            stats.malformed,
            stats.uncategorizable,
        );
    }
    Ok(())
}

fn handle_categorize(names: &[String], default_version: Option<&str>, json: bool) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for name in names {
        let bucket = categorize(name, default_version);
        if json {
            writeln!(out, "{}", serde_json::to_string(&bucket)?)?;
        } else {
            writeln!(out, "{}", bucket.sample_line(name))?;
        }
        if bucket.has_leftover() {
            tracing::warn!("Could not fully categorize {} got{}", name, bucket.leftover);
        }
    }
    Ok(())
}

fn handle_verify(samples: &Path) -> Result<()> {
    if !samples.exists() {
        return Err(BucketsError::InputNotFound {
            path: samples.to_path_buf(),
        });
    }

    let report = verify_samples(BufReader::new(File::open(samples)?))?;

    for (line_no, line) in &report.bad_lines {
        println!("{} line {}: {}", "[SKIP]".yellow(), line_no, line);
    }
    for failure in &report.failures {
        println!(
            "{} {} (line {})",
            "[FAIL]".red().bold(),
            failure.file,
            failure.line_no
        );
        for m in &failure.mismatches {
            println!(
                "    {}: expected {}, got {}",
                m.column,
                m.expected.green(),
                m.actual.red()
            );
        }
    }

    let passed = report.checked - report.failures.len();
    println!(
        "{} {}/{} samples passed",
        if report.passed() {
            "[OK]".green().bold()
        } else {
            "[NG]".red().bold()
        },
        passed,
        report.checked
    );

    report.into_result().map(|_| ())
}

fn handle_config(action: ConfigAction, base_dir: &Path) -> Result<()> {
    match action {
        ConfigAction::List => {
            let config = Config::load(base_dir)?;
            for (key, value) in config.list() {
                println!("{} = {}", key.cyan(), value);
            }
        }
        ConfigAction::Get { key } => {
            let config = Config::load(base_dir)?;
            match config.get(&key) {
                Some(value) => println!("{}", value),
                None => return Err(BucketsError::ConfigKeyNotFound { key }),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load(base_dir)?;
            config.set(&key, &value)?;
            config.save(base_dir)?;
            println!("{} {} = {}", "[OK]".green(), key, value);
        }
        ConfigAction::Init => {
            let path = Config::init(base_dir)?;
            println!("{} {}", "[OK]".green(), path.display());
        }
        ConfigAction::Path => {
            println!("{}", Config::path(base_dir).display());
        }
    }
    Ok(())
}
