use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "artifact-buckets")]
#[command(about = "Categorize release artifact downloads into bucketable dimensions")]
#[command(version)]
pub struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet output (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Base directory (default: ~/.artifact-buckets)
    #[arg(long, global = true, env = "ARTIFACT_BUCKETS_BASE")]
    pub base_dir: Option<PathBuf>,

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
    /// Recategorize raw download logs into enriched, pipe-delimited lines
    ///
    /// Input lines: ymd|hm|repo|file_name|release_tag|bin_count|sha_count|sig_count
    Map {
        /// Raw data files or directories
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Abort on the first line that can not be mapped
        #[arg(long)]
        strict: bool,

        /// Do not use the release tag as the default version
        #[arg(long)]
        no_release_tag: bool,

        /// Print mapping statistics to stderr when done
        #[arg(long)]
        stats: bool,
    },

    /// Categorize file names given on the command line
    Categorize {
        /// Artifact file names (e.g., bazel-5.0.0-linux-x86_64.tar.gz)
        #[arg(required = true)]
        names: Vec<String>,

        /// Version to report when a name carries none
        #[arg(short, long)]
        default_version: Option<String>,

        /// Output JSON instead of sample lines
        #[arg(long)]
        json: bool,
    },

    /// Check a sample file against the categorizer
    ///
    /// Sample lines: file|product|version|arch|os|packaging|installer|is_bin|{attributes}leftover
    Verify {
        /// Sample file
        samples: PathBuf,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show all config values
    List,

    /// Get a config value
    Get {
        /// Config key (e.g., map.strict)
        key: String,
    },

    /// Set a config value
    Set {
        /// Config key (e.g., map.strict)
        key: String,

        /// New value (true/false)
        value: String,
    },

    /// Create config.toml with commented defaults
    Init,

    /// Print config file path
    Path,
}
