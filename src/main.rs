//! Delta Bench Studio CLI
//!
//! Renders comparative charts and summary tables from the telemetry log
//! emitted by the container-image delta benchmark harness.

use anyhow::Result;
use clap::{Parser, Subcommand};
use delta_bench_studio::commands::{
    execute_diff, execute_file_compare, execute_file_diff, execute_file_io,
    execute_file_io_by_type, execute_merge, execute_patch, execute_pull, execute_split,
    execute_tag_mean, DiffArgs, FileCompareArgs, FileDiffArgs, FileIoArgs, FileIoByTypeArgs,
    MergeArgs, PatchArgs, PullArgs, SplitArgs, TagMeanArgs,
};
use env_logger::Env;
use std::path::PathBuf;

/// Delta Bench Studio - benchmark comparison charts for image delta tooling
#[derive(Parser, Debug)]
#[command(name = "delta-bench")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Compare binary-diff vs file-diff time and artifact size
    Diff {
        /// Telemetry log (newline-delimited JSON)
        input: PathBuf,
        /// Output chart (PNG)
        output: PathBuf,
    },

    /// Compare patch application vs di3fs mount time
    Patch {
        input: PathBuf,
        output: PathBuf,
    },

    /// Compare pull and download time per delta mode
    Pull {
        input: PathBuf,
        output: PathBuf,
    },

    /// Compare delta merge cost against the underlying binary diff
    Merge {
        input: PathBuf,
        output: PathBuf,
    },

    /// Scatter per-file compression efficiency against file size
    FileCompare {
        input: PathBuf,
        output: PathBuf,
    },

    /// Scatter per-file diff and merge cost against file size
    FileDiff {
        input: PathBuf,
        output: PathBuf,
    },

    /// Scatter file I/O latency with per-byte summary bars
    FileIo {
        input: PathBuf,
        output: PathBuf,
    },

    /// Scatter di3fs I/O latency grouped by diff entry type
    FileIoByType {
        /// Diff detail log supplying each file's entry type
        diff_input: PathBuf,
        /// I/O telemetry log
        io_input: PathBuf,
        output: PathBuf,
    },

    /// Split a flat benchmark log into per-task bucket files
    Split {
        /// Combined delimited log
        input: PathBuf,
        /// Directory receiving one file per task bucket
        out_dir: PathBuf,
    },

    /// Print per-tag means of a flat benchmark log
    TagMean {
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Diff { input, output } => execute_diff(DiffArgs { input, output })?,
        Commands::Patch { input, output } => execute_patch(PatchArgs { input, output })?,
        Commands::Pull { input, output } => execute_pull(PullArgs { input, output })?,
        Commands::Merge { input, output } => execute_merge(MergeArgs { input, output })?,
        Commands::FileCompare { input, output } => {
            execute_file_compare(FileCompareArgs { input, output })?
        }
        Commands::FileDiff { input, output } => execute_file_diff(FileDiffArgs { input, output })?,
        Commands::FileIo { input, output } => execute_file_io(FileIoArgs { input, output })?,
        Commands::FileIoByType {
            diff_input,
            io_input,
            output,
        } => execute_file_io_by_type(FileIoByTypeArgs {
            diff_input,
            io_input,
            output,
        })?,
        Commands::Split { input, out_dir } => execute_split(SplitArgs { input, out_dir })?,
        Commands::TagMean { input } => execute_tag_mean(TagMeanArgs { input })?,
    }

    Ok(())
}
