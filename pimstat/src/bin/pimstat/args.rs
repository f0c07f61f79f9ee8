//! Arguments

// Imports
use std::path::PathBuf;

/// Arguments
#[derive(Debug)]
#[derive(clap::Parser)]
pub struct Args {
	/// Log file
	///
	/// Specifies a file to perform verbose logging to.
	/// You can use `RUST_LOG_FILE` to set filtering options
	#[clap(long = "log-file")]
	pub log_file: Option<PathBuf>,

	/// Whether to append to the log file
	#[clap(long = "log-file-append")]
	pub log_file_append: bool,

	/// Config file
	///
	/// If not passed, uses the default configuration.
	#[clap(long = "config")]
	pub config_file: Option<PathBuf>,

	/// Results directory
	///
	/// Overrides the configured results directory.
	#[clap(long = "results-dir")]
	pub results_dir: Option<PathBuf>,

	/// Baseline policy
	#[clap(long = "baseline")]
	pub baseline: Option<String>,

	/// Policies to compare
	///
	/// May be passed multiple times. Replaces the configured policies.
	#[clap(long = "policy")]
	pub policies: Vec<String>,

	/// Output file
	///
	/// Defaults to the configured output file within the results directory.
	#[clap(long = "output")]
	pub output_file: Option<PathBuf>,

	/// Only print the summary, without exporting the table
	#[clap(long = "no-export")]
	pub no_export: bool,
}
