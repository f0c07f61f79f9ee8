//! PIM simulator statistics (`pimstat`)

// Modules
mod args;

// Imports
use {
	self::args::Args,
	anyhow::Context,
	clap::Parser,
	pimstat::{report, Config, RegexParser},
	pimstat_util::logger,
	std::{fs, io},
};

fn main() -> Result<(), anyhow::Error> {
	// Get arguments
	let args = Args::parse();
	logger::pre_init::debug(format!("Args: {args:?}"));

	// Initialize logging
	logger::init(args.log_file.as_deref(), args.log_file_append);

	// Read the config file, if any, and apply any overrides
	let mut config = match &args.config_file {
		Some(config_file) => {
			let config_file = fs::File::open(config_file).context("Unable to open config file")?;
			serde_json::from_reader::<_, Config>(config_file).context("Unable to parse config file")?
		},
		None => Config::default(),
	};
	if let Some(results_dir) = args.results_dir {
		config.results_dir = results_dir;
	}
	if let Some(baseline) = args.baseline {
		config.baseline = baseline;
	}
	if !args.policies.is_empty() {
		config.policies = args.policies;
	}
	tracing::debug!(?config, "Configuration");

	// Then analyze all policies
	let analysis = pimstat::analyze(&config, &RegexParser::new()).context("Unable to analyze policies")?;

	if !args.no_export {
		let output_path = args.output_file.unwrap_or_else(|| config.output_path());
		report::write_csv(&analysis.table, &output_path).context("Unable to export results")?;
		tracing::info!(?output_path, "Results saved");
	}

	let mut stdout = io::stdout().lock();
	report::write_summary(&mut stdout, &analysis.table, analysis.comparison.as_ref())
		.context("Unable to write summary")?;

	Ok(())
}
