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
	/// Any missing fields use their default values.
	#[clap(long = "config")]
	pub config_file: Option<PathBuf>,

	/// Sub-command
	#[command(subcommand)]
	pub sub_cmd: SubCmd,
}

/// Sub-command
#[derive(Debug, clap::Subcommand)]
pub enum SubCmd {
	#[clap(name = "thermal")]
	Thermal(Thermal),

	#[clap(name = "energy")]
	Energy(Energy),

	#[clap(name = "stats")]
	Stats(Stats),
}

/// Runs the thermal simulator for each power level
#[derive(Debug, clap::Args)]
pub struct Thermal {
	/// Power files, one per level.
	///
	/// Simulated in order, each overwriting the floorplan of the previous one.
	#[clap(required = true)]
	pub power_files: Vec<PathBuf>,

	/// Output file
	#[clap(short = 'o', long = "output")]
	pub output_file: Option<PathBuf>,
}

/// Estimates energy from statistics dumps
#[derive(Debug, clap::Args)]
pub struct Energy {
	/// Statistics files
	#[clap(required = true)]
	pub stats_files: Vec<PathBuf>,

	/// Operating frequency
	#[clap(long = "freq")]
	pub freq: Option<f64>,

	/// LLC size
	#[clap(long = "llc-size")]
	pub llc_size: Option<f64>,

	/// Power model file
	#[clap(long = "power-model")]
	pub power_model: Option<PathBuf>,

	/// Skip statistics files that can't be parsed or are missing statistics
	#[clap(long = "skip-invalid")]
	pub skip_invalid: bool,

	/// Output file
	#[clap(short = 'o', long = "output")]
	pub output_file: Option<PathBuf>,
}

/// Parses a statistics dump and outputs it as json
#[derive(Debug, clap::Args)]
pub struct Stats {
	/// Statistics file
	pub stats_file: PathBuf,

	/// Output file
	///
	/// If not specified, outputs to stdout
	#[clap(short = 'o', long = "output")]
	pub output_file: Option<PathBuf>,
}
