//! Thermal trace driver and counter-based energy estimator (`powsim`)

// Modules
mod args;
mod config;

// Imports
use {
	self::{args::Args, config::Config},
	anyhow::Context,
	clap::Parser,
	powsim::{
		data,
		trace::fmt_summary,
		EnergyReport,
		ExternalSimulator,
		PowerModel,
		StatRecord,
		ThermalRun,
	},
	powsim_util::{logger, DisplayWrapper},
	std::{
		fs,
		io::{self, Write},
		path::Path,
	},
};

fn main() -> Result<(), anyhow::Error> {
	// Get arguments
	let args = Args::parse();
	logger::pre_init::debug(format!("Args: {args:?}"));

	// Initialize logging
	logger::init(args.log_file.as_deref(), args.log_file_append);

	// Read the config file
	let config = match &args.config_file {
		Some(config_file) => {
			let config_file = fs::File::open(config_file).context("Unable to open config file")?;
			serde_json::from_reader::<_, Config>(config_file).context("Unable to parse config file")?
		},
		None => Config::default(),
	};
	tracing::debug!(?config, "Loaded config");

	match args.sub_cmd {
		args::SubCmd::Thermal(cmd_args) => self::run_thermal(&config, cmd_args),
		args::SubCmd::Energy(cmd_args) => self::run_energy(&config, cmd_args),
		args::SubCmd::Stats(cmd_args) => self::run_stats(cmd_args),
	}
}

/// Runs the thermal simulator on every power level
fn run_thermal(config: &Config, cmd_args: args::Thermal) -> Result<(), anyhow::Error> {
	let mut simulator = ExternalSimulator::new(&config.thermal.simulator);
	let run = ThermalRun {
		floorplan_file: config.thermal.floorplan_file.clone(),
		stack_file:     config.thermal.stack_file.clone(),
		trace_file:     config.thermal.trace_file.clone(),
	};

	let mut output = data::ThermalData::default();
	for power_file in cmd_args.power_files {
		let trace = run
			.run_level(&mut simulator, &power_file)
			.with_context(|| format!("Unable to simulate power level {power_file:?}"))?;

		let columns = trace.summary();
		tracing::info!(
			?power_file,
			rows = trace.time().len(),
			"Temperatures: {}",
			DisplayWrapper::new(|f| f.write_str(&fmt_summary(&columns)))
		);

		output.levels.push(data::ThermalLevel { power_file, columns });
	}

	if let Some(output_file) = &cmd_args.output_file {
		self::write_output(output_file, &output)?;
	}

	Ok(())
}

/// Estimates the energy of every statistics file
fn run_energy(config: &Config, cmd_args: args::Energy) -> Result<(), anyhow::Error> {
	let freq = cmd_args.freq.unwrap_or(config.energy.freq);
	let llc_size = cmd_args.llc_size.unwrap_or(config.energy.llc_size);
	let power_model_file = cmd_args.power_model.as_deref().unwrap_or(&config.energy.power_model);

	// Find the power model row for our frequency
	let power_model = PowerModel::from_path(power_model_file).context("Unable to load power model")?;
	let row_idx = power_model
		.find(freq)
		.with_context(|| format!("Power model has no row for frequency {freq}"))?;
	let row = power_model.row(row_idx).context("Power model row vanished")?;
	tracing::debug!(freq, row_idx, ?row, "Found power model row");

	let mut output = data::EnergyData {
		freq,
		llc_size,
		entries: vec![],
		skipped: vec![],
	};
	for stats_file in cmd_args.stats_files {
		let report = StatRecord::from_path(&stats_file)
			.and_then(|stats| EnergyReport::compute(&stats, row, llc_size, &config.energy.keys));

		match report {
			Ok(report) => {
				tracing::info!(?stats_file, "Energy: {report}");
				output.entries.push(data::EnergyEntry { stats_file, report });
			},

			Err(err) if cmd_args.skip_invalid => {
				tracing::warn!(?stats_file, "Skipping invalid stats file: {err:?}");
				output.skipped.push(data::SkippedEntry {
					stats_file,
					error: format!("{err:#}"),
				});
			},

			Err(err) => return Err(err.context(format!("Unable to estimate energy of {stats_file:?}"))),
		}
	}

	if let Some(output_file) = &cmd_args.output_file {
		self::write_output(output_file, &output)?;
	}

	Ok(())
}

/// Dumps a parsed statistics file
fn run_stats(cmd_args: args::Stats) -> Result<(), anyhow::Error> {
	let stats = StatRecord::from_path(&cmd_args.stats_file).context("Unable to parse stats file")?;
	tracing::info!(stats = stats.len(), "Parsed stats file");

	match &cmd_args.output_file {
		Some(output_file) => self::write_output(output_file, &stats)?,
		None => serde_json::to_writer_pretty(io::stdout().lock(), &stats).context("Unable to write to stdout")?,
	}

	Ok(())
}

/// Writes `data` as json to `output_file`
fn write_output<T: serde::Serialize>(output_file: &Path, data: &T) -> Result<(), anyhow::Error> {
	let file = fs::File::create(output_file).context("Unable to create output file")?;
	let mut writer = io::BufWriter::new(file);
	serde_json::to_writer(&mut writer, data).context("Unable to write to output file")?;
	writer.flush().context("Unable to flush output file")?;
	tracing::debug!(?output_file, "Wrote output");

	Ok(())
}
