//! Thermal simulation

// Imports
use {
	crate::{
		floorplan::{Floorplan, PowerSpec},
		trace::TemperatureTrace,
	},
	anyhow::Context,
	std::{
		path::{Path, PathBuf},
		process::{Command, Stdio},
	},
};

/// Thermal simulator
pub trait ThermalSimulator {
	/// Runs the simulator on stack description `stack_file`, blocking until it finishes.
	///
	/// The simulator is expected to read the floorplan and write the
	/// temperature trace on it's own, as specified by the stack file.
	fn run(&mut self, stack_file: &Path) -> Result<(), anyhow::Error>;
}

/// External simulator binary
#[derive(Clone, Debug)]
pub struct ExternalSimulator {
	/// Binary path
	binary: PathBuf,
}

impl ExternalSimulator {
	/// Creates a new external simulator
	pub fn new(binary: impl Into<PathBuf>) -> Self {
		Self { binary: binary.into() }
	}
}

impl ThermalSimulator for ExternalSimulator {
	fn run(&mut self, stack_file: &Path) -> Result<(), anyhow::Error> {
		tracing::debug!(binary = ?self.binary, ?stack_file, "Running thermal simulator");
		let status = Command::new(&self.binary)
			.arg(stack_file)
			.stdin(Stdio::null())
			.stdout(Stdio::null())
			.status()
			.with_context(|| format!("Unable to run thermal simulator {:?}", self.binary))?;

		// Note: The exit status isn't trusted either way, a failed run will show up
		//       as a missing or stale trace file instead.
		if !status.success() {
			tracing::warn!(binary = ?self.binary, %status, "Thermal simulator exited unsuccessfully");
		}

		Ok(())
	}
}

/// Thermal run.
///
/// All paths are fixed across levels, so each level overwrites the files
/// of the previous one. Concurrent runs on the same paths will race.
#[derive(Clone, Debug)]
pub struct ThermalRun {
	/// Floorplan file, written before each simulation
	pub floorplan_file: PathBuf,

	/// Stack file, passed to the simulator
	pub stack_file: PathBuf,

	/// Trace file, read after each simulation
	pub trace_file: PathBuf,
}

impl ThermalRun {
	/// Simulates a single power level, read from `power_file`.
	///
	/// Writes the floorplan, runs the simulator and reads back the trace.
	pub fn run_level<S: ThermalSimulator + ?Sized>(
		&self,
		simulator: &mut S,
		power_file: &Path,
	) -> Result<TemperatureTrace, anyhow::Error> {
		let power = PowerSpec::from_path(power_file).context("Unable to read power file")?;
		tracing::debug!(?power_file, power = power.values(), "Read power values");

		Floorplan::grid(&power)
			.write_to_path(&self.floorplan_file)
			.context("Unable to write floorplan")?;

		simulator
			.run(&self.stack_file)
			.context("Unable to run thermal simulator")?;

		TemperatureTrace::from_path(&self.trace_file).context("Unable to read temperature trace")
	}
}
