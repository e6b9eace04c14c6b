//! Energy estimation

// Imports
use {
	crate::{power_model::PowerModelRow, stats::StatRecord},
	anyhow::Context,
	std::fmt,
};

/// Scale applied to every energy component.
///
/// Note: This is `1e-11`, not `1e-12`.
pub const ENERGY_SCALE: f64 = 10e-12;

/// Names of the statistics used to estimate energy
#[derive(PartialEq, Eq, Clone, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StatKeys {
	/// Total cycles
	pub num_cycles: String,

	/// Idle cycles
	pub idle_cycles: String,

	/// LLC read hits, summed
	pub llc_read_hits: Vec<String>,

	/// LLC write hits, summed
	pub llc_write_hits: Vec<String>,
}

impl Default for StatKeys {
	fn default() -> Self {
		Self {
			num_cycles:     "system.cpu.numCycles".to_owned(),
			idle_cycles:    "system.cpu.num_idle_cycles".to_owned(),
			llc_read_hits:  [
				"system.l2.ReadReq_hits::total",
				"system.l2.ReadExReq_hits::total",
				"system.l2.ReadCleanReq_hits::total",
				"system.l2.ReadSharedReq_hits::total",
			]
			.map(str::to_owned)
			.to_vec(),
			llc_write_hits: [
				"system.l2.WritebackDirty_hits::total",
				"system.l2.WritebackClean_hits::total",
				"system.l2.WriteClean_hits::total",
			]
			.map(str::to_owned)
			.to_vec(),
		}
	}
}

/// Energy report.
///
/// Each component is independent, they're never summed.
#[derive(PartialEq, Clone, Copy, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct EnergyReport {
	/// Core active energy
	pub active: f64,

	/// Core idle energy
	pub idle: f64,

	/// Core static energy
	pub r#static: f64,

	/// LLC read energy
	pub llc_read: f64,

	/// LLC write energy
	pub llc_write: f64,

	/// LLC leakage energy
	pub llc_leak: f64,
}

impl EnergyReport {
	/// Computes the energy report of `stats` with power model row `row`.
	///
	/// # Errors
	/// Returns an error if any of the statistics in `keys` is missing.
	pub fn compute(
		stats: &StatRecord,
		row: &PowerModelRow,
		llc_size: f64,
		keys: &StatKeys,
	) -> Result<Self, anyhow::Error> {
		let num_cycles = stats.require(&keys.num_cycles)?.as_f64();
		let idle_cycles = stats.require(&keys.idle_cycles)?.as_f64();
		let llc_reads = self::sum_stats(stats, &keys.llc_read_hits).context("Unable to sum LLC reads")?;
		let llc_writes = self::sum_stats(stats, &keys.llc_write_hits).context("Unable to sum LLC writes")?;
		tracing::trace!(num_cycles, idle_cycles, llc_reads, llc_writes, "Energy inputs");

		Ok(Self {
			active:    (num_cycles - idle_cycles) * row.core_active * ENERGY_SCALE,
			idle:      idle_cycles * row.core_idle * ENERGY_SCALE,
			r#static:  num_cycles * row.core_static * ENERGY_SCALE,
			llc_read:  llc_reads * row.llc_read * ENERGY_SCALE,
			llc_write: llc_writes * row.llc_write * ENERGY_SCALE,
			llc_leak:  num_cycles * llc_size * row.llc_static * ENERGY_SCALE,
		})
	}
}

impl fmt::Display for EnergyReport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"active: {:e}, idle: {:e}, static: {:e}, llc read: {:e}, llc write: {:e}, llc leak: {:e}",
			self.active, self.idle, self.r#static, self.llc_read, self.llc_write, self.llc_leak
		)
	}
}

/// Sums all statistics in `keys`
fn sum_stats(stats: &StatRecord, keys: &[String]) -> Result<f64, anyhow::Error> {
	keys.iter().map(|key| stats.require(key).map(|value| value.as_f64())).sum()
}

#[cfg(test)]
mod tests {
	use {super::*, crate::stats::StatValue};

	fn approx_eq(lhs: f64, rhs: f64) -> bool {
		(lhs - rhs).abs() <= rhs.abs() * 1e-12
	}

	fn stats() -> StatRecord {
		let keys = StatKeys::default();
		let mut stats = StatRecord::default();
		stats.insert(&keys.num_cycles, StatValue::Int(1000));
		stats.insert(&keys.idle_cycles, StatValue::Int(200));
		for (key, value) in keys.llc_read_hits.iter().zip([1, 2, 3, 4]) {
			stats.insert(key, StatValue::Int(value));
		}
		for (key, value) in keys.llc_write_hits.iter().zip([5, 6, 7]) {
			stats.insert(key, StatValue::Int(value));
		}
		stats
	}

	const ROW: PowerModelRow = PowerModelRow::from_values([1005.0, 2.0, 0.5, 0.25, 3.0, 4.0, 0.125]);

	#[test]
	fn active_energy() {
		let report = EnergyReport::compute(&self::stats(), &ROW, 1.0, &StatKeys::default()).unwrap();
		assert!(approx_eq(report.active, 1.6e-8), "{report:?}");
	}

	#[test]
	fn all_components() {
		let report = EnergyReport::compute(&self::stats(), &ROW, 2.0, &StatKeys::default()).unwrap();
		assert!(approx_eq(report.idle, 200.0 * 0.5 * 1e-11), "{report:?}");
		assert!(approx_eq(report.r#static, 1000.0 * 0.25 * 1e-11), "{report:?}");
		assert!(approx_eq(report.llc_read, 10.0 * 3.0 * 1e-11), "{report:?}");
		assert!(approx_eq(report.llc_write, 18.0 * 4.0 * 1e-11), "{report:?}");
		assert!(approx_eq(report.llc_leak, 1000.0 * 2.0 * 0.125 * 1e-11), "{report:?}");
	}

	#[test]
	fn float_statistics_are_accepted() {
		let keys = StatKeys::default();
		let mut stats = self::stats();
		stats.insert(&keys.idle_cycles, StatValue::Float(200.5));
		let report = EnergyReport::compute(&stats, &ROW, 1.0, &keys).unwrap();
		assert!(approx_eq(report.active, 799.5 * 2.0 * 1e-11), "{report:?}");
	}

	#[test]
	fn missing_statistic_is_an_error() {
		let keys = StatKeys {
			llc_write_hits: vec!["system.l3.hits".to_owned()],
			..StatKeys::default()
		};
		let err = EnergyReport::compute(&self::stats(), &ROW, 1.0, &keys).unwrap_err();
		assert!(format!("{err:#}").contains("system.l3.hits"), "{err:#}");
	}

	#[test]
	fn scale_is_one_e_minus_eleven() {
		assert!(approx_eq(ENERGY_SCALE, 1e-11));
	}
}
