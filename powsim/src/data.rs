//! Output data

// Imports
use {
	crate::{energy::EnergyReport, trace::ColumnSummary},
	std::path::PathBuf,
};

/// Thermal output data
#[derive(Debug, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct ThermalData {
	pub levels: Vec<ThermalLevel>,
}

/// Thermal output for a single power level
#[derive(Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct ThermalLevel {
	pub power_file: PathBuf,
	pub columns:    Vec<ColumnSummary>,
}

/// Energy output data
#[derive(Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct EnergyData {
	pub freq:     f64,
	pub llc_size: f64,
	pub entries:  Vec<EnergyEntry>,

	// Note: Only filled when skipping invalid stats files
	pub skipped: Vec<SkippedEntry>,
}

/// Energy output for a single stats file
#[derive(Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct EnergyEntry {
	pub stats_file: PathBuf,
	pub report:     EnergyReport,
}

/// Stats file that was skipped
#[derive(Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct SkippedEntry {
	pub stats_file: PathBuf,
	pub error:      String,
}
