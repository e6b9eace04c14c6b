//! Configuration

// Imports
use {powsim::StatKeys, std::path::PathBuf};

/// Configuration
#[derive(Debug, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Config {
	/// Thermal configuration
	pub thermal: ThermalConfig,

	/// Energy configuration
	pub energy: EnergyConfig,
}

/// Thermal config
#[derive(Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ThermalConfig {
	pub simulator:      PathBuf,
	pub stack_file:     PathBuf,
	pub floorplan_file: PathBuf,
	pub trace_file:     PathBuf,
}

impl Default for ThermalConfig {
	fn default() -> Self {
		Self {
			simulator:      "../../WiPLASH/3d-ice/bin/3D-ICE-Emulator".into(),
			stack_file:     "stk_demo.stk".into(),
			floorplan_file: "flp_demo.flp".into(),
			trace_file:     "CPU_DIE_flp.txt".into(),
		}
	}
}

/// Energy config
#[derive(Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EnergyConfig {
	pub power_model: PathBuf,
	pub freq:        f64,
	pub llc_size:    f64,
	pub keys:        StatKeys,
}

impl Default for EnergyConfig {
	fn default() -> Self {
		Self {
			power_model: "power_model.csv".into(),
			freq:        1005.0,
			llc_size:    1.0,
			keys:        StatKeys::default(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn missing_fields_use_defaults() {
		let config = serde_json::from_str::<Config>(r#"{ "energy": { "freq": 600 } }"#).unwrap();
		assert_eq!(config.energy.freq, 600.0);
		assert_eq!(config.energy.llc_size, 1.0);
		assert_eq!(config.energy.keys, StatKeys::default());
		assert_eq!(config.thermal.stack_file, PathBuf::from("stk_demo.stk"));
	}

	#[test]
	fn keys_can_be_overridden() {
		let config = serde_json::from_str::<Config>(r#"{ "energy": { "keys": { "num_cycles": "system.cpu0.numCycles" } } }"#)
			.unwrap();
		assert_eq!(config.energy.keys.num_cycles, "system.cpu0.numCycles");
		assert_eq!(config.energy.keys.idle_cycles, StatKeys::default().idle_cycles);
	}
}
