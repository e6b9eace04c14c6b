//! Thermal trace driver and counter-based energy estimator (`powsim`)

// Modules
pub mod data;
pub mod energy;
pub mod floorplan;
pub mod power_model;
pub mod stats;
pub mod thermal;
pub mod trace;

// Exports
pub use self::{
	energy::{EnergyReport, StatKeys},
	floorplan::{Floorplan, FloorplanBlock, PowerSpec},
	power_model::{PowerModel, PowerModelRow},
	stats::{StatRecord, StatValue},
	thermal::{ExternalSimulator, ThermalRun, ThermalSimulator},
	trace::TemperatureTrace,
};
