//! Power model table

// Imports
use {
	anyhow::Context,
	std::{
		fs,
		io::{self, BufRead},
		path::Path,
	},
};

/// Column separator
pub const SEPARATOR: char = ',';

/// Power model row
///
/// Coefficients for a single operating frequency.
#[derive(PartialEq, Clone, Copy, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct PowerModelRow {
	#[serde(rename = "Freq")]
	pub freq: f64,

	#[serde(rename = "CoreActive")]
	pub core_active: f64,

	#[serde(rename = "CoreIdle")]
	pub core_idle: f64,

	#[serde(rename = "CoreStatic")]
	pub core_static: f64,

	#[serde(rename = "LLCRead")]
	pub llc_read: f64,

	#[serde(rename = "LLCWrite")]
	pub llc_write: f64,

	#[serde(rename = "LLCStatic")]
	pub llc_static: f64,
}

impl PowerModelRow {
	/// Column names, in field order
	pub const COLUMNS: [&'static str; 7] = [
		"Freq",
		"CoreActive",
		"CoreIdle",
		"CoreStatic",
		"LLCRead",
		"LLCWrite",
		"LLCStatic",
	];

	/// Creates a row from values in [`Self::COLUMNS`] order
	#[must_use]
	pub const fn from_values(values: [f64; 7]) -> Self {
		let [freq, core_active, core_idle, core_static, llc_read, llc_write, llc_static] = values;
		Self {
			freq,
			core_active,
			core_idle,
			core_static,
			llc_read,
			llc_write,
			llc_static,
		}
	}
}

/// Power model
#[derive(PartialEq, Clone, Default, Debug)]
pub struct PowerModel {
	/// All rows, in file order
	rows: Vec<PowerModelRow>,
}

impl PowerModel {
	/// Parses a power model from a comma-separated reader.
	///
	/// The first line must be a header containing every column in [`PowerModelRow::COLUMNS`].
	/// Any other columns are ignored.
	///
	/// Empty or missing cells are read as `NaN`, so an incomplete row never matches
	/// a lookup and only poisons it's own coefficients.
	pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, anyhow::Error> {
		let mut lines = reader.lines().enumerate();

		// Locate all the columns we need in the header
		let header = lines
			.next()
			.context("Missing header")?
			.1
			.context("Unable to read header")?;
		let header = header.split(SEPARATOR).map(str::trim).collect::<Vec<_>>();
		let mut column_idxs = [0; 7];
		for (column_idx, column) in column_idxs.iter_mut().zip(PowerModelRow::COLUMNS) {
			*column_idx = header
				.iter()
				.position(|&name| name == column)
				.with_context(|| format!("Header is missing column {column:?}"))?;
		}

		// Then parse every row
		let mut rows = vec![];
		for (line_idx, line) in lines {
			let line_num = line_idx + 1;
			let line = line.with_context(|| format!("Unable to read line {line_num}"))?;
			if line.trim().is_empty() {
				continue;
			}

			let cells = line.split(SEPARATOR).map(str::trim).collect::<Vec<_>>();
			let mut values = [0.0; 7];
			for ((value, &column_idx), column) in values.iter_mut().zip(&column_idxs).zip(PowerModelRow::COLUMNS) {
				*value = match cells.get(column_idx).copied().unwrap_or_default() {
					"" => f64::NAN,
					cell => cell
						.parse()
						.with_context(|| format!("Unable to parse {column:?} value {cell:?} on line {line_num}"))?,
				};
			}

			rows.push(PowerModelRow::from_values(values));
		}

		tracing::trace!(rows = rows.len(), "Parsed power model");
		Ok(Self { rows })
	}

	/// Parses a power model from a file
	pub fn from_path(path: &Path) -> Result<Self, anyhow::Error> {
		let file = fs::File::open(path).with_context(|| format!("Unable to open power model {path:?}"))?;
		Self::from_reader(io::BufReader::new(file)).with_context(|| format!("Unable to parse power model {path:?}"))
	}

	/// Finds the index of the first row with exactly frequency `freq`.
	///
	/// There is no interpolation between frequencies.
	#[must_use]
	pub fn find(&self, freq: f64) -> Option<usize> {
		self.rows.iter().position(|row| row.freq == freq)
	}

	/// Returns a row by index
	#[must_use]
	pub fn row(&self, idx: usize) -> Option<&PowerModelRow> {
		self.rows.get(idx)
	}

	/// Returns the first row with exactly frequency `freq`
	#[must_use]
	pub fn lookup(&self, freq: f64) -> Option<&PowerModelRow> {
		self.find(freq).and_then(|idx| self.row(idx))
	}

	/// Returns all rows
	#[must_use]
	pub fn rows(&self) -> &[PowerModelRow] {
		&self.rows
	}
}
