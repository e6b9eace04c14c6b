//! Temperature traces produced by the thermal simulator

// Imports
use {
	anyhow::Context,
	average::{Max, Mean, Min},
	itertools::Itertools,
	std::{
		fs,
		io::{self, BufRead},
		path::Path,
	},
};

/// Column separator
pub const SEPARATOR: char = '\t';

/// Temperature trace
#[derive(PartialEq, Clone, Debug)]
pub struct TemperatureTrace {
	/// Time column name
	time_name: String,

	/// Time of each row
	time: Vec<f64>,

	/// Temperature columns, by name
	columns: Vec<(String, Vec<f64>)>,
}

impl TemperatureTrace {
	/// Returns the column name for core `core_idx`
	#[must_use]
	pub fn core_column_name(core_idx: usize) -> String {
		format!("core{core_idx}(K)")
	}

	/// Parses a trace from a reader.
	///
	/// The first line is ignored, the second is the header, with the first
	/// column being the time. Every other line is a row.
	pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, anyhow::Error> {
		let mut lines = reader.lines().enumerate().skip(1);

		// Parse the header
		let (_, header) = lines.next().context("Missing header")?;
		let header = header.context("Unable to read header")?;
		let mut names = self::split_row(&header).map(str::to_owned);
		let time_name = names.next().context("Header has no columns")?;
		let mut columns = names.map(|name| (name, vec![])).collect::<Vec<_>>();
		tracing::trace!(?time_name, columns = ?columns.iter().map(|(name, _)| name).collect::<Vec<_>>(), "Parsed header");

		// Then all rows
		let mut time = vec![];
		for (line_idx, line) in lines {
			let line_num = line_idx + 1;
			let line = line.with_context(|| format!("Unable to read line {line_num}"))?;
			if line.trim().is_empty() {
				continue;
			}

			let cells = self::split_row(&line)
				.map(|cell| {
					cell.parse::<f64>()
						.with_context(|| format!("Unable to parse value {cell:?} on line {line_num}"))
				})
				.collect::<Result<Vec<_>, _>>()?;
			anyhow::ensure!(
				cells.len() == columns.len() + 1,
				"Line {line_num} has {} columns, expected {}",
				cells.len(),
				columns.len() + 1
			);

			let mut cells = cells.into_iter();
			time.extend(cells.next());
			for ((_, column), cell) in columns.iter_mut().zip(cells) {
				column.push(cell);
			}
		}

		tracing::trace!(rows = time.len(), "Parsed temperature trace");
		Ok(Self {
			time_name,
			time,
			columns,
		})
	}

	/// Parses a trace from a file
	pub fn from_path(path: &Path) -> Result<Self, anyhow::Error> {
		let file = fs::File::open(path).with_context(|| format!("Unable to open trace file {path:?}"))?;
		Self::from_reader(io::BufReader::new(file)).with_context(|| format!("Unable to parse trace file {path:?}"))
	}

	/// Returns the time column name
	#[must_use]
	pub fn time_name(&self) -> &str {
		&self.time_name
	}

	/// Returns the time of each row
	#[must_use]
	pub fn time(&self) -> &[f64] {
		&self.time
	}

	/// Returns a temperature column by name
	#[must_use]
	pub fn column(&self, name: &str) -> Option<&[f64]> {
		self.columns
			.iter()
			.find(|(column_name, _)| column_name == name)
			.map(|(_, column)| column.as_slice())
	}

	/// Returns the temperature column of core `core_idx`
	#[must_use]
	pub fn core(&self, core_idx: usize) -> Option<&[f64]> {
		self.column(&Self::core_column_name(core_idx))
	}

	/// Returns all temperature columns
	pub fn columns(&self) -> impl Iterator<Item = (&str, &[f64])> + '_ {
		self.columns
			.iter()
			.map(|(name, column)| (name.as_str(), column.as_slice()))
	}

	/// Summarizes every non-empty temperature column
	#[must_use]
	pub fn summary(&self) -> Vec<ColumnSummary> {
		self.columns()
			.filter_map(|(name, column)| {
				let last = *column.last()?;
				Some(ColumnSummary {
					name: name.to_owned(),
					min: column.iter().copied().collect::<Min>().min(),
					max: column.iter().copied().collect::<Max>().max(),
					mean: column.iter().copied().collect::<Mean>().mean(),
					last,
				})
			})
			.collect()
	}
}

/// Summary of a temperature column
#[derive(PartialEq, Clone, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct ColumnSummary {
	pub name: String,
	pub min:  f64,
	pub max:  f64,
	pub mean: f64,
	pub last: f64,
}

/// Splits a row into it's trimmed, non-empty, cells
fn split_row(line: &str) -> impl Iterator<Item = &str> {
	line.split(SEPARATOR).map(str::trim).filter(|cell| !cell.is_empty())
}

/// Formats summaries as a single line
pub fn fmt_summary(summary: &[ColumnSummary]) -> String {
	summary
		.iter()
		.map(|column| {
			format!(
				"{}: {:.2}..{:.2} (mean {:.2}, last {:.2})",
				column.name, column.min, column.max, column.mean, column.last
			)
		})
		.join(", ")
}

#[cfg(test)]
mod tests {
	use super::*;

	const TRACE: &str = "\
% Temperatures of the CPU die
% Time(s) \t core0(K) \t core1(K) \t core2(K) \t core3(K) \t
0.001 \t 300.0 \t 301.0 \t 302.0 \t 303.0 \t
0.002 \t 310.0 \t 311.0 \t 312.0 \t 313.0 \t

0.003 \t 320.0 \t 321.0 \t 322.0 \t 323.0 \t
";

	#[test]
	fn parse_trace() {
		let trace = TemperatureTrace::from_reader(TRACE.as_bytes()).unwrap();
		assert_eq!(trace.time_name(), "% Time(s)");
		assert_eq!(trace.time(), [0.001, 0.002, 0.003]);
		assert_eq!(trace.core(0).unwrap(), [300.0, 310.0, 320.0]);
		assert_eq!(trace.core(3).unwrap(), [303.0, 313.0, 323.0]);
		assert_eq!(trace.column("core1(K)").unwrap(), [301.0, 311.0, 321.0]);
		assert_eq!(trace.core(4), None);
		assert_eq!(trace.columns().count(), 4);
	}

	#[test]
	fn summarize() {
		let trace = TemperatureTrace::from_reader(TRACE.as_bytes()).unwrap();
		let summary = trace.summary();
		assert_eq!(summary.len(), 4);
		assert_eq!(summary[2], ColumnSummary {
			name: "core2(K)".to_owned(),
			min:  302.0,
			max:  322.0,
			mean: 312.0,
			last: 322.0,
		});
		assert!(fmt_summary(&summary).starts_with("core0(K): 300.00..320.00"));
	}

	#[test]
	fn header_only_trace_has_empty_summary() {
		let trace = TemperatureTrace::from_reader("%\n% Time(s) \t core0(K)\n".as_bytes()).unwrap();
		assert!(trace.time().is_empty());
		assert!(trace.summary().is_empty());
	}

	#[test]
	fn short_row_is_an_error() {
		let err = TemperatureTrace::from_reader("%\n% Time(s) \t core0(K)\n0.1\n".as_bytes()).unwrap_err();
		assert!(err.to_string().contains("Line 3"), "{err:#}");
	}

	#[test]
	fn bad_cell_is_an_error() {
		assert!(TemperatureTrace::from_reader("%\n% Time(s) \t core0(K)\n0.1 \t hot\n".as_bytes()).is_err());
	}

	#[test]
	fn missing_header_is_an_error() {
		assert!(TemperatureTrace::from_reader("% only a title\n".as_bytes()).is_err());
	}

	#[test]
	fn missing_file_is_an_error() {
		assert!(TemperatureTrace::from_path(Path::new("/nonexistent/CPU_DIE_flp.txt")).is_err());
	}
}
