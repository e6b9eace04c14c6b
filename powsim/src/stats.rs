//! Statistics dump parsing.
//!
//! Parses the flat `key value # comment` dumps produced by architectural
//! simulators such as gem5.

// Imports
use {
	anyhow::Context,
	powsim_util::StrUncommented,
	std::{
		collections::HashMap,
		fmt,
		fs,
		io::{self, BufRead},
		path::Path,
		str::FromStr,
	},
};

/// Lines starting with this are section separators and are ignored
pub const SEPARATOR: char = '-';

/// Everything after this on a line is a comment
pub const COMMENT: char = '#';

/// A statistic value
#[derive(PartialEq, Clone, Copy, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum StatValue {
	/// Integer
	Int(i64),

	/// Floating point
	Float(f64),
}

impl StatValue {
	/// Returns this value as a float
	#[must_use]
	pub fn as_f64(self) -> f64 {
		match self {
			Self::Int(value) => value as f64,
			Self::Float(value) => value,
		}
	}
}

impl FromStr for StatValue {
	type Err = anyhow::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		// Note: Integers take priority, we only fall back to floats if that fails
		if let Ok(value) = s.parse::<i64>() {
			return Ok(Self::Int(value));
		}

		let value = s
			.parse::<f64>()
			.with_context(|| format!("Value {s:?} is neither an integer nor a float"))?;
		Ok(Self::Float(value))
	}
}

impl fmt::Display for StatValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Int(value) => write!(f, "{value}"),
			Self::Float(value) => write!(f, "{value}"),
		}
	}
}

/// Statistics record
#[derive(PartialEq, Clone, Default, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct StatRecord {
	/// All values, by statistic name
	values: HashMap<String, StatValue>,
}

impl StatRecord {
	/// Parses a statistics dump from a reader
	pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, anyhow::Error> {
		let mut values = HashMap::new();
		for (line_idx, line) in reader.lines().enumerate() {
			let line_num = line_idx + 1;
			let line = line.with_context(|| format!("Unable to read line {line_num}"))?;

			let line = line.trim();
			if line.is_empty() || line.starts_with(SEPARATOR) {
				continue;
			}

			let mut tokens = line.uncommented(COMMENT).split_whitespace();
			let (key, value) = tokens
				.next()
				.zip(tokens.next())
				.with_context(|| format!("Line {line_num} is missing a key or value: {line:?}"))?;
			let value = value
				.parse::<StatValue>()
				.with_context(|| format!("Unable to parse value of {key:?} on line {line_num}"))?;

			// Note: Repeated keys are overwritten by the last occurrence
			if let Some(prev_value) = values.insert(key.to_owned(), value) {
				tracing::trace!(key, %prev_value, %value, "Overwrote repeated statistic");
			}
		}

		tracing::trace!(stats = values.len(), "Parsed statistics");
		Ok(Self { values })
	}

	/// Parses a statistics dump from a file
	pub fn from_path(path: &Path) -> Result<Self, anyhow::Error> {
		let file = fs::File::open(path).with_context(|| format!("Unable to open stats file {path:?}"))?;
		Self::from_reader(io::BufReader::new(file)).with_context(|| format!("Unable to parse stats file {path:?}"))
	}

	/// Returns a statistic by name
	#[must_use]
	pub fn get(&self, key: &str) -> Option<StatValue> {
		self.values.get(key).copied()
	}

	/// Returns a statistic by name, erroring if it doesn't exist
	pub fn require(&self, key: &str) -> Result<StatValue, anyhow::Error> {
		self.get(key).with_context(|| format!("Missing statistic {key:?}"))
	}

	/// Inserts a statistic, returning the previous value, if any
	pub fn insert(&mut self, key: impl Into<String>, value: StatValue) -> Option<StatValue> {
		self.values.insert(key.into(), value)
	}

	/// Returns the number of statistics
	#[must_use]
	pub fn len(&self) -> usize {
		self.values.len()
	}

	/// Returns if there are no statistics
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}
}
