//! Floorplan generation
//!
//! Floorplans describe the geometry and power of each block on the die,
//! in the format consumed by the thermal simulator.

// Imports
use {
	anyhow::Context,
	powsim_util::StrUncommented,
	std::{
		fmt,
		fs,
		io::{self, BufRead, Write},
		path::Path,
	},
};

/// Number of cores in the floorplan
pub const CORE_COUNT: usize = 4;

/// Number of grid columns the cores are laid out on
pub const GRID_COLUMNS: usize = 2;

/// Width and height of each core block
pub const BLOCK_SIZE: u64 = 1000;

/// Power specification
///
/// The power values shared by all cores, kept verbatim.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct PowerSpec {
	values: String,
}

impl PowerSpec {
	/// Creates a power spec from it's values
	pub fn new(values: impl Into<String>) -> Self {
		Self { values: values.into() }
	}

	/// Reads a power spec from the first line of a reader
	pub fn from_reader<R: BufRead>(mut reader: R) -> Result<Self, anyhow::Error> {
		let mut line = String::new();
		let read = reader.read_line(&mut line).context("Unable to read first line")?;
		anyhow::ensure!(read != 0, "Power file is empty");

		Ok(Self::new(line.trim_line_end()))
	}

	/// Reads a power spec from a file
	pub fn from_path(path: &Path) -> Result<Self, anyhow::Error> {
		let file = fs::File::open(path).with_context(|| format!("Unable to open power file {path:?}"))?;
		Self::from_reader(io::BufReader::new(file)).with_context(|| format!("Unable to parse power file {path:?}"))
	}

	/// Returns the power values
	#[must_use]
	pub fn values(&self) -> &str {
		&self.values
	}
}

/// Floorplan block
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct FloorplanBlock {
	pub name:         String,
	pub x:            u64,
	pub y:            u64,
	pub width:        u64,
	pub height:       u64,
	pub power_values: String,
}

impl FloorplanBlock {
	/// Creates the block for core `core_idx` on the grid
	#[must_use]
	pub fn core(core_idx: usize, power: &PowerSpec) -> Self {
		let column = (core_idx % GRID_COLUMNS) as u64;
		let row = (core_idx / GRID_COLUMNS) as u64;

		Self {
			name:         format!("core{core_idx}"),
			x:            BLOCK_SIZE * column,
			y:            BLOCK_SIZE * row,
			width:        BLOCK_SIZE,
			height:       BLOCK_SIZE,
			power_values: power.values().to_owned(),
		}
	}
}

impl fmt::Display for FloorplanBlock {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, "{} :", self.name)?;
		writeln!(f, "  position  {},   {} ;", self.x, self.y)?;
		writeln!(f, "  dimension  {},   {} ;", self.width, self.height)?;
		writeln!(f, "  power values  {} ;", self.power_values)?;
		writeln!(f)
	}
}

/// Floorplan
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Floorplan {
	/// Blocks, always [`CORE_COUNT`] of them
	blocks: Vec<FloorplanBlock>,
}

impl Floorplan {
	/// Creates the core grid floorplan, with every core using `power`
	#[must_use]
	pub fn grid(power: &PowerSpec) -> Self {
		let blocks = (0..CORE_COUNT)
			.map(|core_idx| FloorplanBlock::core(core_idx, power))
			.collect();
		Self { blocks }
	}

	/// Returns all blocks
	#[must_use]
	pub fn blocks(&self) -> &[FloorplanBlock] {
		&self.blocks
	}

	/// Writes this floorplan to a writer
	pub fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), anyhow::Error> {
		for block in &self.blocks {
			write!(writer, "{block}").with_context(|| format!("Unable to write block {:?}", block.name))?;
		}

		Ok(())
	}

	/// Writes this floorplan to a file, replacing any existing contents
	pub fn write_to_path(&self, path: &Path) -> Result<(), anyhow::Error> {
		let file = fs::File::create(path).with_context(|| format!("Unable to create floorplan file {path:?}"))?;
		let mut writer = io::BufWriter::new(file);
		self.to_writer(&mut writer)?;
		writer
			.flush()
			.with_context(|| format!("Unable to flush floorplan file {path:?}"))?;

		tracing::debug!(?path, blocks = self.blocks.len(), "Wrote floorplan");
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn grid_layout() {
		let power = PowerSpec::from_reader("5.0\n6.0\n".as_bytes()).unwrap();
		let floorplan = Floorplan::grid(&power);

		let blocks = floorplan.blocks();
		assert_eq!(blocks.len(), 4);
		let positions = blocks.iter().map(|block| (block.x, block.y)).collect::<Vec<_>>();
		assert_eq!(positions, [(0, 0), (1000, 0), (0, 1000), (1000, 1000)]);
		for (core_idx, block) in blocks.iter().enumerate() {
			assert_eq!(block.name, format!("core{core_idx}"));
			assert_eq!(block.power_values, "5.0");
			assert_eq!((block.width, block.height), (1000, 1000));
		}
	}

	#[test]
	fn block_text() {
		let block = FloorplanBlock::core(3, &PowerSpec::new("1.5, 2.5"));
		assert_eq!(
			block.to_string(),
			"core3 :\n  position  1000,   1000 ;\n  dimension  1000,   1000 ;\n  power values  1.5, 2.5 ;\n\n"
		);
	}

	#[test]
	fn power_values_are_verbatim() {
		let power = PowerSpec::from_reader("  not a number \r\n".as_bytes()).unwrap();
		assert_eq!(power.values(), "  not a number ");
	}

	#[test]
	fn empty_power_file_is_an_error() {
		assert!(PowerSpec::from_reader("".as_bytes()).is_err());
	}

	#[test]
	fn write_overwrites_previous_contents() {
		let file = tempfile::NamedTempFile::new().unwrap();
		fs::write(file.path(), "x".repeat(4096)).unwrap();

		Floorplan::grid(&PowerSpec::new("9.0")).write_to_path(file.path()).unwrap();
		Floorplan::grid(&PowerSpec::new("7.0")).write_to_path(file.path()).unwrap();

		let contents = fs::read_to_string(file.path()).unwrap();
		assert_eq!(contents.matches(" :\n").count(), 4);
		assert_eq!(contents.matches("power values  7.0 ;").count(), 4);
		assert!(!contents.contains("9.0"));
		assert!(!contents.contains('x'));
	}
}
