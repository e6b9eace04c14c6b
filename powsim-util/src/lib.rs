//! Utilities

// Modules
pub mod logger;

// Imports
use std::{cell::RefCell, fmt};

/// Extension trait for `str` to strip trailing comments
#[extend::ext(name = StrUncommented)]
pub impl str {
	/// Returns everything before the first `delim`.
	///
	/// If `delim` doesn't occur, returns the whole string.
	fn uncommented(&self, delim: char) -> &str {
		match self.split_once(delim) {
			Some((before, _)) => before,
			None => self,
		}
	}

	/// Returns this string without a single trailing line terminator (`\n` or `\r\n`)
	fn trim_line_end(&self) -> &str {
		let line = self.strip_suffix('\n').unwrap_or(self);
		line.strip_suffix('\r').unwrap_or(line)
	}
}

/// [`fmt::Display`] helper to display using a `FnMut(&mut fmt::Formatter)`
pub struct DisplayWrapper<F: FnMut(&mut fmt::Formatter) -> fmt::Result>(RefCell<F>);

impl<F: FnMut(&mut fmt::Formatter) -> fmt::Result> DisplayWrapper<F> {
	/// Creates a new display wrapper
	#[must_use]
	pub const fn new(func: F) -> Self {
		Self(RefCell::new(func))
	}
}


impl<F: FnMut(&mut fmt::Formatter) -> fmt::Result> fmt::Display for DisplayWrapper<F> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		// Note: `f` cannot be re-entrant, so this cannot fail
		self.0.borrow_mut()(f)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn uncommented_splits_on_first_delim() {
		assert_eq!("a 1 # b # c".uncommented('#'), "a 1 ");
		assert_eq!("a 1".uncommented('#'), "a 1");
		assert_eq!("# all comment".uncommented('#'), "");
	}

	#[test]
	fn trim_line_end_removes_one_terminator() {
		assert_eq!("5.0\n".trim_line_end(), "5.0");
		assert_eq!("5.0\r\n".trim_line_end(), "5.0");
		assert_eq!("5.0".trim_line_end(), "5.0");
		assert_eq!("5.0\n\n".trim_line_end(), "5.0\n");
	}

	#[test]
	fn display_wrapper_calls_closure() {
		let value = 3;
		let wrapper = DisplayWrapper::new(|f| write!(f, "value={value}"));
		assert_eq!(wrapper.to_string(), "value=3");
	}
}
