//! Engine configuration shared by the parser, evaluator, and Call of Cthulhu checks.

/// Limits and numeric semantics the engine applies to every roll.
///
/// Dice bounds (1 to 100 dice with 2 to 1000 faces) and the bonus/penalty dice bound (0 to 3) are fixed rules of the
/// notation rather than configuration, so they can't be changed here.
///
/// # Examples
/// ```
/// use keeper_dice::config::{Config, Division};
///
/// let config = Config::new().division(Division::Ceil).max_depth(16);
/// assert_eq!(config.division, Division::Ceil);
/// assert_eq!(config.max_depth, 16);
/// assert_eq!(config.max_formula_len, Config::default().max_formula_len);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[non_exhaustive]
pub struct Config {
	/// Maximum length of formula text, in characters
	pub max_formula_len: usize,

	/// Maximum nesting depth of parentheses
	pub max_depth: usize,

	/// Rounding used for integer division
	pub division: Division,

	/// Lowest accepted Call of Cthulhu skill value
	pub min_skill: u32,

	/// Highest accepted Call of Cthulhu skill value
	pub max_skill: u32,
}

impl Config {
	/// Creates the default configuration.
	#[must_use]
	pub const fn new() -> Self {
		Self {
			max_formula_len: 500,
			max_depth: 64,
			division: Division::Floor,
			min_skill: 1,
			max_skill: 100,
		}
	}

	/// Sets the maximum formula length.
	#[must_use]
	pub const fn max_formula_len(mut self, len: usize) -> Self {
		self.max_formula_len = len;
		self
	}

	/// Sets the maximum parenthesis nesting depth.
	#[must_use]
	pub const fn max_depth(mut self, depth: usize) -> Self {
		self.max_depth = depth;
		self
	}

	/// Sets the rounding used for integer division.
	#[must_use]
	pub const fn division(mut self, division: Division) -> Self {
		self.division = division;
		self
	}

	/// Sets the accepted skill value range (inclusive).
	#[must_use]
	pub const fn skill_range(mut self, min: u32, max: u32) -> Self {
		self.min_skill = min;
		self.max_skill = max;
		self
	}
}

impl Default for Config {
	#[inline]
	fn default() -> Self {
		Self::new()
	}
}

/// How the quotient of an integer division is rounded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[expect(clippy::exhaustive_enums, reason = "Integer rounding modes are a closed set")]
pub enum Division {
	/// Rounds towards negative infinity (`-7 / 2 = -4`)
	#[default]
	Floor,

	/// Rounds towards positive infinity (`7 / 2 = 4`)
	Ceil,

	/// Rounds towards zero (`-7 / 2 = -3`)
	Truncate,
}

impl Division {
	/// Divides `a` by `b` with this rounding mode.
	/// Returns [`None`] if `b` is zero or the division overflows.
	///
	/// # Examples
	/// ```
	/// use keeper_dice::config::Division;
	///
	/// assert_eq!(Division::Floor.apply(-7, 2), Some(-4));
	/// assert_eq!(Division::Ceil.apply(7, 2), Some(4));
	/// assert_eq!(Division::Truncate.apply(-7, 2), Some(-3));
	/// assert_eq!(Division::Floor.apply(5, 0), None);
	/// ```
	#[must_use]
	pub const fn apply(self, a: i64, b: i64) -> Option<i64> {
		let Some(quot) = a.checked_div(b) else {
			return None;
		};
		let Some(rem) = a.checked_rem(b) else {
			return None;
		};
		if rem == 0 {
			return Some(quot);
		}

		// Truncated quotient is off by one whenever the rounding direction differs from truncation
		let negative = (rem < 0) != (b < 0);
		match self {
			Self::Truncate => Some(quot),
			Self::Floor if negative => quot.checked_sub(1),
			Self::Ceil if !negative => quot.checked_add(1),
			Self::Floor | Self::Ceil => Some(quot),
		}
	}
}
