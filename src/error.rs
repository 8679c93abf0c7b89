//! Error types for every stage of turning formula text into a result.
//!
//! Each stage short-circuits with its own error type; [`Error`] wraps all of them so callers of the top-level entry
//! points only need to match on a single type.

use std::fmt;

/// Any error that can be produced while tokenizing, parsing, evaluating, or validating a roll
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
	/// Malformed lexeme in the formula text
	#[error(transparent)]
	Lex(#[from] LexError),

	/// Token sequence doesn't match the grammar
	#[error(transparent)]
	Syntax(#[from] SyntaxError),

	/// A dice term, keep modifier, or the formula itself is outside of accepted bounds
	#[error(transparent)]
	Range(#[from] RangeError),

	/// The right-hand side of a division evaluated to zero.
	/// Contains the description of the evaluated division that failed.
	#[error("division by zero in {0}")]
	DivideByZero(String),

	/// Invalid Call of Cthulhu check parameters
	#[error(transparent)]
	Validation(#[from] ValidationError),
}

impl Error {
	/// Character offset into the formula text that the error points at, if the error has one.
	#[must_use]
	pub const fn offset(&self) -> Option<usize> {
		match self {
			Self::Lex(err) => Some(err.offset),
			Self::Syntax(err) => Some(err.offset),
			Self::Range(err) => err.offset(),
			Self::DivideByZero(..) | Self::Validation(..) => None,
		}
	}

	/// Short name of the error kind, suitable for display to users alongside the message.
	#[must_use]
	pub const fn kind(&self) -> &'static str {
		match self {
			Self::Lex(..) => "lex error",
			Self::Syntax(..) => "syntax error",
			Self::Range(..) => "range error",
			Self::DivideByZero(..) => "divide by zero",
			Self::Validation(..) => "validation error",
		}
	}
}

/// An error resulting from tokenizing formula text
///
/// # Examples
/// ```
/// use keeper_dice::parse::lex;
///
/// let err = lex::tokenize("2d6 & 3").unwrap_err();
/// assert_eq!(err.offset, 4);
/// assert_eq!(err.text, "&");
/// ```
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unrecognized input \"{text}\" at offset {offset}: {reason}")]
#[non_exhaustive]
pub struct LexError {
	/// Character offset of the offending text
	pub offset: usize,

	/// Offending text (or "end of input" if the formula ended unexpectedly)
	pub text: String,

	/// Details about what was expected instead
	pub reason: String,
}

impl LexError {
	/// Creates a new lex error.
	#[must_use]
	pub fn new(offset: usize, text: impl Into<String>, reason: impl Into<String>) -> Self {
		Self {
			offset,
			text: text.into(),
			reason: reason.into(),
		}
	}
}

/// An error resulting from a token sequence that doesn't match the grammar
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("expected {} at offset {offset}, found {found}", fmt_expected(.expected))]
#[non_exhaustive]
pub struct SyntaxError {
	/// Character offset of the token that was found
	pub offset: usize,

	/// Description of the token that was found
	pub found: String,

	/// Descriptions of the tokens that would have been accepted
	pub expected: Vec<&'static str>,
}

impl SyntaxError {
	/// Creates a new syntax error.
	#[must_use]
	pub fn new(offset: usize, found: impl Into<String>, expected: Vec<&'static str>) -> Self {
		Self {
			offset,
			found: found.into(),
			expected,
		}
	}
}

/// Joins a list of expectations into a readable "a, b, or c" form.
fn fmt_expected(expected: &[&'static str]) -> String {
	match expected {
		[] => "nothing".to_owned(),
		[only] => (*only).to_owned(),
		[a, b] => format!("{a} or {b}"),
		[rest @ .., last] => format!("{}, or {last}", rest.join(", ")),
	}
}

/// A value outside of the bounds the engine accepts
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RangeError {
	/// Dice count outside of `1..=100`
	#[error("dice count {count} at offset {offset} must be between 1 and {max}", max = crate::dice::DiceTerm::MAX_COUNT)]
	DiceCount {
		/// Count that was given
		count: u32,
		/// Character offset of the dice term
		offset: usize,
	},

	/// Face count outside of `2..=1000`
	#[error("dice faces {faces} at offset {offset} must be between 2 and {max}", max = crate::dice::DiceTerm::MAX_FACES)]
	Faces {
		/// Face count that was given
		faces: u32,
		/// Character offset of the dice term
		offset: usize,
	},

	/// Keep count of zero or larger than the dice term's count
	#[error("keep count {keep} at offset {offset} must be between 1 and the dice count ({count})")]
	KeepCount {
		/// Keep count that was given
		keep: u32,
		/// Count of the dice the modifier is attached to
		count: u32,
		/// Character offset of the keep modifier
		offset: usize,
	},

	/// Parentheses nested deeper than the configured limit
	#[error("parentheses at offset {offset} are nested deeper than {max} levels")]
	NestingTooDeep {
		/// Maximum nesting depth
		max: usize,
		/// Character offset of the parenthesis that exceeded the limit
		offset: usize,
	},

	/// Formula text longer than the configured limit
	#[error("formula is {len} characters long, but at most {max} are allowed")]
	FormulaTooLong {
		/// Length of the formula in characters
		len: usize,
		/// Maximum length
		max: usize,
	},

	/// Integer overflow while calculating a total.
	/// Contains the description of the evaluated expression that overflowed.
	#[error("integer overflow while calculating {0}")]
	Overflow(String),
}

impl RangeError {
	/// Character offset the error points at, if any.
	#[must_use]
	pub const fn offset(&self) -> Option<usize> {
		match self {
			Self::DiceCount { offset, .. }
			| Self::Faces { offset, .. }
			| Self::KeepCount { offset, .. }
			| Self::NestingTooDeep { offset, .. } => Some(*offset),
			Self::FormulaTooLong { .. } | Self::Overflow(..) => None,
		}
	}
}

/// Invalid parameters for a Call of Cthulhu check, raised before anything is rolled
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
	/// Skill value outside of the configured range
	#[error("skill value {value} must be between {min} and {max}")]
	SkillValue {
		/// Skill value that was given
		value: u32,
		/// Minimum accepted skill value
		min: u32,
		/// Maximum accepted skill value
		max: u32,
	},

	/// Bonus/penalty dice count outside of `0..=3`
	#[error("{kind} dice count {count} must be between 0 and 3")]
	BonusDice {
		/// Whether the dice were bonus or penalty dice
		kind: DiceKind,
		/// Count that was given
		count: u32,
	},
}

/// Which kind of extra tens dice a [`ValidationError::BonusDice`] was about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[expect(clippy::exhaustive_enums, reason = "There are only ever bonus and penalty dice")]
pub enum DiceKind {
	/// Bonus dice (`ccN`)
	Bonus,

	/// Penalty dice (`ccnN`)
	Penalty,
}

impl fmt::Display for DiceKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Bonus => "bonus",
			Self::Penalty => "penalty",
		})
	}
}
