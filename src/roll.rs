//! Complete rolls: formula text in, immutable results out.

use std::fmt;

use crate::{
	coc::CocRoll,
	config::Config,
	dice::{roller::Roller, DieRoll, Rolled},
	error::Error,
	expr::Evaled,
	format::Formatter,
	parse,
};

/// Result of rolling a dice formula
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DiceRollResult {
	/// Formula text exactly as it was given
	formula: String,

	/// Final value of the formula
	total: i64,

	/// Evaluated formula, holding every rolled die
	evaled: Evaled,
}

impl DiceRollResult {
	/// Formula text exactly as it was given.
	#[must_use]
	pub fn formula(&self) -> &str {
		&self.formula
	}

	/// Final value of the formula.
	#[must_use]
	pub const fn total(&self) -> i64 {
		self.total
	}

	/// Evaluated formula tree.
	#[must_use]
	pub const fn evaled(&self) -> &Evaled {
		&self.evaled
	}

	/// Every rolled dice term, in roll order.
	#[must_use]
	pub fn terms(&self) -> Vec<&Rolled> {
		self.evaled.rolled()
	}

	/// Every individual die roll across all dice terms, in roll order. Dropped dice are included.
	pub fn rolls(&self) -> impl Iterator<Item = &DieRoll> {
		self.terms().into_iter().flat_map(|rolled| rolled.rolls.iter())
	}

	/// Whether the formula contained no dice terms at all.
	#[must_use]
	pub fn is_deterministic(&self) -> bool {
		self.terms().is_empty()
	}
}

impl fmt::Display for DiceRollResult {
	/// Formats the result with a default [`Formatter`].
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&Formatter::default().format_dice(self))
	}
}

/// Result of rolling any command: a dice formula or a Call of Cthulhu check
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[expect(clippy::exhaustive_enums, reason = "The engine only has the two roll paths")]
pub enum Outcome {
	/// Dice formula result
	Dice(DiceRollResult),

	/// Call of Cthulhu check result
	Coc(CocRoll),
}

impl From<DiceRollResult> for Outcome {
	#[inline]
	fn from(result: DiceRollResult) -> Self {
		Self::Dice(result)
	}
}

impl From<CocRoll> for Outcome {
	#[inline]
	fn from(result: CocRoll) -> Self {
		Self::Coc(result)
	}
}

impl fmt::Display for Outcome {
	/// Formats the outcome with a default [`Formatter`].
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&Formatter::default().format(self))
	}
}

/// Parses, rolls, and totals a dice formula with the default [`Config`].
///
/// # Errors
/// See [`parse_and_roll_with()`].
///
/// # Examples
/// ```
/// use keeper_dice::{dice::roller::Iter as IterRoller, parse_and_roll};
///
/// let result = parse_and_roll("4d6kh3 + 2", &mut IterRoller::new([3, 6, 1, 5]))?;
/// assert_eq!(result.total(), 16);
/// assert_eq!(result.rolls().count(), 4);
/// assert_eq!(result.rolls().filter(|roll| roll.is_dropped()).count(), 1);
/// # Ok::<(), keeper_dice::error::Error>(())
/// ```
pub fn parse_and_roll(formula: &str, roller: &mut impl Roller) -> Result<DiceRollResult, Error> {
	parse_and_roll_with(formula, roller, &Config::default())
}

/// Parses, rolls, and totals a dice formula.
///
/// Nothing is rolled unless the whole formula parses, and no partial result is returned alongside an error.
///
/// # Errors
/// - [`Error::Lex`], [`Error::Syntax`], or [`Error::Range`] if the formula can't be parsed
///   (see [`parse::parse_with()`])
/// - [`Error::DivideByZero`] if a divisor evaluates to zero
/// - [`Error::Range`] if calculating the total overflows
pub fn parse_and_roll_with(formula: &str, roller: &mut impl Roller, config: &Config) -> Result<DiceRollResult, Error> {
	let expr = parse::parse_with(formula, config)?;
	let evaled = expr.eval(roller);
	let total = evaled.calc(config.division)?;

	log::debug!("rolled {formula:?}: {evaled} = {total}");
	Ok(DiceRollResult {
		formula: formula.to_owned(),
		total,
		evaled,
	})
}

/// Rolls a command with the default [`Config`]. See [`roll_with()`].
///
/// # Errors
/// See [`roll_with()`].
///
/// # Examples
/// ```
/// use keeper_dice::{coc::Tier, dice::roller::Iter as IterRoller, roll, Outcome};
///
/// let outcome = roll("cc 65", &mut IterRoller::new([0, 1]))?;
/// assert!(matches!(outcome, Outcome::Coc(ref check) if check.tier == Tier::CriticalSuccess));
///
/// let outcome = roll("2d6 + 1", &mut IterRoller::new([4, 5]))?;
/// assert!(matches!(outcome, Outcome::Dice(ref result) if result.total() == 10));
/// # Ok::<(), keeper_dice::error::Error>(())
/// ```
pub fn roll(text: &str, roller: &mut impl Roller) -> Result<Outcome, Error> {
	roll_with(text, roller, &Config::default())
}

/// Rolls a command: text starting with `cc` (in any case) is a Call of Cthulhu check, and anything else is a dice
/// formula.
///
/// # Errors
/// Any error from [`parse::coc_with()`] and [`crate::coc::CocCheck::roll()`] for checks, or from
/// [`parse_and_roll_with()`] for formulas.
pub fn roll_with(text: &str, roller: &mut impl Roller, config: &Config) -> Result<Outcome, Error> {
	if is_coc_command(text) {
		let check = parse::coc_with(text, config)?;
		Ok(Outcome::Coc(check.roll(roller, config)?))
	} else {
		Ok(Outcome::Dice(parse_and_roll_with(text, roller, config)?))
	}
}

/// Checks whether text is a Call of Cthulhu command rather than a dice formula.
#[must_use]
pub fn is_coc_command(text: &str) -> bool {
	text.trim_start()
		.get(..2)
		.is_some_and(|prefix| prefix.eq_ignore_ascii_case("cc"))
}
