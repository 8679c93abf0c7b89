//! Rendering of roll results into human-readable text.
//!
//! Formatting is a pure function of the result, so formatting the same result twice always yields the same text.

use crate::{
	coc::{CocMode, CocRoll, Tier},
	dice::{describe_list, DieRoll, Rolled},
	roll::{DiceRollResult, Outcome},
};

/// Visual style used to distinguish dropped dice and notable results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum Style {
	/// Plain text: dropped dice are suffixed with ` (d)`
	#[default]
	Plain,

	/// Markdown: dropped dice are struck through, totals and critical/fumble tiers are bolded
	Markdown,
}

/// Renders [`Outcome`]s into display text.
///
/// # Examples
/// ```
/// use keeper_dice::{dice::roller::Iter as IterRoller, format::{Formatter, Style}, parse_and_roll};
///
/// let result = parse_and_roll("2d20kh + 5", &mut IterRoller::new([7, 15]))?;
///
/// assert_eq!(
/// 	Formatter::default().format_dice(&result),
/// 	"Roll: 2d20kh + 5\n2d20kh: [7 (d), 15] = 15\nResult: [15] + 5 = 20"
/// );
/// assert_eq!(
/// 	Formatter::new(Style::Markdown).format_dice(&result),
/// 	"Roll: 2d20kh + 5\n2d20kh: [~~7~~, 15] = 15\nResult: [15] + 5 = **20**"
/// );
/// # Ok::<(), keeper_dice::error::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub struct Formatter {
	/// Visual style
	pub style: Style,

	/// Maximum number of individual rolls to list per dice term before truncating with "X more..."
	pub list_limit: Option<usize>,
}

impl Formatter {
	/// Creates a new formatter with the given style and no list limit.
	#[must_use]
	pub const fn new(style: Style) -> Self {
		Self {
			style,
			list_limit: None,
		}
	}

	/// Sets the maximum number of rolls listed per dice term.
	#[must_use]
	pub const fn list_limit(mut self, limit: usize) -> Self {
		self.list_limit = Some(limit);
		self
	}

	/// Renders any outcome.
	#[must_use]
	pub fn format(&self, outcome: &Outcome) -> String {
		match outcome {
			Outcome::Dice(result) => self.format_dice(result),
			Outcome::Coc(check) => self.format_coc(check),
		}
	}

	/// Renders a dice formula result: the formula, one breakdown line per dice term, and the calculation with each
	/// term replaced by its subtotal. Formulas without dice skip the breakdown.
	#[must_use]
	pub fn format_dice(&self, result: &DiceRollResult) -> String {
		let mut lines = vec![format!("Roll: {}", result.formula())];

		lines.extend(result.terms().into_iter().map(|rolled| {
			format!("{}: [{}] = {}", rolled.dice, self.roll_list(rolled), rolled.total())
		}));

		lines.push(format!(
			"Result: {} = {}",
			result.evaled().describe_with(&|rolled| format!("[{}]", rolled.total())),
			self.emphasize(&result.total().to_string())
		));

		lines.join("\n")
	}

	/// Renders a Call of Cthulhu check: the skill (and label), the digits rolled, and the tier.
	///
	/// # Examples
	/// ```
	/// use keeper_dice::{coc::{roll_coc, CocMode}, dice::roller::Iter as IterRoller, format::Formatter};
	///
	/// let check = roll_coc(65, CocMode::Penalty(1), &mut IterRoller::new([2, 4, 8]))?;
	/// assert_eq!(
	/// 	Formatter::default().format_coc(&check),
	/// 	"CoC check: skill 65\nPenalty 1: tens [2, 8] -> highest 8 | units 4\nResult: 84 > 65 Failure"
	/// );
	/// # Ok::<(), keeper_dice::error::ValidationError>(())
	/// ```
	#[must_use]
	pub fn format_coc(&self, check: &CocRoll) -> String {
		let title = match &check.label {
			Some(label) => format!("CoC check: {label} (skill {})", check.skill),
			None => format!("CoC check: skill {}", check.skill),
		};

		let digits = match check.mode {
			CocMode::Normal => format!("Tens: {} | Units: {}", check.tens, check.units),
			CocMode::Bonus(count) => Self::candidates_line("Bonus", count, "lowest", check),
			CocMode::Penalty(count) => Self::candidates_line("Penalty", count, "highest", check),
		};

		let comparison = if u32::from(check.value) <= check.skill { "<=" } else { ">" };
		let tier = match check.tier {
			Tier::CriticalSuccess | Tier::Fumble => self.emphasize(&format!("{}!", check.tier)),
			Tier::Success | Tier::Failure => check.tier.to_string(),
		};

		format!(
			"{title}\n{digits}\nResult: {} {comparison} {} {tier}",
			check.value, check.skill
		)
	}

	/// Renders an outcome as a single line, for listing repeated rolls.
	///
	/// # Examples
	/// ```
	/// use keeper_dice::{dice::roller::Iter as IterRoller, format::Formatter, roll};
	///
	/// let outcome = roll("2d6kl + 1", &mut IterRoller::new([5, 2]))?;
	/// assert_eq!(Formatter::default().summary(&outcome), "2d6kl[5 (d), 2] + 1 = 3");
	///
	/// let outcome = roll("cc 50", &mut IterRoller::new([9, 7]))?;
	/// assert_eq!(Formatter::default().summary(&outcome), "97 Fumble!");
	/// # Ok::<(), keeper_dice::error::Error>(())
	/// ```
	#[must_use]
	pub fn summary(&self, outcome: &Outcome) -> String {
		match outcome {
			Outcome::Dice(result) => format!(
				"{} = {}",
				result
					.evaled()
					.describe_with(&|rolled| format!("{}[{}]", rolled.dice, self.roll_list(rolled))),
				self.emphasize(&result.total().to_string())
			),
			Outcome::Coc(check) => match check.tier {
				Tier::CriticalSuccess | Tier::Fumble => {
					format!("{} {}", check.value, self.emphasize(&format!("{}!", check.tier)))
				}
				Tier::Success | Tier::Failure => format!("{} {}", check.value, check.tier),
			},
		}
	}

	/// Builds the line listing every tens candidate for bonus/penalty dice.
	fn candidates_line(kind: &str, count: u8, pick: &str, check: &CocRoll) -> String {
		let candidates = check
			.tens_candidates()
			.map(|tens| tens.to_string())
			.collect::<Vec<_>>()
			.join(", ");
		format!(
			"{kind} {count}: tens [{candidates}] -> {pick} {} | units {}",
			check.tens, check.units
		)
	}

	/// Lists the rolls of a dice term in the formatter's style.
	fn roll_list(&self, rolled: &Rolled) -> String {
		describe_list(&rolled.rolls, self.list_limit, |roll| self.roll(roll))
	}

	/// Renders a single die roll in the formatter's style.
	fn roll(&self, roll: &DieRoll) -> String {
		match (self.style, roll.is_dropped()) {
			(Style::Markdown, true) => format!("~~{}~~", roll.val),
			(Style::Plain, _) | (Style::Markdown, false) => roll.to_string(),
		}
	}

	/// Emphasizes text in the formatter's style.
	fn emphasize(&self, text: &str) -> String {
		match self.style {
			Style::Plain => text.to_owned(),
			Style::Markdown => format!("**{text}**"),
		}
	}
}

/// Renders an outcome with the default [`Formatter`].
///
/// # Examples
/// ```
/// use keeper_dice::{dice::roller::Max as MaxRoller, format, roll};
///
/// let outcome = roll("(2+3)*4", &mut MaxRoller)?;
/// assert_eq!(format(&outcome), "Roll: (2+3)*4\nResult: (2 + 3) * 4 = 20");
/// # Ok::<(), keeper_dice::error::Error>(())
/// ```
#[must_use]
pub fn format(outcome: &Outcome) -> String {
	Formatter::default().format(outcome)
}
