//! Call of Cthulhu percentile skill checks with bonus and penalty dice.
//!
//! A check rolls a tens digit and a units digit (both 0 to 9) and combines them into a value from 1 to 100, with `00`
//! and `0` reading as 100. Bonus dice roll extra tens digits and keep the lowest; penalty dice keep the highest.
//! The combined value is then compared against the skill value to pick a [`Tier`].

use std::{fmt, iter};

use crate::{
	config::Config,
	dice::roller::Roller,
	error::{DiceKind, ValidationError},
};

/// Maximum number of bonus or penalty dice for a single check
pub const MAX_EXTRA_DICE: u8 = 3;

/// Whether a check is rolled normally or with bonus/penalty dice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[expect(clippy::exhaustive_enums, reason = "The rules only define these three ways of rolling")]
pub enum CocMode {
	/// Single tens digit
	#[default]
	Normal,

	/// Extra tens digits, keeping the lowest (`cc1` to `cc3`)
	Bonus(u8),

	/// Extra tens digits, keeping the highest (`ccn1` to `ccn3`)
	Penalty(u8),
}

impl CocMode {
	/// Creates a mode with the given number of bonus dice. Zero bonus dice is a normal roll.
	///
	/// # Errors
	/// If `count` is greater than 3, a validation error is returned.
	///
	/// # Examples
	/// ```
	/// use keeper_dice::coc::CocMode;
	///
	/// assert_eq!(CocMode::bonus(2), Ok(CocMode::Bonus(2)));
	/// assert_eq!(CocMode::bonus(0), Ok(CocMode::Normal));
	/// assert!(CocMode::bonus(4).is_err());
	/// ```
	pub fn bonus(count: u32) -> Result<Self, ValidationError> {
		Self::with_dice(DiceKind::Bonus, count)
	}

	/// Creates a mode with the given number of penalty dice. Zero penalty dice is a normal roll.
	///
	/// # Errors
	/// If `count` is greater than 3, a validation error is returned.
	pub fn penalty(count: u32) -> Result<Self, ValidationError> {
		Self::with_dice(DiceKind::Penalty, count)
	}

	/// Creates a mode with the given kind and number of extra dice.
	fn with_dice(kind: DiceKind, count: u32) -> Result<Self, ValidationError> {
		let extra = u8::try_from(count)
			.ok()
			.filter(|count| *count <= MAX_EXTRA_DICE)
			.ok_or(ValidationError::BonusDice { kind, count })?;

		Ok(match (kind, extra) {
			(_, 0) => Self::Normal,
			(DiceKind::Bonus, extra) => Self::Bonus(extra),
			(DiceKind::Penalty, extra) => Self::Penalty(extra),
		})
	}

	/// Number of extra tens dice rolled in this mode.
	#[must_use]
	pub const fn extra_dice(&self) -> u8 {
		match self {
			Self::Normal => 0,
			Self::Bonus(count) | Self::Penalty(count) => *count,
		}
	}

	/// Checks that the number of extra dice is within bounds, since the variants can be constructed directly.
	fn validate(self) -> Result<u8, ValidationError> {
		let extra = self.extra_dice();
		match self {
			Self::Bonus(count) if count > MAX_EXTRA_DICE => Err(ValidationError::BonusDice {
				kind: DiceKind::Bonus,
				count: count.into(),
			}),
			Self::Penalty(count) if count > MAX_EXTRA_DICE => Err(ValidationError::BonusDice {
				kind: DiceKind::Penalty,
				count: count.into(),
			}),
			_ => Ok(extra),
		}
	}
}

impl fmt::Display for CocMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Normal => f.write_str("cc"),
			Self::Bonus(count) => write!(f, "cc{count}"),
			Self::Penalty(count) => write!(f, "ccn{count}"),
		}
	}
}

/// Success tier of a check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[expect(clippy::exhaustive_enums, reason = "The rules only define these four tiers")]
pub enum Tier {
	/// Rolled exactly 1
	CriticalSuccess,

	/// Rolled at or under the skill value
	Success,

	/// Rolled over the skill value
	Failure,

	/// Rolled 96 or higher
	Fumble,
}

impl Tier {
	/// Lowest value that's always a fumble
	pub const FUMBLE_MIN: u8 = 96;

	/// Determines the tier of a rolled value against a skill value.
	///
	/// Critical success is checked first, then fumble, then the plain comparison, so a 1 is always critical and a 96+
	/// is always a fumble no matter how high the skill is.
	///
	/// # Examples
	/// ```
	/// use keeper_dice::coc::Tier;
	///
	/// assert_eq!(Tier::resolve(1, 65), Tier::CriticalSuccess);
	/// assert_eq!(Tier::resolve(1, 100), Tier::CriticalSuccess);
	/// assert_eq!(Tier::resolve(96, 5), Tier::Fumble);
	/// assert_eq!(Tier::resolve(98, 100), Tier::Fumble);
	/// assert_eq!(Tier::resolve(50, 90), Tier::Success);
	/// assert_eq!(Tier::resolve(50, 10), Tier::Failure);
	/// ```
	#[must_use]
	pub fn resolve(value: u8, skill: u32) -> Self {
		if value == 1 {
			Self::CriticalSuccess
		} else if value >= Self::FUMBLE_MIN {
			Self::Fumble
		} else if u32::from(value) <= skill {
			Self::Success
		} else {
			Self::Failure
		}
	}

	/// Whether the tier counts as passing the check.
	#[must_use]
	pub const fn is_success(&self) -> bool {
		matches!(self, Self::CriticalSuccess | Self::Success)
	}

	/// Human-readable label for the tier.
	#[must_use]
	pub const fn label(&self) -> &'static str {
		match self {
			Self::CriticalSuccess => "Critical Success",
			Self::Success => "Success",
			Self::Failure => "Failure",
			Self::Fumble => "Fumble",
		}
	}
}

impl fmt::Display for Tier {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.label())
	}
}

/// Result of a Call of Cthulhu check
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[non_exhaustive]
pub struct CocRoll {
	/// Skill value the check was made against
	pub skill: u32,

	/// Mode the check was rolled in
	pub mode: CocMode,

	/// Tens digit rolled first
	pub primary_tens: u8,

	/// Extra tens digits rolled for bonus/penalty dice, in roll order
	pub extra_tens: Vec<u8>,

	/// Tens digit that was used after bonus/penalty selection
	pub tens: u8,

	/// Units digit
	pub units: u8,

	/// Final value, from 1 to 100
	pub value: u8,

	/// Success tier of the value against the skill
	pub tier: Tier,

	/// Free text the check was labelled with, if any
	pub label: Option<String>,
}

impl CocRoll {
	/// Every tens digit candidate, starting with the primary one.
	pub fn tens_candidates(&self) -> impl Iterator<Item = u8> + '_ {
		iter::once(self.primary_tens).chain(self.extra_tens.iter().copied())
	}

	/// Value that the primary tens digit and the units digit alone would have produced.
	#[must_use]
	pub fn raw(&self) -> u8 {
		combine(self.primary_tens, self.units)
	}
}

/// A parsed Call of Cthulhu command, ready to be rolled
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct CocCheck {
	/// Skill value to check against
	pub skill: u32,

	/// Mode to roll in
	pub mode: CocMode,

	/// Free text following the skill value, if any
	pub label: Option<String>,
}

impl CocCheck {
	/// Creates a new unlabelled check.
	#[must_use]
	pub const fn new(skill: u32, mode: CocMode) -> Self {
		Self {
			skill,
			mode,
			label: None,
		}
	}

	/// Rolls the check.
	///
	/// # Errors
	/// See [`roll_coc_with()`].
	pub fn roll(&self, roller: &mut impl Roller, config: &Config) -> Result<CocRoll, ValidationError> {
		let mut rolled = roll_coc_with(self.skill, self.mode, roller, config)?;
		rolled.label.clone_from(&self.label);
		Ok(rolled)
	}
}

/// Rolls a check with the default [`Config`].
///
/// # Errors
/// See [`roll_coc_with()`].
///
/// # Examples
/// ```
/// use keeper_dice::{coc::{roll_coc, CocMode, Tier}, dice::roller::Iter as IterRoller};
///
/// // Tens digit 4, units digit 3, bonus tens digits 7 and 1
/// let mut roller = IterRoller::new([4, 3, 7, 1]);
/// let rolled = roll_coc(65, CocMode::Bonus(2), &mut roller)?;
/// assert_eq!(rolled.tens, 1);
/// assert_eq!(rolled.value, 13);
/// assert_eq!(rolled.tier, Tier::Success);
/// # Ok::<(), keeper_dice::error::ValidationError>(())
/// ```
pub fn roll_coc(skill: u32, mode: CocMode, roller: &mut impl Roller) -> Result<CocRoll, ValidationError> {
	roll_coc_with(skill, mode, roller, &Config::default())
}

/// Rolls a check.
///
/// Digits are rolled in a fixed order: the primary tens digit, the units digit, then any extra tens digits.
///
/// # Errors
/// If the skill value is outside of the configured range or the mode has more than 3 extra dice, a validation error
/// is returned before anything is rolled.
pub fn roll_coc_with(
	skill: u32,
	mode: CocMode,
	roller: &mut impl Roller,
	config: &Config,
) -> Result<CocRoll, ValidationError> {
	if !(config.min_skill..=config.max_skill).contains(&skill) {
		return Err(ValidationError::SkillValue {
			value: skill,
			min: config.min_skill,
			max: config.max_skill,
		});
	}
	let extra = mode.validate()?;

	let primary_tens = roller.roll_digit() % 10;
	let units = roller.roll_digit() % 10;
	let extra_tens = (0..extra).map(|_| roller.roll_digit() % 10).collect::<Vec<_>>();

	let candidates = iter::once(primary_tens).chain(extra_tens.iter().copied());
	let tens = match mode {
		CocMode::Normal => Some(primary_tens),
		CocMode::Bonus(..) => candidates.min(),
		CocMode::Penalty(..) => candidates.max(),
	}
	.unwrap_or(primary_tens);

	let value = combine(tens, units);
	let tier = Tier::resolve(value, skill);
	log::debug!("{mode} {skill}: tens {primary_tens} {extra_tens:?} -> {tens}, units {units} = {value} ({tier})");

	Ok(CocRoll {
		skill,
		mode,
		primary_tens,
		extra_tens,
		tens,
		units,
		value,
		tier,
		label: None,
	})
}

/// Combines a tens digit and a units digit into a value from 1 to 100.
const fn combine(tens: u8, units: u8) -> u8 {
	match tens.saturating_mul(10).saturating_add(units) {
		0 => 100,
		value => value,
	}
}
