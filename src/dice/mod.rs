//! All functionality for directly creating dice terms, rolling them, and working with their resulting rolls.
//!
//! This is the home of the dice "primitives". For using dice as part of a larger formula, see [`Expr::Dice`].
//!
//! [`Expr::Dice`]: crate::expr::Expr::Dice

pub mod keep;
pub mod roller;

use std::{fmt, num::NonZeroU8};

pub use self::{
	keep::{Keep, KeepKind},
	roller::Roller,
};
use crate::{error::RangeError, expr::Describe};

/// A dice term: a number of rollable dice with a specific number of faces, optionally filtered by a keep modifier.
///
/// Dice terms are always valid once constructed. Use [`DiceTerm::new()`] (or the parser) to create them so the bounds
/// on dice count, face count, and keep count are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DiceTerm {
	/// Number of dice to roll
	count: u8,

	/// Number of faces for each die
	faces: u16,

	/// Keep modifier to apply to the rolls
	keep: Option<Keep>,
}

impl DiceTerm {
	/// Maximum number of dice a single term may roll
	pub const MAX_COUNT: u8 = 100;

	/// Maximum number of faces each die may have
	pub const MAX_FACES: u16 = 1000;

	/// Creates a new dice term with a given count and number of faces and no keep modifier.
	///
	/// # Errors
	/// If the count isn't in `1..=100` or the faces aren't in `2..=1000`, a range error is returned. Values are never
	/// clamped.
	///
	/// # Examples
	/// ```
	/// use keeper_dice::{dice::DiceTerm, error::RangeError};
	///
	/// let dice = DiceTerm::new(4, 6)?;
	/// assert_eq!(dice.to_string(), "4d6");
	///
	/// assert!(matches!(DiceTerm::new(101, 6), Err(RangeError::DiceCount { count: 101, .. })));
	/// assert!(matches!(DiceTerm::new(1, 1), Err(RangeError::Faces { faces: 1, .. })));
	/// # Ok::<(), RangeError>(())
	/// ```
	pub fn new(count: u32, faces: u32) -> Result<Self, RangeError> {
		Self::new_at(count, faces, 0)
	}

	/// Creates a new dice term, reporting any range errors at the given character offset.
	pub(crate) fn new_at(count: u32, faces: u32, offset: usize) -> Result<Self, RangeError> {
		let count = u8::try_from(count)
			.ok()
			.filter(|count| (1..=Self::MAX_COUNT).contains(count))
			.ok_or(RangeError::DiceCount { count, offset })?;
		let faces = u16::try_from(faces)
			.ok()
			.filter(|faces| (2..=Self::MAX_FACES).contains(faces))
			.ok_or(RangeError::Faces { faces, offset })?;

		Ok(Self {
			count,
			faces,
			keep: None,
		})
	}

	/// Attaches a keep modifier to the dice term.
	///
	/// # Errors
	/// If the keep count is zero or greater than the number of dice, a range error is returned.
	///
	/// # Examples
	/// ```
	/// use keeper_dice::{dice::{DiceTerm, KeepKind}, error::RangeError};
	///
	/// let dice = DiceTerm::new(4, 6)?.with_keep(KeepKind::Highest, 3)?;
	/// assert_eq!(dice.to_string(), "4d6kh3");
	///
	/// assert!(DiceTerm::new(4, 6)?.with_keep(KeepKind::Lowest, 0).is_err());
	/// assert!(DiceTerm::new(4, 6)?.with_keep(KeepKind::Lowest, 5).is_err());
	/// # Ok::<(), RangeError>(())
	/// ```
	pub fn with_keep(self, kind: KeepKind, count: u32) -> Result<Self, RangeError> {
		self.with_keep_at(kind, count, 0)
	}

	/// Attaches a keep modifier, reporting any range errors at the given character offset.
	pub(crate) fn with_keep_at(mut self, kind: KeepKind, keep: u32, offset: usize) -> Result<Self, RangeError> {
		let err = RangeError::KeepCount {
			keep,
			count: self.count.into(),
			offset,
		};
		let count = u8::try_from(keep)
			.ok()
			.filter(|keep| *keep <= self.count)
			.and_then(NonZeroU8::new)
			.ok_or(err)?;

		self.keep = Some(Keep { kind, count });
		Ok(self)
	}

	/// Number of dice to roll
	#[must_use]
	#[inline]
	pub const fn count(&self) -> u8 {
		self.count
	}

	/// Number of faces for each die
	#[must_use]
	#[inline]
	pub const fn faces(&self) -> u16 {
		self.faces
	}

	/// Keep modifier, if any
	#[must_use]
	#[inline]
	pub const fn keep(&self) -> Option<Keep> {
		self.keep
	}

	/// Creates a new dice term matching this one but without the keep modifier.
	#[must_use]
	#[inline]
	pub const fn plain(&self) -> Self {
		Self {
			count: self.count,
			faces: self.faces,
			keep: None,
		}
	}
}

impl Default for DiceTerm {
	/// Creates the default dice term (1d20).
	#[inline]
	fn default() -> Self {
		Self {
			count: 1,
			faces: 20,
			keep: None,
		}
	}
}

impl fmt::Display for DiceTerm {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}d{}", self.count, self.faces)?;
		if let Some(keep) = self.keep {
			write!(f, "{keep}")?;
		}
		Ok(())
	}
}

/// Single die produced from rolling a [`DiceTerm`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[non_exhaustive]
pub struct DieRoll {
	/// Value that was rolled
	pub val: u16,

	/// Number of faces on the die that was rolled
	pub faces: u16,

	/// Keep modifier that caused the drop of this die, if any
	pub dropped_by: Option<Keep>,
}

impl DieRoll {
	/// Creates a new kept die roll with the given value.
	#[must_use]
	pub const fn new(val: u16, faces: u16) -> Self {
		Self {
			val,
			faces,
			dropped_by: None,
		}
	}

	/// Marks this die roll as dropped by a given keep modifier, setting [`Self::dropped_by`].
	///
	/// # Panics
	/// Panics if `Self::dropped_by` is already [`Some`].
	pub fn drop(&mut self, from: Keep) {
		assert!(
			self.dropped_by.is_none(),
			"marking a die as dropped that has already been marked as dropped by another modifier"
		);
		self.dropped_by = Some(from);
	}

	/// Indicates whether this die roll has been dropped by a keep modifier.
	#[must_use]
	#[inline]
	pub const fn is_dropped(&self) -> bool {
		self.dropped_by.is_some()
	}

	/// Indicates whether this die roll is being kept (has *not* been dropped by a keep modifier).
	/// This is the direct inverse of [`DieRoll::is_dropped()`].
	#[must_use]
	#[inline]
	pub const fn is_kept(&self) -> bool {
		self.dropped_by.is_none()
	}
}

impl fmt::Display for DieRoll {
	/// Formats the value using the given formatter. [Read more][core::fmt::Debug::fmt()]
	///
	/// The format of a die roll is simply the plain numeric value of the roll.
	/// If the roll was dropped, it is appended with ` (d)`.
	///
	/// # Examples
	/// ```
	/// use keeper_dice::dice::{DieRoll, Keep, KeepKind};
	///
	/// let roll = DieRoll::new(4, 20);
	/// assert_eq!(roll.to_string(), "4");
	///
	/// let mut roll = DieRoll::new(16, 20);
	/// roll.drop(Keep::new(KeepKind::Lowest, 1).unwrap());
	/// assert_eq!(roll.to_string(), "16 (d)");
	/// ```
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}{}", self.val, if self.is_dropped() { " (d)" } else { "" })
	}
}

/// Representation of the result from rolling a [`DiceTerm`]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[expect(clippy::exhaustive_structs, reason = "A rolled term is only ever its dice and their rolls")]
pub struct Rolled {
	/// Each individual die roll that was made, in roll order
	pub rolls: Vec<DieRoll>,

	/// Dice term that was rolled to produce this
	pub dice: DiceTerm,
}

impl Rolled {
	/// Calculates the total of all kept roll values.
	///
	/// Totals can't overflow: even the largest term (100d1000) sums to far less than [`u32::MAX`].
	///
	/// # Examples
	/// ```
	/// use keeper_dice::dice::{roller::{Iter as IterRoller, Roller}, DiceTerm, KeepKind};
	///
	/// let dice = DiceTerm::new(4, 6)?.with_keep(KeepKind::Highest, 2)?;
	/// let rolled = IterRoller::new([6, 2, 5, 3]).roll(&dice);
	/// assert_eq!(rolled.total(), 11);
	/// # Ok::<(), keeper_dice::error::RangeError>(())
	/// ```
	#[must_use]
	pub fn total(&self) -> u32 {
		self.kept().map(|roll| u32::from(roll.val)).sum()
	}

	/// Iterates over the rolls that were kept.
	pub fn kept(&self) -> impl Iterator<Item = &DieRoll> {
		self.rolls.iter().filter(|roll| roll.is_kept())
	}

	/// Iterates over the rolls that were dropped by the keep modifier.
	pub fn dropped(&self) -> impl Iterator<Item = &DieRoll> {
		self.rolls.iter().filter(|roll| roll.is_dropped())
	}

	/// Creates a new rolled set of dice from a given dice term and an iterator of values, applying the term's keep
	/// modifier to them.
	#[must_use]
	pub fn from_dice_and_rolls(dice: DiceTerm, rolls: impl IntoIterator<Item = u16>) -> Self {
		let mut rolled = Self {
			rolls: rolls.into_iter().map(|val| DieRoll::new(val, dice.faces)).collect(),
			dice,
		};
		if let Some(keep) = dice.keep {
			keep.apply(&mut rolled);
		}
		rolled
	}
}

impl Describe for Rolled {
	/// Builds a string of the dice term the roll is from and a list of all of the individual rolled dice
	/// (see [`DieRoll::fmt()`]).
	///
	/// If `list_limit` is specified and there are more rolls than it, the list of rolled dice will be truncated and
	/// appended with "X more..." (where X is the remaining roll count past the max).
	///
	/// # Examples
	/// ```
	/// use keeper_dice::{dice::{DiceTerm, KeepKind, Rolled}, expr::Describe};
	///
	/// let dice = DiceTerm::new(4, 6)?.with_keep(KeepKind::Highest, 2)?;
	/// let rolled = Rolled::from_dice_and_rolls(dice, [6, 2, 5, 3]);
	///
	/// assert_eq!(rolled.describe(None), "4d6kh2[6, 2 (d), 5, 3 (d)]");
	/// assert_eq!(rolled.describe(Some(2)), "4d6kh2[6, 2 (d), 2 more...]");
	/// # Ok::<(), keeper_dice::error::RangeError>(())
	/// ```
	///
	/// [`DieRoll::fmt()`]: ./struct.DieRoll.html#method.fmt
	fn describe(&self, list_limit: Option<usize>) -> String {
		format!(
			"{}[{}]",
			self.dice,
			describe_list(&self.rolls, list_limit, ToString::to_string)
		)
	}
}

impl fmt::Display for Rolled {
	/// Formats the value using the given formatter. [Read more][core::fmt::Debug::fmt()]
	///
	/// The output is equivalent to calling [`Self::describe(None)`].
	///
	/// [`Self::describe(None)`]: Self::describe()
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.describe(None))
	}
}

/// Joins the rolls with commas, truncating the list after `list_limit` entries with "X more...".
pub(crate) fn describe_list(
	rolls: &[DieRoll],
	list_limit: Option<usize>,
	fmt_roll: impl Fn(&DieRoll) -> String,
) -> String {
	let list_limit = list_limit.unwrap_or(usize::MAX);
	let truncated_rolls = rolls.len().saturating_sub(list_limit);

	let mut list = rolls.iter().take(list_limit).map(fmt_roll).collect::<Vec<_>>();
	if truncated_rolls > 0 {
		list.push(format!("{truncated_rolls} more..."));
	}
	list.join(", ")
}
