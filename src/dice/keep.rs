//! Keep-highest and keep-lowest modifiers for dice terms.

use std::{cmp::Reverse, fmt, num::NonZeroU8};

use super::Rolled;

/// Which end of the sorted rolls a [`Keep`] modifier keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[expect(clippy::exhaustive_enums, reason = "Keeping can only go one of two ways")]
pub enum KeepKind {
	/// Keeps the highest rolls (`kh`)
	Highest,

	/// Keeps the lowest rolls (`kl`)
	Lowest,
}

impl KeepKind {
	/// Gets the notation suffix for this kind of keep modifier.
	#[must_use]
	pub const fn symbol(&self) -> &'static str {
		match self {
			Self::Highest => "kh",
			Self::Lowest => "kl",
		}
	}
}

/// Modifier that keeps only the highest or lowest `count` rolls of a dice term, dropping the rest.
///
/// # Examples
///
/// ## Keep highest 2 dice (`kh2`)
/// ```
/// use keeper_dice::dice::{roller::{Iter as IterRoller, Roller}, DiceTerm, Keep, KeepKind};
///
/// // Build the 4d6kh2 dice term and create a roller that has predetermined values for the dice rolls
/// let dice = DiceTerm::new(4, 6)?.with_keep(KeepKind::Highest, 2)?;
/// let mut rng = IterRoller::new([3, 6, 1, 5]);
///
/// // The keep modifier is applied as part of rolling, dropping everything but the two highest rolls.
/// // Rolls stay in the order they were rolled in: 4d6kh2[3 (d), 6, 1 (d), 5]
/// let rolled = rng.roll(&dice);
/// let kept = rolled.rolls.iter().map(|roll| roll.is_kept()).collect::<Vec<_>>();
/// assert_eq!(kept, [false, true, false, true]);
/// assert_eq!(rolled.total(), 11);
/// # Ok::<(), keeper_dice::error::RangeError>(())
/// ```
///
/// ## Keep lowest die (`kl`)
/// ```
/// use keeper_dice::dice::{roller::{Iter as IterRoller, Roller}, DiceTerm, KeepKind};
///
/// let dice = DiceTerm::new(2, 20)?.with_keep(KeepKind::Lowest, 1)?;
/// let rolled = IterRoller::new([17, 4]).roll(&dice);
/// assert_eq!(rolled.to_string(), "2d20kl[17 (d), 4]");
/// assert_eq!(rolled.total(), 4);
/// # Ok::<(), keeper_dice::error::RangeError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[non_exhaustive]
pub struct Keep {
	/// Whether the highest or lowest rolls are kept
	pub kind: KeepKind,

	/// Number of rolls to keep
	pub count: NonZeroU8,
}

impl Keep {
	/// Creates a new keep modifier. Returns [`None`] if `count` is zero, since keeping nothing isn't a valid modifier.
	#[must_use]
	pub const fn new(kind: KeepKind, count: u8) -> Option<Self> {
		match NonZeroU8::new(count) {
			Some(count) => Some(Self { kind, count }),
			None => None,
		}
	}

	/// Applies the modifier to a set of rolled dice, marking every roll beyond the kept ones as dropped.
	///
	/// Rolls are ranked with a stable sort, so of two equal values the earlier roll is kept first. A count equal to
	/// (or larger than) the number of rolls keeps everything.
	pub fn apply(self, rolled: &mut Rolled) {
		let mut refs = rolled
			.rolls
			.iter_mut()
			.filter(|roll| roll.is_kept())
			.collect::<Vec<_>>();

		match self.kind {
			KeepKind::Highest => refs.sort_by_key(|roll| Reverse(roll.val)),
			KeepKind::Lowest => refs.sort_by_key(|roll| roll.val),
		}

		refs.into_iter()
			.skip(self.count.get().into())
			.for_each(|roll| roll.drop(self));
	}
}

impl fmt::Display for Keep {
	/// Formats the modifier as its notation suffix. A count of one is left implicit (`kh`, not `kh1`).
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.kind.symbol())?;
		if self.count.get() > 1 {
			write!(f, "{}", self.count)?;
		}
		Ok(())
	}
}
