//! Abstractions for rolling [`DieRoll`]s using various means.
//!
//! Randomness is always injected: nothing in the engine reaches for a global generator, so tests can substitute one of
//! the deterministic rollers here.

use std::iter::Peekable;

#[cfg(feature = "fastrand")]
use fastrand::Rng;

use super::{DiceTerm, DieRoll, Rolled};

/// Rolls dice - what else is there to say?
pub trait Roller {
	/// Rolls a single die with the given number of faces, producing a value in `1..=faces`.
	#[must_use]
	fn roll_die(&mut self, faces: u16) -> u16;

	/// Rolls a single ten-sided digit die, producing a value in `0..=9`.
	///
	/// The default implementation maps a d10 onto digits, with a roll of 10 reading as 0.
	#[must_use]
	fn roll_digit(&mut self) -> u8 {
		u8::try_from(self.roll_die(10) % 10).unwrap_or_default()
	}

	/// Rolls a dice term and applies its keep modifier to the rolls.
	fn roll(&mut self, dice: &DiceTerm) -> Rolled
	where
		Self: Sized,
	{
		// Roll the dice!
		let mut rolls = Vec::with_capacity(dice.count().into());
		for _ in 0..dice.count() {
			rolls.push(DieRoll::new(self.roll_die(dice.faces()), dice.faces()));
		}

		let mut rolled = Rolled { rolls, dice: *dice };
		if let Some(keep) = dice.keep() {
			keep.apply(&mut rolled);
		}

		rolled
	}
}

impl<R: Roller + ?Sized> Roller for &mut R {
	#[inline]
	fn roll_die(&mut self, faces: u16) -> u16 {
		(**self).roll_die(faces)
	}

	#[inline]
	fn roll_digit(&mut self) -> u8 {
		(**self).roll_digit()
	}
}

/// Generates rolls with random values using [fastrand]. Requires the `fastrand` feature (enabled by default).
///
/// Each roller owns its own generator, so concurrent rolls should each use their own roller.
///
/// # Examples
///
/// ## Default fastrand roller
/// ```
/// use keeper_dice::dice::{roller::{FastRand as FastRandRoller, Roller}, DiceTerm};
///
/// let mut roller = FastRandRoller::default();
///
/// let dice = DiceTerm::new(4, 6)?;
/// let _ = roller.roll(&dice);
/// let _ = roller.roll(&dice);
/// # Ok::<(), keeper_dice::error::RangeError>(())
/// ```
///
/// ## Manually seeded fastrand roller
/// ```
/// use keeper_dice::dice::{roller::{FastRand as FastRandRoller, Roller}, DiceTerm};
///
/// let dice = DiceTerm::new(4, 6)?;
/// let a = FastRandRoller::with_seed(0x750c38d574400).roll(&dice);
/// let b = FastRandRoller::with_seed(0x750c38d574400).roll(&dice);
/// assert_eq!(a, b);
/// # Ok::<(), keeper_dice::error::RangeError>(())
/// ```
#[cfg(feature = "fastrand")]
#[derive(Debug, Clone, Default)]
pub struct FastRand(Rng);

#[cfg(feature = "fastrand")]
impl FastRand {
	/// Creates a new fastrand roller that uses the given RNG instance to generate rolls.
	#[must_use]
	#[inline]
	pub const fn new(rng: Rng) -> Self {
		Self(rng)
	}

	/// Creates a new fastrand roller that uses a pre-seeded RNG instance to generate rolls.
	#[must_use]
	#[inline]
	pub fn with_seed(seed: u64) -> Self {
		Self::new(Rng::with_seed(seed))
	}
}

#[cfg(feature = "fastrand")]
impl Roller for FastRand {
	/// Rolls a single die using the [`fastrand::Rng`] the roller was created with.
	#[inline]
	fn roll_die(&mut self, faces: u16) -> u16 {
		if faces > 0 {
			self.0.u16(1..=faces)
		} else {
			0
		}
	}

	#[inline]
	fn roll_digit(&mut self) -> u8 {
		self.0.u8(0..=9)
	}
}

/// Generates rolls that always have a specific value. Digits are the value's last decimal digit.
///
/// # Examples
/// ```
/// use keeper_dice::dice::{roller::{Roller, Val as ValRoller}, DiceTerm};
///
/// let mut roller = ValRoller(42);
///
/// let dice = DiceTerm::new(4, 6)?;
/// let rolled = roller.roll(&dice);
/// assert!(rolled.rolls.iter().all(|roll| roll.val == 42));
/// assert_eq!(roller.roll_digit(), 2);
/// # Ok::<(), keeper_dice::error::RangeError>(())
/// ```
#[derive(Debug, Default, Clone)]
#[expect(clippy::exhaustive_structs, reason = "Highly unlikely to change")]
pub struct Val(pub u16);

impl Roller for Val {
	/// Rolls a single die, always with one specific value.
	#[inline]
	fn roll_die(&mut self, _faces: u16) -> u16 {
		self.0
	}
}

/// Generates rolls that always have their max value. Digits are always 9.
///
/// # Examples
/// ```
/// use keeper_dice::dice::{roller::{Max as MaxRoller, Roller}, DiceTerm};
///
/// let mut roller = MaxRoller;
///
/// let dice = DiceTerm::new(2, 20)?;
/// let rolled = roller.roll(&dice);
/// assert!(rolled.rolls.iter().all(|roll| roll.val == 20));
/// assert_eq!(roller.roll_digit(), 9);
/// # Ok::<(), keeper_dice::error::RangeError>(())
/// ```
#[derive(Debug, Default, Clone)]
#[expect(clippy::exhaustive_structs, reason = "Highly unlikely to change")]
pub struct Max;

impl Roller for Max {
	/// Rolls a single die, always with the max value (same as the number of faces).
	#[inline]
	fn roll_die(&mut self, faces: u16) -> u16 {
		faces
	}

	#[inline]
	fn roll_digit(&mut self) -> u8 {
		9
	}
}

/// Generates rolls from an iterator of values. Mainly useful for testing purposes.
///
/// Values are used verbatim for both dice and digits, in the order they are requested.
///
/// # Examples
/// ```
/// use keeper_dice::dice::{roller::{Iter as IterRoller, Roller}, DiceTerm};
///
/// let mut roller = IterRoller::new([1, 2, 3, 4, 10]);
/// let dice = DiceTerm::new(5, 6)?;
/// let vals = roller.roll(&dice).rolls.iter().map(|roll| roll.val).collect::<Vec<_>>();
/// assert_eq!(vals, [1, 2, 3, 4, 10]);
/// assert!(!roller.can_roll());
/// # Ok::<(), keeper_dice::error::RangeError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Iter<I: Iterator<Item = u16>>(Peekable<I>);

impl<I: Iterator<Item = u16>> Iter<I> {
	/// Checks whether the iterator still has values available.
	#[inline]
	pub fn can_roll(&mut self) -> bool {
		self.0.peek().is_some()
	}

	/// Creates a new roller that uses the given iterator to provide roll values.
	#[must_use]
	#[inline]
	pub fn new(iter: impl IntoIterator<IntoIter = I>) -> Self {
		Self(iter.into_iter().peekable())
	}
}

impl<I: Iterator<Item = u16>> Roller for Iter<I> {
	/// Rolls a die with the value from the next iteration.
	///
	/// # Panics
	/// If the iterator has finished, this will panic.
	#[inline]
	#[expect(
		clippy::expect_used,
		reason = "Mostly for testing, otherwise manual checking of can_roll() is expected"
	)]
	fn roll_die(&mut self, _faces: u16) -> u16 {
		self.0.next().expect("iterator is finished")
	}

	/// Rolls a digit with the value from the next iteration.
	///
	/// # Panics
	/// If the iterator has finished or the value isn't a single digit, this will panic.
	#[inline]
	#[expect(
		clippy::expect_used,
		reason = "Mostly for testing, otherwise manual checking of can_roll() is expected"
	)]
	fn roll_digit(&mut self) -> u8 {
		let val = self.0.next().expect("iterator is finished");
		u8::try_from(val).ok().filter(|digit| *digit <= 9).expect("digit rolls must be 0-9")
	}
}
