use crate::{
	dice::{
		roller::{FastRand as FastRandRoller, Iter as IterRoller, Max as MaxRoller, Roller, Val as ValRoller},
		DiceTerm, DieRoll, Keep, KeepKind, Rolled,
	},
	error::RangeError,
};

#[test]
fn single_d20() {
	let dice = construct_plain(1, 20);
	let rolled = rolls_in_range(&dice, &mut FastRandRoller::default());
	assert_eq!(rolled.rolls.len(), 1);
	assert_eq!(rolled.dice, dice);
}

#[test]
fn double_d8() {
	let dice = construct_plain(2, 8);
	let rolled = rolls_in_range(&dice, &mut FastRandRoller::default());
	assert_eq!(rolled.rolls.len(), 2);
}

#[test]
fn hundred_d1000s() {
	let dice = construct_plain(100, 1000);
	let rolled = rolls_in_range(&dice, &mut FastRandRoller::default());
	assert_eq!(rolled.rolls.len(), 100);
}

#[test]
fn every_count_and_faces_yields_exactly_count_rolls_in_range() {
	let mut roller = FastRandRoller::with_seed(0x5eed);
	for count in 1..=100 {
		for faces in [2, 3, 4, 6, 8, 10, 12, 20, 100, 999, 1000] {
			let dice = construct_plain(count, faces);
			let rolled = rolls_in_range(&dice, &mut roller);
			assert_eq!(rolled.rolls.len(), count as usize);
			assert!(rolled.rolls.iter().all(|roll| roll.faces == faces));
		}
	}
}

#[test]
fn all_dice_faces_occur() {
	let dice = construct_plain(100, 20);
	let mut roller = FastRandRoller::with_seed(42);
	let mut rolls = Vec::new();

	for _ in 1..=100 {
		rolls.append(&mut roller.roll(&dice).rolls);
	}

	for face in 1..=20 {
		assert!(rolls.iter().any(|roll| roll.val == face));
	}
}

#[test]
fn count_out_of_range() {
	assert!(matches!(DiceTerm::new(0, 6), Err(RangeError::DiceCount { count: 0, .. })));
	assert!(matches!(DiceTerm::new(101, 6), Err(RangeError::DiceCount { count: 101, .. })));
	assert!(matches!(DiceTerm::new(300, 6), Err(RangeError::DiceCount { count: 300, .. })));
}

#[test]
fn faces_out_of_range() {
	assert!(matches!(DiceTerm::new(1, 0), Err(RangeError::Faces { faces: 0, .. })));
	assert!(matches!(DiceTerm::new(1, 1), Err(RangeError::Faces { faces: 1, .. })));
	assert!(matches!(DiceTerm::new(1, 1001), Err(RangeError::Faces { faces: 1001, .. })));
	assert!(matches!(DiceTerm::new(1, 70000), Err(RangeError::Faces { faces: 70000, .. })));
}

#[test]
fn keep_zero_is_rejected_for_every_count() {
	for count in 1..=100 {
		let dice = construct_plain(count, 6);
		assert!(matches!(
			dice.with_keep(KeepKind::Highest, 0),
			Err(RangeError::KeepCount { keep: 0, .. })
		));
		assert!(matches!(
			dice.with_keep(KeepKind::Lowest, 0),
			Err(RangeError::KeepCount { keep: 0, .. })
		));
	}
}

#[test]
fn keep_more_than_count_is_rejected() {
	let dice = construct_plain(3, 6);
	assert!(matches!(
		dice.with_keep(KeepKind::Highest, 4),
		Err(RangeError::KeepCount { keep: 4, count: 3, .. })
	));
}

#[test]
fn keep_high_sums_the_highest_rolls() {
	let dice = construct_plain(4, 6).with_keep(KeepKind::Highest, 2).unwrap();
	let rolled = IterRoller::new([3, 6, 1, 5]).roll(&dice);

	assert_eq!(rolled.total(), 11);
	assert_eq!(rolled.rolls.len(), 4);
	assert_eq!(
		rolled.rolls.iter().map(|roll| roll.val).collect::<Vec<_>>(),
		[3, 6, 1, 5],
		"rolls must stay in roll order"
	);
	assert_eq!(rolled.dropped().map(|roll| roll.val).collect::<Vec<_>>(), [3, 1]);
}

#[test]
fn keep_low_sums_the_lowest_rolls() {
	let dice = construct_plain(4, 6).with_keep(KeepKind::Lowest, 3).unwrap();
	let rolled = IterRoller::new([3, 6, 1, 5]).roll(&dice);

	assert_eq!(rolled.total(), 9);
	assert_eq!(rolled.dropped().map(|roll| roll.val).collect::<Vec<_>>(), [6]);
}

#[test]
fn keep_high_property_holds_for_random_rolls() {
	let mut roller = FastRandRoller::with_seed(0xd1ce);
	for count in 1..=20_u32 {
		for keep in 1..=count {
			let dice = DiceTerm::new(count, 20)
				.and_then(|dice| dice.with_keep(KeepKind::Highest, keep))
				.unwrap();
			let rolled = roller.roll(&dice);

			let mut vals = rolled.rolls.iter().map(|roll| u32::from(roll.val)).collect::<Vec<_>>();
			vals.sort_unstable_by(|a, b| b.cmp(a));
			let expected = vals.iter().take(keep as usize).sum::<u32>();

			assert_eq!(rolled.total(), expected);
			assert_eq!(rolled.rolls.len(), count as usize);
			assert_eq!(rolled.dropped().count(), (count - keep) as usize);
		}
	}
}

#[test]
fn kept_rolls_exclude_dropped_ones() {
	let dice = construct_plain(5, 10).with_keep(KeepKind::Lowest, 2).unwrap();
	let rolled = IterRoller::new([7, 2, 9, 4, 2]).roll(&dice);
	assert_eq!(rolled.kept().map(|roll| roll.val).collect::<Vec<_>>(), [2, 2]);
	assert_eq!(rolled.kept().count() + rolled.dropped().count(), 5);
}

#[test]
fn roller_from_existing_rng() {
	let dice = construct_plain(10, 20);
	let a = FastRandRoller::new(fastrand::Rng::with_seed(5)).roll(&dice);
	let b = FastRandRoller::with_seed(5).roll(&dice);
	assert_eq!(a, b);
}

#[test]
fn keep_ties_keep_the_earlier_roll() {
	let dice = construct_plain(3, 6).with_keep(KeepKind::Highest, 1).unwrap();
	let rolled = IterRoller::new([4, 4, 2]).roll(&dice);
	assert!(rolled.rolls[0].is_kept());
	assert!(rolled.rolls[1].is_dropped());
	assert!(rolled.rolls[2].is_dropped());
}

#[test]
fn keep_all_is_a_no_op() {
	let dice = construct_plain(3, 6).with_keep(KeepKind::Lowest, 3).unwrap();
	let rolled = IterRoller::new([4, 1, 6]).roll(&dice);
	assert_eq!(rolled.dropped().count(), 0);
	assert_eq!(rolled.total(), 11);
}

#[test]
fn dropped_rolls_record_their_modifier() {
	let dice = construct_plain(2, 20).with_keep(KeepKind::Highest, 1).unwrap();
	let rolled = ValRoller(7).roll(&dice);
	let keep = Keep::new(KeepKind::Highest, 1).unwrap();
	assert_eq!(rolled.rolls[1].dropped_by, Some(keep));
	assert_eq!(rolled.rolls[1].to_string(), "7 (d)");
}

#[test]
fn max_roller_rolls_max() {
	let dice = construct_plain(5, 12);
	let rolled = MaxRoller.roll(&dice);
	assert!(rolled.rolls.iter().all(|roll| roll.val == 12));
	assert_eq!(rolled.total(), 60);
}

#[test]
fn rolled_equality() {
	let dice = construct_plain(2, 6);
	let ra = Rolled::from_dice_and_rolls(dice, [3, 4]);
	let rb = Rolled {
		rolls: vec![DieRoll::new(3, 6), DieRoll::new(4, 6)],
		dice,
	};
	assert_eq!(ra, rb);

	let rc = Rolled::from_dice_and_rolls(dice.with_keep(KeepKind::Highest, 1).unwrap(), [3, 4]);
	assert_ne!(ra, rc);
}

#[test]
fn term_display() {
	assert_eq!(DiceTerm::default().to_string(), "1d20");
	assert_eq!(
		construct_plain(8, 10)
			.with_keep(KeepKind::Lowest, 5)
			.unwrap()
			.to_string(),
		"8d10kl5"
	);
	assert_eq!(
		construct_plain(8, 10)
			.with_keep(KeepKind::Lowest, 5)
			.unwrap()
			.plain()
			.to_string(),
		"8d10"
	);
}

fn construct_plain(count: u32, faces: u16) -> DiceTerm {
	let dice = DiceTerm::new(count, faces.into()).unwrap();
	assert_eq!(u32::from(dice.count()), count);
	assert_eq!(dice.faces(), faces);
	assert!(dice.keep().is_none());
	dice
}

fn rolls_in_range(dice: &DiceTerm, roller: &mut impl Roller) -> Rolled {
	let rolled = roller.roll(dice);
	assert!(rolled
		.rolls
		.iter()
		.all(|roll| (1..=dice.faces()).contains(&roll.val)));
	rolled
}
