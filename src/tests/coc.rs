use crate::{
	coc::{roll_coc, roll_coc_with, CocCheck, CocMode, Tier},
	config::Config,
	dice::roller::{FastRand as FastRandRoller, Iter as IterRoller, Max as MaxRoller, Val as ValRoller},
	error::{DiceKind, ValidationError},
};

#[test]
fn critical_success() {
	let rolled = roll_coc(65, CocMode::Normal, &mut IterRoller::new([0, 1])).unwrap();
	assert_eq!(rolled.value, 1);
	assert_eq!(rolled.tier, Tier::CriticalSuccess);
	assert!(rolled.tier.is_success());
}

#[test]
fn fumble_regardless_of_skill() {
	let rolled = roll_coc(5, CocMode::Normal, &mut IterRoller::new([9, 6])).unwrap();
	assert_eq!(rolled.value, 96);
	assert_eq!(rolled.tier, Tier::Fumble);

	let rolled = roll_coc(100, CocMode::Normal, &mut IterRoller::new([9, 9])).unwrap();
	assert_eq!(rolled.tier, Tier::Fumble);
}

#[test]
fn success_and_failure() {
	let rolled = roll_coc(90, CocMode::Normal, &mut IterRoller::new([5, 0])).unwrap();
	assert_eq!(rolled.value, 50);
	assert_eq!(rolled.tier, Tier::Success);

	let rolled = roll_coc(10, CocMode::Normal, &mut IterRoller::new([5, 0])).unwrap();
	assert_eq!(rolled.tier, Tier::Failure);
	assert!(!rolled.tier.is_success());

	let rolled = roll_coc(50, CocMode::Normal, &mut IterRoller::new([5, 0])).unwrap();
	assert_eq!(rolled.tier, Tier::Success, "rolling exactly the skill value succeeds");
}

#[test]
fn double_zero_reads_as_one_hundred() {
	let rolled = roll_coc(100, CocMode::Normal, &mut IterRoller::new([0, 0])).unwrap();
	assert_eq!(rolled.value, 100);
	assert_eq!(rolled.tier, Tier::Fumble);
}

#[test]
fn zero_tens_reads_as_units() {
	let rolled = roll_coc(50, CocMode::Normal, &mut IterRoller::new([0, 7])).unwrap();
	assert_eq!(rolled.value, 7);
}

#[test]
fn bonus_dice_keep_the_lowest_tens() {
	let rolled = roll_coc(40, CocMode::Bonus(2), &mut IterRoller::new([8, 3, 5, 2])).unwrap();
	assert_eq!(rolled.primary_tens, 8);
	assert_eq!(rolled.extra_tens, [5, 2]);
	assert_eq!(rolled.tens_candidates().collect::<Vec<_>>(), [8, 5, 2]);
	assert_eq!(rolled.tens, 2);
	assert_eq!(rolled.units, 3);
	assert_eq!(rolled.value, 23);
	assert_eq!(rolled.raw(), 83);
	assert_eq!(rolled.tier, Tier::Success);
}

#[test]
fn penalty_dice_keep_the_highest_tens() {
	let rolled = roll_coc(40, CocMode::Penalty(3), &mut IterRoller::new([1, 4, 0, 6, 3])).unwrap();
	assert_eq!(rolled.extra_tens, [0, 6, 3]);
	assert_eq!(rolled.tens, 6);
	assert_eq!(rolled.value, 64);
	assert_eq!(rolled.tier, Tier::Failure);
}

#[test]
fn bonus_zero_tens_can_reach_one_hundred() {
	// A zero tens digit is the lowest, so 00 + 0 wins for bonus dice and reads as 100
	let rolled = roll_coc(60, CocMode::Bonus(1), &mut IterRoller::new([3, 0, 0])).unwrap();
	assert_eq!(rolled.tens, 0);
	assert_eq!(rolled.value, 100);
	assert_eq!(rolled.tier, Tier::Fumble);
}

#[test]
fn extra_dice_are_bounded_by_the_primary_roll() {
	let mut roller = FastRandRoller::with_seed(1234);
	for _ in 0..500 {
		let bonus = roll_coc(50, CocMode::Bonus(3), &mut roller).unwrap();
		assert_eq!(bonus.extra_tens.len(), 3);
		assert!(bonus.tens <= bonus.primary_tens);
		assert!((1..=100).contains(&bonus.value));

		let penalty = roll_coc(50, CocMode::Penalty(3), &mut roller).unwrap();
		assert!(penalty.tens >= penalty.primary_tens);
		assert!((1..=100).contains(&penalty.value));
	}
}

#[test]
fn skill_value_out_of_range() {
	assert_eq!(
		roll_coc(0, CocMode::Normal, &mut MaxRoller),
		Err(ValidationError::SkillValue {
			value: 0,
			min: 1,
			max: 100
		})
	);
	assert!(matches!(
		roll_coc(101, CocMode::Normal, &mut MaxRoller),
		Err(ValidationError::SkillValue { value: 101, .. })
	));

	let config = Config::new().skill_range(1, 200);
	assert!(roll_coc_with(150, CocMode::Normal, &mut MaxRoller, &config).is_ok());
}

#[test]
fn invalid_mode_rolls_nothing() {
	let mut roller = IterRoller::new([1, 2]);
	assert_eq!(
		roll_coc(50, CocMode::Bonus(4), &mut roller),
		Err(ValidationError::BonusDice {
			kind: DiceKind::Bonus,
			count: 4
		})
	);
	assert!(roller.can_roll());
}

#[test]
fn modes_from_counts() {
	assert_eq!(CocMode::bonus(0), Ok(CocMode::Normal));
	assert_eq!(CocMode::bonus(3), Ok(CocMode::Bonus(3)));
	assert_eq!(CocMode::penalty(1), Ok(CocMode::Penalty(1)));
	assert!(CocMode::penalty(4).is_err());
	assert!(CocMode::bonus(u32::MAX).is_err());
	assert_eq!(CocMode::Penalty(2).extra_dice(), 2);
	assert_eq!(CocMode::Penalty(2).to_string(), "ccn2");
	assert_eq!(CocMode::Normal.to_string(), "cc");
}

#[test]
fn checks_carry_their_label() {
	let mut check = CocCheck::new(70, CocMode::Normal);
	check.label = Some("Dodge".to_owned());
	let rolled = check.roll(&mut ValRoller(3), &Config::default()).unwrap();
	assert_eq!(rolled.value, 33);
	assert_eq!(rolled.label.as_deref(), Some("Dodge"));
}

#[test]
fn tier_labels() {
	assert_eq!(Tier::CriticalSuccess.to_string(), "Critical Success");
	assert_eq!(Tier::Fumble.label(), "Fumble");
}
