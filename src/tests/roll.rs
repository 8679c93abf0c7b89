use std::thread;

use crate::{
	config::{Config, Division},
	dice::roller::{FastRand as FastRandRoller, Iter as IterRoller, Max as MaxRoller, Roller},
	error::{Error, RangeError, ValidationError},
	parse_and_roll, parse_and_roll_with, roll, roll_with,
	roll::is_coc_command,
	Outcome,
};

#[test]
fn rolls_formula() {
	let result = parse_and_roll("4d6kh3 + 2", &mut IterRoller::new([3, 6, 1, 5])).unwrap();
	assert_eq!(result.total(), 16);
	assert_eq!(result.formula(), "4d6kh3 + 2");
	assert_eq!(result.terms().len(), 1);
	assert_eq!(result.rolls().count(), 4);
	assert!(!result.is_deterministic());
}

#[test]
fn deterministic_formula() {
	let result = parse_and_roll("2+3*4", &mut MaxRoller).unwrap();
	assert_eq!(result.total(), 14);
	assert!(result.is_deterministic());
	assert_eq!(result.rolls().count(), 0);
}

#[test]
fn errors_roll_nothing() {
	let mut roller = IterRoller::new([1, 2, 3]);
	assert!(matches!(parse_and_roll("1d6 +", &mut roller), Err(Error::Syntax(..))));
	assert!(matches!(parse_and_roll("101d6", &mut roller), Err(Error::Range(..))));
	assert!(matches!(parse_and_roll("2d6 $", &mut roller), Err(Error::Lex(..))));
	assert!(matches!(roll("cc 0", &mut roller), Err(Error::Validation(..))));
	assert!(matches!(roll("cc5 50", &mut roller), Err(Error::Validation(..))));
	assert_eq!(roller.roll_die(6), 1, "nothing should have been rolled");
}

#[test]
fn division_config() {
	let config = Config::new().division(Division::Ceil);
	let result = parse_and_roll_with("7 / 2", &mut MaxRoller, &config).unwrap();
	assert_eq!(result.total(), 4);

	let result = parse_and_roll("7 / 2", &mut MaxRoller).unwrap();
	assert_eq!(result.total(), 3);

	assert!(matches!(
		parse_and_roll("1d6 / 0", &mut MaxRoller),
		Err(Error::DivideByZero(..))
	));
}

#[test]
fn dispatches_coc_commands() {
	assert!(is_coc_command("cc 50"));
	assert!(is_coc_command("  CCN1 50"));
	assert!(!is_coc_command("2d6"));
	assert!(!is_coc_command("c"));
	assert!(!is_coc_command(""));

	let outcome = roll("ccn1 50 Climb", &mut IterRoller::new([2, 5, 7])).unwrap();
	let Outcome::Coc(check) = outcome else {
		panic!("expected a check");
	};
	assert_eq!(check.value, 75);
	assert_eq!(check.label.as_deref(), Some("Climb"));

	let outcome = roll("1d100", &mut IterRoller::new([42])).unwrap();
	assert!(matches!(outcome, Outcome::Dice(ref result) if result.total() == 42));
}

#[test]
fn skill_range_config() {
	let config = Config::new().skill_range(5, 95);
	assert!(matches!(
		roll_with("cc 3", &mut MaxRoller, &config),
		Err(Error::Validation(ValidationError::SkillValue { min: 5, max: 95, .. }))
	));
	assert!(roll_with("cc 95", &mut MaxRoller, &config).is_ok());
}

#[test]
fn long_commands_are_rejected() {
	let command = format!("cc 50 {}", "a".repeat(500));
	assert!(matches!(
		roll(&command, &mut MaxRoller),
		Err(Error::Range(RangeError::FormulaTooLong { .. }))
	));
}

#[test]
fn error_offsets_and_kinds() {
	let err = parse_and_roll("1 + 1d0", &mut MaxRoller).unwrap_err();
	assert_eq!(err.offset(), Some(4));
	assert_eq!(err.kind(), "range error");

	let err = parse_and_roll("5 / 0", &mut MaxRoller).unwrap_err();
	assert_eq!(err.offset(), None);
}

#[test]
fn concurrent_rolls() {
	let totals = thread::scope(|scope| {
		let handles = (0..8_u64)
			.map(|seed| {
				scope.spawn(move || {
					let mut roller = FastRandRoller::with_seed(seed);
					(0..200)
						.map(|_| parse_and_roll("10d10kh5 + 1d4", &mut roller).unwrap().total())
						.collect::<Vec<_>>()
				})
			})
			.collect::<Vec<_>>();
		handles
			.into_iter()
			.flat_map(|handle| handle.join().unwrap())
			.collect::<Vec<_>>()
	});

	assert_eq!(totals.len(), 1600);
	assert!(totals.iter().all(|total| (6..=54).contains(total)));
}
