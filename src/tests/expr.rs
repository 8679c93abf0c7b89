use crate::{
	config::Division,
	dice::roller::{FastRand as FastRandRoller, Iter as IterRoller, Max as MaxRoller, Val as ValRoller},
	error::{Error, RangeError},
	expr::{Describe, Evaled, Expr},
};

#[test]
fn arithmetic_precedence() {
	assert_eq!(total("2+3*4"), 14);
	assert_eq!(total("(2+3)*4"), 20);
	assert_eq!(total("2*3+4"), 10);
	assert_eq!(total("10 - 3 - 2"), 5);
	assert_eq!(total("100 / 10 / 5"), 2);
	assert_eq!(total("2(3+4)"), 14);
}

#[test]
fn unary_signs() {
	assert_eq!(total("-5"), -5);
	assert_eq!(total("+5"), 5);
	assert_eq!(total("3 - -2"), 5);
	assert_eq!(total("-(2 + 3) * 2"), -10);
}

#[test]
fn negated_dice() {
	let expr = parse("-1d4");
	let evaled = expr.eval(&mut IterRoller::new([3]));
	assert_eq!(evaled.calc(Division::Floor).unwrap(), -3);
	assert_eq!(evaled.to_string(), "-1d4[3]");
}

#[test]
fn dice_are_rolled_left_to_right() {
	let expr = parse("1d6 + 1d8 * 1d10");
	let evaled = expr.eval(&mut IterRoller::new([1, 2, 3]));
	let firsts = evaled
		.rolled()
		.iter()
		.map(|rolled| (rolled.dice.faces(), rolled.rolls[0].val))
		.collect::<Vec<_>>();
	assert_eq!(firsts, [(6, 1), (8, 2), (10, 3)]);
	assert_eq!(evaled.calc(Division::Floor).unwrap(), 7);
}

#[test]
fn keep_high_in_formula() {
	let evaled = parse("4d6kh3 + 2").eval(&mut IterRoller::new([3, 6, 1, 5]));
	assert_eq!(evaled.calc(Division::Floor).unwrap(), 16);
	assert_eq!(evaled.to_string(), "4d6kh3[3, 6, 1 (d), 5] + 2");
}

#[test]
fn random_totals_stay_in_range() {
	let expr = parse("3d6 + 2d4 - 1");
	let mut roller = FastRandRoller::with_seed(7);
	for _ in 0..1000 {
		let value = expr.eval(&mut roller).calc(Division::Floor).unwrap();
		assert!((4..=25).contains(&value));
	}
}

#[test]
fn max_rolls() {
	let evaled = parse("2d20kh + 1d4").eval(&mut MaxRoller);
	assert_eq!(evaled.calc(Division::Floor).unwrap(), 24);
}

#[test]
fn divide_by_zero() {
	let evaled = parse("5/(2-2)").eval(&mut MaxRoller);
	let Err(Error::DivideByZero(expr)) = evaled.calc(Division::Floor) else {
		panic!("expected a division by zero");
	};
	assert_eq!(expr, "5 / (2 - 2)");
}

#[test]
fn divide_by_zero_from_dice() {
	let evaled = parse("10 / (1d6 - 1)").eval(&mut ValRoller(1));
	assert!(matches!(evaled.calc(Division::Floor), Err(Error::DivideByZero(..))));
}

#[test]
fn division_rounding() {
	let evaled = parse("-7 / 2").eval(&mut MaxRoller);
	assert_eq!(evaled.calc(Division::Floor).unwrap(), -4);
	assert_eq!(evaled.calc(Division::Ceil).unwrap(), -3);
	assert_eq!(evaled.calc(Division::Truncate).unwrap(), -3);

	let evaled = parse("7 / 2").eval(&mut MaxRoller);
	assert_eq!(evaled.calc(Division::Floor).unwrap(), 3);
	assert_eq!(evaled.calc(Division::Ceil).unwrap(), 4);
	assert_eq!(evaled.calc(Division::Truncate).unwrap(), 3);

	let evaled = parse("8 / -2").eval(&mut MaxRoller);
	assert_eq!(evaled.calc(Division::Floor).unwrap(), -4);
}

#[test]
fn overflow_is_reported() {
	let evaled = parse("4000000000 * 4000000000 * 4000000000").eval(&mut MaxRoller);
	assert!(matches!(
		evaled.calc(Division::Floor),
		Err(Error::Range(RangeError::Overflow(..)))
	));
}

#[test]
fn evaled_describe_truncates_lists() {
	let evaled = parse("5d6").eval(&mut ValRoller(2));
	assert_eq!(evaled.describe(Some(3)), "5d6[2, 2, 2, 2 more...]");
	assert_eq!(evaled.describe(None), "5d6[2, 2, 2, 2, 2]");
}

#[test]
fn description_round_trips() {
	for formula in [
		"1 + 2 * 3",
		"(1 + 2) * 3",
		"1 - (2 - 3)",
		"8 / (4 / 2)",
		"-(1d4 + 1)",
		"2d20kh + 5",
		"4d6kl2 * -3",
	] {
		let expr = parse(formula);
		let reparsed = parse(&expr.to_string());
		assert_eq!(expr, reparsed, "{formula} described as {expr}");
	}
}

#[test]
fn deterministic_expressions() {
	assert!(parse("(1 + 2) * 3").is_deterministic());
	assert!(!parse("1 + 1d2").is_deterministic());
	assert_eq!(parse("1d4 + 2d6 - 3").dice_terms(), 2);
}

#[test]
fn evaled_equality() {
	let a = parse("1d6 + 2").eval(&mut ValRoller(4));
	let b = parse("1d6 + 2").eval(&mut ValRoller(4));
	let c = parse("1d6 + 2").eval(&mut ValRoller(5));
	assert_eq!(a, b);
	assert_ne!(a, c);
	assert!(matches!(a, Evaled::Add(..)));
}

fn parse(formula: &str) -> Expr {
	formula.parse().unwrap()
}

fn total(formula: &str) -> i64 {
	parse(formula).eval(&mut MaxRoller).calc(Division::Floor).unwrap()
}
