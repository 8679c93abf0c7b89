//! AST-like data structures for evaluating full mathematical dice formulas and working with their results.

use std::{fmt, str::FromStr};

use crate::{
	config::{Config, Division},
	dice::{roller::Roller, DiceTerm, Rolled},
	error::{Error, RangeError},
};

/// Generates an implementation of [`HasOpType`] for an enum type.
/// This is very tightly coupled with the expected variants:
/// `Num`, `Dice`, `Neg`, `Pos`, `Add`, `Sub`, `Mul`, and `Div`.
macro_rules! op_type_impl {
	($name:ty) => {
		impl HasOpType for $name {
			fn op_type(&self) -> OpType {
				match self {
					Self::Num(..) | Self::Dice(..) => OpType::Value,
					Self::Neg(..) | Self::Pos(..) => OpType::Unary,
					Self::Add(..) | Self::Sub(..) => OpType::Additive,
					Self::Mul(..) | Self::Div(..) => OpType::Multiplicative,
				}
			}

			fn is_value(&self) -> bool {
				matches!(self, Self::Num(..) | Self::Dice(..))
			}

			fn is_inverse(&self) -> bool {
				matches!(self, Self::Sub(..) | Self::Div(..))
			}
		}
	};
}

/// Individual elements of a full mathematical dice formula
///
/// Each node exclusively owns its children, so an expression is always a strict tree.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[non_exhaustive]
pub enum Expr {
	/// Standalone integer
	Num(i64),

	/// Dice term
	Dice(DiceTerm),

	/// Negation of an expression (makes the result of it negative)
	Neg(Box<Self>),

	/// Explicitly positive expression (the result of it is unchanged)
	Pos(Box<Self>),

	/// Sum of two expressions
	Add(Box<Self>, Box<Self>),

	/// Difference of two expressions
	Sub(Box<Self>, Box<Self>),

	/// Product of two expressions
	Mul(Box<Self>, Box<Self>),

	/// Integer quotient of two expressions, rounded according to [`Config::division`]
	Div(Box<Self>, Box<Self>),
}

op_type_impl!(Expr);

impl Expr {
	/// Evaluates the expression. For most types of expressions, this will directly result in a 1:1 equivalent
	/// [`Evaled`], with the notable exception of [`Expr::Dice`]. For dice terms, the dice they contain are
	/// rolled with the given roller, resulting in an [`Evaled::Dice`] with the [`Rolled`] set of dice.
	///
	/// Children are evaluated left to right, so dice are rolled in the order they appear in the formula.
	///
	/// # Examples
	/// ```
	/// use keeper_dice::{dice::roller::Iter as IterRoller, expr::Expr};
	///
	/// let expr: Expr = "-1d4 + 2".parse()?;
	/// let evaled = expr.eval(&mut IterRoller::new([3]));
	/// assert_eq!(evaled.to_string(), "-1d4[3] + 2");
	/// assert_eq!(evaled.calc(Default::default())?, -1);
	/// # Ok::<(), keeper_dice::error::Error>(())
	/// ```
	#[must_use]
	pub fn eval(&self, roller: &mut impl Roller) -> Evaled {
		match self {
			Self::Num(x) => Evaled::Num(*x),
			Self::Dice(dice) => Evaled::Dice(roller.roll(dice)),

			Self::Neg(x) => Evaled::Neg(Box::new(x.eval(roller))),
			Self::Pos(x) => Evaled::Pos(Box::new(x.eval(roller))),

			Self::Add(a, b) => {
				let a = a.eval(roller);
				Evaled::Add(Box::new(a), Box::new(b.eval(roller)))
			}
			Self::Sub(a, b) => {
				let a = a.eval(roller);
				Evaled::Sub(Box::new(a), Box::new(b.eval(roller)))
			}
			Self::Mul(a, b) => {
				let a = a.eval(roller);
				Evaled::Mul(Box::new(a), Box::new(b.eval(roller)))
			}
			Self::Div(a, b) => {
				let a = a.eval(roller);
				Evaled::Div(Box::new(a), Box::new(b.eval(roller)))
			}
		}
	}

	/// Checks whether the expression is deterministic (will always yield the same value with every evaluation).
	/// A [`Self::Num`] will always return `true`, a [`Self::Dice`] will always return `false` (dice always have at least
	/// two faces), and all unary and binary expressions forward the check to their children.
	#[must_use]
	pub fn is_deterministic(&self) -> bool {
		match self {
			Self::Num(..) => true,
			Self::Dice(..) => false,
			Self::Neg(x) | Self::Pos(x) => x.is_deterministic(),
			Self::Add(a, b) | Self::Sub(a, b) | Self::Mul(a, b) | Self::Div(a, b) => {
				a.is_deterministic() && b.is_deterministic()
			}
		}
	}

	/// Counts the dice terms in the expression.
	#[must_use]
	pub fn dice_terms(&self) -> usize {
		match self {
			Self::Num(..) => 0,
			Self::Dice(..) => 1,
			Self::Neg(x) | Self::Pos(x) => x.dice_terms(),
			Self::Add(a, b) | Self::Sub(a, b) | Self::Mul(a, b) | Self::Div(a, b) => {
				a.dice_terms().saturating_add(b.dice_terms())
			}
		}
	}
}

impl Describe for Expr {
	/// Builds a full usable formula string from the expressions. Operations are grouped with parentheses whenever
	/// the order of operations could be considered ambiguous, such as when mixing addition and multiplication together.
	/// All strings output from this should result in the exact same expression layout when re-parsing them.
	///
	/// `list_limit` does not affect the output of this implementation in any way since there are no possible lists of
	/// elements included, so it is always safe to pass `None`.
	fn describe(&self, _list_limit: Option<usize>) -> String {
		match self {
			Self::Num(x) => x.to_string(),
			Self::Dice(dice) => dice.to_string(),

			Self::Neg(x) => self.describe_unary_expr('-', x.as_ref(), |x| x.describe(None)),
			Self::Pos(x) => self.describe_unary_expr('+', x.as_ref(), |x| x.describe(None)),

			Self::Add(a, b) => self.describe_binary_expr('+', a.as_ref(), b.as_ref(), |x| x.describe(None)),
			Self::Sub(a, b) => self.describe_binary_expr('-', a.as_ref(), b.as_ref(), |x| x.describe(None)),
			Self::Mul(a, b) => self.describe_binary_expr('*', a.as_ref(), b.as_ref(), |x| x.describe(None)),
			Self::Div(a, b) => self.describe_binary_expr('/', a.as_ref(), b.as_ref(), |x| x.describe(None)),
		}
	}
}

impl fmt::Display for Expr {
	/// Formats the value using the given formatter. [Read more][core::fmt::Debug::fmt()]
	///
	/// The output of this implementation is equivalent to [`Self::describe(None)`].
	///
	/// [`Self::describe(None)`]: Self::describe()
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.describe(None))
	}
}

impl FromStr for Expr {
	type Err = Error;

	/// Parses a formula with the default [`Config`].
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		crate::parse::parse_with(s, &Config::default())
	}
}

/// Individual elements of an evaluated mathematical dice formula
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[non_exhaustive]
pub enum Evaled {
	/// Standalone integer
	Num(i64),

	/// Rolled dice
	Dice(Rolled),

	/// Negation of an expression (makes the result of it negative)
	Neg(Box<Self>),

	/// Explicitly positive expression (the result of it is unchanged)
	Pos(Box<Self>),

	/// Sum of two expressions
	Add(Box<Self>, Box<Self>),

	/// Difference of two expressions
	Sub(Box<Self>, Box<Self>),

	/// Product of two expressions
	Mul(Box<Self>, Box<Self>),

	/// Integer quotient of two expressions
	Div(Box<Self>, Box<Self>),
}

op_type_impl!(Evaled);

impl Evaled {
	/// Calculates the final result of the evaluated expression and all of its children (if any).
	///
	/// # Errors
	/// If the right-hand side of a division is zero, [`Error::DivideByZero`] is returned.
	/// If there is an integer overflow, [`RangeError::Overflow`] is returned.
	///
	/// # Examples
	/// ```
	/// use keeper_dice::{config::Division, dice::roller::Max as MaxRoller, error::Error, expr::Expr};
	///
	/// let evaled = "7 / 2".parse::<Expr>()?.eval(&mut MaxRoller);
	/// assert_eq!(evaled.calc(Division::Floor)?, 3);
	/// assert_eq!(evaled.calc(Division::Ceil)?, 4);
	///
	/// let evaled = "5 / (2 - 2)".parse::<Expr>()?.eval(&mut MaxRoller);
	/// assert!(matches!(evaled.calc(Division::Floor), Err(Error::DivideByZero(..))));
	/// # Ok::<(), Error>(())
	/// ```
	pub fn calc(&self, division: Division) -> Result<i64, Error> {
		let overflow = || RangeError::Overflow(self.to_string());

		match self {
			Self::Num(x) => Ok(*x),
			Self::Dice(rolled) => Ok(rolled.total().into()),

			Self::Neg(x) => Ok(x.calc(division)?.checked_neg().ok_or_else(overflow)?),
			Self::Pos(x) => x.calc(division),

			Self::Add(a, b) => Ok(a.calc(division)?.checked_add(b.calc(division)?).ok_or_else(overflow)?),
			Self::Sub(a, b) => Ok(a.calc(division)?.checked_sub(b.calc(division)?).ok_or_else(overflow)?),
			Self::Mul(a, b) => Ok(a.calc(division)?.checked_mul(b.calc(division)?).ok_or_else(overflow)?),
			Self::Div(a, b) => {
				let a_val = a.calc(division)?;
				let b_val = b.calc(division)?;
				if b_val == 0 {
					log::debug!("division by zero in {self}");
					return Err(Error::DivideByZero(self.to_string()));
				}
				Ok(division.apply(a_val, b_val).ok_or_else(overflow)?)
			}
		}
	}

	/// Gets every set of rolled dice in the evaluated expression, in the order they were rolled.
	#[must_use]
	pub fn rolled(&self) -> Vec<&Rolled> {
		let mut rolled = Vec::new();
		self.collect_rolled(&mut rolled);
		rolled
	}

	/// Pushes every set of rolled dice onto `out`, left to right.
	fn collect_rolled<'a>(&'a self, out: &mut Vec<&'a Rolled>) {
		match self {
			Self::Num(..) => {}
			Self::Dice(rolled) => out.push(rolled),
			Self::Neg(x) | Self::Pos(x) => x.collect_rolled(out),
			Self::Add(a, b) | Self::Sub(a, b) | Self::Mul(a, b) | Self::Div(a, b) => {
				a.collect_rolled(out);
				b.collect_rolled(out);
			}
		}
	}

	/// Builds a description of the expression with each set of rolled dice rendered by `dice`.
	///
	/// # Examples
	/// ```
	/// use keeper_dice::{dice::roller::Iter as IterRoller, expr::Expr};
	///
	/// let evaled = "2d6kh + 3".parse::<Expr>()?.eval(&mut IterRoller::new([2, 5]));
	/// assert_eq!(evaled.describe_with(&|rolled| format!("[{}]", rolled.total())), "[5] + 3");
	/// # Ok::<(), keeper_dice::error::Error>(())
	/// ```
	#[must_use]
	pub fn describe_with(&self, dice: &dyn Fn(&Rolled) -> String) -> String {
		match self {
			Self::Num(x) => x.to_string(),
			Self::Dice(rolled) => dice(rolled),

			Self::Neg(x) => self.describe_unary_expr('-', x.as_ref(), |x| x.describe_with(dice)),
			Self::Pos(x) => self.describe_unary_expr('+', x.as_ref(), |x| x.describe_with(dice)),

			Self::Add(a, b) => self.describe_binary_expr('+', a.as_ref(), b.as_ref(), |x| x.describe_with(dice)),
			Self::Sub(a, b) => self.describe_binary_expr('-', a.as_ref(), b.as_ref(), |x| x.describe_with(dice)),
			Self::Mul(a, b) => self.describe_binary_expr('*', a.as_ref(), b.as_ref(), |x| x.describe_with(dice)),
			Self::Div(a, b) => self.describe_binary_expr('/', a.as_ref(), b.as_ref(), |x| x.describe_with(dice)),
		}
	}
}

impl Describe for Evaled {
	fn describe(&self, list_limit: Option<usize>) -> String {
		self.describe_with(&|rolled| rolled.describe(list_limit))
	}
}

impl fmt::Display for Evaled {
	/// Formats the value using the given formatter. [Read more][core::fmt::Debug::fmt()]
	///
	/// The output of this implementation is equivalent to [`Self::describe(None)`].
	///
	/// [`Self::describe(None)`]: Self::describe()
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.describe(None))
	}
}

/// Operation type for an individual expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[expect(clippy::exhaustive_enums, reason = "Precedence tiers are fixed by the grammar")]
pub enum OpType {
	/// Single value, no operation
	Value,

	/// Unary operation
	Unary,

	/// Additive operation (sum or difference)
	Additive,

	/// Multiplicative operation (product or quotient)
	Multiplicative,
}

/// Trait that offers [`OpType`]-related information
pub trait HasOpType {
	/// Gets the type of this expression.
	fn op_type(&self) -> OpType;

	/// Checks whether this expression is a single value.
	fn is_value(&self) -> bool;

	/// Checks whether this expression is a non-associative operation (difference or quotient).
	fn is_inverse(&self) -> bool;
}

/// Trait to allow creation of expanded descriptions with an optional max number of individual listed results where
/// applicable
pub trait Describe {
	/// Builds a detailed expression string with additional information about non-deterministic elements.
	/// Any elements of the expression that can have a different result between multiple evaluations or multiple results
	/// should list all of the specific individual results that occurred (ideally, up to `list_limit` of them).
	#[must_use]
	fn describe(&self, list_limit: Option<usize>) -> String;
}

/// Trait for describing unary and binary expressions with influence from own type.
/// Used for wrapping parentheses around parts of expressions based on [`OpType`] of self and the operands.
trait DescribeOperation: HasOpType {
	/// Builds a description for a unary expression, wrapping the operand in parentheses unless it's a plain value.
	fn describe_unary_expr<T: HasOpType>(&self, op: char, x: &T, describe: impl Fn(&T) -> String) -> String {
		if x.is_value() {
			format!("{op}{}", describe(x))
		} else {
			format!("{op}{}", paren_wrap(describe(x)))
		}
	}

	/// Builds a description for a binary expression with parentheses added to disambiguate mixed
	/// additive/multiplicative operations, nested unary operations, and right-hand operands of differences and
	/// quotients.
	fn describe_binary_expr<T: HasOpType>(&self, op: char, a: &T, b: &T, describe: impl Fn(&T) -> String) -> String {
		let left = match (self.op_type(), a.op_type()) {
			(OpType::Additive, OpType::Multiplicative) | (OpType::Multiplicative, OpType::Additive) => {
				paren_wrap(describe(a))
			}
			_ => describe(a),
		};
		let right = match (self.op_type(), b.op_type()) {
			(OpType::Additive, OpType::Multiplicative) | (OpType::Multiplicative, OpType::Additive) => {
				paren_wrap(describe(b))
			}
			(parent, child) if parent == child && self.is_inverse() => paren_wrap(describe(b)),
			_ => describe(b),
		};
		format!("{left} {op} {right}")
	}
}

impl<T: HasOpType> DescribeOperation for T {}

/// Wraps a string in parentheses.
#[must_use]
fn paren_wrap(mut text: String) -> String {
	text.insert(0, '(');
	text.push(')');
	text
}
