//! Parsing of formula text into [`Expr`] trees.
//!
//! Tokenizing is handled by [`lex`]; the token stream is then consumed by a recursive descent parser matching the
//! following grammar (lowest precedence first):
//!
//! ```text
//! expression -> term (('+' | '-') term)*
//! term       -> factor (('*' | '/') factor | group)*
//! factor     -> ['+' | '-'] (integer | dice | group)
//! group      -> '(' expression ')'
//! dice       -> [integer] 'd' integer [('kh' | 'kl') [integer]]
//! ```
//!
//! Keep modifiers must directly follow their dice term, with no whitespace in between.
//!
//! A `(` directly following a complete factor multiplies, so `2(1d4 + 1)` is the same as `2 * (1d4 + 1)`.

pub mod lex;

use self::lex::{Spanned, Token};
use crate::{
	coc::{CocCheck, CocMode},
	config::Config,
	dice::DiceTerm,
	error::{Error, RangeError, SyntaxError},
	expr::Expr,
};

/// Descriptions of everything that can start an operand
const OPERAND: &[&str] = &["a number", "a dice term", "\"(\""];

/// Parses formula text into an expression with the default [`Config`].
///
/// # Errors
/// See [`parse_with()`].
///
/// # Examples
/// ```
/// use keeper_dice::{expr::Expr, parse};
///
/// let expr = parse::parse("2+3*4")?;
/// assert_eq!(expr.to_string(), "2 + (3 * 4)");
/// # Ok::<(), keeper_dice::error::Error>(())
/// ```
pub fn parse(input: &str) -> Result<Expr, Error> {
	parse_with(input, &Config::default())
}

/// Parses formula text into an expression.
///
/// # Errors
/// - [`Error::Range`] if the formula is longer than [`Config::max_formula_len`], parentheses nest deeper than
///   [`Config::max_depth`], or a dice term or keep modifier is out of bounds
/// - [`Error::Lex`] if the text can't be tokenized
/// - [`Error::Syntax`] if the tokens don't form a single complete expression (including empty formulas, unmatched
///   parentheses, and trailing tokens)
pub fn parse_with(input: &str, config: &Config) -> Result<Expr, Error> {
	let len = input.chars().count();
	if len > config.max_formula_len {
		return Err(RangeError::FormulaTooLong {
			len,
			max: config.max_formula_len,
		}
		.into());
	}

	let tokens = lex::tokenize(input)?;
	let mut parser = Parser::new(&tokens, config);
	let expr = parser.expression()?;
	parser.finish()?;

	log::trace!("parsed {input:?} as {expr:?}");
	Ok(expr)
}

/// Parses a Call of Cthulhu command like `cc 65`, `cc2 40 Library Use`, or `ccn1 55`.
///
/// `cc` without a count (or with a count of 0) is a normal roll, `ccN` rolls N bonus dice, and `ccnN` rolls N penalty
/// dice. Anything after the skill value is kept as the check's label.
///
/// # Errors
/// - [`Error::Range`] if the command is longer than [`Config::max_formula_len`]
/// - [`Error::Lex`] if the text isn't a prefix followed by whitespace and a skill value
/// - [`Error::Validation`] if there are more than 3 bonus/penalty dice
///
/// The skill value itself is only checked when the command is rolled.
///
/// # Examples
/// ```
/// use keeper_dice::{coc::CocMode, parse};
///
/// let check = parse::coc("cc1 65 Pistol")?;
/// assert_eq!(check.skill, 65);
/// assert_eq!(check.mode, CocMode::Bonus(1));
/// assert_eq!(check.label.as_deref(), Some("Pistol"));
///
/// assert_eq!(parse::coc("ccn 40")?.mode, CocMode::Normal);
/// assert!(parse::coc("cc4 40").is_err());
/// # Ok::<(), keeper_dice::error::Error>(())
/// ```
pub fn coc(input: &str) -> Result<CocCheck, Error> {
	coc_with(input, &Config::default())
}

/// Parses a Call of Cthulhu command. See [`coc()`].
///
/// # Errors
/// See [`coc()`].
pub fn coc_with(input: &str, config: &Config) -> Result<CocCheck, Error> {
	let len = input.chars().count();
	if len > config.max_formula_len {
		return Err(RangeError::FormulaTooLong {
			len,
			max: config.max_formula_len,
		}
		.into());
	}

	let prefix = lex::tokenize_coc(input)?;
	let dice = prefix.dice.unwrap_or(0);
	let mode = if prefix.penalty {
		CocMode::penalty(dice)?
	} else {
		CocMode::bonus(dice)?
	};

	log::trace!("parsed {input:?} as {mode} against {}", prefix.skill);
	Ok(CocCheck {
		skill: prefix.skill,
		mode,
		label: prefix.label,
	})
}

/// Recursive descent parser over a token list ending in [`Token::End`]
#[derive(Debug)]
struct Parser<'a> {
	/// Tokens to parse
	tokens: &'a [Spanned],

	/// Index of the current token
	pos: usize,

	/// Current parenthesis nesting depth
	depth: usize,

	/// Limits to enforce
	config: &'a Config,
}

impl<'a> Parser<'a> {
	/// Creates a new parser for a list of tokens.
	const fn new(tokens: &'a [Spanned], config: &'a Config) -> Self {
		Self {
			tokens,
			pos: 0,
			depth: 0,
			config,
		}
	}

	/// Gets the current token without consuming it. Past the end of the list, this is always [`Token::End`].
	fn peek(&self) -> Spanned {
		self.tokens.get(self.pos).copied().unwrap_or(Spanned {
			token: Token::End,
			offset: self.tokens.last().map_or(0, |last| last.offset),
		})
	}

	/// Consumes and returns the current token.
	fn advance(&mut self) -> Spanned {
		let current = self.peek();
		if self.pos < self.tokens.len() {
			self.pos = self.pos.saturating_add(1);
		}
		current
	}

	/// Consumes the current token if it's the given token, returning whether it did.
	fn consume(&mut self, token: Token) -> bool {
		let matches = self.peek().token == token;
		if matches {
			self.advance();
		}
		matches
	}

	/// Builds an error for the current token.
	fn unexpected(&self, expected: &[&'static str]) -> Error {
		let found = self.peek();
		SyntaxError::new(found.offset, found.token.to_string(), expected.to_vec()).into()
	}

	/// Ensures every token has been consumed.
	fn finish(&self) -> Result<(), Error> {
		if self.peek().token == Token::End {
			Ok(())
		} else {
			Err(self.unexpected(&["an operator", "end of input"]))
		}
	}

	/// Parses `term (('+' | '-') term)*`.
	fn expression(&mut self) -> Result<Expr, Error> {
		let mut lhs = self.term()?;

		loop {
			lhs = match self.peek().token {
				Token::Plus => {
					self.advance();
					Expr::Add(Box::new(lhs), Box::new(self.term()?))
				}
				Token::Minus => {
					self.advance();
					Expr::Sub(Box::new(lhs), Box::new(self.term()?))
				}
				_ => return Ok(lhs),
			};
		}
	}

	/// Parses `factor (('*' | '/') factor)*`, treating a `(` right after a factor as multiplication.
	fn term(&mut self) -> Result<Expr, Error> {
		let mut lhs = self.factor()?;

		loop {
			lhs = match self.peek().token {
				Token::Star => {
					self.advance();
					Expr::Mul(Box::new(lhs), Box::new(self.factor()?))
				}
				Token::Slash => {
					self.advance();
					Expr::Div(Box::new(lhs), Box::new(self.factor()?))
				}
				Token::LParen => Expr::Mul(Box::new(lhs), Box::new(self.factor()?)),
				_ => return Ok(lhs),
			};
		}
	}

	/// Parses `['+' | '-'] (integer | dice | '(' expression ')')`.
	fn factor(&mut self) -> Result<Expr, Error> {
		if self.consume(Token::Minus) {
			return Ok(Expr::Neg(Box::new(self.operand()?)));
		}
		if self.consume(Token::Plus) {
			return Ok(Expr::Pos(Box::new(self.operand()?)));
		}
		self.operand()
	}

	/// Parses an unsigned operand: an integer, a dice term with an optional keep modifier, or a parenthesized
	/// expression.
	fn operand(&mut self) -> Result<Expr, Error> {
		let current = self.peek();
		match current.token {
			Token::Int(val) => {
				self.advance();
				Ok(Expr::Num(val.into()))
			}

			Token::Dice { count, faces } => {
				self.advance();
				let mut dice = DiceTerm::new_at(count.unwrap_or(1), faces, current.offset)?;

				let next = self.peek();
				if let Token::Keep { kind, count } = next.token {
					self.advance();
					dice = dice.with_keep_at(kind, count.unwrap_or(1), next.offset)?;
				}

				Ok(Expr::Dice(dice))
			}

			Token::LParen => {
				self.advance();
				self.depth = self.depth.saturating_add(1);
				if self.depth > self.config.max_depth {
					return Err(RangeError::NestingTooDeep {
						max: self.config.max_depth,
						offset: current.offset,
					}
					.into());
				}

				let inner = self.expression()?;
				if !self.consume(Token::RParen) {
					return Err(self.unexpected(&["an operator", "\")\""]));
				}
				self.depth = self.depth.saturating_sub(1);

				Ok(inner)
			}

			_ => Err(self.unexpected(OPERAND)),
		}
	}
}
