//! Tokenizing of formula text and Call of Cthulhu command text.
//!
//! Both lexers are built with [chumsky] over the ASCII-lowercased input, so `D`, `KH`, and `CCN` are accepted the same as
//! their lowercase forms. Byte spans from chumsky are converted to character offsets before leaving this module.

use std::{fmt, iter};

use chumsky::{error::RichReason, prelude::*};

use crate::{dice::KeepKind, error::LexError};

/// Type of a single token in a dice formula
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Token {
	/// Integer literal
	Int(u32),

	/// Dice term like `2d6` or `d20` (keep modifiers are separate tokens)
	Dice {
		/// Number of dice, if given
		count: Option<u32>,
		/// Number of faces per die
		faces: u32,
	},

	/// Keep modifier like `kh`, `kh2`, or `kl3`
	Keep {
		/// Which rolls to keep
		kind: KeepKind,
		/// Number of rolls to keep, if given
		count: Option<u32>,
	},

	/// `+`
	Plus,

	/// `-`
	Minus,

	/// `*`
	Star,

	/// `/`
	Slash,

	/// `(`
	LParen,

	/// `)`
	RParen,

	/// End of the formula
	End,
}

impl fmt::Display for Token {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Int(val) => write!(f, "{val}"),
			Self::Dice { count, faces } => match count {
				Some(count) => write!(f, "{count}d{faces}"),
				None => write!(f, "d{faces}"),
			},
			Self::Keep { kind, count } => match count {
				Some(count) => write!(f, "{}{count}", kind.symbol()),
				None => f.write_str(kind.symbol()),
			},
			Self::Plus => f.write_str("\"+\""),
			Self::Minus => f.write_str("\"-\""),
			Self::Star => f.write_str("\"*\""),
			Self::Slash => f.write_str("\"/\""),
			Self::LParen => f.write_str("\"(\""),
			Self::RParen => f.write_str("\")\""),
			Self::End => f.write_str("end of input"),
		}
	}
}

/// A token along with the character offset it starts at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[expect(clippy::exhaustive_structs, reason = "Plain pairing of a token with its position")]
pub struct Spanned {
	/// The token
	pub token: Token,

	/// Character offset of the start of the token
	pub offset: usize,
}

/// Prefix and skill value of a Call of Cthulhu command like `ccn2 65 Spot Hidden`
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct CocPrefix {
	/// Whether the command was for penalty dice (`ccn`) rather than bonus dice (`cc`)
	pub penalty: bool,

	/// Number of bonus/penalty dice, if given
	pub dice: Option<u32>,

	/// Skill value to check against
	pub skill: u32,

	/// Free text following the skill value, if any
	pub label: Option<String>,
}

/// Reason given for Call of Cthulhu commands that don't match the expected shape
const COC_USAGE: &str = "expected a command like \"cc 65\", \"cc2 40\", or \"ccn1 55\"";

/// Parser output type for a formula
type TokenList = Vec<(Token, SimpleSpan)>;

/// Generates a parser for integer literals that fit in a [`u32`]. Leading zeros are part of the literal.
fn int<'src>() -> impl Parser<'src, &'src str, u32, extra::Err<Rich<'src, char>>> + Clone {
	text::digits(10).to_slice().try_map(|digits: &str, span| {
		digits
			.parse()
			.map_err(|err| Rich::custom(span, format!("integer literal {digits} is out of range: {err}")))
	})
}

/// Generates a parser that turns a formula into a list of tokens and their byte spans.
fn lexer<'src>() -> impl Parser<'src, &'src str, TokenList, extra::Err<Rich<'src, char>>> {
	// Dice terms (e.g. 2d6, d20)
	let dice = int()
		.or_not()
		.then_ignore(just('d'))
		.then(int())
		.map(|(count, faces)| Token::Dice { count, faces });

	// Keep modifiers (e.g. kh, kh2, kl3), only ever directly after a dice term
	let keep = just('k')
		.ignore_then(choice((
			just('h').to(KeepKind::Highest),
			just('l').to(KeepKind::Lowest),
		)))
		.then(int().or_not())
		.map(|(kind, count)| Token::Keep { kind, count });

	let dice = dice
		.map_with(|token, e| (token, e.span()))
		.then(keep.map_with(|token, e| (token, e.span())).or_not())
		.map(|(dice, keep)| iter::once(dice).chain(keep).collect::<Vec<_>>());

	// Operators and grouping
	let op = choice((
		just('+').to(Token::Plus),
		just('-').to(Token::Minus),
		just('*').to(Token::Star),
		just('/').to(Token::Slash),
		just('(').to(Token::LParen),
		just(')').to(Token::RParen),
	));

	let single = choice((int().map(Token::Int), op)).map_with(|token, e| vec![(token, e.span())]);

	choice((dice, single))
		.padded()
		.repeated()
		.collect::<Vec<_>>()
		.map(|groups| groups.into_iter().flatten().collect())
		.padded()
		.then_ignore(end())
}

/// Generates a parser for the prefix of a Call of Cthulhu command, producing the penalty flag, dice count, skill value,
/// and the byte span of any trailing text.
fn coc_lexer<'src>() -> impl Parser<'src, &'src str, (bool, Option<u32>, u32, SimpleSpan), extra::Err<Rich<'src, char>>>
{
	text::whitespace()
		.ignore_then(just("cc"))
		.ignore_then(just('n').or_not().map(|n| n.is_some()))
		.then(int().or_not())
		.then_ignore(text::whitespace().at_least(1))
		.then(int())
		.then(any().repeated().map_with(|_, e| e.span()))
		.then_ignore(end())
		.map(|(((penalty, dice), skill), rest)| (penalty, dice, skill, rest))
}

/// Tokenizes formula text. The returned list always ends with a [`Token::End`] positioned at the end of the input.
///
/// # Errors
/// If the text contains an unrecognized character, a truncated dice term or keep modifier, or an integer literal too
/// large to represent, a lex error pointing at the offending text is returned.
///
/// # Examples
/// ```
/// use keeper_dice::parse::lex::{tokenize, Token};
///
/// let tokens = tokenize("2D6kh + 3")?.into_iter().map(|t| t.token).collect::<Vec<_>>();
/// assert_eq!(tokens.len(), 5);
/// assert_eq!(tokens[0], Token::Dice { count: Some(2), faces: 6 });
/// assert_eq!(tokens[3], Token::Int(3));
/// assert_eq!(tokens[4], Token::End);
/// # Ok::<(), keeper_dice::error::LexError>(())
/// ```
pub fn tokenize(input: &str) -> Result<Vec<Spanned>, LexError> {
	let lowered = input.to_ascii_lowercase();
	let tokens = lexer()
		.parse(lowered.as_str())
		.into_result()
		.map_err(|errs| lex_error(input, errs, "unrecognized input"))?;

	let mut spanned = tokens
		.into_iter()
		.map(|(token, span)| Spanned {
			token,
			offset: char_offset(input, span.start),
		})
		.collect::<Vec<_>>();
	spanned.push(Spanned {
		token: Token::End,
		offset: input.chars().count(),
	});

	log::trace!("tokenized {input:?} into {} tokens", spanned.len());
	Ok(spanned)
}

/// Tokenizes the prefix of a Call of Cthulhu command (`cc`, `ccN`, `ccnN`), its skill value, and its label.
///
/// # Errors
/// If the text doesn't start with a valid prefix followed by whitespace and a skill value, a lex error is returned.
///
/// # Examples
/// ```
/// use keeper_dice::parse::lex::tokenize_coc;
///
/// let prefix = tokenize_coc("CCN2 45 Spot Hidden")?;
/// assert!(prefix.penalty);
/// assert_eq!(prefix.dice, Some(2));
/// assert_eq!(prefix.skill, 45);
/// assert_eq!(prefix.label.as_deref(), Some("Spot Hidden"));
/// # Ok::<(), keeper_dice::error::LexError>(())
/// ```
pub fn tokenize_coc(input: &str) -> Result<CocPrefix, LexError> {
	let lowered = input.to_ascii_lowercase();
	let (penalty, dice, skill, rest) = coc_lexer()
		.parse(lowered.as_str())
		.into_result()
		.map_err(|errs| lex_error(input, errs, COC_USAGE))?;

	let label = input
		.get(rest.start..rest.end)
		.map(str::trim)
		.filter(|label| !label.is_empty())
		.map(ToOwned::to_owned);

	Ok(CocPrefix {
		penalty,
		dice,
		skill,
		label,
	})
}

/// Converts the first of chumsky's errors into a [`LexError`] pointing into the original input. `fallback` is used as
/// the reason when chumsky has nothing more specific to say.
fn lex_error(input: &str, errs: Vec<Rich<'_, char>>, fallback: &str) -> LexError {
	let Some(err) = errs.into_iter().next() else {
		return LexError::new(0, input, fallback);
	};

	let span = *err.span();
	let text = input
		.get(span.start..span.end)
		.filter(|text| !text.is_empty())
		.map(ToOwned::to_owned)
		.or_else(|| input.get(span.start..)?.chars().next().map(String::from))
		.unwrap_or_else(|| "end of input".to_owned());

	let reason = custom_reason(err.reason()).unwrap_or_else(|| match err.reason() {
		RichReason::ExpectedFound { expected, .. } if !expected.is_empty() => err.to_string(),
		_ => fallback.to_owned(),
	});

	log::debug!("rejected {input:?} at byte {}: {err}", span.start);
	LexError::new(char_offset(input, span.start), text, reason)
}

/// Finds the first message given to [`Rich::custom`], which chumsky may have merged with other errors.
fn custom_reason(reason: &RichReason<'_, char>) -> Option<String> {
	match reason {
		RichReason::Custom(msg) => Some(msg.clone()),
		RichReason::Many(reasons) => reasons.iter().find_map(custom_reason),
		_ => None,
	}
}

/// Converts a byte offset into `input` to a character offset.
fn char_offset(input: &str, byte: usize) -> usize {
	input
		.char_indices()
		.take_while(|(idx, _)| *idx < byte)
		.count()
}
