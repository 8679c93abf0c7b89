//! Rolls a dice formula or Call of Cthulhu check from the command line.
//!
//! Usage: `keeper-dice [.N] <formula or cc command>`, where `.N` repeats the roll N times (1 to 20). Without any
//! arguments, the command is read from stdin.

use std::{
	env,
	io::{self, Write},
	process::ExitCode,
};

use ariadne::{Color, Label, Report, ReportKind, Source};
use keeper_dice::{dice::roller::FastRand as FastRandRoller, format::Formatter, roll_with, Config, Error};

/// Most times a single command may be repeated
const MAX_REPEAT: u8 = 20;

fn main() -> ExitCode {
	pretty_env_logger::init();

	let input = match read_input() {
		Ok(input) => input,
		Err(err) => {
			eprintln!("Unable to read input: {err}");
			return ExitCode::FAILURE;
		}
	};

	let (times, command) = match split_repeat(&input) {
		Ok(split) => split,
		Err(msg) => {
			eprintln!("{msg}");
			return ExitCode::FAILURE;
		}
	};
	log::info!("rolling {command:?} {times} time(s)");

	let config = Config::default();
	let formatter = Formatter::default();
	let mut roller = FastRandRoller::default();

	if times == 1 {
		return match roll_with(command, &mut roller, &config) {
			Ok(outcome) => {
				println!("{}", formatter.format(&outcome));
				ExitCode::SUCCESS
			}
			Err(err) => report(command, &err),
		};
	}

	println!("Roll: {command} (x{times})");
	for i in 1..=times {
		match roll_with(command, &mut roller, &config) {
			Ok(outcome) => println!("#{i}: {}", formatter.summary(&outcome)),
			Err(err) => return report(command, &err),
		}
	}

	ExitCode::SUCCESS
}

/// Obtains the command by combining all args passed to the executable, so that it can be left unquoted even with
/// spaces. Falls back to the first line of stdin when there are no args.
fn read_input() -> io::Result<String> {
	let args = env::args();
	if args.len() > 1 {
		// The first argument is ignored since it is typically the name of the executable itself
		return Ok(args.skip(1).collect::<Vec<String>>().join(" "));
	}

	print!("Enter dice formula: ");
	io::stdout().flush()?;

	let mut line = String::new();
	io::stdin().read_line(&mut line)?;
	Ok(line.trim().to_owned())
}

/// Splits an optional `.N` repeat prefix off of the command.
fn split_repeat(input: &str) -> Result<(u8, &str), String> {
	let input = input.trim();
	let Some(rest) = input.strip_prefix('.') else {
		return Ok((1, input));
	};

	let (count, command) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
	let times = count
		.parse::<u8>()
		.ok()
		.filter(|times| (1..=MAX_REPEAT).contains(times))
		.ok_or_else(|| format!("Repeat count must be a whole number from 1 to {MAX_REPEAT}, got \"{count}\""))?;

	let command = command.trim();
	if command.is_empty() {
		return Err("Nothing to roll after the repeat count".to_owned());
	}
	Ok((times, command))
}

/// Prints an error, pointing at the offending part of the command when the error has a position.
fn report(command: &str, err: &Error) -> ExitCode {
	let Some(offset) = err.offset() else {
		eprintln!("Error ({}): {err}", err.kind());
		return ExitCode::FAILURE;
	};

	let start = offset.min(command.chars().count());
	let span = start..start.saturating_add(1);

	let printed = Report::build(ReportKind::Error, ("command", span.clone()))
		.with_message(err.kind())
		.with_label(
			Label::new(("command", span))
				.with_message(err.to_string())
				.with_color(Color::Red),
		)
		.finish()
		.eprint(("command", Source::from(command)));
	if printed.is_err() {
		eprintln!("Error ({}): {err}", err.kind());
	}

	ExitCode::FAILURE
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn repeat_prefix_is_split_off() {
		assert_eq!(split_repeat("2d6+1"), Ok((1, "2d6+1")));
		assert_eq!(split_repeat(".5 cc1 65 Pistol"), Ok((5, "cc1 65 Pistol")));
		assert_eq!(split_repeat("  .20   1d20 "), Ok((20, "1d20")));
	}

	#[test]
	fn repeat_count_is_bounded() {
		assert!(split_repeat(".0 1d20").is_err());
		assert!(split_repeat(".21 1d20").is_err());
		assert!(split_repeat(".x 1d20").is_err());
		assert!(split_repeat(".3").is_err());
	}
}
