use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use assertj_migrate::config::{Settings, load_settings};
use assertj_migrate::convert::{FileOutcome, convert_file};
use assertj_migrate::rules::{Family, IMPORT_REMINDER, Rewriter};
use assertj_migrate::select::{compile_pattern, select_files};

#[derive(Parser)]
#[command(name = "assertj-migrate")]
#[command(about = "Convert JUnit assertions in Java test sources to AssertJ assertions")]
#[command(
	long_about = "Convert JUnit assertions in Java test sources to AssertJ assertions.\n\n\
	Every file under the current directory whose path matches PATTERN is rewritten in place. \
	Settings are read from .assertj-migrate.toml files in the current directory, its parents, \
	and the home directory."
)]
struct Cli {
	/// Regex searched in each file path [default: Test\.java]
	#[arg(allow_hyphen_values = true)]
	pattern: Option<String>,
}

fn main() -> ExitCode {
	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn run() -> Result<ExitCode> {
	let args: Vec<String> = std::env::args().collect();

	// At most one argument: the pattern or a help flag.
	if args.len() > 2 {
		eprintln!("{}", Cli::command().render_help());
		return Ok(ExitCode::FAILURE);
	}

	let cli = match Cli::try_parse_from(&args) {
		Ok(cli) => cli,
		Err(e) if e.kind() == ErrorKind::DisplayHelp => {
			e.print().context("Failed to print help")?;
			return Ok(ExitCode::SUCCESS);
		}
		Err(e) => {
			e.print().context("Failed to print usage")?;
			return Ok(ExitCode::FAILURE);
		}
	};

	let cwd = std::env::current_dir().context("Failed to get current directory")?;
	let settings = load_settings(&cwd).context("Failed to load configuration")?;
	init_tracing(&settings.log_level)?;

	for source in &settings.sources {
		tracing::debug!(path = %source.display(), "loaded config");
	}

	handle_convert(&cwd, cli.pattern.as_deref(), &settings)
}

fn init_tracing(log_level: &str) -> Result<()> {
	let filter = EnvFilter::try_new(log_level)
		.with_context(|| format!("Invalid log-level: {}", log_level))?;

	// A subscriber may already be installed when embedded; keep it.
	let _ = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.try_init();

	Ok(())
}

fn handle_convert(root: &Path, cli_pattern: Option<&str>, settings: &Settings) -> Result<ExitCode> {
	let pattern_text = settings.effective_pattern(cli_pattern);
	let pattern = compile_pattern(&pattern_text).context("Invalid search pattern")?;
	let rewriter = settings.rewriter();

	println!(
		"Converting {} assertions to AssertJ ({} matching) in files matching pattern : {}",
		rewriter.rules().dialect().as_str(),
		rewriter.mode().as_str(),
		pattern_text
	);
	println!();
	print_replacements(&rewriter);
	println!();

	let files = select_files(root, &pattern)
		.with_context(|| format!("Failed to list files under {}", root.display()))?;

	let mut converted = 0;
	let mut rewrites = 0;
	for path in &files {
		let outcome = convert_file(path, &rewriter, settings.dry_run)
			.with_context(|| format!("Failed to convert {}", path.display()))?;

		if let FileOutcome::Converted {
			rewrites: counts, ..
		} = &outcome
		{
			converted += 1;
			rewrites += counts.iter().map(|(_, count)| count).sum::<usize>();
			let shown = outcome.path().strip_prefix(root).unwrap_or(outcome.path());
			if settings.dry_run {
				println!(" - would convert {}", shown.display());
			} else {
				println!(" - converted {}", shown.display());
			}
		}
	}

	tracing::info!(
		selected = files.len(),
		converted,
		rewrites,
		dry_run = settings.dry_run,
		"run complete"
	);

	println!();
	if settings.dry_run {
		println!(
			"{} of {} files would be converted ({} assertions), nothing was written.",
			converted,
			files.len(),
			rewrites
		);
	} else {
		println!(
			"{} of {} files converted ({} assertions).",
			converted,
			files.len(),
			rewrites
		);
	}
	println!();
	println!("{}", IMPORT_REMINDER);

	Ok(ExitCode::SUCCESS)
}

fn print_replacements(rewriter: &Rewriter) {
	for family in rewriter.rules().families() {
		let (source, target) = family.example();
		if family == Family::Imports {
			println!(" Replacing : {} by : {}", source, target);
		} else {
			println!(" Replacing : {:.<61} by : {}", format!("{} ", source), target);
		}
	}
}
