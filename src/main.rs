use anyhow::{bail, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use home_exercises::{
    are_equal, compare, EquivalenceError, EquivalenceOptions, NumberFormat, NumberValidator,
    Person, Rejection,
};

#[derive(Parser)]
#[command(name = "home-exercises")]
#[command(version)]
#[command(about = "Validate fixed-point numbers and compare person records", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check values against a number format N(m.k)
    Check(CheckArgs),
    /// Compare two person records stored as JSON
    Compare(CompareArgs),
}

#[derive(Args)]
struct CheckArgs {
    /// Maximum digits, sign included
    #[arg(short, long, env = "NUMBER_PRECISION", allow_negative_numbers = true)]
    precision: Option<i64>,

    /// Maximum fraction digits
    #[arg(short, long, env = "NUMBER_SCALE", default_value_t = 0, allow_negative_numbers = true)]
    scale: i64,

    /// Reject values with a leading minus
    #[arg(long, env = "NUMBER_ONLY_POSITIVE")]
    only_positive: bool,

    /// Format in N(m.k) notation, instead of --precision/--scale
    #[arg(short, long, value_name = "NOTATION", conflicts_with_all = ["precision", "scale"])]
    format: Option<NumberFormat>,

    /// CSV file with a `value` column
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Print results as a JSON array
    #[arg(long)]
    json: bool,

    /// Values to check
    #[arg(allow_hyphen_values = true)]
    values: Vec<String>,
}

#[derive(Args)]
struct CompareArgs {
    /// Actual record (JSON)
    actual: PathBuf,

    /// Expected record (JSON)
    expected: PathBuf,

    /// Member path to skip, e.g. `parent.id` (repeatable)
    #[arg(long, value_name = "PATH")]
    exclude: Vec<String>,

    /// Member name to skip at every depth (repeatable)
    #[arg(long, value_name = "NAME")]
    exclude_everywhere: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ValueRow {
    value: String,
}

#[derive(Debug, Serialize)]
struct CheckOutcome {
    value: String,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rejection: Option<Rejection>,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let all_ok = match cli.command {
        Commands::Check(args) => run_check(args)?,
        Commands::Compare(args) => run_compare(args)?,
    };

    Ok(if all_ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

// ============================================================================
// CHECK
// ============================================================================

fn run_check(args: CheckArgs) -> Result<bool> {
    let validator = build_validator(&args)?;
    info!(format = %validator.format(), only_positive = validator.format().only_positive(), "validator ready");

    let mut values = args.values;
    if let Some(path) = &args.input {
        let loaded = load_values(path)?;
        info!("Loaded {} values from {}", loaded.len(), path.display());
        values.extend(loaded);
    }

    if values.is_empty() {
        bail!("no values to check: pass VALUE arguments or --input FILE");
    }

    let outcomes: Vec<CheckOutcome> = values
        .into_iter()
        .map(|value| match validator.check(Some(&value)) {
            Ok(parsed) => {
                debug!(
                    %value,
                    sign = ?parsed.sign.map(|s| s.as_char()),
                    digits = parsed.digit_count(),
                    "value accepted"
                );
                CheckOutcome {
                    value,
                    valid: true,
                    reason: None,
                    rejection: None,
                }
            }
            Err(rejection) => CheckOutcome {
                value,
                valid: false,
                reason: Some(rejection.to_string()),
                rejection: Some(rejection),
            },
        })
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcomes)?);
    } else {
        for outcome in &outcomes {
            match &outcome.reason {
                None => println!("{}\tvalid", outcome.value),
                Some(reason) => println!("{}\tinvalid ({})", outcome.value, reason),
            }
        }
    }

    let invalid = outcomes.iter().filter(|o| !o.valid).count();
    info!("{} of {} values valid", outcomes.len() - invalid, outcomes.len());

    Ok(invalid == 0)
}

fn build_validator(args: &CheckArgs) -> Result<NumberValidator> {
    let format = match (args.format, args.precision) {
        (Some(format), _) => format,
        (None, Some(precision)) => NumberFormat::new(precision, args.scale, false)
            .context("invalid number format")?,
        (None, None) => bail!("either --precision or --format is required"),
    };

    let format = if args.only_positive {
        format.positive_only()
    } else {
        format
    };

    Ok(NumberValidator::from_format(format))
}

fn load_values(path: &Path) -> Result<Vec<String>> {
    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open CSV file {}", path.display()))?;

    let mut values = Vec::new();
    for result in rdr.deserialize() {
        let row: ValueRow = result.context("Failed to deserialize value row")?;
        values.push(row.value);
    }

    Ok(values)
}

// ============================================================================
// COMPARE
// ============================================================================

fn run_compare(args: CompareArgs) -> Result<bool> {
    let actual = load_person(&args.actual)?;
    let expected = load_person(&args.expected)?;

    let custom = !args.exclude.is_empty() || !args.exclude_everywhere.is_empty();
    let options = if custom {
        let mut options = EquivalenceOptions::new();
        for path in args.exclude {
            options = options.exclude(path);
        }
        for name in args.exclude_everywhere {
            options = options.exclude_member_everywhere(name);
        }
        options
    } else {
        Person::equivalence_options()
    };

    let equivalence = match compare(&actual, &expected, &options) {
        Ok(()) => None,
        Err(EquivalenceError::Different(difference)) => Some(difference),
        Err(err) => return Err(err.into()),
    };

    // Without custom exclusions the field-wise comparer decides
    let equal = if custom {
        equivalence.is_none()
    } else {
        let equal = are_equal(Some(&actual), Some(&expected));
        debug!(equal, "field-wise comparison");
        equal
    };

    if equal {
        println!("equal");
    } else {
        match &equivalence {
            Some(difference) => println!("not equal: {}", difference),
            None => println!("not equal"),
        }
    }

    Ok(equal)
}

fn load_person(path: &Path) -> Result<Person> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let person = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse person record from {}", path.display()))?;
    Ok(person)
}
