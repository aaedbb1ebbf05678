//! cliutil: resolve report dates and tidy text from the command line.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use cliutil::daterange::{
    resolve_anchor, resolve_month_arg, resolve_range, DateRange, Frequency, ResolveOptions,
    WeekStartDay,
};
use cliutil::text::{break_long_paragraph, split_camel_case};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "cliutil",
    version,
    about = "Resolve report date windows (day/week/month) and tidy text for terminal output"
)]
struct Cli {
    /// IANA timezone that decides what "today" is
    #[arg(
        long,
        global = true,
        env = "CLIUTIL_TIMEZONE",
        default_value = "Asia/Shanghai"
    )]
    timezone: String,

    /// First day of the week
    #[arg(long, global = true, value_enum, default_value_t = WeekStart::Monday)]
    week_start: WeekStart,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum WeekStart {
    Monday,
    Sunday,
}

impl From<WeekStart> for WeekStartDay {
    fn from(value: WeekStart) -> Self {
        match value {
            WeekStart::Monday => WeekStartDay::Monday,
            WeekStart::Sunday => WeekStartDay::Sunday,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a date, a number of periods ago, or a month name to one anchor date
    Anchor {
        /// YYYY-MM-DD, a number of periods ago, or a month name (JAN..DEC)
        #[arg(allow_negative_numbers = true)]
        spec: String,

        /// day, week or month (d/w/m); anything else resolves to today
        #[arg(short, long, default_value = "day")]
        frequency: String,
    },

    /// Resolve the window of NRECORDS periods ending in the period containing DATE
    Range {
        /// End date in YYYY-MM-DD format [default: today]
        date: Option<String>,

        /// Number of periods to cover [default: --default-records]
        #[arg(allow_negative_numbers = true)]
        nrecords: Option<i64>,

        /// day, week or month (d/w/m); anything else resolves to today
        #[arg(short, long, default_value = "day")]
        frequency: String,

        /// Record count used when NRECORDS is omitted
        #[arg(long, default_value_t = 1)]
        default_records: i64,
    },

    /// Resolve a month name (JAN..DEC) or a number of months ago to the 1st of that month
    Month {
        /// Month name or months ago; empty prints nothing
        #[arg(default_value = "", allow_negative_numbers = true)]
        arg: String,
    },

    /// Split camel-case words ("PDFLoader" -> "PDF Loader")
    Camel { text: String },

    /// Hard-wrap each line of TEXT
    Wrap {
        text: String,

        /// Characters per line
        #[arg(long, default_value_t = 80)]
        width: usize,

        /// Trim each wrapped line group to this many characters (0 = no limit)
        #[arg(long, default_value_t = 0)]
        max: usize,
    },
}

#[derive(Serialize)]
struct AnchorOutput {
    anchor: String,
    frequency: Frequency,
}

#[derive(Serialize)]
struct RangeOutput {
    #[serde(flatten)]
    range: DateRange,
    nrecords: i64,
    frequency: Frequency,
}

#[derive(Serialize)]
struct MonthOutput {
    month: Option<String>,
}

#[derive(Serialize)]
struct TextOutput {
    text: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = ResolveOptions::default()
        .with_timezone(&cli.timezone)
        .context("invalid --timezone")?
        .with_week_start(cli.week_start.into());
    debug!(?options, "resolve options");

    match cli.command {
        Commands::Anchor { spec, frequency } => {
            let frequency = Frequency::parse(&frequency);
            let anchor = resolve_anchor(&spec, frequency, &options)
                .with_context(|| format!("cannot resolve anchor date from '{spec}'"))?;
            emit(
                cli.json,
                &AnchorOutput {
                    anchor: anchor.to_string(),
                    frequency,
                },
                || anchor.to_string(),
            )
        }
        Commands::Range {
            date,
            nrecords,
            frequency,
            default_records,
        } => {
            let frequency = Frequency::parse(&frequency);
            let date = match date {
                Some(date) => date,
                None => resolve_anchor("0", Frequency::Day, &options)?.to_string(),
            };
            let nrecords = nrecords.unwrap_or(default_records);
            let range = resolve_range(&date, nrecords, frequency, &options)
                .with_context(|| format!("cannot resolve date range from '{date}'"))?;
            emit(
                cli.json,
                &RangeOutput {
                    range,
                    nrecords,
                    frequency,
                },
                || range.to_string(),
            )
        }
        Commands::Month { arg } => {
            let month = resolve_month_arg(&arg, &options)
                .with_context(|| format!("cannot resolve month from '{arg}'"))?
                .map(|date| date.to_string());
            if cli.json {
                print_json(&MonthOutput { month })
            } else {
                if let Some(month) = month {
                    println!("{month}");
                }
                Ok(())
            }
        }
        Commands::Camel { text } => {
            let text = split_camel_case(&text);
            emit(cli.json, &TextOutput { text: text.clone() }, || text)
        }
        Commands::Wrap { text, width, max } => {
            let text = break_long_paragraph(&text, width, max);
            emit(cli.json, &TextOutput { text: text.clone() }, || text)
        }
    }
}

/// Print `value` as JSON, or the plain-text rendering otherwise.
fn emit<T: Serialize>(json: bool, value: &T, plain: impl FnOnce() -> String) -> Result<()> {
    if json {
        print_json(value)
    } else {
        println!("{}", plain());
        Ok(())
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{out}");
    Ok(())
}

/// Log to stderr so stdout stays clean for piping. `RUST_LOG` overrides `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose >= 2)
        .init();
}
