//! # cliutil
//!
//! Small helpers for report-style command-line tools.
//!
//! The main piece is date range resolution: turning "a date or a number", a
//! record count and a day/week/month frequency into calendar dates, with
//! explicit week-start and timezone configuration instead of global state.
//!
//! ## Modules
//!
//! - [`daterange`] — Anchor dates, `[start, end]` windows and month arguments
//! - [`text`] — Camel-case splitting, hard wrapping, trimming with an ellipsis
//! - [`error`] — Error types

pub mod daterange;
pub mod error;
pub mod text;

pub use daterange::{
    resolve_anchor, resolve_anchor_at, resolve_month_arg, resolve_month_arg_at, resolve_range,
    resolve_range_at, DateRange, DateSpec, Frequency, ResolveOptions, WeekStartDay,
};
pub use error::{Error, Result};
pub use text::{break_long_paragraph, break_long_str, split_camel_case, trim_str};
