//! Revision dates.
//!
//! Module revisions are `YYYY-MM-DD` dates. Once a date has been checked,
//! lexicographic order equals chronological order, which is what
//! [`sort_revisions`] relies on.

use chrono::NaiveDate;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::span::Span;

/// Expected length of a revision date.
pub const DATE_LEN: usize = 10;

/// A `revision` statement of a (sub)module.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Revision {
    /// The revision date, `YYYY-MM-DD`.
    pub date: String,
    /// Optional description substatement.
    pub description: Option<String>,
    /// Optional reference substatement.
    pub reference: Option<String>,
    /// Location of the statement.
    pub span: Span,
}

impl Revision {
    /// Creates a revision with only a date.
    #[must_use]
    pub fn new(date: impl Into<String>, span: Span) -> Self {
        Self {
            date: date.into(),
            description: None,
            reference: None,
            span,
        }
    }
}

/// Checks that `date` is a real calendar date written as `YYYY-MM-DD`.
///
/// `stmt` names the statement carrying the date, for the error message.
///
/// # Errors
/// Returns a validation error at `line` when the date is malformed.
pub fn check_date(date: &str, stmt: &str, line: u32) -> Result<()> {
    let bytes = date.as_bytes();
    let shape_ok = bytes.len() == DATE_LEN
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });

    if !shape_ok {
        return Err(Error::validation(
            format!("invalid value \"{date}\" of \"{stmt}\": expected YYYY-MM-DD"),
            line,
        ));
    }

    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
        Error::validation(
            format!("invalid value \"{date}\" of \"{stmt}\": not a calendar date"),
            line,
        )
    })?;

    Ok(())
}

/// Moves the newest revision to the front.
///
/// The relative order of every other revision is left exactly as given.
///
/// # Errors
/// Returns a validation error when a date is malformed or two revisions
/// share the same date, since no order can be derived in either case.
pub fn sort_revisions(revisions: &mut [Revision]) -> Result<()> {
    for rev in revisions.iter() {
        check_date(&rev.date, "revision", rev.span.line)?;
    }

    for (i, rev) in revisions.iter().enumerate() {
        if let Some(dup) = revisions[i + 1..].iter().find(|other| other.date == rev.date) {
            return Err(Error::validation(
                format!("duplicate revision \"{}\" (also on line {})", dup.date, rev.span.line),
                dup.span.line,
            ));
        }
    }

    let newest = revisions
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.date.cmp(&b.date))
        .map(|(idx, _)| idx);

    if let Some(idx) = newest {
        revisions[..=idx].rotate_right(1);
    }

    Ok(())
}

/// Returns true if `a` is a newer revision than `b`.
///
/// A module without any revision is treated as older than any dated one.
#[must_use]
pub fn is_newer(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a > b,
        (Some(_), None) => true,
        (None, _) => false,
    }
}
