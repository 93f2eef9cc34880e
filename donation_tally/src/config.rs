// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};

/// The header of the column holding the name of the donor.
pub const DONOR_COLUMN: &str = "Donor Name";
/// The header of the column holding the amount of the donation.
pub const AMOUNT_COLUMN: &str = "Donation Amount";

/// The number of donations listed under the latest one in the feed.
pub const DEFAULT_PREVIOUS_SHOWN: usize = 4;

/// The content of a spreadsheet cell, as handed over by the readers.
///
/// The readers are expected to map their own cell types onto this enumeration
/// and nothing more: interpreting the content is the job of the
/// [`crate::builder::TableBuilder`].
#[derive(PartialEq, Debug, Clone)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
    /// Any other content (booleans, dates, spreadsheet errors), in a printable form.
    Other(String),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

/// A currency amount, counted in cents.
///
/// Summation is exact. The display form is the one used on the dashboard:
/// `$1,200`, `$1,200.50`, `-$5`.
#[derive(Eq, PartialEq, Debug, Clone, Copy, PartialOrd, Ord, Hash, Default)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub fn from_cents(cents: i64) -> Amount {
        Amount(cents)
    }

    pub fn from_dollars(dollars: i64) -> Amount {
        Amount(dollars.saturating_mul(100))
    }

    /// Converts a spreadsheet number, rounding to the nearest cent.
    ///
    /// Returns None for NaN, infinities and values that do not fit.
    pub fn from_number(value: f64) -> Option<Amount> {
        if !value.is_finite() {
            return None;
        }
        let cents = (value * 100.0).round();
        if cents.abs() >= i64::MAX as f64 {
            return None;
        }
        Some(Amount(cents as i64))
    }

    pub fn cents(&self) -> i64 {
        self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// The amount, or zero if it is negative.
    pub fn clamp_zero(self) -> Amount {
        Amount(self.0.max(0))
    }
}

impl Add for Amount {
    type Output = Amount;
    fn add(self: Amount, rhs: Amount) -> Amount {
        Amount(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Amount) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for Amount {
    type Output = Amount;
    fn sub(self: Amount, rhs: Amount) -> Amount {
        Amount(self.0.saturating_sub(rhs.0))
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, |acc, a| acc + a)
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}${}", sign, group_thousands(abs / 100))?;
        if abs % 100 != 0 {
            write!(f, ".{:02}", abs % 100)?;
        }
        Ok(())
    }
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, c) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// One row of the donation table.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Donation {
    pub donor: String,
    pub amount: Amount,
}

impl Donation {
    pub fn new(donor: &str, amount: Amount) -> Donation {
        Donation {
            donor: donor.to_string(),
            amount,
        }
    }
}

// ******** Output data structures *********

/// The values derived from one reading of the donation table.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct DonationSummary {
    pub total: Amount,
    pub count: usize,
    /// The last row of the table, if any.
    pub latest: Option<Donation>,
    /// The rows just before the latest one, most recent first.
    pub previous: Vec<Donation>,
}

/// The two segments of the progress chart.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct Progress {
    pub donated: Amount,
    /// Never negative, even when the target is exceeded.
    pub remaining: Amount,
    pub target: Amount,
}

impl Progress {
    /// The share of the chart taken by the donated segment, between 0 and 1.
    ///
    /// The remaining segment takes the rest of the chart.
    pub fn donated_fraction(&self) -> f64 {
        let donated = self.donated.clamp_zero().cents() as f64;
        let whole = donated + self.remaining.cents() as f64;
        if whole <= 0.0 {
            0.0
        } else {
            donated / whole
        }
    }
}

/// Errors that prevent a donation table from being built.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum TallyError {
    /// A required column is not in the header.
    MissingColumn { column: String },
    /// A required column appears more than once in the header.
    DuplicateColumn { column: String },
    /// The amount of a donation is blank.
    MissingAmount { lineno: u64 },
    /// The amount of a donation is not a number.
    InvalidAmount { lineno: u64, content: String },
}

impl Error for TallyError {}

impl Display for TallyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TallyError::MissingColumn { column } => write!(f, "missing column {:?}", column),
            TallyError::DuplicateColumn { column } => {
                write!(f, "column {:?} appears more than once", column)
            }
            TallyError::MissingAmount { lineno } => {
                write!(f, "line {}: the donation amount is blank", lineno)
            }
            TallyError::InvalidAmount { lineno, content } => write!(
                f,
                "line {}: the donation amount {} is not a number",
                lineno, content
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_display() {
        assert_eq!(Amount::ZERO.to_string(), "$0");
        assert_eq!(Amount::from_dollars(200).to_string(), "$200");
        assert_eq!(Amount::from_dollars(1200).to_string(), "$1,200");
        assert_eq!(Amount::from_dollars(100000).to_string(), "$100,000");
        assert_eq!(Amount::from_dollars(1234567).to_string(), "$1,234,567");
        assert_eq!(Amount::from_cents(120050).to_string(), "$1,200.50");
        assert_eq!(Amount::from_cents(5).to_string(), "$0.05");
        assert_eq!(Amount::from_dollars(-5).to_string(), "-$5");
    }

    #[test]
    fn amount_from_number() {
        assert_eq!(Amount::from_number(100.0), Some(Amount::from_dollars(100)));
        assert_eq!(Amount::from_number(0.1 + 0.2), Some(Amount::from_cents(30)));
        assert_eq!(Amount::from_number(19.999), Some(Amount::from_dollars(20)));
        assert_eq!(Amount::from_number(f64::NAN), None);
        assert_eq!(Amount::from_number(f64::INFINITY), None);
        assert_eq!(Amount::from_number(1e300), None);
    }

    #[test]
    fn progress_fraction() {
        let p = Progress {
            donated: Amount::from_dollars(300),
            remaining: Amount::from_dollars(700),
            target: Amount::from_dollars(1000),
        };
        assert!((p.donated_fraction() - 0.3).abs() < 1e-9);

        let nothing = Progress {
            donated: Amount::ZERO,
            remaining: Amount::ZERO,
            target: Amount::ZERO,
        };
        assert_eq!(nothing.donated_fraction(), 0.0);
    }
}
