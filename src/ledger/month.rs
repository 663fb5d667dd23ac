use std::{fmt, str::FromStr};

use chrono::Datelike;
use serde::{Deserialize, Serialize};

/// One of the twelve fixed month slots of the ledger year.
///
/// Declaration order is calendar order; `Ord` and [`MonthKey::index`] rely on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MonthKey {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl MonthKey {
    pub const ALL: [MonthKey; 12] = [
        MonthKey::January,
        MonthKey::February,
        MonthKey::March,
        MonthKey::April,
        MonthKey::May,
        MonthKey::June,
        MonthKey::July,
        MonthKey::August,
        MonthKey::September,
        MonthKey::October,
        MonthKey::November,
        MonthKey::December,
    ];

    /// Zero-based position in the calendar (January is 0).
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The month immediately before this one, `None` for January.
    pub fn previous(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    pub fn is_first(self) -> bool {
        self.index() == 0
    }

    /// Months from January up to and including `self`.
    pub fn through(self) -> impl Iterator<Item = MonthKey> {
        Self::ALL.into_iter().take(self.index() + 1)
    }

    pub fn name(self) -> &'static str {
        match self {
            MonthKey::January => "January",
            MonthKey::February => "February",
            MonthKey::March => "March",
            MonthKey::April => "April",
            MonthKey::May => "May",
            MonthKey::June => "June",
            MonthKey::July => "July",
            MonthKey::August => "August",
            MonthKey::September => "September",
            MonthKey::October => "October",
            MonthKey::November => "November",
            MonthKey::December => "December",
        }
    }

    pub fn short_name(self) -> &'static str {
        &self.name()[..3]
    }

    /// Month slot containing `date`.
    pub fn of_date(date: impl Datelike) -> Self {
        Self::ALL[date.month0() as usize]
    }

    /// Month slot of the local wall clock.
    pub fn current() -> Self {
        Self::of_date(chrono::Local::now().date_naive())
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown month `{0}` (use a name like `march`, `mar`, or a number 1-12)")]
pub struct ParseMonthError(pub String);

impl FromStr for MonthKey {
    type Err = ParseMonthError;

    /// Accepts full names, three-letter abbreviations, or 1-based numbers.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        if let Ok(number) = trimmed.parse::<usize>() {
            return number
                .checked_sub(1)
                .and_then(Self::from_index)
                .ok_or_else(|| ParseMonthError(input.to_string()));
        }
        let needle = trimmed.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|month| {
                let name = month.name().to_ascii_lowercase();
                name == needle || (needle.len() == 3 && name.starts_with(&needle))
            })
            .ok_or_else(|| ParseMonthError(input.to_string()))
    }
}
