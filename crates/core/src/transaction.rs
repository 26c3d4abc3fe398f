use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;

/// The statement layout a candidate line was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    /// Chronological listing with amount and running balance.
    ByDate,
    /// Listing grouped by deposit/withdrawal type, amount only.
    ByType,
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionKind::ByDate => write!(f, "by_date"),
            SectionKind::ByType => write!(f, "by_type"),
        }
    }
}

impl std::str::FromStr for SectionKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "by_date" => Ok(SectionKind::ByDate),
            "by_type" => Ok(SectionKind::ByType),
            other => Err(format!("Unknown section kind: '{other}'")),
        }
    }
}

/// Direction of money relative to the account holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flow {
    Debit,
    Credit,
}

/// One matched line, not yet deduplicated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionCandidate {
    /// `MM/DD` exactly as printed.
    pub date: String,
    pub raw_description: String,
    /// Always non-negative.
    pub amount: Money,
    pub balance: Option<Money>,
    pub flow: Flow,
    pub source: SectionKind,
}

impl TransactionCandidate {
    /// Debits keep the magnitude, credits are negated.
    pub fn signed_amount(&self) -> Money {
        match self.flow {
            Flow::Debit => self.amount,
            Flow::Credit => -self.amount,
        }
    }

    /// `None` when the amount cannot be keyed (overflows cents).
    pub fn key(&self) -> Option<LedgerKey> {
        LedgerKey::new(&self.date, self.signed_amount())
    }
}

/// Identity of an economic event across sections: date plus signed cents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LedgerKey {
    pub date: String,
    pub cents: i64,
}

impl LedgerKey {
    pub fn new(date: &str, signed_amount: Money) -> Option<Self> {
        Some(LedgerKey {
            date: date.to_string(),
            cents: signed_amount.to_cents()?,
        })
    }
}

impl fmt::Display for LedgerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.cents < 0 { "-" } else { "" };
        let abs = self.cents.unsigned_abs();
        write!(f, "{}-{}{}.{:02}", self.date, sign, abs / 100, abs % 100)
    }
}

/// Canonical reconciled record. The sign of `signed_amount` is fixed when the
/// record is created and never recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: String,
    pub description: String,
    pub signed_amount: Money,
    pub balance: Option<Money>,
}

impl Transaction {
    pub fn from_candidate(candidate: TransactionCandidate) -> Self {
        let signed_amount = candidate.signed_amount();
        Transaction {
            date: candidate.date,
            description: candidate.raw_description,
            signed_amount,
            balance: candidate.balance,
        }
    }

    pub fn key(&self) -> Option<LedgerKey> {
        LedgerKey::new(&self.date, self.signed_amount)
    }

    pub fn is_credit(&self) -> bool {
        self.signed_amount.is_negative()
    }

    /// Resolve the printed `MM/DD` against a statement year.
    pub fn posted_on(&self, year: i32) -> Option<NaiveDate> {
        let (m, d) = self.date.trim().split_once('/')?;
        NaiveDate::from_ymd_opt(year, m.parse().ok()?, d.parse().ok()?)
    }
}
