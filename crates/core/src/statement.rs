use serde::{Deserialize, Serialize};

use super::money::Money;
use super::transaction::{SectionKind, Transaction};

/// Customer identity read from the statement. Each field resolves on its own;
/// `None` means the pattern did not match anywhere in the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityFields {
    pub customer_name: Option<String>,
    pub account_number: Option<String>,
    pub address: Option<String>,
}

/// The transactions one category rule selected, in ledger order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub name: String,
    pub transactions: Vec<Transaction>,
    /// Sum of `signed_amount` over `transactions`, when the rule asks for one.
    pub total: Option<Money>,
}

impl CategorySummary {
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementTotals {
    /// Read straight from the statement's summary line; not derived from the ledger.
    pub reported_deposits: Option<Money>,
    /// Sum of positive (outflow) amounts.
    pub debits: Money,
    /// Sum of negative (inflow) amounts.
    pub credits: Money,
    pub net: Money,
}

impl StatementTotals {
    pub fn from_ledger(transactions: &[Transaction], reported_deposits: Option<Money>) -> Self {
        let debits: Money = transactions
            .iter()
            .map(|t| t.signed_amount)
            .filter(|a| !a.is_negative())
            .sum();
        let credits: Money = transactions
            .iter()
            .map(|t| t.signed_amount)
            .filter(|a| a.is_negative())
            .sum();
        StatementTotals {
            reported_deposits,
            debits,
            credits,
            net: debits + credits,
        }
    }
}

/// Counters for input the engine degraded on instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseDiagnostics {
    pub lines_examined: usize,
    pub boilerplate_skipped: usize,
    pub unmatched_lines: usize,
    pub malformed_numeric: usize,
    pub duplicates_dropped: usize,
    pub descriptions_merged: usize,
    pub orphans_discarded: usize,
    pub absent_sections: Vec<SectionKind>,
}

/// Everything extracted from one statement. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementResult {
    pub identity: IdentityFields,
    pub transactions: Vec<Transaction>,
    pub categories: Vec<CategorySummary>,
    pub totals: StatementTotals,
    pub diagnostics: ParseDiagnostics,
    /// SHA-256 of the joined document text.
    pub document_digest: String,
}

impl StatementResult {
    pub fn category(&self, name: &str) -> Option<&CategorySummary> {
        self.categories.iter().find(|c| c.name == name)
    }
}
