pub mod document;
pub mod money;
pub mod statement;
pub mod transaction;

pub use document::{DocumentText, PageText};
pub use money::Money;
pub use statement::{
    CategorySummary, IdentityFields, ParseDiagnostics, StatementResult, StatementTotals,
};
pub use transaction::{Flow, LedgerKey, SectionKind, Transaction, TransactionCandidate};
