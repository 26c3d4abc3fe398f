use ledgerlens_core::{
    DocumentText, Money, ParseDiagnostics, StatementResult, StatementTotals, Transaction,
    TransactionCandidate,
};
use regex::Regex;

use crate::grammar::LineMatcher;
use crate::identity::{compile, first_match, IdentityExtractor};
use crate::reconcile::reconcile;
use crate::rules::CategoryRuleEngine;
use crate::sections::locate_section;
use crate::template::{SectionSpec, StatementTemplate, TemplateError};

/// A statement template compiled for repeated use.
///
/// Parsing never fails on content: absent sections, unparsable lines and
/// missing identity fields all degrade to empty values.
#[derive(Debug)]
pub struct StatementParser {
    sections: Vec<SectionSpec>,
    credit_keywords: Vec<String>,
    identity: IdentityExtractor,
    reported_deposits: Regex,
    rules: CategoryRuleEngine,
}

impl StatementParser {
    pub fn new(template: &StatementTemplate) -> Result<Self, TemplateError> {
        if template.sections.is_empty() {
            return Err(TemplateError::NoSections(template.name.clone()));
        }
        Ok(Self {
            sections: template.sections.clone(),
            credit_keywords: template.credit_keywords.clone(),
            identity: IdentityExtractor::new(&template.identity)?,
            reported_deposits: compile("reported_deposits", &template.reported_deposits)?,
            rules: CategoryRuleEngine::new(template.categories.clone())?,
        })
    }

    /// Parser for the built-in statement family.
    pub fn builtin() -> Self {
        Self::new(&StatementTemplate::default()).expect("built-in template must compile")
    }

    pub fn from_toml(toml_content: &str) -> Result<Self, TemplateError> {
        Self::new(&StatementTemplate::from_toml(toml_content)?)
    }

    pub fn parse(&self, document: &DocumentText) -> StatementResult {
        let text = document.as_str();
        let mut diagnostics = ParseDiagnostics::default();

        let candidates = self.candidates(text, &mut diagnostics);
        let transactions = reconcile(candidates, &mut diagnostics);
        let identity = self.identity.extract(text);
        let reported_deposits = self.reported_deposits(text, &mut diagnostics);
        let totals = StatementTotals::from_ledger(&transactions, reported_deposits);
        let categories = self.rules.summarize(&transactions);

        tracing::info!(
            transactions = transactions.len(),
            unmatched = diagnostics.unmatched_lines,
            absent_sections = diagnostics.absent_sections.len(),
            "statement parsed"
        );

        StatementResult {
            identity,
            transactions,
            categories,
            totals,
            diagnostics,
            document_digest: document.digest_hex(),
        }
    }

    /// Reconciled ledger only, without identity or aggregates.
    pub fn transactions(&self, document: &DocumentText) -> (Vec<Transaction>, ParseDiagnostics) {
        let mut diagnostics = ParseDiagnostics::default();
        let candidates = self.candidates(document.as_str(), &mut diagnostics);
        let ledger = reconcile(candidates, &mut diagnostics);
        (ledger, diagnostics)
    }

    /// Candidates from every configured section, in template then line order.
    pub fn candidates(&self, text: &str, diag: &mut ParseDiagnostics) -> Vec<TransactionCandidate> {
        let mut out = Vec::new();
        for spec in &self.sections {
            let Some(section) = locate_section(text, spec) else {
                tracing::debug!(section = %spec.kind, anchor = %spec.start, "section absent");
                diag.absent_sections.push(spec.kind);
                continue;
            };
            let matcher = LineMatcher::new(
                spec.kind,
                &spec.start,
                &spec.boilerplate,
                &self.credit_keywords,
            );
            out.extend(matcher.scan(section, diag));
        }
        out
    }

    fn reported_deposits(&self, text: &str, diag: &mut ParseDiagnostics) -> Option<Money> {
        let raw = first_match(&self.reported_deposits, text)?;
        let amount = Money::parse_us(raw);
        if amount.is_none() {
            diag.malformed_numeric += 1;
        }
        amount
    }
}
