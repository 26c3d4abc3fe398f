use ledgerlens_core::SectionKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rules::{CategoryRule, MatchType};

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Failed to parse template TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid pattern for {name}: {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },
    #[error("Template '{0}' defines no sections")]
    NoSections(String),
}

/// One named region of the statement, bounded by literal anchors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SectionSpec {
    pub kind: SectionKind,
    /// Case-sensitive literal; the section starts at its first occurrence.
    pub start: String,
    /// The section ends at the earliest of these after `start`, else at end of text.
    #[serde(default)]
    pub end: Vec<String>,
    /// Lines containing any of these are skipped before grammar matching.
    #[serde(default)]
    pub boilerplate: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IdentityPatterns {
    pub name: String,
    pub account_number: String,
    pub address: String,
}

impl Default for IdentityPatterns {
    fn default() -> Self {
        Self {
            // FIRST M. LAST
            name: r"([A-Z]+\s+[A-Z]\.\s+[A-Z]+)".to_string(),
            account_number: r"(?i)(?:Account\s+#\s*|#)(\d+)".to_string(),
            address: r"(\d+\s+[A-Z]+\s+DRIVE[\r\n\s]+[A-Z]+\s+CITY,\s+USA\s+\d{5})".to_string(),
        }
    }
}

/// Everything that varies between statement families. Fields left out of a
/// TOML file keep the built-in values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StatementTemplate {
    pub name: String,
    pub sections: Vec<SectionSpec>,
    /// Descriptions containing any of these (case-insensitive) are inflows.
    pub credit_keywords: Vec<String>,
    pub identity: IdentityPatterns,
    /// Summary line carrying the statement's own deposit total.
    pub reported_deposits: String,
    pub categories: Vec<CategoryRule>,
}

impl Default for StatementTemplate {
    fn default() -> Self {
        Self {
            name: "relationship_checking".to_string(),
            sections: vec![
                SectionSpec {
                    kind: SectionKind::ByDate,
                    start: "Account Transactions by date".to_string(),
                    end: vec!["Account Transactions by type".to_string()],
                    boilerplate: strings(&["Date Description", "Activity for Relationship"]),
                },
                SectionSpec {
                    kind: SectionKind::ByType,
                    start: "Account Transactions by type".to_string(),
                    end: vec!["Checks Paid".to_string()],
                    boilerplate: strings(&[
                        "Date Description",
                        "Deposits and Other Credits",
                        "Withdrawals and Other Debits",
                        "Check Images for Relationship Checking",
                    ]),
                },
            ],
            credit_keywords: strings(&["CREDIT", "INTEREST", "DEPOSIT"]),
            identity: IdentityPatterns::default(),
            reported_deposits: r"Deposits and other credits\s+\$([\d,]+\.\d{2})".to_string(),
            categories: vec![
                CategoryRule {
                    name: "atm_withdrawals".to_string(),
                    pattern: "ATM WITHDRAWAL".to_string(),
                    match_type: MatchType::AllWords,
                    sum_amounts: true,
                },
                CategoryRule {
                    name: "walmart".to_string(),
                    pattern: r"\bWAL[\s-]?MART\b".to_string(),
                    match_type: MatchType::Regex,
                    sum_amounts: true,
                },
            ],
        }
    }
}

impl StatementTemplate {
    pub fn from_toml(toml_content: &str) -> Result<Self, TemplateError> {
        Ok(toml::from_str(toml_content)?)
    }

    pub fn section(&self, kind: SectionKind) -> Option<&SectionSpec> {
        self.sections.iter().find(|s| s.kind == kind)
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_anchors() {
        let t = StatementTemplate::default();
        let by_date = t.section(SectionKind::ByDate).unwrap();
        assert_eq!(by_date.start, "Account Transactions by date");
        assert_eq!(by_date.end, vec!["Account Transactions by type"]);
        let by_type = t.section(SectionKind::ByType).unwrap();
        assert_eq!(by_type.end, vec!["Checks Paid"]);
    }

    #[test]
    fn empty_toml_is_default() {
        let t = StatementTemplate::from_toml("").unwrap();
        assert_eq!(t, StatementTemplate::default());
    }

    #[test]
    fn toml_overrides_only_given_fields() {
        let toml = r#"
name = "credit_union"
credit_keywords = ["REFUND", "PAYROLL"]

[identity]
address = '(\d+\s+\w+\s+STREET)'

[[sections]]
kind = "by_date"
start = "Activity"
end = ["Summary", "Fees"]

[[categories]]
name = "coffee"
pattern = "starbucks"
match_type = "contains"
"#;
        let t = StatementTemplate::from_toml(toml).unwrap();
        assert_eq!(t.name, "credit_union");
        assert_eq!(t.credit_keywords, vec!["REFUND", "PAYROLL"]);
        assert_eq!(t.identity.address, r"(\d+\s+\w+\s+STREET)");
        // Unset identity fields keep the built-in patterns.
        assert_eq!(t.identity.name, IdentityPatterns::default().name);
        assert_eq!(t.sections.len(), 1);
        assert!(t.sections[0].boilerplate.is_empty());
        assert_eq!(t.categories[0].match_type, MatchType::Contains);
        assert!(!t.categories[0].sum_amounts);
        assert_eq!(t.reported_deposits, StatementTemplate::default().reported_deposits);
    }

    #[test]
    fn malformed_toml_errors() {
        assert!(matches!(
            StatementTemplate::from_toml("sections = 3"),
            Err(TemplateError::Toml(_))
        ));
    }
}
