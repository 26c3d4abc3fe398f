use ledgerlens_core::{CategorySummary, Money, Transaction};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::template::TemplateError;

/// A named predicate over transaction descriptions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryRule {
    pub name: String,
    pub pattern: String,
    #[serde(default)]
    pub match_type: MatchType,
    /// Whether the category's `signed_amount` sum is reported.
    #[serde(default)]
    pub sum_amounts: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    #[default]
    Contains,
    /// Every whitespace-separated word of the pattern appears, in any order.
    AllWords,
    Regex,
}

impl std::str::FromStr for MatchType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "contains" => Ok(MatchType::Contains),
            "all_words" => Ok(MatchType::AllWords),
            "regex" => Ok(MatchType::Regex),
            other => Err(format!("Unknown match type: '{other}'")),
        }
    }
}

#[derive(Debug)]
enum Matcher {
    Contains(String),
    AllWords(Vec<String>),
    Regex(Regex),
}

impl Matcher {
    fn is_match(&self, description: &str) -> bool {
        match self {
            Matcher::Regex(re) => re.is_match(description),
            Matcher::Contains(needle) => description.to_uppercase().contains(needle.as_str()),
            Matcher::AllWords(words) => {
                let text = description.to_uppercase();
                words.iter().all(|w| text.contains(w.as_str()))
            }
        }
    }
}

/// Internal pairing of a rule with its compiled matcher.
#[derive(Debug)]
struct CompiledRule {
    rule: CategoryRule,
    matcher: Matcher,
}

/// Case-insensitive category rules, evaluated independently: a transaction
/// may belong to several categories.
#[derive(Debug)]
pub struct CategoryRuleEngine {
    rules: Vec<CompiledRule>,
}

impl CategoryRuleEngine {
    pub fn new(rules: Vec<CategoryRule>) -> Result<Self, TemplateError> {
        let rules = rules
            .into_iter()
            .map(|rule| {
                let matcher = match rule.match_type {
                    MatchType::Contains => Matcher::Contains(rule.pattern.to_uppercase()),
                    MatchType::AllWords => Matcher::AllWords(
                        rule.pattern.split_whitespace().map(str::to_uppercase).collect(),
                    ),
                    MatchType::Regex => Matcher::Regex(
                        RegexBuilder::new(&rule.pattern)
                            .case_insensitive(true)
                            .build()
                            .map_err(|source| TemplateError::InvalidPattern {
                                name: format!("category '{}'", rule.name),
                                source,
                            })?,
                    ),
                };
                Ok(CompiledRule { rule, matcher })
            })
            .collect::<Result<Vec<_>, TemplateError>>()?;
        Ok(Self { rules })
    }

    /// Names of every category the transaction falls into, in rule order.
    pub fn categories_of(&self, tx: &Transaction) -> Vec<&str> {
        self.rules
            .iter()
            .filter(|cr| cr.matcher.is_match(&tx.description))
            .map(|cr| cr.rule.name.as_str())
            .collect()
    }

    /// One summary per rule, in rule order, each preserving ledger order.
    pub fn summarize(&self, ledger: &[Transaction]) -> Vec<CategorySummary> {
        self.rules
            .iter()
            .map(|cr| {
                let transactions: Vec<Transaction> = ledger
                    .iter()
                    .filter(|tx| cr.matcher.is_match(&tx.description))
                    .cloned()
                    .collect();
                let total = cr
                    .rule
                    .sum_amounts
                    .then(|| transactions.iter().map(|t| t.signed_amount).sum::<Money>());
                CategorySummary {
                    name: cr.rule.name.clone(),
                    transactions,
                    total,
                }
            })
            .collect()
    }
}
