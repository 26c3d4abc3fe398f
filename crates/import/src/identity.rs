use std::sync::OnceLock;

use ledgerlens_core::IdentityFields;
use regex::Regex;

use crate::template::{IdentityPatterns, TemplateError};

fn re_line_breaks() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| Regex::new(r"[\r\n]+").expect("invalid regex"))
}

fn re_whitespace() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| Regex::new(r"\s+").expect("invalid regex"))
}

/// Pulls name, account number and mailing address out of the full document.
/// Each field is a single first-match lookup; one miss never affects another.
#[derive(Debug)]
pub struct IdentityExtractor {
    name: Regex,
    account_number: Regex,
    address: Regex,
}

impl IdentityExtractor {
    pub fn new(patterns: &IdentityPatterns) -> Result<Self, TemplateError> {
        Ok(Self {
            name: compile("identity.name", &patterns.name)?,
            account_number: compile("identity.account_number", &patterns.account_number)?,
            address: compile("identity.address", &patterns.address)?,
        })
    }

    pub fn extract(&self, text: &str) -> IdentityFields {
        IdentityFields {
            customer_name: self.extract_name(text),
            account_number: self.extract_account_number(text),
            address: self.extract_address(text),
        }
    }

    pub fn extract_name(&self, text: &str) -> Option<String> {
        first_match(&self.name, text).map(|s| s.trim().to_string())
    }

    pub fn extract_account_number(&self, text: &str) -> Option<String> {
        first_match(&self.account_number, text).map(str::to_string)
    }

    /// Line breaks inside the match become `, `; whitespace runs collapse.
    pub fn extract_address(&self, text: &str) -> Option<String> {
        let raw = first_match(&self.address, text)?;
        let joined = re_line_breaks().replace_all(raw, ", ");
        let collapsed = re_whitespace().replace_all(&joined, " ");
        Some(collapsed.trim().to_string())
    }
}

pub(crate) fn compile(name: &str, pattern: &str) -> Result<Regex, TemplateError> {
    Regex::new(pattern).map_err(|source| TemplateError::InvalidPattern {
        name: name.to_string(),
        source,
    })
}

/// First capture group if the pattern has one, otherwise the whole match.
pub(crate) fn first_match<'a>(re: &Regex, text: &'a str) -> Option<&'a str> {
    let caps = re.captures(text)?;
    caps.get(1).or_else(|| caps.get(0)).map(|m| m.as_str())
}
