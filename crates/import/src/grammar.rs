use std::sync::OnceLock;

use ledgerlens_core::{Flow, Money, ParseDiagnostics, SectionKind, TransactionCandidate};
use regex::{Captures, Regex};

// ── Line grammars ────────────────────────────────────────────────────────────

const DATE: &str = r"(?P<date>\d{2}/\d{2})";
const DESC: &str = r"(?P<desc>.*?)";
const AMOUNT: &str = r"(?P<amount>-?\$?[\d,]*\.?\d{1,2})";
const BALANCE: &str = r"(?P<balance>-?\$?[\d,]*\.?\d{1,2})";

fn by_date_re() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| {
        Regex::new(&format!(r"{DATE}\s+{DESC}\s+{AMOUNT}\s+{BALANCE}$")).expect("invalid regex")
    })
}

fn by_type_re() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| Regex::new(&format!(r"{DATE}\s+{DESC}\s+{AMOUNT}$")).expect("invalid regex"))
}

/// Named fields captured from one statement line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineFields<'a> {
    pub date: &'a str,
    pub description: &'a str,
    pub amount: &'a str,
    pub balance: Option<&'a str>,
}

/// `<MM/DD> <description> <amount> [<balance>]`, anchored at end of line.
/// The description is the shortest run that still lets the numeric tail match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineGrammar {
    kind: SectionKind,
}

impl LineGrammar {
    pub fn for_section(kind: SectionKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> SectionKind {
        self.kind
    }

    pub fn has_balance(&self) -> bool {
        self.kind == SectionKind::ByDate
    }

    pub fn match_line<'a>(&self, line: &'a str) -> Option<LineFields<'a>> {
        let re = match self.kind {
            SectionKind::ByDate => by_date_re(),
            SectionKind::ByType => by_type_re(),
        };
        let caps = re.captures(line)?;
        Some(LineFields {
            date: field(&caps, "date")?,
            description: field(&caps, "desc")?.trim(),
            amount: field(&caps, "amount")?,
            balance: if self.has_balance() { Some(field(&caps, "balance")?) } else { None },
        })
    }
}

fn field<'a>(caps: &Captures<'a>, name: &str) -> Option<&'a str> {
    caps.name(name).map(|m| m.as_str())
}

// ── Section matcher ──────────────────────────────────────────────────────────

/// Turns one section's text into candidates: skips blank and boilerplate
/// lines, applies the section grammar, classifies credit vs. debit.
pub struct LineMatcher<'t> {
    grammar: LineGrammar,
    title: &'t str,
    boilerplate: &'t [String],
    credit_keywords: &'t [String],
}

impl<'t> LineMatcher<'t> {
    pub fn new(
        kind: SectionKind,
        title: &'t str,
        boilerplate: &'t [String],
        credit_keywords: &'t [String],
    ) -> Self {
        Self {
            grammar: LineGrammar::for_section(kind),
            title,
            boilerplate,
            credit_keywords,
        }
    }

    fn is_boilerplate(&self, line: &str) -> bool {
        (!self.title.is_empty() && line.contains(self.title))
            || self
                .boilerplate
                .iter()
                .any(|marker| !marker.is_empty() && line.contains(marker.as_str()))
    }

    pub fn classify(&self, description: &str) -> Flow {
        is_credit(description, self.credit_keywords)
    }

    /// Candidates in line order. Unmatched and malformed lines are dropped and counted.
    pub fn scan(&self, section: &str, diag: &mut ParseDiagnostics) -> Vec<TransactionCandidate> {
        let mut out = Vec::new();

        for raw in section.lines() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            diag.lines_examined += 1;

            if self.is_boilerplate(line) {
                diag.boilerplate_skipped += 1;
                continue;
            }

            let Some(fields) = self.grammar.match_line(line) else {
                tracing::debug!(section = %self.grammar.kind(), line, "unmatched line");
                diag.unmatched_lines += 1;
                continue;
            };

            match self.build(fields) {
                Some(candidate) => out.push(candidate),
                None => {
                    tracing::debug!(section = %self.grammar.kind(), line, "malformed amount");
                    diag.malformed_numeric += 1;
                }
            }
        }

        out
    }

    fn build(&self, fields: LineFields<'_>) -> Option<TransactionCandidate> {
        let amount = Money::parse_us(fields.amount)?.abs();
        let balance = match fields.balance {
            Some(b) => Some(Money::parse_us(b)?),
            None => None,
        };
        Some(TransactionCandidate {
            date: fields.date.to_string(),
            raw_description: fields.description.to_string(),
            amount,
            balance,
            flow: self.classify(fields.description),
            source: self.grammar.kind(),
        })
    }
}

/// Credit when the description contains any keyword, ignoring case.
pub fn is_credit(description: &str, keywords: &[String]) -> Flow {
    let upper = description.to_uppercase();
    let credit = keywords
        .iter()
        .filter(|k| !k.is_empty())
        .any(|k| upper.contains(&k.to_uppercase()));
    if credit {
        Flow::Credit
    } else {
        Flow::Debit
    }
}
