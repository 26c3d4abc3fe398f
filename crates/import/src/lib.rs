pub mod grammar;
pub mod identity;
pub mod parser;
pub mod reconcile;
pub mod rules;
pub mod sections;
pub mod template;

pub use grammar::{LineFields, LineGrammar, LineMatcher};
pub use identity::IdentityExtractor;
pub use parser::StatementParser;
pub use reconcile::{reconcile, Reconciler};
pub use rules::{CategoryRule, CategoryRuleEngine, MatchType};
pub use template::{IdentityPatterns, SectionSpec, StatementTemplate, TemplateError};
