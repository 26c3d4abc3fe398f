use ledgerlens_core::{DocumentText, Money, PageText};
use ledgerlens_import::StatementParser;

const PAGE_1: &str = include_str!("fixtures/relationship_checking_p1.txt");
const PAGE_2: &str = include_str!("fixtures/relationship_checking_p2.txt");

fn document() -> DocumentText {
    DocumentText::from_pages(&[PageText::new(0, PAGE_1), PageText::new(1, PAGE_2)])
}

#[test]
fn identity_fields() {
    let result = StatementParser::builtin().parse(&document());
    assert_eq!(result.identity.customer_name.as_deref(), Some("JOHN Q. PUBLIC"));
    assert_eq!(result.identity.account_number.as_deref(), Some("000123456789"));
    assert_eq!(
        result.identity.address.as_deref(),
        Some("1234 MAPLE DRIVE, ANY CITY, USA 12345")
    );
}

#[test]
fn ledger_is_deduplicated_and_merged() {
    let result = StatementParser::builtin().parse(&document());
    let ledger = &result.transactions;

    let summary: Vec<(&str, i64)> = ledger
        .iter()
        .map(|t| (t.date.as_str(), t.signed_amount.to_cents().unwrap()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("05/01", -150_000),
            ("05/03", 6437),
            ("05/07", 10_000),
            ("05/12", 25_000),
            ("05/18", 1111),
            ("05/20", 4000),
            ("05/31", -1250),
        ]
    );

    // By-type text wins where both sections list the event.
    assert_eq!(ledger[0].description, "ACME CORP PAYROLL DIRECT DEPOSIT");
    assert_eq!(ledger[1].description, "WAL-MART STORE #1234 ANY CITY");
    // Events only in the by-date section keep their own text.
    assert_eq!(ledger[3].description, "CHECK 1001");
    assert_eq!(ledger[4].description, "P0S PURCHASE WAL MART SUPERCENTER");

    // Balances come from the by-date section and are never touched by the merge.
    assert_eq!(ledger[6].balance, Some(Money::from_cents(204_702)));
}

#[test]
fn diagnostics_account_for_dropped_input() {
    let result = StatementParser::builtin().parse(&document());
    let diag = &result.diagnostics;
    assert_eq!(diag.unmatched_lines, 1);
    assert_eq!(diag.duplicates_dropped, 1);
    assert_eq!(diag.descriptions_merged, 5);
    assert_eq!(diag.orphans_discarded, 1);
    assert_eq!(diag.boilerplate_skipped, 8);
    assert_eq!(diag.malformed_numeric, 0);
    assert!(diag.absent_sections.is_empty());
}

#[test]
fn categories_and_totals() {
    let result = StatementParser::builtin().parse(&document());

    let atm = result.category("atm_withdrawals").unwrap();
    assert_eq!(atm.len(), 2);
    assert_eq!(atm.total, Some(Money::from_cents(14_000)));

    let walmart = result.category("walmart").unwrap();
    assert_eq!(walmart.len(), 2);
    assert_eq!(walmart.total, Some(Money::from_cents(7548)));

    let totals = &result.totals;
    assert_eq!(totals.reported_deposits, Some(Money::from_cents(151_250)));
    assert_eq!(totals.debits, Money::from_cents(46_548));
    assert_eq!(totals.credits, Money::from_cents(-151_250));
    assert_eq!(totals.net, Money::from_cents(-104_702));
}

#[test]
fn reparse_is_deterministic() {
    let parser = StatementParser::builtin();
    let shuffled = DocumentText::from_pages(&[PageText::new(1, PAGE_2), PageText::new(0, PAGE_1)]);
    let a = parser.parse(&document());
    let b = parser.parse(&shuffled);
    assert_eq!(a, b);
    assert_eq!(a.document_digest, b.document_digest);
}

#[test]
fn result_serializes_to_json() {
    let result = StatementParser::builtin().parse(&document());
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["identity"]["account_number"], "000123456789");
    assert_eq!(json["transactions"].as_array().unwrap().len(), 7);
    assert_eq!(json["categories"][1]["name"], "walmart");
}
