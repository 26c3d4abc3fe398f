use crate::template::SectionSpec;

/// Slice of `text` from the first `start` (inclusive) up to the earliest end
/// anchor found after it, or to end of text. `None` when `start` is absent.
pub fn locate<'a>(text: &'a str, start: &str, ends: &[String]) -> Option<&'a str> {
    if start.is_empty() {
        return None;
    }
    let from = text.find(start)?;
    let body_from = from + start.len();
    let to = ends
        .iter()
        .filter(|e| !e.is_empty())
        .filter_map(|e| text[body_from..].find(e.as_str()))
        .min()
        .map_or(text.len(), |offset| body_from + offset);
    Some(&text[from..to])
}

pub fn locate_section<'a>(text: &'a str, spec: &SectionSpec) -> Option<&'a str> {
    locate(text, &spec.start, &spec.end)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "header\nAccount Transactions by date\n05/01 A 1.00 2.00\n\
                       Account Transactions by type\n05/01 A 1.00\nChecks Paid\n1001 5.00";

    fn ends(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn section_runs_to_end_anchor() {
        let end = ends(&["Account Transactions by type"]);
        let s = locate(DOC, "Account Transactions by date", &end).unwrap();
        assert_eq!(s, "Account Transactions by date\n05/01 A 1.00 2.00\n");
    }

    #[test]
    fn section_runs_to_end_of_text_without_end_anchor() {
        let s = locate(DOC, "Checks Paid", &[]).unwrap();
        assert_eq!(s, "Checks Paid\n1001 5.00");
        let s = locate(DOC, "Checks Paid", &ends(&["Not Present"])).unwrap();
        assert_eq!(s, "Checks Paid\n1001 5.00");
    }

    #[test]
    fn earliest_of_several_end_anchors_wins() {
        let end = ends(&["Checks Paid", "Account Transactions by type"]);
        let s = locate(DOC, "Account Transactions by date", &end).unwrap();
        assert!(s.ends_with("2.00\n"));
    }

    #[test]
    fn end_anchor_before_start_is_ignored() {
        let text = "Checks Paid\nAccount Transactions by type\n05/02 B 3.00";
        let s = locate(text, "Account Transactions by type", &ends(&["Checks Paid"])).unwrap();
        assert_eq!(s, "Account Transactions by type\n05/02 B 3.00");
    }

    #[test]
    fn absent_start_anchor() {
        assert_eq!(locate(DOC, "Account Summary", &[]), None);
    }

    #[test]
    fn anchors_are_case_sensitive() {
        assert_eq!(locate(DOC, "account transactions by date", &[]), None);
    }

    #[test]
    fn empty_start_anchor_never_matches() {
        assert_eq!(locate(DOC, "", &[]), None);
    }
}
