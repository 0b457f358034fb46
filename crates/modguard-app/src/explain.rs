//! The `explain` use case: look up check/code documentation.

use modguard_types::explain::{self, Explanation};
use std::fmt::Write as _;

/// Output from the explain use case.
#[derive(Clone, Debug)]
pub enum ExplainOutput {
    /// Found an explanation for the identifier.
    Found(Explanation),
    /// Unknown identifier; includes available check_ids and codes.
    NotFound {
        identifier: String,
        available_check_ids: &'static [&'static str],
        available_codes: &'static [&'static str],
    },
}

/// Look up an explanation for a check_id or code.
pub fn run_explain(identifier: &str) -> ExplainOutput {
    match explain::lookup_explanation(identifier) {
        Some(exp) => ExplainOutput::Found(exp),
        None => ExplainOutput::NotFound {
            identifier: identifier.to_string(),
            available_check_ids: explain::all_check_ids(),
            available_codes: explain::all_codes(),
        },
    }
}

/// Render an explanation as a small terminal document: underlined title,
/// description, remediation, then the before/after snippets.
pub fn format_explanation(exp: &Explanation) -> String {
    let mut out = String::new();
    heading(&mut out, exp.title, '=');
    let _ = writeln!(out, "{}\n", exp.description);
    heading(&mut out, "Remediation", '-');
    let _ = writeln!(out, "{}\n", exp.remediation);
    heading(&mut out, "Examples", '-');
    snippet(&mut out, "Before (violation)", exp.examples.before);
    out.push('\n');
    snippet(&mut out, "After (fixed)", exp.examples.after);
    out
}

/// Message for an identifier the registry does not know. Check ids are
/// grouped under their category prefix.
pub fn format_not_found(identifier: &str, check_ids: &[&str], codes: &[&str]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Unknown check_id or code: {identifier}\n");
    out.push_str("Available check_ids:\n");

    let mut current: Option<&str> = None;
    for id in check_ids {
        let prefix = id.split_once('.').map_or(*id, |(p, _)| p);
        if current != Some(prefix) {
            let _ = writeln!(out, "  {prefix}:");
            current = Some(prefix);
        }
        let _ = writeln!(out, "    - {id}");
    }

    out.push_str("\nAvailable codes:\n");
    for code in codes {
        let _ = writeln!(out, "  - {code}");
    }
    out
}

fn heading(out: &mut String, title: &str, underline: char) {
    let width = title.chars().count();
    let _ = writeln!(out, "{title}\n{}\n", underline.to_string().repeat(width));
}

fn snippet(out: &mut String, label: &str, body: &str) {
    let _ = writeln!(out, "{label}:\n```hcl\n{}\n```", body.trim_end());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unwrap_found(output: ExplainOutput) -> Explanation {
        match output {
            ExplainOutput::Found(exp) => exp,
            ExplainOutput::NotFound { identifier, .. } => panic!("no explanation for {identifier}"),
        }
    }

    #[test]
    fn explain_known_check_id() {
        let output = run_explain("naming.convention");
        assert!(matches!(output, ExplainOutput::Found(_)));
    }

    #[test]
    fn explain_known_code() {
        let output = run_explain("missing_validation");
        assert!(matches!(output, ExplainOutput::Found(_)));
    }

    #[test]
    fn explain_unknown_lists_alternatives() {
        match run_explain("not_a_real_thing") {
            ExplainOutput::NotFound {
                identifier,
                available_check_ids,
                available_codes,
            } => {
                assert_eq!(identifier, "not_a_real_thing");
                assert_eq!(available_check_ids.len(), 12);
                assert!(available_codes.contains(&"duplicate_declaration"));
            }
            ExplainOutput::Found(_) => panic!("unexpected explanation"),
        }
    }

    #[test]
    fn format_explanation_output() {
        let exp = unwrap_found(run_explain("output.value"));
        let formatted = format_explanation(&exp);
        assert!(formatted.starts_with(exp.title));
        assert!(formatted.contains("Remediation"));
        assert!(formatted.contains("Examples"));
        assert!(formatted.contains("```hcl"));
    }

    #[test]
    fn format_not_found_output() {
        let formatted = format_not_found("missing", &["check.one", "check.two"], &["code_one"]);
        assert!(formatted.contains("Unknown check_id or code: missing"));
        assert!(formatted.contains("  check:\n    - check.one\n    - check.two\n"));
        assert!(formatted.contains("\nAvailable codes:\n  - code_one\n"));
    }
}
