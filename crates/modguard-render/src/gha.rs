use crate::{RenderableReport, RenderableStatus};

/// Render non-pass verdicts as GitHub Actions workflow command annotations.
///
/// Format:
/// `::{level} file={path},line={line},col={col}::{message}`
pub fn render_github_annotations(report: &RenderableReport) -> Vec<String> {
    let mut out = Vec::new();

    for v in report.sections.iter().flat_map(|s| s.verdicts.iter()) {
        let level = match v.status {
            RenderableStatus::Pass => continue,
            RenderableStatus::Warn => "warning",
            RenderableStatus::Fail => "error",
        };

        let mut meta = String::new();
        if let Some(loc) = &v.location {
            meta.push_str(&format!("file={}", escape_property(&loc.path)));
            if let Some(line) = loc.line {
                meta.push_str(&format!(",line={line}"));
            }
            if let Some(col) = loc.col {
                meta.push_str(&format!(",col={col}"));
            }
        }

        let message = escape_data(&format!(
            "[{}:{}] {}: {}",
            v.check_id, v.code, v.target, v.message
        ));

        if meta.is_empty() {
            out.push(format!("::{level}::{message}"));
        } else {
            out.push(format!("::{level} {meta}::{message}"));
        }
    }

    out
}

fn escape_data(s: &str) -> String {
    s.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(s: &str) -> String {
    escape_data(s).replace(':', "%3A").replace(',', "%2C")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_report;

    #[test]
    fn emits_only_non_pass_verdicts() {
        let lines = render_github_annotations(&sample_report());
        assert_eq!(
            lines,
            vec![
                "::warning::[structure.recommended_files:missing_recommended_file] README.md: recommended entry README.md is missing".to_string(),
                "::error file=variables.tf,line=1::[naming.convention:invalid_identifier] var.VPC_CIDR: var.VPC_CIDR does not match ^[a-z_][a-z0-9_-]*$".to_string(),
            ]
        );
    }

    #[test]
    fn escapes_workflow_command_characters() {
        let mut report = sample_report();
        let v = &mut report.sections[1].verdicts[0];
        v.message = "100%\nbroken".to_string();
        if let Some(loc) = v.location.as_mut() {
            loc.path = "a,b.tf".to_string();
            loc.col = Some(3);
        }
        let lines = render_github_annotations(&report);
        assert!(lines[1].starts_with("::error file=a%2Cb.tf,line=1,col=3::"));
        assert!(lines[1].ends_with("100%25%0Abroken"));
    }
}
