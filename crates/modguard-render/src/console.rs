use crate::{RenderableReport, RenderableStatus};

/// Terminal listing: one section per category with a marker per verdict,
/// then the run summary.
pub fn render_console(report: &RenderableReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("modguard: validating {}\n", report.module));

    for section in &report.sections {
        out.push_str(&format!(
            "\n{} ({}/{} passed)\n",
            section.title, section.summary.passed, section.summary.total
        ));
        if section.verdicts.is_empty() {
            out.push_str("  - no checks ran\n");
            continue;
        }
        for v in &section.verdicts {
            let mut line = format!("  {} {}: {}", v.status.marker(), v.target, v.message);
            if v.status != RenderableStatus::Pass {
                line.push_str(&format!(" [{}]", v.code));
            }
            if let Some(loc) = v.location.as_ref().filter(|l| l.line.is_some()) {
                line.push_str(&format!(" ({})", loc.display()));
            }
            out.push_str(&line);
            out.push('\n');
        }
    }

    let s = &report.summary;
    out.push_str(&format!(
        "\nSummary: {} passed, {} warnings, {} failed ({} checks)\n",
        s.passed, s.warned, s.failed, s.total
    ));
    out.push_str(&format!("Result: {}\n", report.result_label()));
    out
}
