use crate::{RenderableReport, RenderableStatus};

/// The durable report written next to the module.
pub fn render_markdown(report: &RenderableReport) -> String {
    let mut out = String::new();

    out.push_str("# Module validation report\n\n");
    let s = &report.summary;
    out.push_str(&format!(
        "- Module: `{}`\n- Result: **{}**\n- Checks: {} passed, {} warnings, {} failed ({} total)\n\n",
        report.module,
        report.result_label(),
        s.passed,
        s.warned,
        s.failed,
        s.total
    ));

    out.push_str("## Summary\n\n");
    out.push_str("| Category | Passed | Warnings | Failed | Total |\n");
    out.push_str("|---|---:|---:|---:|---:|\n");
    for section in &report.sections {
        let c = &section.summary;
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            section.title, c.passed, c.warned, c.failed, c.total
        ));
    }

    for section in &report.sections {
        out.push_str(&format!("\n## {}\n\n", section.title));
        if section.verdicts.is_empty() {
            out.push_str("No checks ran.\n");
            continue;
        }

        out.push_str("| Status | Target | Message | Location |\n");
        out.push_str("|---|---|---|---|\n");
        for v in &section.verdicts {
            let location = v
                .location
                .as_ref()
                .map(|l| format!("`{}`", l.display()))
                .unwrap_or_default();
            out.push_str(&format!(
                "| {} {} | `{}` | {} | {} |\n",
                v.status.marker(),
                v.status.label(),
                escape_cell(&v.target),
                escape_cell(&v.message),
                location
            ));
        }

        let helped: Vec<_> = section
            .verdicts
            .iter()
            .filter(|v| v.status != RenderableStatus::Pass)
            .filter_map(|v| v.help.as_ref().map(|h| (v, h)))
            .collect();
        if !helped.is_empty() {
            out.push('\n');
            for (v, help) in helped {
                out.push_str(&format!("- `{}` (`{}`): {}\n", v.target, v.code, help));
            }
        }
    }

    out
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
