//! Render use cases: console, markdown and GitHub annotations from in-memory reports.

use modguard_render::RenderableReport;

pub fn render_console(report: &RenderableReport) -> String {
    modguard_render::render_console(report)
}

pub fn render_markdown(report: &RenderableReport) -> String {
    modguard_render::render_markdown(report)
}

pub fn render_annotations(report: &RenderableReport, max: usize) -> Vec<String> {
    modguard_render::render_github_annotations(report)
        .into_iter()
        .take(max)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use modguard_render::{
        RenderableLocation, RenderableSection, RenderableStatus, RenderableSummary,
        RenderableVerdict,
    };

    fn sample_report() -> RenderableReport {
        let verdict = |status, target: &str| RenderableVerdict {
            status,
            check_id: "description.required".to_string(),
            code: "missing_description".to_string(),
            target: target.to_string(),
            message: "no description".to_string(),
            location: Some(RenderableLocation {
                path: "variables.tf".to_string(),
                line: Some(1),
                col: None,
            }),
            help: None,
        };
        RenderableReport {
            module: ".".to_string(),
            passed: false,
            summary: RenderableSummary {
                passed: 0,
                warned: 1,
                failed: 1,
                total: 2,
            },
            sections: vec![RenderableSection {
                title: "Description".to_string(),
                summary: RenderableSummary {
                    passed: 0,
                    warned: 1,
                    failed: 1,
                    total: 2,
                },
                verdicts: vec![
                    verdict(RenderableStatus::Fail, "var.a"),
                    verdict(RenderableStatus::Warn, "var.b"),
                ],
            }],
        }
    }

    #[test]
    fn render_annotations_respects_max() {
        let report = sample_report();
        assert_eq!(render_annotations(&report, 1).len(), 1);
        assert_eq!(render_annotations(&report, 10).len(), 2);
    }

    #[test]
    fn render_markdown_and_console_smoke() {
        let report = sample_report();
        assert!(render_markdown(&report).contains("## Description"));
        assert!(render_console(&report).contains("Description (0/2 passed)"));
    }
}
