use anyhow::Context;
use modguard_render::{
    RenderableLocation, RenderableReport, RenderableSection, RenderableStatus, RenderableSummary,
    RenderableVerdict,
};
use modguard_types::{ModguardReport, SCHEMA_REPORT_V1, Status, Summary, Verdict};

pub fn parse_report_json(text: &str) -> anyhow::Result<ModguardReport> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;

    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    if schema != SCHEMA_REPORT_V1 {
        anyhow::bail!("unknown report schema: {schema:?} (expected {SCHEMA_REPORT_V1})");
    }

    serde_json::from_value(value).context("parse modguard report")
}

/// Pretty JSON with a trailing newline.
pub fn serialize_report(report: &ModguardReport) -> anyhow::Result<Vec<u8>> {
    let mut data = serde_json::to_vec_pretty(report).context("serialize report")?;
    data.push(b'\n');
    Ok(data)
}

pub fn to_renderable(report: &ModguardReport) -> RenderableReport {
    RenderableReport {
        module: report.module.clone(),
        passed: report.passed,
        summary: renderable_summary(&report.summary),
        sections: report
            .categories
            .iter()
            .map(|c| RenderableSection {
                title: c.category.title().to_string(),
                summary: renderable_summary(&c.summary),
                verdicts: c.verdicts.iter().map(renderable_verdict).collect(),
            })
            .collect(),
    }
}

fn renderable_summary(s: &Summary) -> RenderableSummary {
    RenderableSummary {
        passed: s.passed,
        warned: s.warned,
        failed: s.failed,
        total: s.total,
    }
}

fn renderable_verdict(v: &Verdict) -> RenderableVerdict {
    RenderableVerdict {
        status: match v.status {
            Status::Pass => RenderableStatus::Pass,
            Status::Warn => RenderableStatus::Warn,
            Status::Fail => RenderableStatus::Fail,
        },
        check_id: v.check_id.clone(),
        code: v.code.clone(),
        target: v.target.clone(),
        message: v.message.clone(),
        location: v.location.as_ref().map(|l| RenderableLocation {
            path: l.path.as_str().to_string(),
            line: l.line,
            col: l.col,
        }),
        help: v.help.clone(),
    }
}
