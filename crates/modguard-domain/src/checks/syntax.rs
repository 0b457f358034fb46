use super::{CheckContext, Emitter, Violation};
use modguard_types::Location;
use serde_json::json;

/// One verdict per scan anomaly; a clean file gets a single pass.
pub fn run(ctx: &CheckContext<'_>, emit: &mut Emitter<'_>) {
    for file in &ctx.model.files {
        let path = &file.source.path;
        if file.anomalies.is_empty() {
            emit.pass(path.as_str(), "delimiters balanced", Some(Location::file(path)));
            continue;
        }
        for anomaly in &file.anomalies {
            emit.violation(Violation {
                code: anomaly.kind.code(),
                target: path.as_str().to_string(),
                message: format!("{} (line {})", anomaly.detail, anomaly.line),
                location: Some(Location {
                    path: path.clone(),
                    line: Some(anomaly.line),
                    col: Some(anomaly.col),
                }),
                help: None,
                data: json!({ "line": anomaly.line, "col": anomaly.col }),
            });
        }
    }
}
