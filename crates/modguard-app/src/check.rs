//! The `check` use case: resolve config, scan the module, evaluate rules, produce a report.

use anyhow::Context;
use camino::Utf8Path;
use modguard_repo::DiscoveryOptions;
use modguard_settings::{ModguardConfigV1, Overrides, ResolvedConfig};
use modguard_types::{ModguardReport, SCHEMA_REPORT_V1, ToolMeta};

/// Input for the check use case.
#[derive(Clone, Debug)]
pub struct CheckInput<'a> {
    /// Module directory to validate.
    pub module_dir: &'a Utf8Path,
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// CLI overrides.
    pub overrides: Overrides,
}

/// Output from the check use case.
#[derive(Clone, Debug)]
pub struct CheckOutput {
    pub report: ModguardReport,
    /// The resolved configuration used.
    pub resolved_config: ResolvedConfig,
}

/// Run the check use case.
///
/// Config problems and input-directory problems come back as errors before
/// any rule runs. Everything found inside the module is a verdict.
pub fn run_check(input: CheckInput<'_>) -> anyhow::Result<CheckOutput> {
    // Parse config (empty is allowed, defaults apply).
    let cfg = if input.config_text.trim().is_empty() {
        ModguardConfigV1::default()
    } else {
        modguard_settings::parse_config_toml(input.config_text).context("parse config")?
    };

    let resolved =
        modguard_settings::resolve_config(cfg, input.overrides).context("resolve config")?;

    let discovery = DiscoveryOptions {
        extension: resolved.extension.clone(),
        exclude: resolved.exclude.clone(),
        documents: vec![resolved.effective.readme_file.clone()],
    };
    let model = modguard_repo::build_module_model(input.module_dir, &discovery)?;

    let domain = modguard_domain::evaluate(&model, &resolved.effective);
    tracing::info!(
        profile = %resolved.effective.profile,
        passed = domain.summary.passed,
        warned = domain.summary.warned,
        failed = domain.summary.failed,
        references = domain.data.references.resolved
            + domain.data.references.unresolved
            + domain.data.references.external,
        "evaluation complete"
    );

    let report = ModguardReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: "modguard".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        module: model.root.clone(),
        passed: domain.passed,
        summary: domain.summary,
        categories: domain.categories,
        data: domain.data,
    };

    Ok(CheckOutput {
        report,
        resolved_config: resolved,
    })
}

/// Map the overall result to an exit code: 0 = pass (warnings allowed), 2 = fail.
pub fn exit_code(report: &ModguardReport) -> i32 {
    if report.passed { 0 } else { 2 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(root: &Utf8Path, name: &str, text: &str) {
        std::fs::write(root.join(name), text).expect("write file");
    }

    #[test]
    fn empty_config_uses_defaults() {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let root = Utf8Path::from_path(tmp.path()).expect("utf8 path");
        write(
            root,
            "main.tf",
            "resource \"aws_vpc\" \"main\" {\n  cidr_block = \"10.0.0.0/16\"\n}\n",
        );

        let output = run_check(CheckInput {
            module_dir: root,
            config_text: "",
            overrides: Overrides::default(),
        })
        .expect("run_check");

        assert_eq!(output.resolved_config.effective.profile, "default");
        assert_eq!(output.report.schema, SCHEMA_REPORT_V1);
        assert_eq!(output.report.tool.name, "modguard");
        assert_eq!(output.report.data.files_scanned, 1);
        assert_eq!(exit_code(&output.report), 2);
    }

    #[test]
    fn config_errors_abort_before_scanning() {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let root = Utf8Path::from_path(tmp.path()).expect("utf8 path");

        let err = run_check(CheckInput {
            module_dir: root,
            config_text: "profile = \"lenient\"\n",
            overrides: Overrides::default(),
        })
        .unwrap_err();
        assert!(format!("{err:#}").contains("unknown profile"));
    }

    #[test]
    fn missing_directory_is_an_input_error() {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let root = Utf8Path::from_path(tmp.path()).expect("utf8 path").join("missing");

        let err = run_check(CheckInput {
            module_dir: &root,
            config_text: "",
            overrides: Overrides::default(),
        })
        .unwrap_err();
        assert!(err.downcast_ref::<modguard_repo::InputError>().is_some());
    }
}
