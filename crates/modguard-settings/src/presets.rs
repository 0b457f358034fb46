use modguard_domain::patterns::builtin_patterns;
use modguard_domain::policy::{CheckPolicy, EffectiveConfig, ReadmeSection, Severity};
use modguard_types::ids::*;
use regex::Regex;
use std::collections::BTreeMap;

pub const DEFAULT_CONFIG_FILE: &str = "modguard.toml";
pub const DEFAULT_REPORT_FILE: &str = "validation_report.md";
pub const DEFAULT_EXTENSION: &str = "tf";
pub const DEFAULT_NAMING_PATTERN: &str = r"^[a-z_][a-z0-9_-]*$";

/// Known profile names, in the order `--help` lists them.
pub const PROFILES: [&str; 3] = ["default", "strict", "relaxed"];

/// Stems of the files every module must carry; the extension is added during resolution.
pub(crate) const DEFAULT_REQUIRED_FILES: [&str; 4] = ["main", "variables", "outputs", "versions"];
pub(crate) const DEFAULT_RECOMMENDED_FILES: [&str; 3] = ["README.md", "examples/", ".gitignore"];
pub(crate) const DEFAULT_VERSIONS_FILE: &str = "versions";
pub(crate) const DEFAULT_README_FILE: &str = "README.md";

/// Section name and the heading words that satisfy it.
const README_SECTIONS: [(&str, &[&str]); 2] = [
    ("usage", &["usage"]),
    ("requirements", &["requirements", "prerequisites"]),
];

const PROVIDER_NAMESPACES: [&str; 15] = [
    "aws",
    "azurerm",
    "google",
    "kubernetes",
    "helm",
    "random",
    "null",
    "tls",
    "local",
    "archive",
    "http",
    "time",
    "external",
    "template",
    "cloudinit",
];

/// Preset profiles are opinionated defaults.
///
/// Keep these small and readable. Anything complex should go into repo config.
pub fn preset(profile: &str) -> anyhow::Result<EffectiveConfig> {
    let mut checks = default_checks();
    match profile {
        "default" => {}
        "strict" => {
            set_severity(&mut checks, CHECK_TYPE_PATTERN_VALIDATION, Severity::Fail);
            set_severity(&mut checks, CHECK_REFERENCE_RESOLVED, Severity::Fail);
        }
        "relaxed" => {
            set_severity(&mut checks, CHECK_NAMING_CONVENTION, Severity::Warn);
            set_severity(&mut checks, CHECK_DESCRIPTION_REQUIRED, Severity::Warn);
        }
        other => anyhow::bail!(
            "unknown profile: {other} (expected one of {})",
            PROFILES.join(", ")
        ),
    }

    Ok(EffectiveConfig {
        profile: profile.to_string(),
        checks,
        required_files: DEFAULT_REQUIRED_FILES.map(String::from).to_vec(),
        recommended_files: DEFAULT_RECOMMENDED_FILES.map(String::from).to_vec(),
        versions_file: DEFAULT_VERSIONS_FILE.to_string(),
        readme_file: DEFAULT_README_FILE.to_string(),
        readme_sections: README_SECTIONS
            .iter()
            .map(|(name, keywords)| ReadmeSection::new(name, keywords))
            .collect(),
        naming_pattern: Regex::new(DEFAULT_NAMING_PATTERN)?,
        provider_namespaces: PROVIDER_NAMESPACES.map(String::from).to_vec(),
        builtin_providers: vec!["terraform".to_string()],
        type_patterns: builtin_patterns(),
    })
}

fn set_severity(checks: &mut BTreeMap<String, CheckPolicy>, check_id: &str, severity: Severity) {
    if let Some(policy) = checks.get_mut(check_id) {
        policy.severity = severity;
    }
}

fn default_checks() -> BTreeMap<String, CheckPolicy> {
    let mut m = BTreeMap::new();

    for id in [
        CHECK_STRUCTURE_REQUIRED_FILES,
        CHECK_STRUCTURE_SYNTAX,
        CHECK_NAMING_CONVENTION,
        CHECK_NAMING_DUPLICATES,
        CHECK_DESCRIPTION_REQUIRED,
        CHECK_VERSION_CONSTRAINTS,
        CHECK_OUTPUT_VALUE,
    ] {
        m.insert(id.to_string(), CheckPolicy::enabled(Severity::Fail));
    }

    // Best practices rather than correctness; never fail a default run.
    for id in [
        CHECK_STRUCTURE_RECOMMENDED_FILES,
        CHECK_STRUCTURE_README_SECTIONS,
        CHECK_TYPE_PATTERN_VALIDATION,
        CHECK_REFERENCE_RESOLVED,
        CHECK_REFERENCE_UNUSED_VARIABLES,
    ] {
        m.insert(id.to_string(), CheckPolicy::enabled(Severity::Warn));
    }

    m
}
