use crate::model::{ModguardConfigV1, ReadmeSectionConfig, TypePatternConfig};
use crate::presets::{self, DEFAULT_EXTENSION, DEFAULT_REPORT_FILE};
use anyhow::Context;
use globset::Glob;
use modguard_domain::patterns::TypePattern;
use modguard_domain::policy::{EffectiveConfig, ReadmeSection, Severity};
use regex::Regex;

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    /// Replaces the configured required-files set when non-empty.
    pub required_files: Vec<String>,
    pub naming_pattern: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub effective: EffectiveConfig,
    /// Extension (without the dot) of the files to scan.
    pub extension: String,
    /// Validated glob patterns for file names left out of discovery.
    pub exclude: Vec<String>,
    pub report_file: String,
}

pub fn resolve_config(
    cfg: ModguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    let profile = overrides
        .profile
        .clone()
        .or(cfg.profile.clone())
        .unwrap_or_else(|| "default".to_string());

    let mut effective = presets::preset(&profile)?;

    let extension = parse_extension(cfg.extension.as_deref().unwrap_or(DEFAULT_EXTENSION))?;

    // Files
    let required = if overrides.required_files.is_empty() {
        cfg.required_files.clone()
    } else {
        Some(overrides.required_files.clone())
    };
    if let Some(required) = required {
        effective.required_files = required;
    }
    effective.required_files = effective
        .required_files
        .iter()
        .map(|name| with_extension(name, &extension))
        .collect();

    if let Some(recommended) = cfg.recommended_files.clone() {
        effective.recommended_files = recommended;
    }
    let versions_file = cfg
        .versions_file
        .clone()
        .unwrap_or_else(|| effective.versions_file.clone());
    effective.versions_file = with_extension(&versions_file, &extension);

    // README
    if let Some(readme) = cfg.readme_file.clone() {
        if readme.trim().is_empty() || readme.contains(['/', '\\']) {
            anyhow::bail!("invalid readme_file: {readme:?}");
        }
        effective.readme_file = readme;
    }
    if let Some(sections) = &cfg.readme_sections {
        effective.readme_sections = sections
            .iter()
            .map(build_readme_section)
            .collect::<anyhow::Result<_>>()?;
    }

    // Naming
    if let Some(pattern) = overrides.naming_pattern.clone().or(cfg.naming_pattern.clone()) {
        effective.naming_pattern = Regex::new(&pattern)
            .with_context(|| format!("invalid naming_pattern: {pattern}"))?;
    }

    // Providers
    if let Some(namespaces) = cfg.provider_namespaces.clone() {
        effective.provider_namespaces = namespaces;
    }
    if let Some(builtin) = cfg.builtin_providers.clone() {
        effective.builtin_providers = builtin;
    }

    // per-check overrides
    let known = modguard_types::explain::all_check_ids();
    for (check_id, cc) in cfg.checks.iter() {
        if !known.contains(&check_id.as_str()) {
            anyhow::bail!(
                "unknown check id in [checks]: {check_id} (see `modguard explain <check_id>`)"
            );
        }
        let entry = effective
            .checks
            .get_mut(check_id)
            .with_context(|| format!("profile {profile} does not register {check_id}"))?;

        if let Some(enabled) = cc.enabled {
            entry.enabled = enabled;
        }
        if let Some(sev) = cc.severity.as_deref() {
            entry.severity =
                parse_severity(sev).with_context(|| format!("invalid severity for {check_id}"))?;
        }
        if !cc.allow.is_empty() {
            validate_globs(&format!("allow glob for {check_id}"), &cc.allow)?;
            entry.allow = cc.allow.clone();
        }
    }

    // Type patterns
    for entry in &cfg.type_patterns {
        effective.type_patterns.upsert(build_type_pattern(entry)?);
    }

    validate_globs("exclude glob", &cfg.exclude)?;

    Ok(ResolvedConfig {
        effective,
        extension,
        exclude: cfg.exclude,
        report_file: cfg
            .report_file
            .unwrap_or_else(|| DEFAULT_REPORT_FILE.to_string()),
    })
}

fn build_type_pattern(entry: &TypePatternConfig) -> anyhow::Result<TypePattern> {
    if entry.name.trim().is_empty() {
        anyhow::bail!("type_patterns entry is missing a name");
    }
    let keys: Vec<&str> = entry.name_keys.iter().map(String::as_str).collect();
    let types: Vec<&str> = entry.accepted_types.iter().map(String::as_str).collect();
    TypePattern::new(
        &entry.name,
        &keys,
        entry.default_pattern.as_deref(),
        entry.plausible.as_deref(),
        &types,
    )
    .with_context(|| format!("invalid regex in type pattern {}", entry.name))
}

fn build_readme_section(entry: &ReadmeSectionConfig) -> anyhow::Result<ReadmeSection> {
    let name = entry.name.trim();
    if name.is_empty() {
        anyhow::bail!("readme_sections entry is missing a name");
    }
    let keywords: Vec<&str> = if entry.keywords.is_empty() {
        vec![name]
    } else {
        entry.keywords.iter().map(|k| k.trim()).collect()
    };
    if keywords.iter().any(|k| k.is_empty()) {
        anyhow::bail!("readme section {name} has an empty keyword");
    }
    Ok(ReadmeSection::new(name, &keywords))
}

fn validate_globs(what: &str, patterns: &[String]) -> anyhow::Result<()> {
    for pattern in patterns {
        Glob::new(pattern).with_context(|| format!("invalid {what}: {pattern}"))?;
    }
    Ok(())
}

fn parse_extension(v: &str) -> anyhow::Result<String> {
    let ext = v.trim().trim_start_matches('.');
    if ext.is_empty() || ext.contains(['/', '\\']) {
        anyhow::bail!("invalid extension: {v:?}");
    }
    Ok(ext.to_string())
}

/// `main` becomes `main.tf`; names that already carry an extension are kept.
fn with_extension(name: &str, extension: &str) -> String {
    if name.contains('.') {
        name.to_string()
    } else {
        format!("{name}.{extension}")
    }
}

fn parse_severity(v: &str) -> anyhow::Result<Severity> {
    match v {
        "warn" | "warning" => Ok(Severity::Warn),
        "fail" | "error" => Ok(Severity::Fail),
        other => anyhow::bail!("unknown severity: {other} (expected warn|fail)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_config_toml;
    use modguard_types::ids::*;

    fn resolve(toml: &str) -> anyhow::Result<ResolvedConfig> {
        resolve_config(parse_config_toml(toml)?, Overrides::default())
    }

    #[test]
    fn empty_config_resolves_to_defaults() {
        let r = resolve("").expect("resolve");
        assert_eq!(r.effective.profile, "default");
        assert_eq!(r.extension, "tf");
        assert_eq!(
            r.effective.required_files,
            vec!["main.tf", "variables.tf", "outputs.tf", "versions.tf"]
        );
        assert_eq!(r.effective.versions_file, "versions.tf");
        assert_eq!(r.report_file, "validation_report.md");
        assert!(r.effective.naming_pattern.is_match("vpc_cidr"));
        assert!(!r.effective.naming_pattern.is_match("VPC_CIDR"));
        assert!(!r.effective.naming_pattern.is_match("1st"));
    }

    #[test]
    fn extension_is_appended_to_bare_required_names() {
        let r = resolve(
            r#"
extension = ".hcl"
required_files = ["main", "providers.tf"]
versions_file = "terraform"
"#,
        )
        .expect("resolve");
        assert_eq!(r.extension, "hcl");
        assert_eq!(r.effective.required_files, vec!["main.hcl", "providers.tf"]);
        assert_eq!(r.effective.versions_file, "terraform.hcl");
    }

    #[test]
    fn overrides_win_over_config() {
        let cfg = parse_config_toml(
            r#"
profile = "relaxed"
naming_pattern = "^[a-z]+$"
required_files = ["main"]
"#,
        )
        .expect("parse");
        let r = resolve_config(
            cfg,
            Overrides {
                profile: Some("strict".into()),
                required_files: vec!["main".into(), "variables".into()],
                naming_pattern: Some("^x".into()),
            },
        )
        .expect("resolve");
        assert_eq!(r.effective.profile, "strict");
        assert_eq!(r.effective.required_files, vec!["main.tf", "variables.tf"]);
        assert!(r.effective.naming_pattern.is_match("xyz"));
        assert!(!r.effective.naming_pattern.is_match("abc"));
    }

    #[test]
    fn per_check_config_applies() {
        let r = resolve(
            r#"
[checks."naming.convention"]
severity = "warn"
allow = ["var.Legacy*"]

[checks."reference.unused_variables"]
enabled = false
"#,
        )
        .expect("resolve");
        let naming = &r.effective.checks[CHECK_NAMING_CONVENTION];
        assert_eq!(naming.severity, Severity::Warn);
        assert_eq!(naming.allow, vec!["var.Legacy*"]);
        assert!(r.effective.check_policy(CHECK_REFERENCE_UNUSED_VARIABLES).is_none());
    }

    #[test]
    fn type_patterns_upsert_into_table() {
        let r = resolve(
            r#"
[[type_patterns]]
name = "cidr"
name_keys = ["network"]
plausible = "cidrhost"

[[type_patterns]]
name = "port"
name_keys = ["port"]
plausible = "(>=|<=)"
"#,
        )
        .expect("resolve");
        let table = &r.effective.type_patterns;
        let cidr = table.get("cidr").expect("cidr");
        assert_eq!(cidr.name_keys, vec!["network"]);
        assert!(table.get("port").is_some());
        assert_eq!(table.names().last(), Some("port"));
    }

    #[test]
    fn readme_sections_replace_defaults() {
        let r = resolve("").expect("resolve");
        assert_eq!(r.effective.readme_file, "README.md");
        let names: Vec<_> = r.effective.readme_sections.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["usage", "requirements"]);
        assert!(r.effective.recommended_files.contains(&".gitignore".to_string()));

        let r = resolve(
            r#"
readme_file = "README.markdown"

[[readme_sections]]
name = "Inputs"

[[readme_sections]]
name = "examples"
keywords = ["Examples", "Usage"]
"#,
        )
        .expect("resolve");
        assert_eq!(r.effective.readme_file, "README.markdown");
        assert_eq!(
            r.effective.readme_sections,
            vec![
                ReadmeSection::new("Inputs", &["inputs"]),
                ReadmeSection::new("examples", &["examples", "usage"]),
            ]
        );
    }

    #[test]
    fn invalid_values_are_rejected() {
        let cases = [
            ("profile = \"lenient\"", "unknown profile"),
            ("naming_pattern = \"[\"", "invalid naming_pattern"),
            ("exclude = [\"[\"]", "invalid exclude glob"),
            ("extension = \"\"", "invalid extension"),
            ("[checks.\"naming.nope\"]\nenabled = true", "unknown check id"),
            (
                "[checks.\"naming.convention\"]\nseverity = \"info\"",
                "invalid severity",
            ),
            (
                "[checks.\"naming.convention\"]\nallow = [\"[\"]",
                "invalid allow glob",
            ),
            (
                "[[type_patterns]]\nname = \"x\"\nplausible = \"(\"",
                "invalid regex in type pattern x",
            ),
            ("readme_file = \"docs/README.md\"", "invalid readme_file"),
            ("[[readme_sections]]\nname = \" \"", "missing a name"),
        ];
        for (toml, needle) in cases {
            let err = resolve(toml).expect_err(toml);
            assert!(
                format!("{err:#}").contains(needle),
                "{toml}: expected {needle:?}, got {err:#}"
            );
        }
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(parse_config_toml("profile = ").is_err());
    }
}
