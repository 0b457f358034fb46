use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `modguard.toml` schema v1.
///
/// This is a *user-facing* config model: every field is optional and falls
/// back to the selected profile.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ModguardConfigV1 {
    /// Optional schema string for tooling (`modguard.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// `default`, `strict` or `relaxed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// Configuration file extension without the dot (default `tf`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,

    /// Glob patterns for file names to leave out of the scan.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,

    /// File names that must exist. The extension is appended when missing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_files: Option<Vec<String>>,

    /// Entries whose absence warns. A trailing `/` names a directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_files: Option<Vec<String>>,

    /// File holding the `terraform` settings block (default `versions`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub versions_file: Option<String>,

    /// README checked for expected sections (default `README.md`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readme_file: Option<String>,

    /// Sections the README must have. Replaces the default usage and
    /// requirements sections when set; an empty list turns the rule into a
    /// no-op.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readme_sections: Option<Vec<ReadmeSectionConfig>>,

    /// Markdown report file name written by `check --write-markdown`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_file: Option<String>,

    /// Regex every declaration name must match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub naming_pattern: Option<String>,

    /// Resource type prefixes classified as external when not declared locally.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_namespaces: Option<Vec<String>>,

    /// Providers that never need a version constraint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub builtin_providers: Option<Vec<String>>,

    /// Map of check_id -> config.
    #[serde(default)]
    pub checks: BTreeMap<String, CheckConfig>,

    /// Type-pattern table entries. A known name replaces the builtin entry,
    /// a new name is appended.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_patterns: Vec<TypePatternConfig>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CheckConfig {
    /// Override preset enable/disable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Override preset severity: `warn` or `fail`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,

    /// Glob patterns matched against verdict targets (e.g. `var.legacy_*`).
    #[serde(default)]
    pub allow: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TypePatternConfig {
    pub name: String,

    /// Words in a variable name that select this category.
    #[serde(default)]
    pub name_keys: Vec<String>,

    /// Regex tried against the literal default value when no name key matches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_pattern: Option<String>,

    /// Regex a validation condition must match to count as plausible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plausible: Option<String>,

    /// Type constraints that satisfy the category without a validation block.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accepted_types: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReadmeSectionConfig {
    pub name: String,

    /// Heading words that satisfy the section; defaults to the name itself.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
}
