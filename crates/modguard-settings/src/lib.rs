//! Config parsing and profile/preset resolution.
//!
//! This crate is intentionally IO-free: it parses and resolves configuration provided as strings.

#![forbid(unsafe_code)]

mod model;
mod presets;
mod resolve;

pub use model::{CheckConfig, ModguardConfigV1, ReadmeSectionConfig, TypePatternConfig};
pub use presets::{DEFAULT_CONFIG_FILE, DEFAULT_REPORT_FILE, PROFILES};
pub use resolve::{Overrides, ResolvedConfig};

/// Parse `modguard.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<ModguardConfigV1> {
    let cfg: ModguardConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the effective config used by the engine (profiles + overrides + per-check config).
pub fn resolve_config(
    cfg: ModguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}
