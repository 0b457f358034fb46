use super::{CheckContext, Emitter, Violation};
use crate::model::{Declaration, DeclarationKind, literal_text};
use modguard_types::{Location, RepoPath, ids};
use regex::Regex;
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

static OBJECT_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bversion\s*=\s*"([^"\n]*)""#).expect("static regex")
});

/// Providers the module uses: resource and data type prefixes plus explicit
/// `provider` blocks, minus builtins.
fn providers_in_use(ctx: &CheckContext<'_>) -> BTreeSet<String> {
    let mut used = BTreeSet::new();
    for decl in ctx.model.declarations() {
        let name = match decl.kind {
            DeclarationKind::Resource | DeclarationKind::DataSource => decl
                .type_name
                .as_deref()
                .and_then(|t| t.split('_').next())
                .map(str::to_string),
            DeclarationKind::Provider => Some(decl.name.clone()),
            _ => None,
        };
        if let Some(name) = name
            && !name.is_empty()
            && !ctx.cfg.builtin_providers.contains(&name)
        {
            used.insert(name);
        }
    }
    used
}

/// `terraform` blocks from the versions file, or from any file when the
/// versions file was not scanned.
fn settings_blocks<'a>(ctx: &CheckContext<'a>) -> Vec<&'a Declaration> {
    let in_versions_file: Vec<_> = ctx
        .model
        .declarations_of(DeclarationKind::Settings)
        .filter(|d| d.file.as_str() == ctx.cfg.versions_file)
        .collect();
    if ctx.model.file(&ctx.cfg.versions_file).is_some() {
        return in_versions_file;
    }
    ctx.model
        .declarations_of(DeclarationKind::Settings)
        .collect()
}

/// Provider name to declared version constraint (possibly empty).
fn pinned_providers(blocks: &[&Declaration]) -> BTreeMap<String, (String, Location)> {
    let mut pinned = BTreeMap::new();
    for block in blocks {
        for required in block.body.blocks_of("required_providers") {
            for entry in &required.body.attributes {
                let value = entry.value.trim();
                let version = if value.starts_with('{') {
                    OBJECT_VERSION
                        .captures(value)
                        .map(|c| c[1].trim().to_string())
                        .unwrap_or_default()
                } else {
                    // Legacy shorthand: `aws = ">= 3.0"`.
                    literal_text(value).trim().to_string()
                };
                pinned
                    .entry(entry.name.clone())
                    .or_insert((version, Location::line(&block.file, entry.line)));
            }
        }
    }
    pinned
}

/// True when some clause of the constraint sets a minimum: `>=`, `>`, `~>`,
/// `=` or a bare version. `< 2.0` or `!= 1.3` alone leave the floor open.
pub(crate) fn has_lower_bound(constraint: &str) -> bool {
    constraint.split(',').map(str::trim).any(|clause| {
        let operand = ["~>", ">=", ">", "="]
            .iter()
            .find_map(|op| clause.strip_prefix(op))
            .unwrap_or(clause)
            .trim_start();
        let bare_or_lower = !clause.starts_with(['<', '!']);
        bare_or_lower && operand.starts_with(|c: char| c.is_ascii_digit())
    })
}

pub fn run(ctx: &CheckContext<'_>, emit: &mut Emitter<'_>) {
    let blocks = settings_blocks(ctx);
    let versions_path = RepoPath::new(&ctx.cfg.versions_file);

    let core = blocks.iter().find_map(|b| {
        let attr = b.attribute("required_version")?;
        let constraint = literal_text(&attr.value).trim().to_string();
        Some((constraint, Location::line(&b.file, attr.line)))
    });
    match core {
        Some((constraint, location)) if has_lower_bound(&constraint) => emit.pass(
            "terraform.required_version",
            format!("core version constrained: {constraint}"),
            Some(location),
        ),
        other => {
            let message = match &other {
                Some((constraint, _)) if !constraint.is_empty() => format!(
                    "required_version \"{constraint}\" sets no minimum version"
                ),
                _ => format!(
                    "{} does not declare a non-empty required_version",
                    ctx.cfg.versions_file
                ),
            };
            let location = other
                .map(|(_, l)| l)
                .or_else(|| blocks.first().map(|b| Location::line(&b.file, b.span.start)))
                .unwrap_or_else(|| Location::file(&versions_path));
            emit.violation(Violation {
                code: ids::CODE_MISSING_CORE_VERSION,
                target: "terraform.required_version".to_string(),
                message,
                location: Some(location),
                help: Some("Add `required_version = \">= 1.5.0\"` to the terraform block.".into()),
                data: json!({ "file": ctx.cfg.versions_file }),
            });
        }
    }

    let pinned = pinned_providers(&blocks);
    for provider in providers_in_use(ctx) {
        let target = format!("provider.{provider}");
        match pinned.get(&provider) {
            Some((version, location)) if has_lower_bound(version) => emit.pass(
                target,
                format!("{provider} constrained: {version}"),
                Some(location.clone()),
            ),
            found => {
                let location = found
                    .map(|(_, l)| l.clone())
                    .unwrap_or_else(|| Location::file(&versions_path));
                let reason = match found {
                    Some((version, _)) if !version.is_empty() => {
                        format!("its constraint \"{version}\" sets no minimum version")
                    }
                    Some(_) => "has no version constraint".to_string(),
                    None => "is not listed in required_providers".to_string(),
                };
                emit.violation(Violation {
                    code: ids::CODE_MISSING_PROVIDER_VERSION,
                    target: target.clone(),
                    message: format!("provider {provider} is used but {reason}"),
                    location: Some(location),
                    help: Some(format!(
                        "Add `{provider} = {{ source = \"...\", version = \">= x.y\" }}` \
                         to required_providers."
                    )),
                    data: json!({ "provider": provider }),
                });
            }
        }
    }
}
