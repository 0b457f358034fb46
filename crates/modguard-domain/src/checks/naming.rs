use super::{CheckContext, Emitter, Violation};
use crate::model::DeclarationKind;
use modguard_types::{Location, ids};
use serde_json::json;

pub fn run(ctx: &CheckContext<'_>, emit: &mut Emitter<'_>) {
    let pattern = &ctx.cfg.naming_pattern;
    for decl in ctx.model.declarations() {
        if decl.kind == DeclarationKind::Settings {
            continue;
        }
        let address = decl.address();
        let location = Some(Location::line(&decl.file, decl.span.start));
        if pattern.is_match(&decl.name) {
            emit.pass(address, "name follows convention", location);
        } else {
            emit.violation(Violation {
                code: ids::CODE_INVALID_IDENTIFIER,
                target: address,
                message: format!(
                    "{} name '{}' does not match {}",
                    decl.kind.as_str(),
                    decl.name,
                    pattern.as_str()
                ),
                location,
                help: Some(format!(
                    "Rename to '{}' or adjust naming_pattern.",
                    suggest(&decl.name)
                )),
                data: json!({ "name": decl.name, "pattern": pattern.as_str() }),
            });
        }
    }
}

fn suggest(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            'A'..='Z' => c.to_ascii_lowercase(),
            'a'..='z' | '0'..='9' | '_' | '-' => c,
            _ => '_',
        })
        .collect()
}
