use super::{CheckContext, Emitter, Violation};
use crate::model::DeclarationKind;
use modguard_types::{Location, ids};
use serde_json::json;

/// Variables and outputs need a non-empty description; resources are exempt.
pub fn run(ctx: &CheckContext<'_>, emit: &mut Emitter<'_>) {
    let targets = ctx
        .model
        .declarations()
        .filter(|d| matches!(d.kind, DeclarationKind::Variable | DeclarationKind::Output));

    for decl in targets {
        let address = decl.address();
        let location = Some(Location::line(&decl.file, decl.span.start));
        if decl.description().is_some() {
            emit.pass(address, "description present", location);
            continue;
        }
        let reason = if decl.attribute("description").is_some() {
            "has an empty description"
        } else {
            "has no description"
        };
        emit.violation(Violation {
            code: ids::CODE_MISSING_DESCRIPTION,
            target: address.clone(),
            message: format!("{address} {reason}"),
            location,
            help: Some("Add a description attribute explaining the purpose.".to_string()),
            data: json!({ "kind": decl.kind.as_str() }),
        });
    }
}
