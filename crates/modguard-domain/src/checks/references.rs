use super::{CheckContext, Emitter, Violation};
use crate::model::DeclarationKind;
use crate::resolve::Resolution;
use modguard_types::{Location, ids};
use serde_json::json;

/// Unresolved references warn; resolved and external ones pass.
pub fn unresolved(ctx: &CheckContext<'_>, emit: &mut Emitter<'_>) {
    for r in ctx.references {
        let location = Some(Location::line(&r.file, r.line));
        match &r.resolution {
            Resolution::Resolved { file, line } => emit.pass(
                r.target.address.clone(),
                format!("{} -> {file}:{line}", r.source),
                location,
            ),
            Resolution::External { namespace } => emit.pass(
                r.target.address.clone(),
                format!("{} -> external ({namespace} provider)", r.source),
                location,
            ),
            Resolution::Unresolved => emit.violation(Violation {
                code: ids::CODE_UNRESOLVED_REFERENCE,
                target: r.target.address.clone(),
                message: format!(
                    "{} references {} which is not declared in this module",
                    r.source, r.target.address
                ),
                location,
                help: Some("Declare it, fix the spelling, or allow-list the target.".to_string()),
                data: json!({ "source": r.source, "attribute": r.attribute }),
            }),
        }
    }
}

/// A variable nothing but its own validations refers to.
pub fn unused_variables(ctx: &CheckContext<'_>, emit: &mut Emitter<'_>) {
    for var in ctx.model.declarations_of(DeclarationKind::Variable) {
        let address = var.address();
        let users = ctx
            .references
            .iter()
            .filter(|r| r.target.address == address && r.source != address)
            .count();
        let location = Some(Location::line(&var.file, var.span.start));
        if users > 0 {
            emit.pass(address, format!("referenced {users} time(s)"), location);
        } else {
            emit.violation(Violation {
                code: ids::CODE_UNUSED_VARIABLE,
                target: address.clone(),
                message: format!("{address} is declared but never referenced"),
                location,
                help: Some("Remove the variable or use it.".to_string()),
                data: serde_json::Value::Null,
            });
        }
    }
}
