use super::{CheckContext, Emitter, Violation};
use crate::model::DeclarationKind;
use crate::resolve::{Resolution, targets_in};
use modguard_types::{Location, ids};
use serde_json::json;

pub fn run(ctx: &CheckContext<'_>, emit: &mut Emitter<'_>) {
    for output in ctx.model.declarations_of(DeclarationKind::Output) {
        let address = output.address();

        let Some(value) = output.attribute("value") else {
            emit.violation(Violation {
                code: ids::CODE_MISSING_VALUE,
                target: address.clone(),
                message: format!("{address} has no value"),
                location: Some(Location::line(&output.file, output.span.start)),
                help: Some("Add `value = <expression>`.".to_string()),
                data: serde_json::Value::Null,
            });
            continue;
        };

        let location = Some(Location::line(&output.file, value.line));
        let targets = targets_in(&value.expression);
        if targets.is_empty() {
            emit.violation(Violation {
                code: ids::CODE_LITERAL_VALUE,
                target: address.clone(),
                message: format!(
                    "{address} value references nothing: {}",
                    value.value.trim()
                ),
                location,
                help: Some("Point the output at something the module declares.".to_string()),
                data: json!({ "value": value.value.trim() }),
            });
            continue;
        }

        let resolutions: Vec<Resolution> =
            targets.iter().map(|t| ctx.resolver.resolve(t)).collect();
        if resolutions.iter().all(|r| *r == Resolution::Unresolved) {
            let names: Vec<&str> = targets.iter().map(|t| t.address.as_str()).collect();
            emit.violation(Violation {
                code: ids::CODE_UNRESOLVED_VALUE,
                target: address.clone(),
                message: format!(
                    "{address} value references only undeclared entities: {}",
                    names.join(", ")
                ),
                location,
                help: None,
                data: json!({ "references": names }),
            });
            continue;
        }

        emit.pass(address, "value resolves", location);
    }
}
