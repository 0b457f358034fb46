use super::{CheckContext, Emitter, Violation};
use crate::model::{Declaration, DeclarationKind};
use crate::patterns::TypePattern;
use crate::resolve::targets_in;
use modguard_types::{Location, ids};
use serde_json::json;

pub fn run(ctx: &CheckContext<'_>, emit: &mut Emitter<'_>) {
    for var in ctx.model.declarations_of(DeclarationKind::Variable) {
        let Some(pattern) = ctx.cfg.type_patterns.classify(var) else {
            continue;
        };
        if pattern.accepted_types.is_empty() {
            check_validation(var, pattern, emit);
        } else {
            check_type_constraint(var, pattern, emit);
        }
    }
}

fn check_type_constraint(var: &Declaration, pattern: &TypePattern, emit: &mut Emitter<'_>) {
    let address = var.address();
    let declared = var.attribute("type").map(|a| a.value.trim());
    let location = Some(Location::line(&var.file, var.span.start));

    if declared.is_some_and(|t| pattern.accepts_type(t)) {
        emit.pass(
            address,
            format!("{} variable constrained by type", pattern.name),
            location,
        );
        return;
    }

    emit.violation(Violation {
        code: ids::CODE_MISSING_TYPE_CONSTRAINT,
        target: address.clone(),
        message: format!(
            "{address} looks like a {} variable but its type is {}",
            pattern.name,
            declared.unwrap_or("not declared")
        ),
        location,
        help: Some(format!(
            "Declare `type` as one of: {}.",
            pattern.accepted_types.join(", ")
        )),
        data: json!({ "category": pattern.name, "type": declared }),
    });
}

fn check_validation(var: &Declaration, pattern: &TypePattern, emit: &mut Emitter<'_>) {
    let address = var.address();
    // Condition text with comments removed; string contents are kept so that
    // patterns such as `regex("^ami-", ...)` stay visible.
    let conditions: Vec<(&str, u32)> = var
        .validations()
        .filter_map(|v| v.body.attribute("condition"))
        .filter(|c| targets_in(&c.expression).iter().any(|t| t.address == address))
        .map(|c| (c.value.as_str(), c.line))
        .collect();

    if conditions.is_empty() {
        emit.violation(Violation {
            code: ids::CODE_MISSING_VALIDATION,
            target: address.clone(),
            message: format!(
                "{address} looks like a {} variable but has no validation referencing it",
                pattern.name
            ),
            location: Some(Location::line(&var.file, var.span.start)),
            help: Some(format!(
                "Add a validation block checking the {} format.",
                pattern.name
            )),
            data: json!({ "category": pattern.name }),
        });
        return;
    }

    let plausible = conditions.iter().find(|(text, _)| {
        pattern
            .plausible
            .as_ref()
            .is_none_or(|re| re.is_match(text))
    });

    match plausible {
        Some((_, line)) => emit.pass(
            address,
            format!("{} validation present", pattern.name),
            Some(Location::line(&var.file, *line)),
        ),
        None => {
            let (text, line) = conditions[0];
            emit.violation(Violation {
                code: ids::CODE_IMPLAUSIBLE_VALIDATION,
                target: address.clone(),
                message: format!(
                    "{address} validation does not look like a {} check: {}",
                    pattern.name,
                    text.trim()
                ),
                location: Some(Location::line(&var.file, line)),
                help: pattern
                    .plausible
                    .as_ref()
                    .map(|re| format!("Expected a condition matching /{}/.", re.as_str())),
                data: json!({ "category": pattern.name, "condition": text.trim() }),
            });
        }
    }
}
