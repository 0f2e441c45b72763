// Ring 1: Input Validation - trims text and checks declared field limits
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::database::graph::{FieldDef, FieldKind};
use crate::observer::context::ObserverContext;
use crate::observer::error::ObserverError;
use crate::observer::traits::{Observer, ObserverRing};
use crate::rules::negotiation::normalize_percentage;
use crate::types::Operation;

#[derive(Default)]
pub struct FieldRulesObserver;

#[async_trait]
impl Observer for FieldRulesObserver {
    fn name(&self) -> &'static str {
        "FieldRulesObserver"
    }

    fn ring(&self) -> ObserverRing {
        ObserverRing::InputValidation
    }

    fn applies_to_operation(&self, op: Operation) -> bool {
        matches!(op, Operation::Create | Operation::Update)
    }

    async fn execute(&self, ctx: &mut ObserverContext) -> Result<(), ObserverError> {
        for def in ctx.entity.fields() {
            let value = ctx.candidate.entry(def.name).or_insert(Value::Null);
            *value = check_field(def, value.take())?;
        }
        Ok(())
    }
}

fn check_field(def: &FieldDef, value: Value) -> Result<Value, ObserverError> {
    let value = match (def.kind, value) {
        (FieldKind::Text, Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Value::Null
            } else {
                check_length(def, trimmed)?;
                Value::String(trimmed.to_string())
            }
        }
        (FieldKind::Integer, Value::Number(n)) => {
            let is_reference = def.name.ends_with("_id");
            match n.as_i64() {
                Some(id) if is_reference && id <= 0 => {
                    return Err(ObserverError::invalid_field(def.name, "must be a positive id"))
                }
                Some(_) => Value::Number(n),
                None => return Err(ObserverError::invalid_field(def.name, "must be an integer")),
            }
        }
        (FieldKind::Decimal, value @ (Value::String(_) | Value::Number(_))) => {
            let raw = match &value {
                Value::String(s) => s.trim().to_string(),
                other => other.to_string(),
            };
            let parsed: Decimal = raw
                .parse()
                .map_err(|_| ObserverError::invalid_field(def.name, "must be a decimal number"))?;
            Value::String(normalize_percentage(parsed).to_string())
        }
        (_, value) => value,
    };

    if def.required && value.is_null() {
        return Err(ObserverError::invalid_field(def.name, "is required"));
    }
    Ok(value)
}

fn check_length(def: &FieldDef, value: &str) -> Result<(), ObserverError> {
    let len = value.chars().count();
    if let Some(min) = def.min_len.filter(|min| len < *min) {
        return Err(ObserverError::invalid_field(
            def.name,
            format!("must be at least {} characters", min),
        ));
    }
    if let Some(max) = def.max_len.filter(|max| len > *max) {
        return Err(ObserverError::invalid_field(
            def.name,
            format!("must be at most {} characters", max),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::graph::Entity;
    use serde_json::json;

    fn def(entity: Entity, name: &str) -> &'static FieldDef {
        entity.field(name).unwrap()
    }

    #[test]
    fn trims_text_and_blanks_optional_fields() {
        let name = def(Entity::Union, "name");
        assert_eq!(check_field(name, json!("  Sindicato 1 ")).unwrap(), json!("Sindicato 1"));

        let federation = def(Entity::Union, "federation");
        assert_eq!(check_field(federation, json!("   ")).unwrap(), Value::Null);
    }

    #[test]
    fn blank_required_text_is_rejected() {
        let err = check_field(def(Entity::Principal, "name"), json!("  ")).unwrap_err();
        assert_eq!(err.to_string(), "name is required");
    }

    #[test]
    fn enforces_character_limits() {
        let role = def(Entity::Role, "name");
        assert!(check_field(role, json!("ab")).is_err());
        assert!(check_field(role, json!("abc")).is_ok());

        let union_type = def(Entity::Union, "union_type");
        assert!(check_field(union_type, json!("ñ".repeat(50))).is_ok());
        assert!(check_field(union_type, json!("ñ".repeat(51))).is_err());
    }

    #[test]
    fn reference_ids_must_be_positive() {
        let err = check_field(def(Entity::Contractor, "principal_id"), json!(0)).unwrap_err();
        assert!(matches!(err, ObserverError::InvalidField { .. }));
        assert!(check_field(def(Entity::Negotiation, "total_headcount"), json!(0)).is_ok());
    }

    #[test]
    fn percentages_are_normalized() {
        let pct = def(Entity::Negotiation, "unionized_percentage");
        assert_eq!(check_field(pct, json!(33.5)).unwrap(), json!("33.50"));
        assert_eq!(check_field(pct, json!("12.345")).unwrap(), json!("12.35"));
        assert!(check_field(pct, json!("lots")).is_err());
    }

    #[test]
    fn percentages_round_before_the_range_check() {
        let pct = def(Entity::Negotiation, "unionized_percentage");
        assert_eq!(check_field(pct, json!("100.004")).unwrap(), json!("100.00"));
        assert_eq!(check_field(pct, json!("100.005")).unwrap(), json!("100.01"));
    }
}
