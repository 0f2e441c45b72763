use anyhow::Context;
use serde_json::Value;
use std::path::Path;

use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;
use crate::database::graph::Entity;
use crate::database::models::{to_fields, Input, Negotiation};
use crate::rules::negotiation::normalize_percentage;
use crate::rules::validate_negotiation;

/// Run the negotiation consistency rules against a document without touching storage
pub fn handle(file: &Path, output_format: OutputFormat) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))?;
    let body: Value = serde_json::from_str(&raw).with_context(|| format!("{} is not valid JSON", file.display()))?;

    let fields = Input::from_json(Entity::Negotiation, body)?.into_new()?;
    let mut candidate: Negotiation = serde_json::from_value(Value::Object(fields))?;
    candidate.unionized_percentage = candidate.unionized_percentage.map(normalize_percentage);

    match validate_negotiation(candidate) {
        Ok(validated) => {
            let derived = Value::Object(to_fields(&validated)?);
            output_success(&output_format, "Negotiation is consistent", Some(derived))
        }
        Err(violation) => {
            output_error(&output_format, &violation.to_string(), Some("VALIDATION_ERROR"))?;
            Err(violation.into())
        }
    }
}
