use serde_json::Value;
use sqlx::postgres::PgArguments;

use crate::database::graph::{Entity, FieldKind};

/// Column list for reads: numeric columns come back as text so decimal scale survives `row_to_json`.
pub fn select_list(entity: Entity) -> String {
    std::iter::once("\"id\"".to_string())
        .chain(entity.fields().iter().map(|def| match def.kind {
            FieldKind::Decimal => format!("\"{0}\"::text AS \"{0}\"", def.name),
            _ => format!("\"{}\"", def.name),
        }))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn bind_param_query<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &'q Value,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s),
        Value::Array(_) | Value::Object(_) => q.bind(v.clone()),
    }
}

pub fn bind_param_query_scalar<'q, O>(
    q: sqlx::query::QueryScalar<'q, sqlx::Postgres, O, PgArguments>,
    v: &'q Value,
) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, O, PgArguments> {
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s),
        Value::Array(_) | Value::Object(_) => q.bind(v.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_list_casts_decimals_to_text() {
        let cols = select_list(Entity::Negotiation);
        assert!(cols.starts_with("\"id\", \"contractor_id\""));
        assert!(cols.contains("\"unionized_percentage\"::text AS \"unionized_percentage\""));
        assert_eq!(select_list(Entity::Role), "\"id\", \"name\"");
    }
}
