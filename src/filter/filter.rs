use serde_json::Value;

use super::error::FilterError;
use super::filter_where::FilterWhere;
use super::types::{FilterOp, FilterWhereInfo, SqlResult};
use crate::database::graph::Entity;
use crate::database::record::Record;

/// Conjunction of column predicates used for scoped lookups and counts.
///
/// The same filter is evaluated in memory (`matches`) or rendered to a
/// parameterised SQL `WHERE` clause (`to_where_sql`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<FilterWhereInfo>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(column.into(), FilterOp::Eq, value.into());
        self
    }

    pub fn trim_eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(column.into(), FilterOp::TrimEq, value.into());
        self
    }

    /// Skip the record with this id (the record being updated)
    pub fn exclude_id(mut self, id: Option<i64>) -> Self {
        if let Some(id) = id {
            self.push("id".to_string(), FilterOp::Ne, Value::from(id));
        }
        self
    }

    fn push(&mut self, column: String, operator: FilterOp, data: Value) {
        self.conditions.push(FilterWhereInfo { column, operator, data });
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.conditions.iter().all(|condition| {
            let actual = if condition.column == "id" {
                Value::from(record.id)
            } else {
                record.fields.get(&condition.column).cloned().unwrap_or(Value::Null)
            };
            match condition.operator {
                FilterOp::Eq => values_equal(&actual, &condition.data),
                FilterOp::Ne => !values_equal(&actual, &condition.data),
                FilterOp::TrimEq => match (actual.as_str(), condition.data.as_str()) {
                    (Some(a), Some(b)) => a.trim() == b.trim(),
                    _ => values_equal(&actual, &condition.data),
                },
            }
        })
    }

    /// Render as a `WHERE` body for `entity`, numbering parameters from `$1`
    pub fn to_where_sql(&self, entity: Entity) -> Result<SqlResult, FilterError> {
        FilterWhere::generate(entity, &self.conditions)
    }

    pub fn to_count_sql(&self, entity: Entity) -> Result<SqlResult, FilterError> {
        let where_result = self.to_where_sql(entity)?;
        Ok(SqlResult {
            query: format!(
                "SELECT COUNT(*) AS count FROM \"{}\" WHERE {}",
                entity.table(),
                where_result.query
            ),
            params: where_result.params,
        })
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x == y,
            _ => x.as_f64() == y.as_f64(),
        },
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn contractor(id: i64, name: &str) -> Record {
        Record::from_row(json!({"id": id, "principal_id": 1, "name": name, "tax_id": "76.000.000-1"})).unwrap()
    }

    #[test]
    fn trim_eq_ignores_surrounding_whitespace() {
        let filter = Filter::new().eq("principal_id", 1).trim_eq("name", "Acme ");
        assert!(filter.matches(&contractor(1, "  Acme")));
        assert!(!filter.matches(&contractor(2, "Acme Ltd")));
    }

    #[test]
    fn exclude_id_skips_self() {
        let filter = Filter::new().trim_eq("name", "Acme").exclude_id(Some(1));
        assert!(!filter.matches(&contractor(1, "Acme")));
        assert!(filter.matches(&contractor(2, "Acme")));
        assert_eq!(Filter::new().exclude_id(None), Filter::new());
    }

    #[test]
    fn eq_on_missing_column_matches_null() {
        let filter = Filter::new().eq("comments", Value::Null);
        assert!(filter.matches(&contractor(1, "Acme")));
    }

    #[test]
    fn renders_count_sql() {
        let sql = Filter::new().eq("principal_id", 4).to_count_sql(Entity::Contractor).unwrap();
        assert_eq!(
            sql.query,
            "SELECT COUNT(*) AS count FROM \"contractors\" WHERE \"principal_id\" = $1::bigint"
        );
        assert_eq!(sql.params, vec![json!(4)]);
    }
}
