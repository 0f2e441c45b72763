use serde_json::Value;

use super::error::FilterError;
use super::types::{FilterOp, FilterWhereInfo, SqlResult};
use crate::database::graph::{Entity, FieldKind};

pub struct FilterWhere {
    entity: Entity,
    param_values: Vec<Value>,
}

impl FilterWhere {
    pub fn generate(entity: Entity, conditions: &[FilterWhereInfo]) -> Result<SqlResult, FilterError> {
        let mut filter_where = Self { entity, param_values: vec![] };
        let mut sql_conditions = Vec::with_capacity(conditions.len());
        for condition in conditions {
            sql_conditions.push(filter_where.build_sql_condition(condition)?);
        }
        let query = if sql_conditions.is_empty() {
            "1=1".to_string()
        } else {
            sql_conditions.join(" AND ")
        };
        Ok(SqlResult { query, params: filter_where.param_values })
    }

    fn column_kind(&self, column: &str) -> Result<FieldKind, FilterError> {
        if column == "id" {
            return Ok(FieldKind::Integer);
        }
        self.entity
            .field(column)
            .map(|def| def.kind)
            .ok_or_else(|| FilterError::InvalidColumn {
                table: self.entity.table(),
                column: column.to_string(),
            })
    }

    fn param(&mut self, value: &Value, kind: FieldKind) -> String {
        self.param_values.push(value.clone());
        format!("${}::{}", self.param_values.len(), kind.sql_cast())
    }

    fn build_sql_condition(&mut self, condition: &FilterWhereInfo) -> Result<String, FilterError> {
        let kind = self.column_kind(&condition.column)?;
        let column = format!("\"{}\"", condition.column);

        match condition.operator {
            FilterOp::Eq if condition.data.is_null() => Ok(format!("{} IS NULL", column)),
            FilterOp::Eq => {
                let param = self.param(&condition.data, kind);
                Ok(format!("{} = {}", column, param))
            }
            FilterOp::Ne if condition.data.is_null() => Ok(format!("{} IS NOT NULL", column)),
            FilterOp::Ne => {
                let param = self.param(&condition.data, kind);
                Ok(format!("{} IS DISTINCT FROM {}", column, param))
            }
            FilterOp::TrimEq => {
                if kind != FieldKind::Text || !condition.data.is_string() {
                    return Err(FilterError::InvalidOperatorData {
                        column: condition.column.clone(),
                        message: "trimmed comparison requires a text column and value".to_string(),
                    });
                }
                let param = self.param(&condition.data, kind);
                Ok(format!("btrim({}) = btrim({})", column, param))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Filter;
    use serde_json::json;

    #[test]
    fn builds_scoped_uniqueness_lookup() {
        let filter = Filter::new()
            .eq("contractor_id", 1)
            .eq("union_id", 2)
            .trim_eq("contract_label", " CC-1 ")
            .exclude_id(Some(9));
        let sql = filter.to_where_sql(Entity::Negotiation).unwrap();
        assert_eq!(
            sql.query,
            "\"contractor_id\" = $1::bigint AND \"union_id\" = $2::bigint \
             AND btrim(\"contract_label\") = btrim($3::text) AND \"id\" IS DISTINCT FROM $4::bigint"
        );
        assert_eq!(sql.params, vec![json!(1), json!(2), json!(" CC-1 "), json!(9)]);
    }

    #[test]
    fn rejects_unknown_columns() {
        let err = Filter::new().eq("password_hash", "x").to_where_sql(Entity::Principal).unwrap_err();
        assert!(matches!(err, FilterError::InvalidColumn { table: "principals", .. }));
    }

    #[test]
    fn rejects_trim_on_integer_column() {
        let err = Filter::new().trim_eq("principal_id", "1").to_where_sql(Entity::Contractor).unwrap_err();
        assert!(matches!(err, FilterError::InvalidOperatorData { .. }));
    }

    #[test]
    fn empty_filter_matches_everything() {
        let sql = Filter::new().to_where_sql(Entity::Union).unwrap();
        assert_eq!(sql.query, "1=1");
        assert!(sql.params.is_empty());
    }
}
