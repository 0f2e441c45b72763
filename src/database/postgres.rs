use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::PgPool;

use crate::database::graph::Entity;
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::query_builder::{bind_param_query, bind_param_query_scalar, select_list};
use crate::database::record::Record;
use crate::database::storage::{Storage, StorageError};
use crate::filter::Filter;

/// Postgres-backed store. Uniqueness and foreign keys are also enforced by the schema in `migrations/`.
#[derive(Clone)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_rows(&self, entity: Entity, filter: &Filter, limit: Option<i64>) -> Result<Vec<Record>, StorageError> {
        let where_sql = filter.to_where_sql(entity)?;
        let limit_clause = limit.map(|n| format!(" LIMIT {}", n)).unwrap_or_default();
        let sql = format!(
            "SELECT row_to_json(t) AS row FROM (SELECT {} FROM \"{}\" WHERE {} ORDER BY \"id\"{}) t",
            select_list(entity),
            entity.table(),
            where_sql.query,
            limit_clause
        );

        let mut q = sqlx::query_scalar::<_, Value>(&sql);
        for p in where_sql.params.iter() {
            q = bind_param_query_scalar(q, p);
        }
        let rows = q.fetch_all(&self.pool).await.map_err(|e| map_sqlx_error(entity, e))?;
        rows.into_iter()
            .map(|row| Record::from_row(row).map_err(StorageError::from))
            .collect()
    }

    /// Keep only declared columns, in declaration order
    fn writable_columns(entity: Entity, fields: &Map<String, Value>) -> Vec<(&'static str, &'static str, Value)> {
        entity
            .fields()
            .iter()
            .filter_map(|def| {
                fields
                    .get(def.name)
                    .map(|value| (def.name, def.kind.sql_cast(), value.clone()))
            })
            .collect()
    }
}

fn map_sqlx_error(entity: Entity, err: sqlx::Error) -> StorageError {
    if let sqlx::Error::Database(db) = &err {
        let constraint = db.constraint().unwrap_or_default().to_string();
        match db.code().as_deref() {
            Some("23505") => return StorageError::UniqueViolation { entity, constraint },
            Some("23503") => return StorageError::ForeignKeyViolation { entity, constraint },
            _ => {}
        }
    }
    StorageError::Database(DatabaseError::Sqlx(err))
}

#[async_trait]
impl Storage for PgStorage {
    async fn find_by_id(&self, entity: Entity, id: i64) -> Result<Option<Record>, StorageError> {
        self.find_one(entity, &Filter::new().eq("id", id)).await
    }

    async fn find_one(&self, entity: Entity, filter: &Filter) -> Result<Option<Record>, StorageError> {
        Ok(self.fetch_rows(entity, filter, Some(1)).await?.into_iter().next())
    }

    async fn find_all(&self, entity: Entity, filter: &Filter) -> Result<Vec<Record>, StorageError> {
        self.fetch_rows(entity, filter, None).await
    }

    async fn count(&self, entity: Entity, filter: &Filter) -> Result<i64, StorageError> {
        let sql_result = filter.to_count_sql(entity)?;
        let mut q = sqlx::query_scalar::<_, i64>(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query_scalar(q, p);
        }
        q.fetch_one(&self.pool).await.map_err(|e| map_sqlx_error(entity, e))
    }

    async fn create(&self, entity: Entity, fields: Map<String, Value>) -> Result<Record, StorageError> {
        let columns = Self::writable_columns(entity, &fields);
        let insert = if columns.is_empty() {
            format!("INSERT INTO \"{}\" DEFAULT VALUES RETURNING *", entity.table())
        } else {
            let names: Vec<String> = columns.iter().map(|(name, _, _)| format!("\"{}\"", name)).collect();
            let params: Vec<String> = columns
                .iter()
                .enumerate()
                .map(|(i, (_, cast, _))| format!("${}::{}", i + 1, cast))
                .collect();
            format!(
                "INSERT INTO \"{}\" ({}) VALUES ({}) RETURNING *",
                entity.table(),
                names.join(", "),
                params.join(", ")
            )
        };
        let sql = format!(
            "WITH ins AS ({}) SELECT row_to_json(t) AS row FROM (SELECT {} FROM ins) t",
            insert,
            select_list(entity)
        );

        let values: Vec<Value> = columns.into_iter().map(|(_, _, v)| v).collect();
        let mut q = sqlx::query_scalar::<_, Value>(&sql);
        for v in values.iter() {
            q = bind_param_query_scalar(q, v);
        }
        let row = q.fetch_one(&self.pool).await.map_err(|e| map_sqlx_error(entity, e))?;
        tracing::debug!("Inserted into {}", entity.table());
        Ok(Record::from_row(row)?)
    }

    async fn update(&self, entity: Entity, id: i64, fields: Map<String, Value>) -> Result<Record, StorageError> {
        let columns = Self::writable_columns(entity, &fields);
        if columns.is_empty() {
            return self
                .find_by_id(entity, id)
                .await?
                .ok_or(StorageError::NotFound { entity, id });
        }

        let assignments: Vec<String> = columns
            .iter()
            .enumerate()
            .map(|(i, (name, cast, _))| format!("\"{}\" = ${}::{}", name, i + 1, cast))
            .collect();
        let sql = format!(
            "WITH upd AS (UPDATE \"{}\" SET {} WHERE \"id\" = ${}::bigint RETURNING *) \
             SELECT row_to_json(t) AS row FROM (SELECT {} FROM upd) t",
            entity.table(),
            assignments.join(", "),
            columns.len() + 1,
            select_list(entity)
        );

        let mut values: Vec<Value> = columns.into_iter().map(|(_, _, v)| v).collect();
        values.push(Value::from(id));
        let mut q = sqlx::query_scalar::<_, Value>(&sql);
        for v in values.iter() {
            q = bind_param_query_scalar(q, v);
        }
        let row = q
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(entity, e))?
            .ok_or(StorageError::NotFound { entity, id })?;
        Ok(Record::from_row(row)?)
    }

    async fn delete(&self, entity: Entity, id: i64) -> Result<(), StorageError> {
        let sql = format!("DELETE FROM \"{}\" WHERE \"id\" = $1::bigint", entity.table());
        let id_value = Value::from(id);
        let result = bind_param_query(sqlx::query(&sql), &id_value)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(entity, e))?;
        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound { entity, id });
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StorageError> {
        DatabaseManager::health_check(&self.pool).await?;
        Ok(())
    }
}
