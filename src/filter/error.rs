use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Invalid column name for {table}: {column}")]
    InvalidColumn { table: &'static str, column: String },

    #[error("Invalid operator data for {column}: {message}")]
    InvalidOperatorData { column: String, message: String },
}
