use serde_json::Value;

use super::error::FilterError;
use super::filter_where::FilterWhere;
use super::types::{FilterData, SqlResult};
use crate::config::is_identifier;

pub struct Filter {
    table_name: String,
    where_data: Option<Value>,
}

impl Filter {
    pub fn new(table_name: impl Into<String>) -> Result<Self, FilterError> {
        let table_name = table_name.into();
        Self::validate_table_name(&table_name)?;
        Ok(Self {
            table_name,
            where_data: None,
        })
    }

    pub fn assign(&mut self, data: FilterData) -> Result<&mut Self, FilterError> {
        if let Some(where_clause) = data.where_clause { self.where_clause(where_clause)?; }
        Ok(self)
    }

    pub fn where_clause(&mut self, conditions: Value) -> Result<&mut Self, FilterError> {
        FilterWhere::validate(&conditions)?;
        self.where_data = Some(conditions);
        Ok(self)
    }

    pub fn to_sql(&self) -> Result<SqlResult, FilterError> {
        let where_result = self.to_where_sql(0)?;
        let query = format!("SELECT * FROM \"{}\" WHERE {}", self.table_name, where_result.query);
        Ok(SqlResult { query, params: where_result.params })
    }

    /// WHERE body only, with placeholders numbered after `offset`.
    pub fn to_where_sql(&self, offset: usize) -> Result<SqlResult, FilterError> {
        let (query, params) = match self.where_data {
            Some(ref where_data) => FilterWhere::generate(where_data, offset)?,
            None => ("1=1".to_string(), vec![]),
        };
        Ok(SqlResult { query, params })
    }

    /// `UPDATE ... SET c1 = $1, c2 = $2 WHERE ...`. The returned params cover the WHERE part
    /// only; callers bind the SET values first, in column order.
    pub fn to_update_sql(&self, columns: &[&str]) -> Result<SqlResult, FilterError> {
        if columns.is_empty() {
            return Err(FilterError::InvalidColumn("UPDATE requires at least one column".to_string()));
        }
        let mut assignments = Vec::with_capacity(columns.len());
        for (i, column) in columns.iter().enumerate() {
            Self::validate_column(column)?;
            assignments.push(format!("\"{}\" = ${}", column, i + 1));
        }

        let where_result = self.to_where_sql(columns.len())?;
        let query = format!(
            "UPDATE \"{}\" SET {} WHERE {}",
            self.table_name,
            assignments.join(", "),
            where_result.query
        );
        Ok(SqlResult { query, params: where_result.params })
    }

    pub fn to_delete_sql(&self) -> Result<SqlResult, FilterError> {
        if self.where_data.is_none() {
            return Err(FilterError::InvalidWhereClause("DELETE requires a WHERE clause".to_string()));
        }
        let where_result = self.to_where_sql(0)?;
        let query = format!("DELETE FROM \"{}\" WHERE {}", self.table_name, where_result.query);
        Ok(SqlResult { query, params: where_result.params })
    }

    fn validate_table_name(name: &str) -> Result<(), FilterError> {
        if name.is_empty() { return Err(FilterError::InvalidTableName("Table name cannot be empty".to_string())); }
        if !is_identifier(name) {
            return Err(FilterError::InvalidTableName(format!("Invalid table name format: {}", name)));
        }
        Ok(())
    }

    fn validate_column(column: &str) -> Result<(), FilterError> {
        if !is_identifier(column) {
            return Err(FilterError::InvalidColumn(format!("Invalid column name format: {}", column)));
        }
        Ok(())
    }
}
