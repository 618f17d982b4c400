//! Positional result rows.

use crate::error::{OrmError, OrmResult};
use crate::value::{FromValue, Value};

/// A result row: column names and values in select-list order.
///
/// Executors convert their driver rows into this shape so the engine can scan
/// them into records without knowing the driver.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Row {
    pub fn new(columns: Vec<String>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    /// Build a row from values only (column names unknown).
    pub fn from_values(values: Vec<Value>) -> Self {
        Self {
            columns: Vec::new(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn get(&self, idx: usize) -> Option<&Value> {
        self.values.get(idx)
    }

    /// Decode the value at `idx` into `T`.
    pub fn try_get<T: FromValue>(&self, idx: usize) -> OrmResult<T> {
        let value = self
            .values
            .get(idx)
            .cloned()
            .ok_or_else(|| self.missing(idx))?;
        T::from_value(value).map_err(|e| e.at_column(&self.column_name(idx)))
    }

    /// Move the value at `idx` out of the row, leaving NULL behind.
    pub fn take(&mut self, idx: usize) -> OrmResult<Value> {
        let missing = self.missing(idx);
        self.values
            .get_mut(idx)
            .map(std::mem::take)
            .ok_or(missing)
    }

    /// Return the values, requiring exactly `n` of them.
    pub fn expect_len(self, n: usize) -> OrmResult<Vec<Value>> {
        if self.values.len() != n {
            return Err(OrmError::decode(
                "*",
                format!("expected {n} columns, got {}", self.values.len()),
            ));
        }
        Ok(self.values)
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    fn column_name(&self, idx: usize) -> String {
        self.columns
            .get(idx)
            .cloned()
            .unwrap_or_else(|| format!("#{idx}"))
    }

    fn missing(&self, idx: usize) -> OrmError {
        OrmError::decode(
            self.column_name(idx),
            format!("row has only {} columns", self.values.len()),
        )
    }
}
