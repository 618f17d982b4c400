//! Aligned column/value sequences.

use crate::value::Value;

/// Column names and their values, kept the same length at all times.
///
/// Every transform applies the same positional edit to both sequences; a
/// length mismatch is a bug in the record's `values()` and panics.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ColumnValues {
    columns: Vec<&'static str>,
    values: Vec<Value>,
}

impl ColumnValues {
    pub(crate) fn new(columns: &'static [&'static str], values: Vec<Value>) -> Self {
        let pairs = Self {
            columns: columns.to_vec(),
            values,
        };
        pairs.check();
        pairs
    }

    /// Remove the column at `index` and its value.
    pub(crate) fn remove(&mut self, index: usize) -> (&'static str, Value) {
        let column = self.columns.remove(index);
        let value = self.values.remove(index);
        self.check();
        (column, value)
    }

    /// Keep only the named columns (descriptor order), never the one at `skip`.
    ///
    /// Returns the requested names that matched no column, in request order.
    pub(crate) fn retain_named(&mut self, names: &[&str], skip: usize) -> Vec<String> {
        let mut unexpected: Vec<String> = Vec::new();
        for name in names {
            let known = self.columns.iter().any(|c| c == name);
            if !known && !unexpected.iter().any(|u| u == name) {
                unexpected.push((*name).to_string());
            }
        }

        let keep: Vec<bool> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| i != skip && names.iter().any(|n| n == c))
            .collect();
        let mut flags = keep.iter();
        self.columns.retain(|_| flags.next().copied().unwrap_or(false));
        let mut flags = keep.iter();
        self.values.retain(|_| flags.next().copied().unwrap_or(false));
        self.check();
        unexpected
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub(crate) fn columns(&self) -> &[&'static str] {
        &self.columns
    }

    pub(crate) fn into_values(self) -> Vec<Value> {
        self.values
    }

    fn check(&self) {
        assert_eq!(
            self.columns.len(),
            self.values.len(),
            "column/value length mismatch: values() must follow the descriptor's columns"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLUMNS: &[&str] = &["id", "name", "email"];

    fn sample() -> ColumnValues {
        ColumnValues::new(
            COLUMNS,
            vec![Value::Int(0), Value::from("ann"), Value::from("a@x")],
        )
    }

    #[test]
    fn remove_keeps_pairs_aligned() {
        let mut pairs = sample();
        let (col, value) = pairs.remove(0);
        assert_eq!(col, "id");
        assert_eq!(value, Value::Int(0));
        assert_eq!(pairs.columns(), &["name", "email"]);
        assert_eq!(pairs.columns().len(), 2);
        assert_eq!(
            pairs.into_values(),
            vec![Value::from("ann"), Value::from("a@x")]
        );
    }

    #[test]
    fn remove_from_the_middle() {
        let mut pairs = sample();
        pairs.remove(1);
        assert_eq!(pairs.columns(), &["id", "email"]);
        assert_eq!(pairs.into_values(), vec![Value::Int(0), Value::from("a@x")]);
    }

    #[test]
    fn retain_named_follows_descriptor_order() {
        let mut pairs = sample();
        let unexpected = pairs.retain_named(&["email", "name"], 0);
        assert!(unexpected.is_empty());
        assert_eq!(pairs.columns(), &["name", "email"]);
        assert_eq!(
            pairs.into_values(),
            vec![Value::from("ann"), Value::from("a@x")]
        );
    }

    #[test]
    fn retain_named_skips_primary_key() {
        let mut pairs = sample();
        let unexpected = pairs.retain_named(&["id"], 0);
        assert!(unexpected.is_empty());
        assert!(pairs.is_empty());
    }

    #[test]
    fn retain_named_reports_unknown_once() {
        let mut pairs = sample();
        let unexpected = pairs.retain_named(&["nope", "name", "nope", "zzz"], 0);
        assert_eq!(unexpected, vec!["nope", "zzz"]);
        assert_eq!(pairs.columns(), &["name"]);
    }

    #[test]
    #[should_panic(expected = "column/value length mismatch")]
    fn mismatched_lengths_panic() {
        ColumnValues::new(COLUMNS, vec![Value::Int(1)]);
    }
}
