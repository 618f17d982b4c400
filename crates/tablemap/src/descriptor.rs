//! Static table and view descriptors.
//!
//! Descriptors are plain `'static` data, normally generated by
//! `#[derive(Record)]` / `#[derive(View)]`, but they can be declared by hand:
//!
//! ```rust
//! use tablemap::{Table, View};
//!
//! static PEOPLE: Table = Table::new(View::new("people", &["id", "name", "email"]), 0);
//!
//! assert_eq!(PEOPLE.name(), "people");
//! assert_eq!(PEOPLE.pk_column(), "id");
//! ```

/// A named relation and its ordered columns.
///
/// Column order defines the positional correspondence with a record's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct View {
    name: &'static str,
    columns: &'static [&'static str],
}

impl View {
    pub const fn new(name: &'static str, columns: &'static [&'static str]) -> Self {
        Self { name, columns }
    }

    /// Relation name, possibly schema-qualified.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn columns(&self) -> &'static [&'static str] {
        self.columns
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| *c == column)
    }
}

/// A view with a single-column primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Table {
    view: View,
    pk_index: usize,
}

impl Table {
    /// Panics (at compile time in const context) if `pk_index` is out of range.
    pub const fn new(view: View, pk_index: usize) -> Self {
        assert!(
            pk_index < view.columns.len(),
            "primary key index out of range"
        );
        Self { view, pk_index }
    }

    pub const fn view(&self) -> &View {
        &self.view
    }

    pub const fn name(&self) -> &'static str {
        self.view.name
    }

    pub const fn columns(&self) -> &'static [&'static str] {
        self.view.columns
    }

    pub const fn pk_index(&self) -> usize {
        self.pk_index
    }

    pub const fn pk_column(&self) -> &'static str {
        self.view.columns[self.pk_index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ITEMS: Table = Table::new(View::new("shop.items", &["sku", "id", "title"]), 1);

    #[test]
    fn table_exposes_view_data() {
        assert_eq!(ITEMS.name(), "shop.items");
        assert_eq!(ITEMS.columns(), &["sku", "id", "title"]);
        assert_eq!(ITEMS.pk_index(), 1);
        assert_eq!(ITEMS.pk_column(), "id");
        assert_eq!(ITEMS.view().column_index("title"), Some(2));
        assert_eq!(ITEMS.view().column_index("missing"), None);
    }

    #[test]
    #[should_panic(expected = "primary key index out of range")]
    fn pk_index_is_bounded() {
        let view = View::new("t", &["a"]);
        let _ = Table::new(view, 1);
    }
}
