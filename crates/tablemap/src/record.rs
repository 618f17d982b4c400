//! Per-instance contracts for mapped structs.
//!
//! `#[derive(Record)]` and `#[derive(View)]` implement these traits; manual
//! implementations must keep [`Struct::values`] in the descriptor's column order.

use crate::descriptor::{Table, View};
use crate::error::OrmResult;
use crate::row::Row;
use crate::value::Value;

/// A struct mapped onto a view or table.
pub trait Struct: Send + Sync {
    /// The view this struct maps onto.
    fn view(&self) -> &'static View;

    /// Column values in the view's column order.
    fn values(&self) -> Vec<Value>;

    /// Assign every mapped field from `row`, in the view's column order.
    fn scan(&mut self, row: Row) -> OrmResult<()>;

    /// Returns `Some` when this struct is a [`Record`] with a primary key.
    fn as_record_mut(&mut self) -> Option<&mut dyn Record> {
        None
    }

    /// Returns `Some` when this struct wants [`BeforeInsert`] called.
    fn as_before_insert(&mut self) -> Option<&mut dyn BeforeInsert> {
        None
    }
}

/// A struct mapped onto a table with a single-column primary key.
pub trait Record: Struct {
    fn table(&self) -> &'static Table;

    /// Whether the primary key field holds a meaningful (non-zero) value.
    fn has_pk(&self) -> bool;

    fn pk_value(&self) -> Value;

    fn set_pk(&mut self, pk: Value) -> OrmResult<()>;

    /// Returns `Some` when this record wants [`BeforeUpdate`] called.
    fn as_before_update(&mut self) -> Option<&mut dyn BeforeUpdate> {
        None
    }
}

/// Hook run before INSERT; an error aborts the insert before any SQL is built.
pub trait BeforeInsert {
    fn before_insert(&mut self) -> OrmResult<()>;
}

/// Hook run before UPDATE; an error aborts the update before any SQL is built.
pub trait BeforeUpdate {
    fn before_update(&mut self) -> OrmResult<()>;
}
