//! Derive macros for tablemap
//!
//! Provides `#[derive(Record)]` and `#[derive(View)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod attrs;
mod record;

/// Derive `Struct` and `Record` for a struct mapped onto a table.
///
/// # Example
///
/// ```ignore
/// use tablemap::Record;
///
/// #[derive(Debug, Default, Record)]
/// #[orm(table = "people")]
/// struct Person {
///     #[orm(pk)]
///     id: i64,
///     name: String,
///     #[orm(column = "email_address")]
///     email: Option<String>,
/// }
/// ```
///
/// # Generated
///
/// - `fn descriptor() -> &'static tablemap::Table`
/// - `impl tablemap::Struct` and `impl tablemap::Record`
///
/// # Attributes
///
/// - `#[orm(table = "name")]` - Table name (defaults to the struct name in snake_case)
/// - `#[orm(pk)]` / `#[orm(id)]` - The primary key field (exactly one)
/// - `#[orm(column = "name")]` - Map field to a different column name
/// - `#[orm(skip)]` - Leave the field unmapped
/// - `#[orm(before_insert)]` / `#[orm(before_update)]` - Call the struct's
///   `BeforeInsert` / `BeforeUpdate` impl before those commands
#[proc_macro_derive(Record, attributes(orm))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::expand(input, record::Kind::Record)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Derive `Struct` for a struct mapped onto a view (no primary key).
///
/// # Example
///
/// ```ignore
/// use tablemap::View;
///
/// #[derive(Debug, Default, View)]
/// #[orm(view = "active_people")]
/// struct ActivePerson {
///     name: String,
///     email: Option<String>,
/// }
/// ```
///
/// # Attributes
///
/// - `#[orm(view = "name")]` - View name (defaults to the struct name in snake_case)
/// - `#[orm(column = "name")]`, `#[orm(skip)]`, `#[orm(before_insert)]` - as for `Record`
#[proc_macro_derive(View, attributes(orm))]
pub fn derive_view(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::expand(input, record::Kind::View)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
