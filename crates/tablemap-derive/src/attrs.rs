//! Attribute parsing for the Record and View derive macros.
//!
//! Handles parsing of struct-level and field-level `#[orm(...)]` attributes.

use heck::ToSnakeCase;
use syn::{Attribute, DeriveInput, LitStr, Result};

/// Struct-level `#[orm(...)]` settings.
#[derive(Default)]
pub(crate) struct StructAttr {
    pub table: Option<String>,
    pub view: Option<String>,
    pub before_insert: bool,
    pub before_update: bool,
}

/// Field-level `#[orm(...)]` settings.
#[derive(Default)]
pub(crate) struct FieldAttr {
    pub is_pk: bool,
    pub column: Option<String>,
    pub skip: bool,
}

fn orm_attrs(attrs: &[Attribute]) -> impl Iterator<Item = &Attribute> {
    attrs.iter().filter(|attr| attr.path().is_ident("orm"))
}

impl StructAttr {
    pub(crate) fn parse(input: &DeriveInput) -> Result<Self> {
        let mut out = StructAttr::default();
        for attr in orm_attrs(&input.attrs) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("table") {
                    out.table = Some(meta.value()?.parse::<LitStr>()?.value());
                } else if meta.path.is_ident("view") {
                    out.view = Some(meta.value()?.parse::<LitStr>()?.value());
                } else if meta.path.is_ident("before_insert") {
                    out.before_insert = true;
                } else if meta.path.is_ident("before_update") {
                    out.before_update = true;
                } else {
                    return Err(meta.error(
                        "unknown orm attribute; expected `table`, `view`, `before_insert` or `before_update`",
                    ));
                }
                Ok(())
            })?;
        }
        Ok(out)
    }
}

impl FieldAttr {
    pub(crate) fn parse(field: &syn::Field) -> Result<Self> {
        let mut out = FieldAttr::default();
        for attr in orm_attrs(&field.attrs) {
            attr.parse_nested_meta(|meta| {
                // `id` is accepted as an alias of `pk`.
                if meta.path.is_ident("pk") || meta.path.is_ident("id") {
                    out.is_pk = true;
                } else if meta.path.is_ident("column") {
                    out.column = Some(meta.value()?.parse::<LitStr>()?.value());
                } else if meta.path.is_ident("skip") {
                    out.skip = true;
                } else {
                    return Err(meta.error(
                        "unknown orm attribute; expected `pk`, `column = \"...\"` or `skip`",
                    ));
                }
                Ok(())
            })?;
        }
        if out.skip && (out.is_pk || out.column.is_some()) {
            return Err(syn::Error::new_spanned(
                field,
                "#[orm(skip)] cannot be combined with `pk` or `column`",
            ));
        }
        Ok(out)
    }
}

/// Default table/view name: the struct name in snake_case.
pub(crate) fn default_name(input: &DeriveInput) -> String {
    input.ident.to_string().to_snake_case()
}
