//! Record / View derive macro implementation

use crate::attrs::{FieldAttr, StructAttr, default_name};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use std::collections::HashSet;
use syn::{Data, DeriveInput, Fields, Result};

#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum Kind {
    Record,
    View,
}

impl Kind {
    fn name(self) -> &'static str {
        match self {
            Kind::Record => "Record",
            Kind::View => "View",
        }
    }
}

struct MappedField {
    ident: syn::Ident,
    column: String,
}

pub(crate) fn expand(input: DeriveInput, kind: Kind) -> Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    format!("{} can only be derived for structs with named fields", kind.name()),
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                format!("{} can only be derived for structs", kind.name()),
            ));
        }
    };

    let struct_attr = StructAttr::parse(&input)?;
    let relation = match kind {
        Kind::Record => {
            if struct_attr.view.is_some() {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Record uses #[orm(table = \"...\")]; use #[derive(View)] for views",
                ));
            }
            struct_attr.table.clone()
        }
        Kind::View => {
            if struct_attr.table.is_some() {
                return Err(syn::Error::new_spanned(
                    &input,
                    "View uses #[orm(view = \"...\")]; use #[derive(Record)] for tables",
                ));
            }
            if struct_attr.before_update {
                return Err(syn::Error::new_spanned(
                    &input,
                    "#[orm(before_update)] requires a primary key; use #[derive(Record)]",
                ));
            }
            struct_attr.view.clone()
        }
    }
    .unwrap_or_else(|| default_name(&input));

    let mut mapped: Vec<MappedField> = Vec::new();
    let mut pk_index: Option<usize> = None;
    let mut seen = HashSet::new();

    for field in fields {
        let attr = FieldAttr::parse(field)?;
        if attr.skip {
            continue;
        }
        let Some(ident) = field.ident.clone() else {
            continue;
        };
        let column = attr.column.unwrap_or_else(|| ident.to_string());

        if !seen.insert(column.clone()) {
            return Err(syn::Error::new_spanned(
                field,
                format!("duplicate column name `{column}`"),
            ));
        }

        if attr.is_pk {
            if kind == Kind::View {
                return Err(syn::Error::new_spanned(
                    field,
                    "View has no primary key; use #[derive(Record)] for tables",
                ));
            }
            if pk_index.is_some() {
                return Err(syn::Error::new_spanned(
                    field,
                    "Record supports a single #[orm(pk)] field",
                ));
            }
            pk_index = Some(mapped.len());
        }

        mapped.push(MappedField { ident, column });
    }

    let columns: Vec<&str> = mapped.iter().map(|f| f.column.as_str()).collect();
    let column_count = mapped.len();
    let idents: Vec<&syn::Ident> = mapped.iter().map(|f| &f.ident).collect();
    let temps: Vec<syn::Ident> = (0..column_count)
        .map(|i| format_ident!("__tablemap_v{}", i))
        .collect();

    let before_insert = struct_attr.before_insert.then(|| {
        quote! {
            fn as_before_insert(&mut self) -> ::core::option::Option<&mut dyn ::tablemap::BeforeInsert> {
                ::core::option::Option::Some(self)
            }
        }
    });

    let scan = quote! {
        fn scan(&mut self, row: ::tablemap::Row) -> ::tablemap::OrmResult<()> {
            #[allow(unused_mut, unused_variables)]
            let mut __tablemap_values = row.expect_len(#column_count)?.into_iter();
            #(
                let #temps = ::tablemap::FromValue::from_value(__tablemap_values.next().unwrap_or_default())
                    .map_err(|e| e.at_column(#columns))?;
            )*
            #( self.#idents = #temps; )*
            ::core::result::Result::Ok(())
        }
    };

    let values = quote! {
        fn values(&self) -> ::std::vec::Vec<::tablemap::Value> {
            ::std::vec![#( ::tablemap::ToValue::to_value(&self.#idents) ),*]
        }
    };

    match kind {
        Kind::View => Ok(quote! {
            impl #impl_generics #name #ty_generics #where_clause {
                /// The view this struct maps onto.
                pub fn descriptor() -> &'static ::tablemap::View {
                    static VIEW: ::tablemap::View =
                        ::tablemap::View::new(#relation, &[#(#columns),*]);
                    &VIEW
                }
            }

            impl #impl_generics ::tablemap::Struct for #name #ty_generics #where_clause {
                fn view(&self) -> &'static ::tablemap::View {
                    Self::descriptor()
                }

                #values

                #scan

                #before_insert
            }
        }),
        Kind::Record => {
            let Some(pk_index) = pk_index else {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Record requires exactly one #[orm(pk)] field",
                ));
            };
            let pk_ident = &mapped[pk_index].ident;
            let pk_column = &mapped[pk_index].column;

            let before_update = struct_attr.before_update.then(|| {
                quote! {
                    fn as_before_update(&mut self) -> ::core::option::Option<&mut dyn ::tablemap::BeforeUpdate> {
                        ::core::option::Option::Some(self)
                    }
                }
            });

            Ok(quote! {
                impl #impl_generics #name #ty_generics #where_clause {
                    /// The table this record maps onto.
                    pub fn descriptor() -> &'static ::tablemap::Table {
                        static TABLE: ::tablemap::Table = ::tablemap::Table::new(
                            ::tablemap::View::new(#relation, &[#(#columns),*]),
                            #pk_index,
                        );
                        &TABLE
                    }
                }

                impl #impl_generics ::tablemap::Struct for #name #ty_generics #where_clause {
                    fn view(&self) -> &'static ::tablemap::View {
                        Self::descriptor().view()
                    }

                    #values

                    #scan

                    fn as_record_mut(&mut self) -> ::core::option::Option<&mut dyn ::tablemap::Record> {
                        ::core::option::Option::Some(self)
                    }

                    #before_insert
                }

                impl #impl_generics ::tablemap::Record for #name #ty_generics #where_clause {
                    fn table(&self) -> &'static ::tablemap::Table {
                        Self::descriptor()
                    }

                    fn has_pk(&self) -> bool {
                        !::tablemap::IsZero::is_zero(&self.#pk_ident)
                    }

                    fn pk_value(&self) -> ::tablemap::Value {
                        ::tablemap::ToValue::to_value(&self.#pk_ident)
                    }

                    fn set_pk(&mut self, pk: ::tablemap::Value) -> ::tablemap::OrmResult<()> {
                        self.#pk_ident = ::tablemap::FromValue::from_value(pk)
                            .map_err(|e| e.at_column(#pk_column))?;
                        ::core::result::Result::Ok(())
                    }

                    #before_update
                }
            })
        }
    }
}
