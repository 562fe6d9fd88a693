use std::collections::HashSet;

use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{parse_macro_input, Data, DeriveInput, Fields, LitStr};

mod classify;

use classify::{classify, TypeClass};

const PARTITION_KEY_FIELD: &str = "partition_key";
const ROW_KEY_FIELD: &str = "row_key";
const RESERVED_COLUMNS: [&str; 2] = ["PartitionKey", "RowKey"];

/// Derive macro for table entities.
///
/// Generates an `Entity` impl on the annotated struct:
///
/// - `schema()`: static descriptor table, one entry per field, in declaration order.
/// - `read_field(index)` / `write_field(index, value)`: typed accessors, native
///   column types read and written directly, everything else through JSON text.
///
/// The struct must implement `Default` (decoding starts from it) and declare
/// `partition_key` and `row_key` fields of type `String` or `Option<String>`.
/// Fields of non-native types must implement `Serialize` and `DeserializeOwned`.
///
/// # Example
///
/// ```ignore
/// #[derive(Entity, Default)]
/// pub struct Book {
///     pub partition_key: Option<String>,
///     pub row_key: Option<String>,
///
///     #[entity(required)]
///     pub title: Option<String>,
///
///     #[entity(rename = "pubdate")]
///     pub published_date: DateTime<Utc>,
///
///     #[entity(ignore)]
///     pub cached_summary: Option<String>,
///
///     pub chapters: Option<Vec<Chapter>>,
/// }
/// ```
///
/// Column names are the field name without underscores, lower-cased
/// (`published_date` → `publisheddate`), unless renamed.
#[proc_macro_derive(Entity, attributes(entity))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match derive_impl(&input) {
        Ok(tokens) => tokens,
        Err(e) => e.to_compile_error().into(),
    }
}

fn derive_impl(input: &DeriveInput) -> Result<TokenStream, syn::Error> {
    let name = &input.ident;
    let type_name = name.to_string();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Entity only supports structs with named fields",
                ))
            }
        },
        _ => return Err(syn::Error::new_spanned(name, "Entity only supports structs")),
    };

    let mut descriptor_tokens = Vec::new();
    let mut read_arms = Vec::new();
    let mut write_arms = Vec::new();
    let mut seen_columns = HashSet::new();

    for (index, field) in fields.iter().enumerate() {
        let field_name = field.ident.as_ref().ok_or_else(|| {
            syn::Error::new_spanned(field, "expected named field")
        })?;
        let field_name_str = field_name.unraw().to_string();
        let field_ty = &field.ty;
        let type_name_str = quote!(#field_ty).to_string().replace(' ', "");

        // Parse #[entity(...)] attribute.
        let mut required = false;
        let mut ignored = false;
        let mut rename: Option<LitStr> = None;

        for attr in &field.attrs {
            if !attr.path().is_ident("entity") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("required") {
                    required = true;
                } else if meta.path.is_ident("ignore") {
                    ignored = true;
                } else if meta.path.is_ident("rename") {
                    rename = Some(meta.value()?.parse()?);
                } else {
                    return Err(meta.error(
                        "unknown entity attribute (expected required, ignore or rename)",
                    ));
                }
                Ok(())
            })?;
        }

        let classified = classify(field_ty);

        let role = match field_name_str.as_str() {
            PARTITION_KEY_FIELD => Some(quote! { table_entity::schema::FieldRole::PartitionKey }),
            ROW_KEY_FIELD => Some(quote! { table_entity::schema::FieldRole::RowKey }),
            _ => None,
        };

        let column = match &role {
            Some(_) => {
                if !matches!(classified.class, TypeClass::Native("String")) {
                    return Err(syn::Error::new_spanned(
                        field_ty,
                        format!("'{field_name_str}' must be String or Option<String>"),
                    ));
                }
                if ignored || rename.is_some() {
                    return Err(syn::Error::new_spanned(
                        field_name,
                        format!("'{field_name_str}' is a key field and cannot be ignored or renamed"),
                    ));
                }
                field_name_str.replace('_', "").to_lowercase()
            }
            None => match &rename {
                Some(lit) => {
                    let column = lit.value();
                    if column.is_empty() || RESERVED_COLUMNS.contains(&column.as_str()) {
                        return Err(syn::Error::new_spanned(
                            lit,
                            format!("'{column}' cannot be used as a column name"),
                        ));
                    }
                    column
                }
                None => field_name_str.replace('_', "").to_lowercase(),
            },
        };

        if role.is_none() && !seen_columns.insert(column.clone()) {
            return Err(syn::Error::new_spanned(
                field_name,
                format!("duplicate column '{column}'"),
            ));
        }

        let role = role.unwrap_or_else(|| quote! { table_entity::schema::FieldRole::Property });

        let (kind_expr, accessor) = match classified.class {
            TypeClass::Native(edm) => {
                let edm = format_ident!("{}", edm);
                (
                    quote! { table_entity::schema::FieldKind::Native(table_entity::value::EdmType::#edm) },
                    "native",
                )
            }
            TypeClass::Json => (quote! { table_entity::schema::FieldKind::Json }, "json"),
        };
        let optional = classified.optional;
        let suffix = if optional { "_opt" } else { "" };
        let reader = format_ident!("read_{}{}", accessor, suffix, span = Span::call_site());
        let writer = format_ident!("write_{}{}", accessor, suffix, span = Span::call_site());

        descriptor_tokens.push(quote! {
            table_entity::schema::FieldDescriptor {
                name: #field_name_str,
                column: #column,
                type_name: #type_name_str,
                kind: #kind_expr,
                optional: #optional,
                role: #role,
                required: #required,
                ignored: #ignored,
            }
        });

        read_arms.push(quote! {
            #index => table_entity::field::#reader(&self.#field_name),
        });
        write_arms.push(quote! {
            #index => table_entity::field::#writer(&mut self.#field_name, value),
        });
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics table_entity::Entity for #name #ty_generics #where_clause {
            fn schema() -> &'static table_entity::schema::EntitySchema {
                static SCHEMA: table_entity::schema::EntitySchema = table_entity::schema::EntitySchema {
                    type_name: #type_name,
                    fields: &[
                        #(#descriptor_tokens),*
                    ],
                };
                &SCHEMA
            }

            fn read_field(
                &self,
                index: usize,
            ) -> ::core::result::Result<
                ::core::option::Option<table_entity::value::EntityValue>,
                table_entity::error::FieldError,
            > {
                match index {
                    #(#read_arms)*
                    _ => ::core::result::Result::Err(table_entity::error::FieldError::UnknownField(index)),
                }
            }

            fn write_field(
                &mut self,
                index: usize,
                value: ::core::option::Option<table_entity::value::EntityValue>,
            ) -> ::core::result::Result<(), table_entity::error::FieldError> {
                match index {
                    #(#write_arms)*
                    _ => ::core::result::Result::Err(table_entity::error::FieldError::UnknownField(index)),
                }
            }
        }
    };

    Ok(TokenStream::from(expanded))
}
