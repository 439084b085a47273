use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, Lit, LitStr, Meta, Type};

/// Integer and decimal types rendered as numeric output columns.
const NUMERIC_TYPES: &[&str] = &[
    "Decimal", "u8", "u16", "u32", "u64", "usize", "i8", "i16", "i32", "i64", "f32", "f64",
];

/// Derive macro describing the columns a struct contributes to exported output.
///
/// Each named field becomes one column, in declaration order:
/// - label from `#[serde(rename = "...")]`, or the field name
/// - numeric if the field type is an integer, float or `Decimal`
/// - description from the field's doc comments
///
/// Generates an `output_columns() -> &'static [OutputColumn]` method; an
/// `OutputColumn` type must be in scope where the derive is used.
#[proc_macro_derive(OutputColumns, attributes(serde))]
pub fn derive_output_columns(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return syn::Error::new_spanned(name, "OutputColumns needs named fields")
                    .to_compile_error()
                    .into()
            }
        },
        _ => {
            return syn::Error::new_spanned(name, "OutputColumns only supports structs")
                .to_compile_error()
                .into()
        }
    };

    let mut entries = Vec::new();
    for field in fields {
        let label = match serde_rename(&field.attrs) {
            Ok(Some(label)) => label,
            Ok(None) => field
                .ident
                .as_ref()
                .map(|i| i.to_string())
                .unwrap_or_default(),
            Err(err) => return err.to_compile_error().into(),
        };
        let numeric = is_numeric(&field.ty);
        let description = doc_comment(&field.attrs);

        entries.push(quote! {
            OutputColumn {
                label: #label,
                numeric: #numeric,
                description: #description,
            }
        });
    }

    let expanded = quote! {
        impl #name {
            pub fn output_columns() -> &'static [OutputColumn] {
                static COLUMNS: &[OutputColumn] = &[
                    #(#entries),*
                ];
                COLUMNS
            }
        }
    };

    TokenStream::from(expanded)
}

fn serde_rename(attrs: &[syn::Attribute]) -> syn::Result<Option<String>> {
    let mut rename = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let value: LitStr = meta.value()?.parse()?;
                rename = Some(value.value());
            } else if meta.input.peek(syn::Token![=]) {
                // skip the value of other key = value options
                let _: syn::Expr = meta.value()?.parse()?;
            }
            Ok(())
        })?;
    }
    Ok(rename)
}

fn doc_comment(attrs: &[syn::Attribute]) -> String {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(meta) => match &meta.value {
                syn::Expr::Lit(syn::ExprLit {
                    lit: Lit::Str(s), ..
                }) => Some(s.value().trim().to_string()),
                _ => None,
            },
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_numeric(ty: &Type) -> bool {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .is_some_and(|s| NUMERIC_TYPES.iter().any(|n| s.ident == *n)),
        _ => false,
    }
}
