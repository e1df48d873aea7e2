//! Procedural macros for the gamelayer project.
//!
//! This crate provides the `Document` derive, which implements
//! `gamelayer::document::Document` for a struct with named fields.

#[allow(unused_extern_crates)]
extern crate self as gamelayer_macros;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, Ident, LitStr};

/// Derives `gamelayer::document::Document`.
///
/// # Attributes
///
/// - `#[document(collection = "name")]` on the struct (required)
/// - `#[document(id)]` on the identifier field; defaults to the field named `id`
/// - `#[document(unique)]` on every field that must stay unique across the collection
///
/// ```ignore
/// #[derive(Debug, Clone, Serialize, Deserialize, Document)]
/// #[document(collection = "games")]
/// pub struct Game {
///     pub id: DocumentId,
///     #[document(unique)]
///     pub title: String,
/// }
/// ```
#[proc_macro_derive(Document, attributes(document))]
pub fn derive_document(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    expand_document(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand_document(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let collection = collection_name(input)?;

    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(&input.ident, "Document can only be derived for structs"));
    };

    let Fields::Named(fields) = &data.fields else {
        return Err(syn::Error::new_spanned(&input.ident, "Document requires named fields"));
    };

    let mut id_field: Option<&Ident> = None;
    let mut unique_fields = Vec::new();

    for field in &fields.named {
        let Some(name) = field.ident.as_ref() else {
            continue;
        };

        for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("document")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("id") {
                    if id_field.is_some() {
                        return Err(meta.error("only one field can be marked #[document(id)]"));
                    }
                    id_field = Some(name);
                    Ok(())
                } else if meta.path.is_ident("unique") {
                    unique_fields.push(name.to_string());
                    Ok(())
                } else {
                    Err(meta.error("expected `id` or `unique`"))
                }
            })?;
        }
    }

    let id_field = match id_field {
        Some(field) => field,
        None => fields
            .named
            .iter()
            .filter_map(|field| field.ident.as_ref())
            .find(|ident| *ident == "id")
            .ok_or_else(|| syn::Error::new_spanned(
                &input.ident,
                "no identifier field: add an `id` field or mark one with #[document(id)]",
            ))?,
    };

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::gamelayer::document::Document for #ident #ty_generics #where_clause {
            fn id(&self) -> &::gamelayer::document::DocumentId {
                &self.#id_field
            }

            fn collection_name() -> &'static str {
                #collection
            }

            fn unique_fields() -> &'static [&'static str] {
                &[#(#unique_fields),*]
            }
        }
    })
}

fn collection_name(input: &DeriveInput) -> syn::Result<LitStr> {
    let mut collection = None;

    for attr in input.attrs.iter().filter(|attr| attr.path().is_ident("document")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("collection") {
                collection = Some(meta.value()?.parse::<LitStr>()?);
                Ok(())
            } else {
                Err(meta.error("expected `collection = \"...\"`"))
            }
        })?;
    }

    collection.ok_or_else(|| {
        syn::Error::new_spanned(&input.ident, "missing #[document(collection = \"...\")]")
    })
}
