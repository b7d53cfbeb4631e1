//! `#[derive(BitFields)]` for the `fields` crate.

use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{parse_macro_input, Data, DeriveInput, Fields};

mod args;

use args::{is_custom, FieldArgs};

/// Derives `fields::BitFields` for a struct with named fields.
///
/// Fields are mapped in declaration order. See the `fields` crate docs for
/// the `#[bits(...)]` attribute. `#[bit_fields(custom)]` on the struct
/// defers to its `BitSerialize` impl instead.
#[proc_macro_derive(BitFields, attributes(bits, bit_fields))]
pub fn derive_bit_fields(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn derive(input: &DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let shape = if is_custom(&input.attrs)? {
        quote! { ::fields::Shape::custom() }
    } else {
        let defs = field_defs(input)?;
        quote! { ::fields::Shape::Fields(::std::vec![#(#defs),*]) }
    };

    Ok(quote! {
        impl #impl_generics ::fields::BitFields for #name #ty_generics #where_clause {
            fn shape() -> ::fields::Shape<Self> {
                #shape
            }
        }
    })
}

fn field_defs(input: &DeriveInput) -> syn::Result<Vec<TokenStream>> {
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "BitFields can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "BitFields can only be derived for structs",
            ))
        }
    };

    let mut defs = Vec::with_capacity(fields.len());
    for field in fields {
        let args = FieldArgs::from_attrs(&field.attrs)?;
        // Skipped fields stay out of the list, so any type may be skipped.
        if args.skip {
            continue;
        }
        let Some(ident) = &field.ident else {
            continue;
        };
        let label = ident.unraw().to_string();
        let calls = args.builder_calls()?;
        defs.push(quote! {
            ::fields::FieldDef::<Self>::new(
                #label,
                |record| &record.#ident,
                |record| &mut record.#ident,
            )
            #calls
        });
    }
    Ok(defs)
}
