use proc_macro2::TokenStream;
use quote::quote;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{Attribute, Ident, LitInt, LitStr, Token};

/// One item inside `#[bits(...)]`.
pub enum BitsArg {
    /// `6`
    Width(LitInt),
    /// `signed`
    Signed,
    /// `skip`
    Skip,
    /// `range = 0..6`
    Range(LitInt, LitInt),
    /// `offset = 2`
    Offset(LitInt),
    /// `width = 4`
    NamedWidth(LitInt),
    /// `encoding = "ascii"`
    Encoding(LitStr),
}

impl Parse for BitsArg {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        if input.peek(LitInt) {
            return Ok(Self::Width(input.parse()?));
        }

        let key: Ident = input.parse()?;
        match key.to_string().as_str() {
            "signed" => Ok(Self::Signed),
            "skip" => Ok(Self::Skip),
            "range" => {
                input.parse::<Token![=]>()?;
                let start = input.parse()?;
                input.parse::<Token![..]>()?;
                let end = input.parse()?;
                Ok(Self::Range(start, end))
            }
            "offset" => {
                input.parse::<Token![=]>()?;
                Ok(Self::Offset(input.parse()?))
            }
            "width" => {
                input.parse::<Token![=]>()?;
                Ok(Self::NamedWidth(input.parse()?))
            }
            "encoding" => {
                input.parse::<Token![=]>()?;
                Ok(Self::Encoding(input.parse()?))
            }
            other => Err(syn::Error::new(
                key.span(),
                format!(
                    "unknown bits argument `{other}`, expected a width, signed, skip, range, offset, width or encoding"
                ),
            )),
        }
    }
}

/// Everything the `#[bits]` attributes of one field ask for.
#[derive(Default)]
pub struct FieldArgs {
    pub skip: bool,
    signed: bool,
    widths: Vec<LitInt>,
    ranges: Vec<(LitInt, LitInt)>,
    offset: Option<LitInt>,
    encoding: Option<LitStr>,
}

impl FieldArgs {
    pub fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut args = Self::default();
        for attr in attrs.iter().filter(|attr| attr.path().is_ident("bits")) {
            let items = attr.parse_args_with(Punctuated::<BitsArg, Token![,]>::parse_terminated)?;
            for item in items {
                match item {
                    BitsArg::Width(lit) | BitsArg::NamedWidth(lit) => {
                        lit.base10_parse::<u8>()?;
                        args.widths.push(lit);
                    }
                    BitsArg::Signed => args.signed = true,
                    BitsArg::Skip => args.skip = true,
                    BitsArg::Range(start, end) => {
                        start.base10_parse::<u32>()?;
                        end.base10_parse::<u32>()?;
                        args.ranges.push((start, end));
                    }
                    BitsArg::Offset(lit) => {
                        lit.base10_parse::<u32>()?;
                        if args.offset.replace(lit.clone()).is_some() {
                            return Err(syn::Error::new(lit.span(), "duplicate offset"));
                        }
                    }
                    BitsArg::Encoding(lit) => {
                        if args.encoding.replace(lit.clone()).is_some() {
                            return Err(syn::Error::new(lit.span(), "duplicate encoding"));
                        }
                    }
                }
            }
        }
        Ok(args)
    }

    /// Builder calls appended to `FieldDef::new(..)`.
    ///
    /// Several layouts on one field are all emitted so that the serializer
    /// reports the conflict with the field name.
    pub fn builder_calls(&self) -> syn::Result<TokenStream> {
        let mut calls = Vec::new();

        match (&self.offset, self.widths.as_slice()) {
            (Some(offset), [width, rest @ ..]) => {
                calls.push(quote! { .relative(#offset, #width) });
                calls.extend(rest.iter().map(|width| quote! { .bits(#width) }));
            }
            (Some(offset), []) => {
                return Err(syn::Error::new(offset.span(), "offset needs a width"));
            }
            (None, widths) => {
                calls.extend(widths.iter().map(|width| quote! { .bits(#width) }));
            }
        }
        for (start, end) in &self.ranges {
            calls.push(quote! { .range(#start..#end) });
        }
        if self.signed {
            calls.push(quote! { .signed() });
        }
        if let Some(encoding) = &self.encoding {
            let variant = encoding_variant(encoding)?;
            calls.push(quote! { .encoding(::fields::TextEncoding::#variant) });
        }

        Ok(quote! { #(#calls)* })
    }
}

fn encoding_variant(lit: &LitStr) -> syn::Result<Ident> {
    let name = match lit.value().to_ascii_lowercase().as_str() {
        "ascii" | "us-ascii" => "Ascii",
        "latin1" | "iso-8859-1" => "Latin1",
        "utf8" | "utf-8" => "Utf8",
        "utf16le" | "utf-16le" => "Utf16Le",
        "utf16be" | "utf-16be" => "Utf16Be",
        other => {
            return Err(syn::Error::new(
                lit.span(),
                format!("unknown encoding `{other}`, expected ascii, latin1, utf8, utf16le or utf16be"),
            ))
        }
    };
    Ok(Ident::new(name, lit.span()))
}

/// Returns `true` for `#[bit_fields(custom)]`.
pub fn is_custom(attrs: &[Attribute]) -> syn::Result<bool> {
    let mut custom = false;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("bit_fields")) {
        let ident: Ident = attr.parse_args()?;
        if ident != "custom" {
            return Err(syn::Error::new(
                ident.span(),
                "unknown bit_fields argument, expected `custom`",
            ));
        }
        custom = true;
    }
    Ok(custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn field_args(attrs: Vec<Attribute>) -> syn::Result<FieldArgs> {
        FieldArgs::from_attrs(&attrs)
    }

    fn compact(args: &FieldArgs) -> String {
        args.builder_calls().unwrap().to_string().replace(' ', "")
    }

    #[test]
    fn width_and_signed() {
        let args = field_args(vec![parse_quote!(#[bits(6, signed)])]).unwrap();
        let calls = compact(&args);
        assert!(calls.contains(".bits(6)"));
        assert!(calls.contains(".signed()"));
    }

    #[test]
    fn offset_and_width_become_relative() {
        let args = field_args(vec![parse_quote!(#[bits(offset = 2, width = 4)])]).unwrap();
        assert!(compact(&args).contains(".relative(2,4)"));
    }

    #[test]
    fn range_parses() {
        let args = field_args(vec![parse_quote!(#[bits(range = 8..14)])]).unwrap();
        assert!(compact(&args).contains(".range(8..14)"));
    }

    #[test]
    fn several_layouts_pass_through() {
        let args = field_args(vec![
            parse_quote!(#[bits(3)]),
            parse_quote!(#[bits(range = 0..3)]),
        ])
        .unwrap();
        let calls = compact(&args);
        assert!(calls.contains(".bits(3)"));
        assert!(calls.contains(".range(0..3)"));
    }

    #[test]
    fn offset_without_width_is_rejected() {
        let args = field_args(vec![parse_quote!(#[bits(offset = 2)])]).unwrap();
        assert!(args.builder_calls().is_err());
    }

    #[test]
    fn encodings() {
        let args = field_args(vec![parse_quote!(#[bits(encoding = "UTF-16LE")])]).unwrap();
        assert!(compact(&args).contains("TextEncoding::Utf16Le"));

        let args = field_args(vec![parse_quote!(#[bits(encoding = "ebcdic")])]).unwrap();
        assert!(args.builder_calls().is_err());
    }

    #[test]
    fn unknown_argument_is_rejected() {
        assert!(field_args(vec![parse_quote!(#[bits(packed)])]).is_err());
        assert!(field_args(vec![parse_quote!(#[bits(300)])]).is_err());
    }

    #[test]
    fn container_attribute() {
        let attrs: Vec<Attribute> = vec![parse_quote!(#[bit_fields(custom)])];
        assert!(is_custom(&attrs).unwrap());
        assert!(!is_custom(&[]).unwrap());
        let attrs: Vec<Attribute> = vec![parse_quote!(#[bit_fields(other)])];
        assert!(is_custom(&attrs).is_err());
    }
}
