//! Implementation of the `#[derive(Refinable)]` macro.
//!
//! Generates field name constants, the `field_value` accessor and the
//! static field descriptor table used for dynamic filters and sorts.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{spanned::Spanned, Data, DeriveInput, Error, Fields, Result};

use crate::attrs::{option_inner, parse_refine_attrs, FieldKind};

/// Main implementation of the Refinable derive macro.
pub fn refinable_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(Error::new(
            input.generics.span(),
            "Refinable cannot be derived for generic structs",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Refinable can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Refinable can only be derived for structs",
            ))
        }
    };

    let mut field_matches: Vec<TokenStream> = Vec::new();
    let mut field_constants: Vec<TokenStream> = Vec::new();
    let mut descriptors: Vec<TokenStream> = Vec::new();

    for field in fields.iter() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let attrs = parse_refine_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }

        // Option<T> is exposed as T; an empty value reads as Value::None
        let inner = option_inner(&field.ty);
        let ty = inner.unwrap_or(&field.ty);

        // Unrecognised types without an explicit kind stay private
        let kind = match attrs.kind.or_else(|| FieldKind::infer(ty)) {
            Some(kind) => kind,
            None => continue,
        };

        let key = attrs.rename.unwrap_or_else(|| field_name.to_string());
        let const_name = format_ident!("{}", to_screaming_snake_case(&key));

        field_constants.push(quote! {
            /// Filter and sort key of this field.
            pub const #const_name: &'static str = #key;
        });

        let (read, descriptor) = match kind {
            FieldKind::Text => (
                quote! { ::refine::Value::String(value) },
                quote! { ::refine::FieldDescriptor::text(#key) },
            ),
            FieldKind::Number => (
                quote! { ::refine::Value::Number(::refine::Number::from(*value)) },
                quote! { ::refine::FieldDescriptor::number::<#ty>(#key) },
            ),
            FieldKind::Timestamp => (
                quote! {
                    ::refine::Value::Timestamp(::refine::ToTimestamp::to_timestamp(value))
                },
                quote! { ::refine::FieldDescriptor::timestamp(#key) },
            ),
            FieldKind::Enum => (
                quote! {
                    ::refine::Value::Enum(<#ty as ::refine::ParamEnum>::discriminant(value))
                },
                quote! { ::refine::FieldDescriptor::enumeration::<#ty>(#key) },
            ),
            FieldKind::Bool => (
                quote! { ::refine::Value::Bool(*value) },
                quote! { ::refine::FieldDescriptor::boolean(#key) },
            ),
        };

        let value_expr = if inner.is_some() {
            quote! {
                match &self.#field_name {
                    ::std::option::Option::Some(value) => #read,
                    ::std::option::Option::None => ::refine::Value::None,
                }
            }
        } else {
            quote! {{
                let value = &self.#field_name;
                #read
            }}
        };

        field_matches.push(quote! {
            #key => #value_expr,
        });
        descriptors.push(descriptor);
    }

    let expanded = quote! {
        impl #struct_name {
            #(#field_constants)*
        }

        impl ::refine::Refinable for #struct_name {
            fn field_value(&self, field: &str) -> ::refine::Value<'_> {
                match field {
                    #(#field_matches)*
                    _ => ::refine::Value::None,
                }
            }

            fn fields() -> &'static [::refine::FieldDescriptor] {
                static FIELDS: &[::refine::FieldDescriptor] = &[#(#descriptors),*];
                FIELDS
            }
        }
    };

    Ok(expanded)
}

/// Convert a string to SCREAMING_SNAKE_CASE.
fn to_screaming_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_was_lower = false;

    for c in s.chars() {
        if c.is_uppercase() {
            if prev_was_lower {
                result.push('_');
            }
            result.push(c);
            prev_was_lower = false;
        } else if c == '_' || c == '-' {
            result.push('_');
            prev_was_lower = false;
        } else {
            result.push(c.to_ascii_uppercase());
            prev_was_lower = true;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(tokens: &str) -> Result<String> {
        let input: DeriveInput = syn::parse_str(tokens)?;
        refinable_derive_impl(input).map(|ts| ts.to_string())
    }

    #[test]
    fn test_screaming_snake_case() {
        assert_eq!(to_screaming_snake_case("name"), "NAME");
        assert_eq!(to_screaming_snake_case("dec_value"), "DEC_VALUE");
        assert_eq!(to_screaming_snake_case("enumProp"), "ENUM_PROP");
        assert_eq!(to_screaming_snake_case("my-field"), "MY_FIELD");
    }

    #[test]
    fn test_inferred_and_skipped_fields() {
        let out = expand(
            "struct Item { id: i32, name: String, #[refine(skip)] cache: u64, other: Vec<u8> }",
        )
        .unwrap();
        assert!(out.contains("pub const ID"));
        assert!(out.contains("pub const NAME"));
        assert!(!out.contains("CACHE"));
        assert!(!out.contains("OTHER"));
        assert!(out.contains("FieldDescriptor :: number :: < i32 >"));
    }

    #[test]
    fn test_option_fields_use_inner_type() {
        let out = expand(
            "struct Person { age: Option<i32>, #[refine(Enum)] stage: Option<Stage>, tags: Option<Vec<u8>> }",
        )
        .unwrap();
        assert!(out.contains("pub const AGE"));
        assert!(out.contains("FieldDescriptor :: number :: < i32 >"));
        assert!(out.contains("enumeration :: < Stage >"));
        assert!(out.contains(":: std :: option :: Option :: None => :: refine :: Value :: None"));
        assert!(!out.contains("TAGS"));
    }

    #[test]
    fn test_enum_field_uses_param_enum() {
        let out = expand("struct Item { #[refine(Enum, rename = \"kind\")] k: Kind }").unwrap();
        assert!(out.contains("pub const KIND"));
        assert!(out.contains("ParamEnum > :: discriminant"));
        assert!(out.contains("enumeration :: < Kind >"));
    }

    #[test]
    fn test_rejects_non_structs() {
        assert!(expand("enum Item { A, B }").is_err());
        assert!(expand("struct Item(i32);").is_err());
    }

    #[test]
    fn test_rejects_generics() {
        let err = expand("struct Item<T> { value: T }").unwrap_err();
        assert!(err.to_string().contains("generic"));
    }
}
