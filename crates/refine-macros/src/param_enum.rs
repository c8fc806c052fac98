//! Implementation of the `#[derive(ParamEnum)]` macro.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{spanned::Spanned, Data, DeriveInput, Error, Fields, Result};

/// Generates `ParamEnum` and `FromParam` for a fieldless enum.
///
/// Discriminants are declaration indexes, so deriving `PartialOrd` on the
/// same enum orders members the way clauses compare them. Explicit
/// discriminants (`A = 2`) would let the two orders disagree and are
/// rejected.
pub fn param_enum_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let enum_name = &input.ident;
    let type_name = enum_name.to_string();

    if !input.generics.params.is_empty() {
        return Err(Error::new(
            input.generics.span(),
            "ParamEnum cannot be derived for generic enums",
        ));
    }

    let variants = match &input.data {
        Data::Enum(data) => &data.variants,
        _ => {
            return Err(Error::new(
                input.span(),
                "ParamEnum can only be derived for enums",
            ))
        }
    };

    if variants.is_empty() {
        return Err(Error::new(
            input.span(),
            "ParamEnum needs at least one variant",
        ));
    }

    let mut names: Vec<String> = Vec::new();
    let mut from_name_arms: Vec<TokenStream> = Vec::new();
    let mut name_arms: Vec<TokenStream> = Vec::new();
    let mut discriminant_arms: Vec<TokenStream> = Vec::new();

    for (index, variant) in variants.iter().enumerate() {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(Error::new(
                variant.span(),
                "ParamEnum variants cannot carry data",
            ));
        }
        if let Some((_, expr)) = &variant.discriminant {
            return Err(Error::new(
                expr.span(),
                "ParamEnum members are ordered by declaration; remove the explicit discriminant",
            ));
        }
        let ident = &variant.ident;
        let name = ident.to_string();
        let index = index as u32;

        from_name_arms.push(quote! { #name => ::std::option::Option::Some(#enum_name::#ident), });
        name_arms.push(quote! { #enum_name::#ident => #name, });
        discriminant_arms.push(quote! { #enum_name::#ident => #index, });
        names.push(name);
    }

    let expanded = quote! {
        impl ::refine::ParamEnum for #enum_name {
            const VARIANTS: &'static [&'static str] = &[#(#names),*];

            fn from_variant_name(name: &str) -> ::std::option::Option<Self> {
                match name {
                    #(#from_name_arms)*
                    _ => ::std::option::Option::None,
                }
            }

            fn variant_name(&self) -> &'static str {
                match self {
                    #(#name_arms)*
                }
            }

            fn discriminant(&self) -> u32 {
                match self {
                    #(#discriminant_arms)*
                }
            }
        }

        impl ::refine::FromParam for #enum_name {
            const TYPE_NAME: &'static str = #type_name;
            const KIND: ::refine::ParamKind = ::refine::ParamKind::Enum;

            fn from_param(raw: &str) -> ::refine::Result<Self> {
                ::refine::parse_enum(raw, <Self as ::refine::FromParam>::TYPE_NAME)
            }

            fn variant_names() -> ::std::option::Option<&'static [&'static str]> {
                ::std::option::Option::Some(<Self as ::refine::ParamEnum>::VARIANTS)
            }
        }
    };

    Ok(expanded)
}
