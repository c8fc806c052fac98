//! Attribute parsing for the Refinable derive macro.
//!
//! Parses the `#[refine(...)]` field attributes and infers a field kind
//! from the field's type when no attribute names one.

use proc_macro2::Span;
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, GenericArgument, Ident, Lit, Meta, PathArguments, Result, Token, Type,
};

/// How a field is exposed for filtering and sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Text field: `#[refine(Text)]` or `#[refine(String)]`
    Text,
    /// Numeric primitive: `#[refine(Number)]`
    Number,
    /// Date/time field: `#[refine(Timestamp)]`
    Timestamp,
    /// Enum field: `#[refine(Enum)]`, requires `ParamEnum`
    Enum,
    /// Boolean field: `#[refine(Bool)]`
    Bool,
}

impl FieldKind {
    fn parse_name(name: &str, span: Span) -> Result<Self> {
        match name {
            "Text" | "text" | "String" | "string" => Ok(FieldKind::Text),
            "Number" | "number" => Ok(FieldKind::Number),
            "Timestamp" | "timestamp" => Ok(FieldKind::Timestamp),
            "Enum" | "enum" | "enumeration" => Ok(FieldKind::Enum),
            "Bool" | "bool" | "boolean" => Ok(FieldKind::Bool),
            other => Err(Error::new(
                span,
                format!(
                    "unknown field kind: '{}'. Expected one of: Text, Number, Timestamp, Enum, Bool",
                    other
                ),
            )),
        }
    }

    pub fn from_ident(ident: &Ident) -> Result<Self> {
        Self::parse_name(&ident.to_string(), ident.span())
    }

    /// Infers the kind from the last segment of a plain type path.
    ///
    /// Returns `None` for anything not recognised; such fields are left out
    /// unless annotated.
    pub fn infer(ty: &Type) -> Option<Self> {
        let Type::Path(path) = ty else {
            return None;
        };
        if path.qself.is_some() {
            return None;
        }
        let segment = path.path.segments.last()?;
        match segment.ident.to_string().as_str() {
            "String" => Some(FieldKind::Text),
            "i8" | "i16" | "i32" | "i64" | "isize" | "u8" | "u16" | "u32" | "u64" | "usize"
            | "f32" | "f64" => Some(FieldKind::Number),
            "bool" => Some(FieldKind::Bool),
            "Timestamp" | "DateTime" | "NaiveDateTime" | "NaiveDate" => Some(FieldKind::Timestamp),
            _ => None,
        }
    }
}

/// Returns `T` when `ty` is `Option<T>`.
///
/// Nullable fields are exposed with the kind of their inner type and read
/// as `Value::None` when empty.
pub fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    if path.qself.is_some() {
        return None;
    }
    let segment = path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first() {
        Some(GenericArgument::Type(inner)) if args.args.len() == 1 => Some(inner),
        _ => None,
    }
}

/// Field-level attributes from `#[refine(...)]`.
#[derive(Debug, Clone)]
pub struct RefineAttr {
    /// Explicit kind; inferred from the type when absent.
    pub kind: Option<FieldKind>,
    /// Leave this field out of filtering and sorting.
    pub skip: bool,
    /// Custom key (default: field name).
    pub rename: Option<String>,
    pub span: Span,
}

impl Default for RefineAttr {
    fn default() -> Self {
        RefineAttr {
            kind: None,
            skip: false,
            rename: None,
            span: Span::call_site(),
        }
    }
}

fn string_literal(expr: &syn::Expr, what: &str) -> Result<syn::LitStr> {
    match expr {
        syn::Expr::Lit(syn::ExprLit {
            lit: Lit::Str(s), ..
        }) => Ok(s.clone()),
        other => Err(Error::new(
            other.span(),
            format!("{} must be a string literal", what),
        )),
    }
}

impl Parse for RefineAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = RefineAttr::default();

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                // refine(Text), refine(Number), refine(skip) ...
                Meta::Path(p) => {
                    if p.is_ident("skip") {
                        attr.skip = true;
                    } else if let Some(ident) = p.get_ident() {
                        attr.kind = Some(FieldKind::from_ident(ident)?);
                        attr.span = ident.span();
                    } else {
                        return Err(Error::new(
                            p.span(),
                            "expected field kind: Text, Number, Timestamp, Enum, Bool, or skip",
                        ));
                    }
                }

                // rename = "key" or ty = "enum"
                Meta::NameValue(nv) => {
                    if nv.path.is_ident("rename") {
                        attr.rename = Some(string_literal(&nv.value, "rename")?.value());
                    } else if nv.path.is_ident("ty") {
                        let s = string_literal(&nv.value, "ty")?;
                        attr.kind = Some(FieldKind::parse_name(&s.value(), s.span())?);
                        attr.span = s.span();
                    } else {
                        return Err(Error::new(
                            nv.path.span(),
                            "unknown attribute. Expected: rename or ty",
                        ));
                    }
                }

                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown refine attribute. Expected: Text, Number, Timestamp, Enum, Bool, skip, rename = \"...\", or ty = \"...\"",
                    ));
                }
            }
        }

        Ok(attr)
    }
}

/// Extracts `#[refine(...)]` from a field's attributes.
pub fn parse_refine_attrs(attrs: &[Attribute]) -> Result<RefineAttr> {
    for attr in attrs {
        if attr.path().is_ident("refine") {
            return attr.parse_args::<RefineAttr>();
        }
    }
    Ok(RefineAttr::default())
}
