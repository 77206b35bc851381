//! `#[derive(Describe)]` for beanforge.
//!
//! Generates the structure descriptor of a plain struct so that its fields
//! can be mapped by a compiled converter without a hand-written `Describe`
//! impl.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, LitStr, Path, Type};

/// Derive `Describe` for a struct with named fields.
///
/// Every field becomes a field member in declaration order. `pub` fields are
/// public, all others non-public (mapped only by resolvers that force
/// access).
///
/// Field types are classified by name: the eight primitives (`i8` … `i64`,
/// `f32`, `f64`, `bool`, `char`) and `String` use typed accessors, `Value`
/// is the universal object type, anything else is an opaque object coerced
/// through serde and must implement `Serialize` and `DeserializeOwned`.
///
/// # Attributes
///
/// On the struct:
/// - `#[bean(default)]`: add `Default::default()` as zero-parameter constructor
/// - `#[bean(extend = "path::to::fn")]`: pass the descriptor through
///   `fn(StructureDescriptor<Self>) -> StructureDescriptor<Self>`, to add
///   getter/setter methods or other constructors
/// - `#[bean(crate = "path")]`: where `beanforge_core` items live
///   (default `::beanforge_core`)
///
/// On a field:
/// - `#[bean(rename = "name")]`: attach the `rename` attribute
/// - `#[bean(attr(key = "value", ...))]`: attach arbitrary attributes
/// - `#[bean(object)]`: treat the field as an opaque object
/// - `#[bean(skip)]`: leave the field out of the descriptor
///
/// # Example
///
/// ```ignore
/// #[derive(Describe, Default)]
/// #[bean(default)]
/// pub struct User {
///     pub name: String,
///     #[bean(rename = "years")]
///     age: i32,
///     pub tags: Vec<String>,
/// }
/// ```
#[proc_macro_derive(Describe, attributes(bean))]
pub fn derive_describe(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match derive_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

#[derive(Default)]
struct StructOptions {
    default: bool,
    extend: Option<Path>,
    krate: Option<Path>,
}

#[derive(Default)]
struct FieldOptions {
    attributes: Vec<(String, String)>,
    object: bool,
    skip: bool,
}

fn derive_impl(input: &DeriveInput) -> Result<TokenStream2, syn::Error> {
    let name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Describe cannot be derived for generic structs",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Describe only supports structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "Describe only supports structs",
            ))
        }
    };

    let options = struct_options(input)?;
    let krate = match &options.krate {
        Some(path) => quote! { #path },
        None => quote! { ::beanforge_core },
    };

    let mut members = Vec::new();
    for field in fields {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(field, "expected named field"))?;
        let field_options = field_options(field)?;
        if field_options.skip {
            continue;
        }

        let declared = field_name.to_string();
        let ty = &field.ty;
        let kind = if field_options.object {
            FieldKind::Object
        } else {
            classify(ty)
        };

        let constructor = match kind {
            FieldKind::Primitive => quote! {
                #krate::Member::<Self>::field::<#ty>(
                    #declared,
                    |__bean: &Self| __bean.#field_name,
                    |__bean: &mut Self, __value: #ty| __bean.#field_name = __value,
                )
            },
            FieldKind::String => quote! {
                #krate::Member::<Self>::string_field(
                    #declared,
                    |__bean: &Self| __bean.#field_name.as_str(),
                    |__bean: &mut Self, __value: ::std::string::String| __bean.#field_name = __value,
                )
            },
            FieldKind::Value => quote! {
                #krate::Member::<Self>::value_field(
                    #declared,
                    |__bean: &Self| &__bean.#field_name,
                    |__bean: &mut Self, __value: #krate::Value| __bean.#field_name = __value,
                )
            },
            FieldKind::Object => quote! {
                #krate::Member::<Self>::object_field::<#ty>(
                    #declared,
                    |__bean: &Self| &__bean.#field_name,
                    |__bean: &mut Self, __value: #ty| __bean.#field_name = __value,
                )
            },
        };

        let visibility = match field.vis {
            syn::Visibility::Public(_) => quote! {},
            _ => quote! { .non_public() },
        };
        let attributes = field_options.attributes.iter().map(|(key, value)| {
            quote! { .with_attribute(#key, #value) }
        });

        members.push(quote! {
            .member(#constructor #visibility #(#attributes)*)
        });
    }

    let type_name = name.to_string();
    let default_constructor = if options.default {
        quote! { .constructor(#krate::Constructor::default_of()) }
    } else {
        quote! {}
    };
    let finish = match &options.extend {
        Some(path) => quote! { #path(descriptor) },
        None => quote! { descriptor },
    };

    Ok(quote! {
        impl #krate::Describe for #name {
            fn describe() -> #krate::StructureDescriptor<Self> {
                let descriptor = #krate::StructureDescriptor::<Self>::new(#type_name)
                    #default_constructor
                    #(#members)*;
                #finish
            }
        }
    })
}

fn struct_options(input: &DeriveInput) -> Result<StructOptions, syn::Error> {
    let mut options = StructOptions::default();
    for attr in &input.attrs {
        if !attr.path().is_ident("bean") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("default") {
                options.default = true;
            } else if meta.path.is_ident("extend") {
                let value: LitStr = meta.value()?.parse()?;
                options.extend = Some(value.parse()?);
            } else if meta.path.is_ident("crate") {
                let value: LitStr = meta.value()?.parse()?;
                options.krate = Some(value.parse()?);
            } else {
                return Err(meta.error("unknown bean attribute, expected default, extend or crate"));
            }
            Ok(())
        })?;
    }
    Ok(options)
}

fn field_options(field: &syn::Field) -> Result<FieldOptions, syn::Error> {
    let mut options = FieldOptions::default();
    for attr in &field.attrs {
        if !attr.path().is_ident("bean") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let value: LitStr = meta.value()?.parse()?;
                options.attributes.push(("rename".to_string(), value.value()));
            } else if meta.path.is_ident("attr") {
                meta.parse_nested_meta(|inner| {
                    let key = inner
                        .path
                        .get_ident()
                        .map(|ident| ident.to_string())
                        .ok_or_else(|| inner.error("attribute keys must be identifiers"))?;
                    let value: LitStr = inner.value()?.parse()?;
                    options.attributes.push((key, value.value()));
                    Ok(())
                })?;
            } else if meta.path.is_ident("object") {
                options.object = true;
            } else if meta.path.is_ident("skip") {
                options.skip = true;
            } else {
                return Err(meta.error(
                    "unknown bean attribute, expected rename, attr, object or skip",
                ));
            }
            Ok(())
        })?;
    }
    Ok(options)
}

enum FieldKind {
    Primitive,
    String,
    Value,
    Object,
}

/// Classify a field type by its last path segment.
fn classify(ty: &Type) -> FieldKind {
    let Type::Path(type_path) = ty else {
        return FieldKind::Object;
    };
    if type_path.qself.is_some() {
        return FieldKind::Object;
    }
    let segments: Vec<_> = type_path.path.segments.iter().collect();
    let Some(last) = segments.last() else {
        return FieldKind::Object;
    };
    if !last.arguments.is_none() {
        return FieldKind::Object;
    }

    match last.ident.to_string().as_str() {
        "i8" | "i16" | "i32" | "i64" | "f32" | "f64" | "bool" | "char" if segments.len() == 1 => {
            FieldKind::Primitive
        }
        "String" => FieldKind::String,
        "Value" if is_universal_value(&segments) => FieldKind::Value,
        _ => FieldKind::Object,
    }
}

/// `Value` alone, or qualified by one of the crates exporting it.
fn is_universal_value(segments: &[&syn::PathSegment]) -> bool {
    match segments {
        [_] => true,
        [.., krate, _] => krate.ident == "beanforge_core" || krate.ident == "beanforge",
        [] => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind_of(ty: &str) -> &'static str {
        let ty: Type = syn::parse_str(ty).unwrap();
        match classify(&ty) {
            FieldKind::Primitive => "primitive",
            FieldKind::String => "string",
            FieldKind::Value => "value",
            FieldKind::Object => "object",
        }
    }

    #[test]
    fn classifies_field_types() {
        assert_eq!(kind_of("i32"), "primitive");
        assert_eq!(kind_of("char"), "primitive");
        assert_eq!(kind_of("String"), "string");
        assert_eq!(kind_of("std::string::String"), "string");
        assert_eq!(kind_of("Value"), "value");
        assert_eq!(kind_of("beanforge_core::Value"), "value");
        assert_eq!(kind_of("serde_json::Value"), "object");
        assert_eq!(kind_of("Vec<String>"), "object");
        assert_eq!(kind_of("Option<i32>"), "object");
        assert_eq!(kind_of("u64"), "object");
    }

    #[test]
    fn rejects_tuple_structs_and_generics() {
        let tuple: DeriveInput = syn::parse_str("struct P(i32);").unwrap();
        assert!(derive_impl(&tuple).is_err());

        let generic: DeriveInput = syn::parse_str("struct P<T> { t: T }").unwrap();
        assert!(derive_impl(&generic).is_err());
    }

    #[test]
    fn unknown_attributes_are_errors() {
        let input: DeriveInput =
            syn::parse_str("struct P { #[bean(flatten)] x: i32 }").unwrap();
        let err = derive_impl(&input).unwrap_err();
        assert!(err.to_string().contains("unknown bean attribute"));
    }

    #[test]
    fn expands_members_and_options() {
        let input: DeriveInput = syn::parse_str(
            r#"
            #[bean(default, crate = "beanforge::core")]
            struct P {
                pub x: i32,
                #[bean(rename = "label", attr(format = "short"))]
                name: String,
                #[bean(skip)]
                cache: Vec<u8>,
            }
            "#,
        )
        .unwrap();
        let expanded = derive_impl(&input).unwrap().to_string();
        assert!(expanded.contains("beanforge :: core :: Describe"));
        assert!(expanded.contains("default_of"));
        assert!(expanded.contains("field :: < i32 >"));
        assert!(expanded.contains("string_field"));
        assert!(expanded.contains("non_public"));
        assert!(expanded.contains("\"rename\" , \"label\""));
        assert!(expanded.contains("\"format\" , \"short\""));
        assert!(!expanded.contains("cache"));
    }
}
