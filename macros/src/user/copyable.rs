//! `#[derive(Copyable)]` expansion
//!
//! Generates a field-wise `Copyable` impl and, when `#[copyable(describe)]`
//! is present, the matching `Describe` impl through the
//! `__describe_copyable!` bridge.
//!
//! ```ignore
//! #[derive(Copyable)]
//! #[copyable(describe)]
//! struct Doc<T> { title: String, pages: Vec<T> }
//!
//! // Expands to:
//! impl<T: ::tola_copy::Copyable> ::tola_copy::Copyable for Doc<T> {
//!     const KIND: ::tola_copy::Kind = ::tola_copy::Kind::Delegated;
//!     fn deep_copy(&self) -> Self {
//!         Self { title: ..deep_copy(&self.title), pages: ..deep_copy(&self.pages) }
//!     }
//! }
//! ::tola_copy::__describe_copyable!(capability; [T: ::tola_copy::Copyable] Doc<T>; []);
//! ```

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{parse_quote, Data, DeriveInput, Fields, GenericParam, Generics, WherePredicate};

use crate::common::{parse_field_mode, parse_type_attrs, FieldMode, TypeMode};

pub fn expand_derive_copyable(input: DeriveInput) -> TokenStream {
    expand(input).unwrap_or_else(|err| err.to_compile_error())
}

fn expand(input: DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;
    let attrs = parse_type_attrs(&input.attrs)?;
    let mode = attrs.mode;

    let mut extra_preds: Vec<WherePredicate> = Vec::new();
    let body = match mode {
        TypeMode::Value => quote! { *self },
        TypeMode::Delegated => expand_body(&input.data, &mut extra_preds)?,
    };

    let generics = bounded_generics(&input.generics, &extra_preds);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let kind = match mode {
        TypeMode::Value => quote! { ::tola_copy::Kind::Value },
        TypeMode::Delegated => quote! { ::tola_copy::Kind::Delegated },
    };

    let copyable_impl = quote! {
        impl #impl_generics ::tola_copy::Copyable for #name #ty_generics #where_clause {
            const KIND: ::tola_copy::Kind = #kind;

            #[inline]
            fn deep_copy(&self) -> Self {
                #body
            }
        }
    };

    // `Describe` requires `Send + Sync + 'static`, so it is only emitted on request.
    let describe_bridge = if attrs.describe {
        expand_describe_bridge(name, &generics, mode)
    } else {
        TokenStream::new()
    };

    Ok(quote! {
        #copyable_impl
        #describe_bridge
    })
}

/// Add `T: Copyable` to every type parameter, plus any per-field predicates.
fn bounded_generics(generics: &Generics, extra_preds: &[WherePredicate]) -> Generics {
    let mut generics = generics.clone();
    for param in generics.type_params_mut() {
        param.bounds.push(parse_quote!(::tola_copy::Copyable));
    }
    if !extra_preds.is_empty() {
        let where_clause = generics.make_where_clause();
        where_clause.predicates.extend(extra_preds.iter().cloned());
    }
    generics
}

/// Emit the `Describe` bridge call with defaults stripped from the params.
fn expand_describe_bridge(name: &syn::Ident, generics: &Generics, mode: TypeMode) -> TokenStream {
    let (_, ty_generics, where_clause) = generics.split_for_impl();

    let mut params = generics.params.clone();
    for param in params.iter_mut() {
        match param {
            GenericParam::Type(ty) => {
                ty.eq_token = None;
                ty.default = None;
            }
            GenericParam::Const(c) => {
                c.eq_token = None;
                c.default = None;
            }
            GenericParam::Lifetime(_) => {}
        }
    }

    let mut preds: Vec<TokenStream> = where_clause
        .map(|w| w.predicates.iter().map(|p| quote! { #p }).collect())
        .unwrap_or_default();
    let facet = match mode {
        TypeMode::Value => {
            preds.push(quote! { #name #ty_generics: ::core::clone::Clone });
            format_ident!("value")
        }
        TypeMode::Delegated => format_ident!("capability"),
    };

    quote! {
        ::tola_copy::__describe_copyable!(#facet; [#params] #name #ty_generics; [#(#preds,)*]);
    }
}

// =============================================================================
// Body Generation
// =============================================================================

fn expand_body(data: &Data, extra_preds: &mut Vec<WherePredicate>) -> syn::Result<TokenStream> {
    match data {
        Data::Struct(data) => {
            let construct = expand_fields(quote! { Self }, &data.fields, extra_preds, |member| {
                quote! { &self.#member }
            })?;
            Ok(construct)
        }
        Data::Enum(data) => {
            if data.variants.is_empty() {
                return Ok(quote! { match *self {} });
            }
            let mut arms = Vec::with_capacity(data.variants.len());
            for variant in &data.variants {
                let ident = &variant.ident;
                let pattern = bind_pattern(quote! { Self::#ident }, &variant.fields);
                let construct = expand_fields(quote! { Self::#ident }, &variant.fields, extra_preds, |member| {
                    let binding = binding_ident(member);
                    quote! { #binding }
                })?;
                arms.push(quote! { #pattern => #construct });
            }
            Ok(quote! {
                match self {
                    #(#arms,)*
                }
            })
        }
        Data::Union(data) => Err(syn::Error::new(
            data.union_token.span,
            "Copyable cannot be derived for unions",
        )),
    }
}

/// Build `path { a: copy(a), .. }`, `path(copy(0), ..)` or `path`.
fn expand_fields<F>(
    path: TokenStream,
    fields: &Fields,
    extra_preds: &mut Vec<WherePredicate>,
    access: F,
) -> syn::Result<TokenStream>
where
    F: Fn(&syn::Member) -> TokenStream,
{
    let mut copies = Vec::with_capacity(fields.len());
    for (index, field) in fields.iter().enumerate() {
        let member = member_of(field, index);
        let source = access(&member);
        let copy = match parse_field_mode(field)? {
            FieldMode::DeepCopy => quote! { ::tola_copy::Copyable::deep_copy(#source) },
            FieldMode::Clone => {
                let ty = &field.ty;
                extra_preds.push(parse_quote! { #ty: ::core::clone::Clone });
                quote! { ::core::clone::Clone::clone(#source) }
            }
        };
        copies.push((member, copy));
    }

    Ok(match fields {
        Fields::Named(_) => {
            let (members, copies): (Vec<_>, Vec<_>) = copies.into_iter().unzip();
            quote! { #path { #(#members: #copies),* } }
        }
        Fields::Unnamed(_) => {
            let copies = copies.into_iter().map(|(_, copy)| copy);
            quote! { #path(#(#copies),*) }
        }
        Fields::Unit => path,
    })
}

/// Build the match pattern binding every field of a variant.
fn bind_pattern(path: TokenStream, fields: &Fields) -> TokenStream {
    let bindings = fields.iter().enumerate().map(|(index, field)| {
        let member = member_of(field, index);
        let binding = binding_ident(&member);
        match member {
            syn::Member::Named(_) => quote! { #member: #binding },
            syn::Member::Unnamed(_) => quote! { #binding },
        }
    });
    match fields {
        Fields::Named(_) => quote! { #path { #(#bindings),* } },
        Fields::Unnamed(_) => quote! { #path(#(#bindings),*) },
        Fields::Unit => path,
    }
}

fn member_of(field: &syn::Field, index: usize) -> syn::Member {
    match &field.ident {
        Some(ident) => syn::Member::Named(ident.clone()),
        None => syn::Member::Unnamed(index.into()),
    }
}

fn binding_ident(member: &syn::Member) -> syn::Ident {
    match member {
        syn::Member::Named(ident) => format_ident!("__field_{}", ident),
        syn::Member::Unnamed(index) => format_ident!("__field_{}", index.index),
    }
}
