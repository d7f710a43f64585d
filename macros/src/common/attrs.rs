//! `#[copyable(...)]` attribute parsing
//!
//! Container attributes:
//! - `#[copyable(value)]` - the type is an immutable value type (requires `Copy`)
//! - `#[copyable(describe)]` - also implement `Describe` for the dynamic
//!   dispatcher (requires `Send + Sync + 'static`)
//!
//! Field attributes:
//! - `#[copyable(clone)]` - copy this field with `Clone::clone` instead of `deep_copy`

use syn::{Attribute, Field};

const ATTR: &str = "copyable";

/// How the derived impl classifies the type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeMode {
    Delegated,
    Value,
}

/// How one field is copied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldMode {
    DeepCopy,
    Clone,
}

/// Container-level options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypeAttrs {
    pub mode: TypeMode,
    pub describe: bool,
}

/// Parse container-level attributes.
pub fn parse_type_attrs(attrs: &[Attribute]) -> syn::Result<TypeAttrs> {
    let mut parsed = TypeAttrs { mode: TypeMode::Delegated, describe: false };
    for attr in attrs.iter().filter(|a| a.path().is_ident(ATTR)) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("value") {
                parsed.mode = TypeMode::Value;
                Ok(())
            } else if meta.path.is_ident("describe") {
                parsed.describe = true;
                Ok(())
            } else if meta.path.is_ident("clone") {
                Err(meta.error("`clone` applies to fields; use `value` for the whole type"))
            } else {
                Err(meta.error("unknown copyable attribute, expected `value` or `describe`"))
            }
        })?;
    }
    Ok(parsed)
}

/// Parse field-level attributes.
pub fn parse_field_mode(field: &Field) -> syn::Result<FieldMode> {
    let mut mode = FieldMode::DeepCopy;
    for attr in field.attrs.iter().filter(|a| a.path().is_ident(ATTR)) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("clone") {
                mode = FieldMode::Clone;
                Ok(())
            } else {
                Err(meta.error("unknown copyable field attribute, expected `clone`"))
            }
        })?;
    }
    Ok(mode)
}
