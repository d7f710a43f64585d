//! Copy strategies and the classifier that builds them.
//!
//! ## Erased calling convention
//!
//! Every copier receives the source as `&dyn Any` (a `&T`) and writes the
//! copy into `&mut dyn Any` (a `&mut Option<T>` slot). Per-element copies
//! therefore never allocate a box; only the copied value itself is built.

use core::any::{type_name, Any};
use core::fmt;
use std::sync::Arc;

use super::descriptor::TypeDescriptor;
use super::descriptor::TypeRef;
use crate::contract::{Copyable, Kind, Shape};
use crate::error::CopyError;

/// Copy a `&T` into a `&mut Option<T>` slot.
pub type CopyFn = fn(src: &dyn Any, dst: &mut dyn Any) -> Result<(), CopyError>;

/// Copy a container using already-resolved element strategies.
pub type ContainerCopyFn =
    fn(src: &dyn Any, dst: &mut dyn Any, elements: &[Arc<Strategy>]) -> Result<(), CopyError>;

/// Resolved decision of how to copy one type.
///
/// Built once per type and shared read-only through `Arc`.
pub enum Strategy {
    Value {
        type_name: &'static str,
        copy: CopyFn,
    },
    Delegated {
        type_name: &'static str,
        copy: CopyFn,
    },
    Optional {
        type_name: &'static str,
        inner: Arc<Strategy>,
        copy: ContainerCopyFn,
    },
    /// Tuples and boxes: every field copied with its own strategy.
    Composite {
        type_name: &'static str,
        kind: Kind,
        fields: Vec<Arc<Strategy>>,
        copy: ContainerCopyFn,
    },
    Container {
        type_name: &'static str,
        shape: Shape,
        elements: Vec<Arc<Strategy>>,
        copy: ContainerCopyFn,
    },
}

impl Strategy {
    pub fn type_name(&self) -> &'static str {
        match self {
            Strategy::Value { type_name, .. }
            | Strategy::Delegated { type_name, .. }
            | Strategy::Optional { type_name, .. }
            | Strategy::Composite { type_name, .. }
            | Strategy::Container { type_name, .. } => type_name,
        }
    }

    /// Kind of the copy. Optional wrappers and boxes report their inner kind.
    pub fn kind(&self) -> Kind {
        match self {
            Strategy::Value { .. } => Kind::Value,
            Strategy::Delegated { .. } => Kind::Delegated,
            Strategy::Optional { inner, .. } => inner.kind(),
            Strategy::Composite { kind, .. } => *kind,
            Strategy::Container { shape, .. } => Kind::Container(*shape),
        }
    }

    /// Element strategies of a container (keys before values for maps),
    /// or field strategies of a composite.
    pub fn elements(&self) -> &[Arc<Strategy>] {
        match self {
            Strategy::Container { elements, .. } => elements,
            Strategy::Composite { fields, .. } => fields,
            Strategy::Optional { inner, .. } => core::slice::from_ref(inner),
            _ => &[],
        }
    }

    /// Copy an erased `&T` into an erased `&mut Option<T>`.
    pub fn copy_into(&self, src: &dyn Any, dst: &mut dyn Any) -> Result<(), CopyError> {
        match self {
            Strategy::Value { copy, .. } | Strategy::Delegated { copy, .. } => copy(src, dst),
            Strategy::Optional { inner, copy, .. } => copy(src, dst, core::slice::from_ref(inner)),
            Strategy::Composite { fields, copy, .. } => copy(src, dst, fields),
            Strategy::Container { elements, copy, .. } => copy(src, dst, elements),
        }
    }

    /// Copy a value whose type is known at the call site.
    #[inline]
    pub fn copy_typed<T: 'static>(&self, value: &T) -> Result<T, CopyError> {
        let mut slot: Option<T> = None;
        self.copy_into(value, &mut slot)?;
        slot.ok_or(CopyError::TypeMismatch { expected: type_name::<T>() })
    }
}

impl fmt::Debug for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Value { type_name, .. } => write!(f, "Value({type_name})"),
            Strategy::Delegated { type_name, .. } => write!(f, "Delegated({type_name})"),
            Strategy::Optional { inner, .. } => f.debug_tuple("Optional").field(inner).finish(),
            Strategy::Composite { type_name, fields, .. } => f
                .debug_struct("Composite")
                .field("type", type_name)
                .field("fields", fields)
                .finish(),
            Strategy::Container { type_name, shape, elements, .. } => f
                .debug_struct("Container")
                .field("type", type_name)
                .field("shape", shape)
                .field("elements", elements)
                .finish(),
        }
    }
}

// =============================================================================
// Type Classifier
// =============================================================================

/// Pick exactly one strategy for `descriptor`.
///
/// Decision order, first match wins:
/// 1. capability contract -> `Delegated`
/// 2. value type -> `Value`
/// 3. optional wrapper -> `Optional`, resolving the inner type
/// 4. tuple or box -> `Composite`, resolving every field type
/// 5. container shape -> `Container`, resolving every element type
/// 6. otherwise `CopyError::Unclassifiable`
///
/// Element types go through `resolve`, which is where the dispatcher plugs
/// in its cache.
pub fn classify<F>(descriptor: &TypeDescriptor, mut resolve: F) -> Result<Strategy, CopyError>
where
    F: FnMut(&TypeRef) -> Result<Arc<Strategy>, CopyError>,
{
    let type_name = descriptor.name();

    if let Some(copy) = descriptor.capability {
        return Ok(Strategy::Delegated { type_name, copy });
    }
    if let Some(copy) = descriptor.value {
        return Ok(Strategy::Value { type_name, copy });
    }
    if let Some(optional) = &descriptor.optional {
        let inner = resolve(&optional.inner)?;
        return Ok(Strategy::Optional { type_name, inner, copy: optional.copy });
    }
    if let Some(composite) = &descriptor.composite {
        let fields = composite
            .fields
            .iter()
            .map(|field| resolve(field))
            .collect::<Result<Vec<_>, _>>()?;
        // Same rule as the static impls: boxes forward, tuples are values
        // only when every field is.
        let kind = match (composite.transparent, fields.first()) {
            (true, Some(inner)) => inner.kind(),
            _ if fields.iter().all(|field| field.kind().is_value()) => Kind::Value,
            _ => Kind::Delegated,
        };
        return Ok(Strategy::Composite { type_name, kind, fields, copy: composite.copy });
    }
    if let Some(container) = &descriptor.container {
        let elements = container
            .elements
            .iter()
            .map(|element| resolve(element))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(Strategy::Container {
            type_name,
            shape: container.shape,
            elements,
            copy: container.copy,
        });
    }

    Err(CopyError::Unclassifiable { type_name })
}

// =============================================================================
// Erasure Helpers
// =============================================================================

/// Downcast the source side of an erased copy.
#[inline]
pub fn source<T: 'static>(src: &dyn Any) -> Result<&T, CopyError> {
    src.downcast_ref::<T>()
        .ok_or(CopyError::TypeMismatch { expected: type_name::<T>() })
}

/// Copy one field of a composite through the `index`th strategy.
#[inline]
pub fn copy_field<T: 'static>(fields: &[Arc<Strategy>], index: usize, value: &T) -> Result<T, CopyError> {
    fields
        .get(index)
        .ok_or(CopyError::TypeMismatch { expected: type_name::<T>() })?
        .copy_typed(value)
}

/// Write `value` into the destination slot of an erased copy.
#[inline]
pub fn emit<T: 'static>(dst: &mut dyn Any, value: T) -> Result<(), CopyError> {
    let slot = dst
        .downcast_mut::<Option<T>>()
        .ok_or(CopyError::TypeMismatch { expected: type_name::<T>() })?;
    *slot = Some(value);
    Ok(())
}

/// Fetch the `index`th element strategy handed to a container copier.
#[inline]
pub fn element<'a, C: 'static>(
    elements: &'a [Arc<Strategy>],
    index: usize,
) -> Result<&'a Strategy, CopyError> {
    elements
        .get(index)
        .map(Arc::as_ref)
        .ok_or(CopyError::TypeMismatch { expected: type_name::<C>() })
}

pub(crate) fn erase_value<T: Clone + 'static>(src: &dyn Any, dst: &mut dyn Any) -> Result<(), CopyError> {
    let value = source::<T>(src)?.clone();
    emit(dst, value)
}

pub(crate) fn erase_capability<T: Copyable + 'static>(
    src: &dyn Any,
    dst: &mut dyn Any,
) -> Result<(), CopyError> {
    let value = source::<T>(src)?.deep_copy();
    emit(dst, value)
}
