//! Element type descriptors.
//!
//! A [`TypeDescriptor`] answers the classifier's questions about one type:
//! is it a value type, does it implement the contract, is it an optional
//! wrapper, is it a container (and of what). Element types are referenced
//! through [`TypeRef`], which carries the `TypeId` up front so a cache hit
//! never has to build the element's descriptor.

use core::any::{type_name, Any, TypeId};
use core::fmt;

use super::strategy::{erase_capability, erase_value, ContainerCopyFn, CopyFn};
use crate::contract::{Copyable, Shape};

/// Types the dynamic dispatcher can describe.
///
/// Derived by `#[derive(Copyable)]` when the type carries
/// `#[copyable(describe)]`. Implement it by
/// hand to describe foreign types, or to mark a type as opaque.
pub trait Describe: Any + Send + Sync {
    fn describe() -> TypeDescriptor;
}

/// Lazy handle to an element type.
#[derive(Clone, Copy)]
pub struct TypeRef {
    id: TypeId,
    name: &'static str,
    describe: fn() -> TypeDescriptor,
}

impl TypeRef {
    pub fn of<T: Describe>() -> Self {
        TypeRef {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
            describe: T::describe,
        }
    }

    #[inline]
    pub fn id(&self) -> TypeId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn describe(&self) -> TypeDescriptor {
        (self.describe)()
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeRef({})", self.name)
    }
}

/// Structural facet of a container type.
#[derive(Clone)]
pub struct ContainerFacet {
    pub(crate) shape: Shape,
    pub(crate) elements: Vec<TypeRef>,
    pub(crate) copy: ContainerCopyFn,
}

/// `Option<T>` facet: absent slots propagate, present ones use `T`'s strategy.
#[derive(Clone)]
pub struct OptionalFacet {
    pub(crate) inner: TypeRef,
    pub(crate) copy: ContainerCopyFn,
}

/// Field-wise facet of a product type (tuples) or a transparent wrapper
/// (`Box<T>`). Not a container shape: the copy keeps the type's own layout.
#[derive(Clone)]
pub struct CompositeFacet {
    pub(crate) fields: Vec<TypeRef>,
    pub(crate) transparent: bool,
    pub(crate) copy: ContainerCopyFn,
}

/// Everything the classifier may ask about a type.
///
/// Facets are independent: a type can carry several (a user type that
/// wraps a vector may be both `Copyable` and a container), and the
/// classifier picks one by priority.
#[derive(Clone)]
pub struct TypeDescriptor {
    id: TypeId,
    name: &'static str,
    pub(crate) capability: Option<CopyFn>,
    pub(crate) value: Option<CopyFn>,
    pub(crate) optional: Option<OptionalFacet>,
    pub(crate) composite: Option<CompositeFacet>,
    pub(crate) container: Option<ContainerFacet>,
}

impl TypeDescriptor {
    /// A type with no facets. Always fails classification.
    pub fn opaque<T: 'static>() -> Self {
        TypeDescriptor {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
            capability: None,
            value: None,
            optional: None,
            composite: None,
            container: None,
        }
    }

    /// An immutable value type, copied by `Clone`.
    pub fn value<T: Clone + 'static>() -> Self {
        Self::opaque::<T>().with_value::<T>()
    }

    /// A type implementing the capability contract.
    pub fn capability<T: Copyable + 'static>() -> Self {
        Self::opaque::<T>().with_capability::<T>()
    }

    /// A container of `shape` over `elements`, copied by `copy`.
    pub fn container<C: 'static>(shape: Shape, elements: Vec<TypeRef>, copy: ContainerCopyFn) -> Self {
        let mut descriptor = Self::opaque::<C>();
        descriptor.container = Some(ContainerFacet { shape, elements, copy });
        descriptor
    }

    /// An optional wrapper around `inner`.
    pub fn optional<O: 'static>(inner: TypeRef, copy: ContainerCopyFn) -> Self {
        let mut descriptor = Self::opaque::<O>();
        descriptor.optional = Some(OptionalFacet { inner, copy });
        descriptor
    }

    /// A product of `fields`, each copied with its own strategy.
    pub fn composite<C: 'static>(fields: Vec<TypeRef>, copy: ContainerCopyFn) -> Self {
        let mut descriptor = Self::opaque::<C>();
        descriptor.composite = Some(CompositeFacet { fields, transparent: false, copy });
        descriptor
    }

    /// A wrapper that copies like `inner` and reports `inner`'s kind.
    pub fn boxed<B: 'static>(inner: TypeRef, copy: ContainerCopyFn) -> Self {
        let mut descriptor = Self::opaque::<B>();
        descriptor.composite = Some(CompositeFacet { fields: vec![inner], transparent: true, copy });
        descriptor
    }

    /// Add the capability facet. `T` must be the described type.
    pub fn with_capability<T: Copyable + 'static>(mut self) -> Self {
        debug_assert_eq!(self.id, TypeId::of::<T>(), "capability facet for a different type");
        self.capability = Some(erase_capability::<T>);
        self
    }

    /// Add the value facet. `T` must be the described type.
    pub fn with_value<T: Clone + 'static>(mut self) -> Self {
        debug_assert_eq!(self.id, TypeId::of::<T>(), "value facet for a different type");
        self.value = Some(erase_value::<T>);
        self
    }

    #[inline]
    pub fn id(&self) -> TypeId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_value(&self) -> bool {
        self.value.is_some()
    }

    pub fn implements_capability(&self) -> bool {
        self.capability.is_some()
    }

    pub fn shape(&self) -> Option<Shape> {
        self.container.as_ref().map(|c| c.shape)
    }

    /// Element types of a container, keys before values for maps.
    pub fn elements(&self) -> &[TypeRef] {
        self.container.as_ref().map_or(&[][..], |c| c.elements.as_slice())
    }

    pub fn optional_of(&self) -> Option<&TypeRef> {
        self.optional.as_ref().map(|o| &o.inner)
    }

    /// Field types of a tuple, or the pointee of a box.
    pub fn fields(&self) -> &[TypeRef] {
        self.composite.as_ref().map_or(&[][..], |c| c.fields.as_slice())
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("capability", &self.implements_capability())
            .field("value", &self.is_value())
            .field("optional", &self.optional_of())
            .field("fields", &self.fields())
            .field("shape", &self.shape())
            .field("elements", &self.elements())
            .finish()
    }
}
