//! Procedural macros for the tola-copy deep copy engine
//!
//! # Macro API
//!
//! | Macro | Target | Purpose |
//! |-------|--------|---------|
//! | `#[derive(Copyable)]` | struct/enum | Field-wise deep copy contract |
//! | `#[copyable(value)]` | struct/enum | Classify as an immutable value (`Copy`) |
//! | `#[copyable(describe)]` | struct/enum | Also implement `Describe` for the dispatcher |
//! | `#[copyable(clone)]` | field | Copy the field with `Clone::clone` |
//!
//! ## Example
//!
//! ```ignore
//! #[derive(Copyable)]
//! struct Layer {
//!     name: String,
//!     cells: Vec<[u8; 4]>,
//!     #[copyable(clone)]
//!     shared: Arc<Palette>,
//! }
//!
//! #[derive(Clone, Copy, Copyable)]
//! #[copyable(value)]
//! struct Point { x: i32, y: i32 }
//! ```

use proc_macro::TokenStream;
use syn::parse_macro_input;

// =============================================================================
// Module Declarations (Two-tier: common / user)
// =============================================================================

mod common;
mod user;

// =============================================================================
// User-facing Macros (user/)
// =============================================================================

/// Derive macro implementing the `Copyable` contract.
///
/// Every field is copied with `Copyable::deep_copy` unless marked
/// `#[copyable(clone)]`. Type parameters receive a `Copyable` bound.
/// With `#[copyable(describe)]` and the `dispatch` feature of `tola-copy`
/// on, a `Describe` impl is generated as well so the type can be resolved
/// by a `Dispatcher`. That impl needs `Send + Sync + 'static`; without the
/// attribute the derive places no thread bounds on the type.
///
/// # Usage
/// ```ignore
/// #[derive(Copyable)]
/// #[copyable(describe)]
/// enum Shape {
///     Circle { r: f64 },
///     Poly(Vec<(f64, f64)>),
///     Empty,
/// }
///
/// let copy = deep_copy(&shape);
/// ```
#[proc_macro_derive(Copyable, attributes(copyable))]
pub fn derive_copyable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as syn::DeriveInput);
    user::expand_derive_copyable(input).into()
}
