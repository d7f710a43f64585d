//! User-facing macro implementations
//!
//! | Macro | Usage | Purpose |
//! |-------|-------|---------|
//! | `#[derive(Copyable)]` | on struct/enum | Deep copy contract + `Describe` |

mod copyable;

pub use copyable::expand_derive_copyable;
