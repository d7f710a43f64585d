// Common utilities shared by the derive expansions
//
// This module contains:
// - attrs: `#[copyable(...)]` attribute parsing

mod attrs;

pub use attrs::*;
