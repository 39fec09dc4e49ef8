//! Mathematical utilities and decisions.
//!
//! Everything here is re-exported from the internal `flatland-base` library.

#[doc(inline)]
pub use flatland_base::math::*;
