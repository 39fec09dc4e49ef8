//! Tools that we could imagine being in the Rust standard library, but aren't.

#[doc(inline)]
pub use flatland_base::util::*;

mod status_text;
pub use status_text::*;
