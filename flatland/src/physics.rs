//! Rigid bodies, collision shapes, and the per-tick physics pass.
//!
//! The narrow phase ([`detect()`]) is a family of pure functions over [`PlacedShape`]s;
//! contact response ([`Collision::resolve()`]) and the tick itself act on a
//! [`Scene`](crate::scene::Scene), since applying forces requires walking the hierarchy.

mod body;
pub use body::*;
mod collision;
pub use collision::*;
mod config;
pub use config::*;
mod resolve;
pub use resolve::*;
mod shape;
pub use shape::*;
pub(crate) mod step;
pub use step::PhysicsStepInfo;
