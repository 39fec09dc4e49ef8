//! Flatland is a small 2D rigid-body physics core.
//!
//! A [`Scene`](scene::Scene) owns a set of entities, each with a hierarchical
//! [`Transform`](transform::Transform) and optionally a [`RigidBody`](physics::RigidBody)
//! carrying collision [`Shape`](physics::Shape)s. Stepping the scene advances a fixed-rate
//! [`Clock`](time::Clock): first the registered update hooks run, then every body that uses
//! physics is integrated, and finally every pair of bodies sharing a layer is tested for
//! contact and pushed apart with an impulse response.
//!
//! ## Crate features
//!
//! * `serde`: Adds [`serde`] implementations for configuration and value types.
//!
//! ## Coordinate conventions
//!
//! The plane is the usual mathematical one: +X to the right, +Y up, and angles measured
//! counterclockwise from +X in radians. All positions and velocities stored in the
//! scene are in world units per second, with no other physical units implied.
//!
//! ## Example
//!
//! ```
//! use flatland::math::{FreePoint, FreeVector};
//! use flatland::physics::{RigidBody, Shape};
//! use flatland::scene::{EntityBuilder, Scene};
//!
//! let mut scene = Scene::new();
//! let mut body = RigidBody::new();
//! body.gravity = FreeVector::new(0.0, -10.0);
//! body.shapes.push(Shape::circle(0.5, FreePoint::origin()).unwrap());
//! let ball = scene
//!     .insert("ball", EntityBuilder::new().position(FreePoint::new(0.0, 5.0)).body(body))
//!     .unwrap();
//!
//! for _ in 0..60 {
//!     scene.step();
//! }
//! assert!(scene.pose(ball).unwrap().position.y < 0.0);
//! ```

// Crate-specific lint settings. (General settings can be found in the workspace manifest.)
#![forbid(unsafe_code)]
// Lenience for tests.
#![cfg_attr(test,
    allow(clippy::float_cmp), // deterministic tests
    allow(clippy::redundant_clone), // prefer regularity over efficiency
)]

pub mod math;
pub mod physics;
pub mod scene;
pub mod time;
pub mod transform;
pub mod util;
