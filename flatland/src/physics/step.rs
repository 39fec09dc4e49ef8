//! The per-tick physics pass over a whole scene.

use core::fmt;

use itertools::Itertools as _;
use manyfmt::{Fmt, Refmt as _};

use crate::physics::{Collision, FrictionRegime, Resolution, ShapeHandle, detect};
use crate::scene::{EntityId, LookupError, Scene};
use crate::time::Tick;
use crate::util::{ShowStatus, StatusText};

/// Counts of what happened during one physics tick, returned inside
/// [`SceneStepInfo`](crate::scene::SceneStepInfo).
#[derive(Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub struct PhysicsStepInfo {
    /// Number of bodies integrated.
    pub integrated: usize,
    /// Number of body pairs sharing a layer.
    pub pairs_considered: usize,
    /// Number of shape pairs passed to [`detect()`].
    pub shape_tests: usize,
    /// Number of overlapping shape pairs found.
    pub contacts: usize,
    /// Contacts that received an impulse.
    pub resolved: usize,
    /// Contacts whose bodies were already moving apart.
    pub separating: usize,
    /// Contacts between two infinite masses, which were ignored.
    pub immovable: usize,
    /// Of the resolved contacts, how many were held by static friction.
    pub static_friction: usize,
    /// Contacts involving a sensor, in the order they were found.
    pub sensor_overlaps: Vec<Collision>,
}

impl core::ops::AddAssign for PhysicsStepInfo {
    fn add_assign(&mut self, other: Self) {
        self.integrated += other.integrated;
        self.pairs_considered += other.pairs_considered;
        self.shape_tests += other.shape_tests;
        self.contacts += other.contacts;
        self.resolved += other.resolved;
        self.separating += other.separating;
        self.immovable += other.immovable;
        self.static_friction += other.static_friction;
        self.sensor_overlaps.extend(other.sensor_overlaps);
    }
}

impl Fmt<StatusText> for PhysicsStepInfo {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>, fopt: &StatusText) -> fmt::Result {
        if fopt.show.contains(ShowStatus::STEP) {
            writeln!(
                fmt,
                "Bodies: {}  Pairs: {}  Shape tests: {}",
                self.integrated, self.pairs_considered, self.shape_tests
            )?;
        }
        if fopt.show.contains(ShowStatus::CONTACTS) {
            write!(
                fmt,
                "Contacts: {} ({} resolved, {} static, {} separating, {} immovable, {} sensor)",
                self.contacts,
                self.resolved,
                self.static_friction,
                self.separating,
                self.immovable,
                self.sensor_overlaps.len()
            )?;
            for overlap in &self.sensor_overlaps {
                write!(fmt, "\n  {}", overlap.refmt(fopt))?;
            }
        }
        Ok(())
    }
}

/// Runs one physics tick over every body in `scene`.
///
/// 1. Every body's `calculated_this_frame` flag is cleared.
/// 2. Every body that uses physics is integrated.
/// 3. Every pair of such bodies whose layers intersect is tested shape against shape, and
///    each contact is resolved as soon as it is found, so later pairs see its effects.
///
/// The set of bodies is taken once at the start; entities are never added or removed during
/// the pass.
pub(crate) fn physics_tick(scene: &mut Scene, tick: Tick) -> PhysicsStepInfo {
    let dt = tick.delta_t_f64();
    let mut info = PhysicsStepInfo::default();

    for id in scene.ids() {
        if let Ok(body) = scene.body_mut(id) {
            body.calculated_this_frame = false;
        }
    }

    let bodies: Vec<EntityId> = scene.physics_bodies().collect();
    for &id in &bodies {
        match scene.integrate(id, dt) {
            Ok(true) => info.integrated += 1,
            Ok(false) => {}
            Err(e) => log::error!("failed to integrate {id:?}: {e}"),
        }
    }

    for (a, b) in bodies.iter().copied().tuple_combinations() {
        if let Err(e) = collide_pair(scene, a, b, &mut info) {
            log::error!("failed to collide {a:?} with {b:?}: {e}");
        }
    }

    info
}

fn collide_pair(
    scene: &mut Scene,
    a: EntityId,
    b: EntityId,
    info: &mut PhysicsStepInfo,
) -> Result<(), LookupError> {
    if !scene.entity(a)?.layers.intersects(scene.entity(b)?.layers) {
        return Ok(());
    }
    info.pairs_considered += 1;

    let config = *scene.config();
    let parallel_threshold = config.parallel_threshold.into_inner();
    let shape_count_a = scene.body(a)?.shapes.len();
    let shape_count_b = scene.body(b)?.shapes.len();
    for (index_a, index_b) in (0..shape_count_a).cartesian_product(0..shape_count_b) {
        // Placed anew for every test, since resolving an earlier contact may have moved them.
        let handle_a = ShapeHandle {
            entity: a,
            index: index_a,
        };
        let handle_b = ShapeHandle {
            entity: b,
            index: index_b,
        };
        let (Some(shape_a), Some(shape_b)) =
            (scene.placed_shape(handle_a)?, scene.placed_shape(handle_b)?)
        else {
            continue;
        };

        info.shape_tests += 1;
        let Some(contact) = detect(&shape_a, &shape_b, parallel_threshold) else {
            continue;
        };
        info.contacts += 1;

        let collision = Collision::new(handle_a, &shape_a, handle_b, &shape_b, contact);
        match collision.resolve(scene, config.correction_percent)? {
            Resolution::Resolved { friction, .. } => {
                info.resolved += 1;
                if friction == FrictionRegime::Static {
                    info.static_friction += 1;
                }
            }
            Resolution::Separating => info.separating += 1,
            Resolution::Immovable => info.immovable += 1,
            Resolution::Sensor => info.sensor_overlaps.push(collision),
        }
    }
    Ok(())
}
