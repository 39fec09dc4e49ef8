use core::cell::RefCell;
use core::f64::consts::FRAC_PI_2;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::math::{Angle, FreePoint, FreeVector, LayerMask, pos64};
use crate::physics::{PhysicsConfig, RigidBody};
use crate::scene::{
    Camera, EntityBuilder, EntityId, HierarchyError, InsertError, LookupError, Name, Scene,
    SpriteId,
};
use crate::transform::Space;

#[track_caller]
fn assert_close_point(actual: FreePoint, expected: FreePoint) {
    assert!(
        (actual - expected).length() < 1e-9,
        "{actual:?} != {expected:?}"
    );
}

#[track_caller]
fn assert_close_vector(actual: FreeVector, expected: FreeVector) {
    assert!(
        (actual - expected).length() < 1e-9,
        "{actual:?} != {expected:?}"
    );
}

fn body(mass: f64) -> RigidBody {
    let mut body = RigidBody::new();
    body.set_mass(mass).unwrap();
    body
}

fn at(x: f64, y: f64) -> EntityBuilder {
    EntityBuilder::new().position(FreePoint::new(x, y))
}

fn layers(bits: u64) -> LayerMask {
    LayerMask::from_bits_retain(bits)
}

// --- Registry ------------------------------------------------------------------------------------

#[test]
fn insert_and_lookup() {
    let mut scene = Scene::new();
    assert!(scene.is_empty());
    let id = scene.insert("ball", at(1.0, 2.0)).unwrap();
    assert_eq!(scene.lookup(&Name::from("ball")), Ok(id));
    assert_eq!(scene.entity(id).unwrap().name(), &Name::from("ball"));
    assert_eq!(scene.pose(id).unwrap().position, FreePoint::new(1.0, 2.0));
    assert_eq!(scene.len(), 1);
}

#[test]
fn insert_duplicate_name() {
    let mut scene = Scene::new();
    scene.insert("ball", EntityBuilder::new()).unwrap();
    assert_eq!(
        scene.insert("ball", EntityBuilder::new()),
        Err(InsertError::AlreadyExists(Name::from("ball")))
    );
    assert_eq!(scene.len(), 1);
}

#[test]
fn lookup_missing() {
    let scene = Scene::new();
    let error = scene.lookup(&Name::from("ghost")).unwrap_err();
    assert_eq!(error, LookupError::NotFound(Name::from("ghost")));
    assert_eq!(error.to_string(), "no entity named 'ghost'");
}

#[test]
fn anonymous_names_are_distinct() {
    let mut scene = Scene::new();
    let a = scene.insert_anonymous(EntityBuilder::new()).unwrap();
    let b = scene.insert_anonymous(EntityBuilder::new()).unwrap();
    assert_ne!(a, b);
    assert_eq!(scene.entity(a).unwrap().name(), &Name::Anonym(0));
    assert_eq!(scene.entity(b).unwrap().name(), &Name::Anonym(1));
}

#[test]
fn removed_id_is_gone_even_after_reuse() {
    let mut scene = Scene::new();
    let old = scene.insert("a", EntityBuilder::new()).unwrap();
    let removed = scene.remove(old).unwrap();
    assert_eq!(removed.name(), &Name::from("a"));
    assert_eq!(scene.entity(old).unwrap_err(), LookupError::Gone(old));
    assert_eq!(scene.remove(old).unwrap_err(), LookupError::Gone(old));
    assert!(scene.lookup(&Name::from("a")).is_err());

    // The name and the storage are both free for reuse.
    let new = scene.insert("a", EntityBuilder::new()).unwrap();
    assert_ne!(new, old);
    assert!(scene.entity(new).is_ok());
    assert_eq!(scene.entity(old).unwrap_err(), LookupError::Gone(old));
    assert_eq!(scene.len(), 1);
}

#[test]
fn insert_with_missing_parent() {
    let mut scene = Scene::new();
    let parent = scene.insert("p", EntityBuilder::new()).unwrap();
    scene.remove(parent).unwrap();
    assert_eq!(
        scene.insert("c", EntityBuilder::new().parent(parent)),
        Err(InsertError::Parent(LookupError::Gone(parent)))
    );
    assert!(scene.is_empty());
}

#[test]
fn insert_with_parent_keeps_world_placement() {
    let mut scene = Scene::new();
    let parent = scene
        .insert("p", at(10.0, 0.0).angle(Angle::HALF_PI))
        .unwrap();
    let child = scene.insert("c", at(10.0, 5.0).parent(parent)).unwrap();
    assert!(scene.is_child_of(child, parent));
    assert_close_point(scene.pose(child).unwrap().position, FreePoint::new(10.0, 5.0));
    assert_close_point(
        scene.entity(child).unwrap().transform().local_position(),
        FreePoint::new(5.0, 0.0),
    );
    assert_close_vector(scene.pose(child).unwrap().right(), FreeVector::new(1.0, 0.0));
}

// --- Hierarchy -----------------------------------------------------------------------------------

#[test]
fn set_parent_preserves_world_state() {
    let mut scene = Scene::new();
    let parent = scene
        .insert(
            "p",
            at(3.0, 4.0)
                .angle(Angle::from_radians(1.0))
                .scale(FreeVector::new(2.0, 2.0))
                .body(body(1.0)),
        )
        .unwrap();
    let child = scene
        .insert("c", at(-1.0, 2.0).angle(Angle::from_radians(0.25)).body(body(1.0)))
        .unwrap();
    scene.set_velocity(parent, FreeVector::new(1.0, 2.0)).unwrap();
    scene.set_angular_speed(parent, 0.5).unwrap();
    scene.set_velocity(child, FreeVector::new(-1.0, 0.0)).unwrap();
    scene.set_angular_speed(child, 2.0).unwrap();
    let before = scene.pose(child).unwrap();

    scene.set_parent(child, Some(parent)).unwrap();

    let after = scene.pose(child).unwrap();
    assert_close_point(after.position, before.position);
    assert!((after.angle.radians() - 0.25).abs() < 1e-9, "{after:?}");
    assert_close_vector(after.scale, FreeVector::new(1.0, 1.0));
    assert_eq!(scene.velocity(child).unwrap(), FreeVector::new(-1.0, 0.0));
    assert!((scene.angular_speed(child).unwrap() - 2.0).abs() < 1e-12);
    assert!((scene.body(child).unwrap().local_angular_speed() - 1.5).abs() < 1e-12);
    assert_eq!(scene.child_count(parent), Ok(1));

    scene.set_parent(child, None).unwrap();
    assert_eq!(scene.entity(child).unwrap().transform().parent(), None);
    assert_close_point(scene.pose(child).unwrap().position, before.position);
    assert!((scene.angular_speed(child).unwrap() - 2.0).abs() < 1e-12);
    assert_eq!(scene.child_count(parent), Ok(0));
}

#[test]
fn set_parent_rejects_cycles() {
    let mut scene = Scene::new();
    let a = scene.insert("a", EntityBuilder::new()).unwrap();
    let b = scene.insert("b", EntityBuilder::new().parent(a)).unwrap();
    let c = scene.insert("c", EntityBuilder::new().parent(b)).unwrap();

    assert_eq!(
        scene.set_parent(a, Some(a)),
        Err(HierarchyError::WouldCycle {
            child: a,
            parent: a
        })
    );
    assert_eq!(
        scene.set_parent(a, Some(c)),
        Err(HierarchyError::WouldCycle {
            child: a,
            parent: c
        })
    );
    assert_eq!(scene.entity(a).unwrap().transform().parent(), None);
    assert!(scene.is_descendant_of(c, a));
}

#[test]
fn parent_rotation_carries_children() {
    let mut scene = Scene::new();
    let parent = scene.insert("p", EntityBuilder::new()).unwrap();
    let child = scene.insert("c", at(1.0, 0.0).parent(parent)).unwrap();
    scene.set_angle(parent, Angle::HALF_PI).unwrap();
    let pose = scene.pose(child).unwrap();
    assert_close_point(pose.position, FreePoint::new(0.0, 1.0));
    assert_eq!(pose.angle, Angle::HALF_PI);
    assert_close_vector(pose.right(), FreeVector::new(0.0, 1.0));
}

#[test]
fn remove_reparents_children_to_grandparent() {
    let mut scene = Scene::new();
    let a = scene.insert("a", at(1.0, 0.0)).unwrap();
    let b = scene
        .insert("b", at(2.0, 0.0).angle(Angle::HALF_PI).parent(a))
        .unwrap();
    let c = scene.insert("c", at(2.0, 3.0).parent(b)).unwrap();

    scene.remove(b).unwrap();

    assert!(scene.is_child_of(c, a));
    assert_eq!(scene.child_count(a), Ok(1));
    assert_close_point(scene.pose(c).unwrap().position, FreePoint::new(2.0, 3.0));
    assert_close_vector(scene.pose(c).unwrap().right(), FreeVector::new(1.0, 0.0));
}

#[test]
fn remove_root_makes_children_roots() {
    let mut scene = Scene::new();
    let a = scene.insert("a", at(5.0, 5.0)).unwrap();
    let b = scene.insert("b", at(6.0, 5.0).parent(a)).unwrap();
    scene.remove(a).unwrap();
    assert_eq!(scene.entity(b).unwrap().transform().parent(), None);
    assert_close_point(scene.pose(b).unwrap().position, FreePoint::new(6.0, 5.0));
}

#[test]
fn relationship_queries() {
    let mut scene = Scene::new();
    let a = scene.insert("a", EntityBuilder::new()).unwrap();
    let b = scene.insert("b", EntityBuilder::new().parent(a)).unwrap();
    let c = scene.insert("c", EntityBuilder::new().parent(b)).unwrap();
    let d = scene.insert("d", EntityBuilder::new().parent(a)).unwrap();

    assert_eq!(scene.child_count(a), Ok(2));
    assert_eq!(scene.descendant_count(a), Ok(3));
    assert_eq!(scene.descendant_count(c), Ok(0));
    assert!(scene.is_child_of(b, a));
    assert!(!scene.is_child_of(c, a));
    assert!(scene.is_descendant_of(c, a));
    assert!(!scene.is_descendant_of(a, c));
    assert!(!scene.is_descendant_of(d, b));
    assert!(!scene.is_descendant_of(a, a));
}

#[test]
fn look_at() {
    let mut scene = Scene::new();
    let id = scene.insert("a", at(1.0, 1.0)).unwrap();
    scene.look_at(id, FreePoint::new(1.0, 3.0)).unwrap();
    assert!((scene.pose(id).unwrap().angle.radians() - FRAC_PI_2).abs() < 1e-12);

    // Looking at its own position changes nothing.
    scene.look_at(id, FreePoint::new(1.0, 1.0)).unwrap();
    assert!((scene.pose(id).unwrap().angle.radians() - FRAC_PI_2).abs() < 1e-12);
}

#[test]
fn look_at_entity_under_rotated_parent() {
    let mut scene = Scene::new();
    let parent = scene
        .insert("p", EntityBuilder::new().angle(Angle::from_radians(1.0)))
        .unwrap();
    let eye = scene.insert("eye", at(0.0, 0.0).parent(parent)).unwrap();
    let target = scene.insert("target", at(-2.0, 0.0)).unwrap();
    scene.look_at_entity(eye, target).unwrap();
    assert_close_vector(scene.pose(eye).unwrap().right(), FreeVector::new(-1.0, 0.0));
}

#[test]
fn move_all_moves_roots_only() {
    let mut scene = Scene::new();
    let root = scene.insert("root", at(1.0, 1.0)).unwrap();
    let child = scene.insert("child", at(2.0, 1.0).parent(root)).unwrap();
    scene.move_all(FreeVector::new(10.0, 0.0));
    assert_close_point(scene.pose(root).unwrap().position, FreePoint::new(11.0, 1.0));
    assert_close_point(scene.pose(child).unwrap().position, FreePoint::new(12.0, 1.0));
    assert_close_point(
        scene.entity(child).unwrap().transform().local_position(),
        FreePoint::new(1.0, 0.0),
    );
}

#[test]
fn conversions_round_trip_through_deep_chain() {
    let mut scene = Scene::new();
    let placements = [
        (FreePoint::new(2.0, 1.0), 0.7),
        (FreePoint::new(3.0, -1.0), 1.8),
        (FreePoint::new(-0.5, 4.0), 3.0),
        (FreePoint::new(1.5, 2.5), 3.4),
    ];
    let mut chain: Vec<EntityId> = Vec::new();
    for (position, radians) in placements {
        let mut builder = EntityBuilder::new()
            .position(position)
            .angle(Angle::from_radians(radians));
        if let Some(&parent) = chain.last() {
            builder = builder.parent(parent);
        }
        chain.push(scene.insert_anonymous(builder).unwrap());
    }
    let leaf = chain[3];
    assert_eq!(scene.descendant_count(chain[0]), Ok(3));
    assert!(scene.is_descendant_of(leaf, chain[0]));

    let pose = scene.pose(leaf).unwrap();
    assert_close_point(pose.position, FreePoint::new(1.5, 2.5));
    assert!((pose.angle.radians() - 3.4).abs() < 1e-9, "{pose:?}");
    assert_close_point(pose.local_to_global_point(FreePoint::origin()), pose.position);

    let point = FreePoint::new(7.0, -3.0);
    assert_close_point(pose.global_to_local_point(pose.local_to_global_point(point)), point);
    assert_close_point(pose.local_to_global_point(pose.global_to_local_point(point)), point);

    let vector = FreeVector::new(2.0, 5.0);
    assert_close_vector(pose.global_to_local_vector(pose.local_to_global_vector(vector)), vector);
    assert_close_vector(pose.local_to_global_vector(pose.global_to_local_vector(vector)), vector);

    for radians in [0.2, 1.3, 4.0] {
        let angle = Angle::from_radians(radians);
        let there_and_back = pose.global_to_local_angle(pose.local_to_global_angle(angle));
        assert!((there_and_back.radians() - radians).abs() < 1e-9, "{there_and_back:?}");
        let back_and_there = pose.local_to_global_angle(pose.global_to_local_angle(angle));
        assert!((back_and_there.radians() - radians).abs() < 1e-9, "{back_and_there:?}");
    }
}

// --- Dynamics ------------------------------------------------------------------------------------

#[test]
fn total_mass_includes_children() {
    let mut scene = Scene::new();
    let parent = scene.insert("p", EntityBuilder::new().body(body(2.0))).unwrap();
    scene
        .insert("c", EntityBuilder::new().body(body(3.0)).parent(parent))
        .unwrap();
    assert_eq!(scene.total_mass(parent).unwrap().into_inner(), 5.0);

    scene
        .apply_force(parent, FreeVector::new(10.0, 0.0), Space::Global)
        .unwrap();
    assert_eq!(scene.velocity(parent).unwrap(), FreeVector::new(2.0, 0.0));

    scene.body_mut(parent).unwrap().uses_physics = false;
    assert_eq!(scene.total_mass(parent).unwrap().into_inner(), 3.0);
}

#[test]
fn force_on_massless_or_infinite_does_nothing() {
    let mut scene = Scene::new();
    let massless = scene.insert("ghost", EntityBuilder::new()).unwrap();
    let anchor = scene
        .insert("anchor", EntityBuilder::new().body(body(f64::INFINITY)))
        .unwrap();
    for id in [massless, anchor] {
        scene
            .apply_force(id, FreeVector::new(1.0, 1.0), Space::Global)
            .unwrap();
        assert_eq!(scene.velocity(id).unwrap(), FreeVector::zero());
        assert_eq!(scene.inverse_total_mass(id).unwrap().into_inner(), 0.0);
    }
}

#[test]
fn local_force_uses_parent_frame() {
    let mut scene = Scene::new();
    let parent = scene
        .insert("p", EntityBuilder::new().angle(Angle::HALF_PI))
        .unwrap();
    let child = scene
        .insert("c", EntityBuilder::new().body(body(1.0)).parent(parent))
        .unwrap();
    scene
        .apply_force(child, FreeVector::new(1.0, 0.0), Space::Local)
        .unwrap();
    assert_close_vector(scene.velocity(child).unwrap(), FreeVector::new(0.0, 1.0));

    scene
        .apply_force_at_angle(child, 2.0, Angle::ZERO, Space::Global)
        .unwrap();
    assert_close_vector(scene.velocity(child).unwrap(), FreeVector::new(2.0, 1.0));
}

#[test]
fn local_velocity_is_relative_to_parent() {
    let mut scene = Scene::new();
    let parent = scene
        .insert("p", EntityBuilder::new().angle(Angle::HALF_PI).body(body(1.0)))
        .unwrap();
    let child = scene
        .insert("c", EntityBuilder::new().body(body(1.0)).parent(parent))
        .unwrap();
    scene.set_velocity(parent, FreeVector::new(1.0, 0.0)).unwrap();
    scene.set_velocity(child, FreeVector::new(1.0, 2.0)).unwrap();
    assert_close_vector(scene.local_velocity(child).unwrap(), FreeVector::new(2.0, 0.0));

    scene
        .set_local_velocity(child, FreeVector::new(0.0, 3.0))
        .unwrap();
    assert_close_vector(scene.velocity(child).unwrap(), FreeVector::new(-2.0, 0.0));
}

#[test]
fn torque_and_angular_speed() {
    let mut scene = Scene::new();
    let parent = scene.insert("p", EntityBuilder::new().body(body(1.0))).unwrap();
    let child = scene
        .insert("c", EntityBuilder::new().body(body(1.0)).parent(parent))
        .unwrap();
    // Default moment of inertia is 5.
    scene.apply_torque(parent, 10.0).unwrap();
    assert_eq!(scene.angular_speed(parent), Ok(2.0));
    // Children turn along with their parent.
    assert_eq!(scene.angular_speed(child), Ok(2.0));

    scene
        .body_mut(child)
        .unwrap()
        .set_moment_of_inertia(f64::INFINITY)
        .unwrap();
    scene.apply_torque(child, 10.0).unwrap();
    assert_eq!(scene.angular_speed(child), Ok(2.0));
}

#[test]
fn infinite_mass_does_not_turn() {
    let mut scene = Scene::new();
    // Only the mass is infinite; the moment of inertia keeps its finite default.
    let anchor = scene
        .insert("anchor", EntityBuilder::new().body(body(f64::INFINITY)))
        .unwrap();
    let ghost = scene.insert("ghost", EntityBuilder::new()).unwrap();
    for id in [anchor, ghost] {
        assert_eq!(scene.inverse_moment_of_inertia(id), Ok(0.0));
        scene.apply_torque(id, 10.0).unwrap();
        let force = FreeVector::new(0.0, 3.0);
        scene
            .apply_force_at_position(id, force, FreePoint::new(2.0, 0.0), Space::Global)
            .unwrap();
        assert_eq!(scene.angular_speed(id), Ok(0.0));
    }
    let ball = scene.insert("ball", EntityBuilder::new().body(body(1.0))).unwrap();
    assert_eq!(scene.inverse_moment_of_inertia(ball), Ok(0.2));
}

#[rstest]
#[case::global(Space::Global, FreePoint::new(2.0, 1.0))]
#[case::local(Space::Local, FreePoint::new(1.0, 0.0))]
fn force_at_position_produces_torque(#[case] space: Space, #[case] position: FreePoint) {
    let mut scene = Scene::new();
    let id = scene.insert("a", at(1.0, 1.0).body(body(1.0))).unwrap();
    scene
        .apply_force_at_position(id, FreeVector::new(0.0, 2.0), position, space)
        .unwrap();
    assert_close_vector(scene.velocity(id).unwrap(), FreeVector::new(0.0, 2.0));
    // Arm (1, 0) × force (0, 2) = 2, over inertia 5.
    assert!((scene.angular_speed(id).unwrap() - 0.4).abs() < 1e-12);
}

#[test]
fn velocity_at_point_includes_rotation() {
    let mut scene = Scene::new();
    let id = scene.insert("a", at(1.0, 0.0).body(body(1.0))).unwrap();
    scene.set_velocity(id, FreeVector::new(0.5, 0.0)).unwrap();
    scene.set_angular_speed(id, 2.0).unwrap();
    assert_close_vector(
        scene.velocity_at_point(id, FreePoint::new(2.0, 0.0)).unwrap(),
        FreeVector::new(0.5, 2.0),
    );
    assert_close_vector(
        scene.velocity_at_point(id, FreePoint::new(1.0, 1.0)).unwrap(),
        FreeVector::new(-1.5, 0.0),
    );
}

#[test]
fn placed_shape_out_of_range() {
    let mut scene = Scene::new();
    let id = scene.insert("a", EntityBuilder::new()).unwrap();
    let handle = crate::physics::ShapeHandle { entity: id, index: 0 };
    assert_eq!(scene.placed_shape(handle), Ok(None));
}

// --- Stepping ------------------------------------------------------------------------------------

#[test]
fn hooks_run_in_order_before_physics() {
    let mut scene = Scene::new();
    let mut ball = body(1.0);
    ball.gravity = FreeVector::zero();
    let id = scene.insert("ball", EntityBuilder::new().body(ball)).unwrap();

    let log = Rc::new(RefCell::new(Vec::new()));
    for label in ["first", "second"] {
        let log = Rc::clone(&log);
        scene.add_update_hook(move |scene, _tick| {
            log.borrow_mut().push(label);
            if label == "first" && scene.velocity(id).unwrap() == FreeVector::zero() {
                scene.set_velocity(id, FreeVector::new(60.0, 0.0)).unwrap();
            }
        });
    }

    let info = scene.step();
    assert_eq!(info.hooks_run, 2);
    assert_eq!(*log.borrow(), ["first", "second"]);
    // The velocity set by the hook was used by the same step's integration.
    assert!((scene.pose(id).unwrap().position.x - 1.0).abs() < 1e-6);
}

#[test]
fn hook_added_by_hook_runs_next_step() {
    let mut scene = Scene::new();
    let count = Rc::new(RefCell::new(0));
    let inner_count = Rc::clone(&count);
    let mut added = false;
    scene.add_update_hook(move |scene, _tick| {
        if !added {
            added = true;
            let inner_count = Rc::clone(&inner_count);
            scene.add_update_hook(move |_, _| *inner_count.borrow_mut() += 1);
        }
    });

    assert_eq!(scene.step().hooks_run, 1);
    assert_eq!(*count.borrow(), 0);
    assert_eq!(scene.update_hook_count(), 2);
    assert_eq!(scene.step().hooks_run, 2);
    assert_eq!(*count.borrow(), 1);
}

#[test]
fn paused_step_runs_hooks_only() {
    let mut scene = Scene::new();
    let id = scene.insert("ball", EntityBuilder::new().body(body(1.0))).unwrap();
    scene.set_velocity(id, FreeVector::new(1.0, 1.0)).unwrap();
    let saw_paused = Rc::new(RefCell::new(None));
    let saw = Rc::clone(&saw_paused);
    scene.add_update_hook(move |_, tick| *saw.borrow_mut() = Some(tick.paused()));

    scene.set_paused(true);
    let info = scene.step();

    assert!(info.paused);
    assert_eq!(info.hooks_run, 1);
    assert_eq!(info.physics.integrated, 0);
    assert_eq!(*saw_paused.borrow(), Some(true));
    assert_eq!(scene.pose(id).unwrap().position, FreePoint::origin());
    assert_eq!(scene.velocity(id).unwrap(), FreeVector::new(1.0, 1.0));
    assert!(!scene.body(id).unwrap().calculated_this_frame());
}

#[test]
fn calculated_this_frame_marks_integrated_bodies() {
    let mut scene = Scene::new();
    let moving = scene.insert("moving", EntityBuilder::new().body(body(1.0))).unwrap();
    let fixed = scene.insert("fixed", EntityBuilder::new()).unwrap();
    let info = scene.step();
    assert_eq!(info.physics.integrated, 1);
    assert!(scene.body(moving).unwrap().calculated_this_frame());
    assert!(!scene.body(fixed).unwrap().calculated_this_frame());
}

#[test]
fn set_config_failure_leaves_scene_unchanged() {
    let mut scene = Scene::new();
    let mut config = PhysicsConfig::DEFAULT;
    config.fixed_step_hz = pos64(f64::INFINITY);
    assert!(scene.set_config(config).is_err());
    assert_eq!(scene.config(), &PhysicsConfig::DEFAULT);

    config.fixed_step_hz = pos64(30.0);
    scene.set_config(config).unwrap();
    assert_eq!(scene.config().fixed_step_hz, pos64(30.0));
    assert!((scene.clock().next_tick(false).delta_t_f64() - 1.0 / 30.0).abs() < 1e-9);
}

// --- Cameras and rendering -----------------------------------------------------------------------

#[test]
fn current_camera() {
    let mut scene = Scene::new();
    let thing = scene.insert("thing", EntityBuilder::new()).unwrap();
    let eye = scene
        .insert("eye", EntityBuilder::new().camera(Camera::new(1.5).unwrap()))
        .unwrap();

    assert_eq!(scene.current_camera(), None);
    assert_eq!(
        scene.set_current_camera(thing),
        Err(LookupError::NotACamera(thing))
    );
    assert_eq!(
        scene.camera(&Name::from("thing")),
        Err(LookupError::NotACamera(thing))
    );
    assert_eq!(scene.camera(&Name::from("eye")), Ok(eye));
    assert_eq!(scene.cameras().collect::<Vec<_>>(), [eye]);

    scene.set_current_camera(eye).unwrap();
    assert_eq!(scene.current_camera(), Some(eye));
    scene.remove(eye).unwrap();
    assert_eq!(scene.current_camera(), None);
}

#[test]
fn layer_queries_require_all_layers() {
    let mut scene = Scene::new();
    let both = scene.insert("both", EntityBuilder::new().layers(layers(0b11))).unwrap();
    let one = scene.insert("one", EntityBuilder::new().layers(layers(0b01))).unwrap();
    let eye = scene
        .insert(
            "eye",
            EntityBuilder::new()
                .layers(layers(0b11))
                .camera(Camera::new(1.0).unwrap()),
        )
        .unwrap();

    assert_eq!(scene.entities_on_layers(layers(0b11)).collect::<Vec<_>>(), [both]);
    assert_eq!(
        scene.entities_on_layers(layers(0b01)).collect::<Vec<_>>(),
        [both, one]
    );
    assert_eq!(scene.cameras_on_layers(layers(0b10)).collect::<Vec<_>>(), [eye]);
}

#[test]
fn render_list_order_and_visibility() {
    let mut scene = Scene::new();
    let eye = scene
        .insert(
            "eye",
            at(1.0, 1.0)
                .layers(layers(0b111))
                .camera(Camera::new(1.0).unwrap()),
        )
        .unwrap();
    let low = scene
        .insert("low", at(2.0, 1.0).layers(layers(0b001)).sprite(SpriteId(7)))
        .unwrap();
    let middle = scene
        .insert("middle", EntityBuilder::new().layers(layers(0b100010)))
        .unwrap();
    let high = scene.insert("high", EntityBuilder::new().layers(layers(0b100))).unwrap();
    let also_low = scene.insert("also_low", EntityBuilder::new()).unwrap();
    scene.insert("hidden", EntityBuilder::new().layers(layers(0b1000))).unwrap();
    scene
        .insert(
            "other_eye",
            EntityBuilder::new()
                .layers(layers(0b111))
                .camera(Camera::new(1.0).unwrap()),
        )
        .unwrap();

    let items = scene.render_list(eye).unwrap();

    assert_eq!(
        items.iter().map(|item| (item.entity, item.layer)).collect::<Vec<_>>(),
        [(high, 2), (middle, 1), (low, 0), (also_low, 0)]
    );
    let low_item = &items[2];
    assert_eq!(low_item.sprite, Some(SpriteId(7)));
    assert_eq!(low_item.camera_offset, FreeVector::new(1.0, 0.0));
    assert_eq!(low_item.name, Name::from("low"));

    assert_eq!(
        scene.render_list(low),
        Err(LookupError::NotACamera(low))
    );
}

#[test]
fn unknown_id_errors() {
    let mut scene = Scene::new();
    let id = scene.insert("a", EntityBuilder::new()).unwrap();
    scene.remove(id).unwrap();
    assert_eq!(scene.velocity(id), Err(LookupError::Gone(id)));
    assert_eq!(
        scene.set_parent(id, None),
        Err(HierarchyError::Lookup(LookupError::Gone(id)))
    );
    assert!(!scene.is_child_of(id, id));
    assert_eq!(
        scene.apply_force(id, FreeVector::zero(), Space::Global),
        Err(LookupError::Gone(id))
    );
}

#[test]
fn entity_id_from_other_slot_is_gone() {
    let mut scene = Scene::new();
    let a: EntityId = scene.insert("a", EntityBuilder::new()).unwrap();
    scene.remove(a).unwrap();
    let b = scene.insert("b", EntityBuilder::new()).unwrap();
    // Same storage, different generation.
    assert_ne!(format!("{a:?}"), format!("{b:?}"));
    assert!(scene.entity(a).is_err());
}
