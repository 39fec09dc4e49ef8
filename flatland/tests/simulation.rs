//! Whole-scene simulations run through [`Scene::step()`].

use manyfmt::Refmt as _;
use pretty_assertions::assert_eq;

use flatland::math::{Angle, FreePoint, FreeVector, LayerMask, pos64};
use flatland::physics::{Drag, DragModel, Material, PhysicsConfig, RigidBody, Shape, ShapeRole};
use flatland::scene::{EntityBuilder, EntityId, Scene};
use flatland::util::StatusText;

fn ball(radius: f64, mass: f64, material: Material) -> RigidBody {
    let mut body = RigidBody::new();
    body.set_mass(mass).unwrap();
    body.shapes.push(
        Shape::circle(radius, FreePoint::origin())
            .unwrap()
            .with_material(material),
    );
    body
}

fn floor(material: Material) -> RigidBody {
    let mut body = RigidBody::new();
    body.set_mass(f64::INFINITY).unwrap();
    body.set_moment_of_inertia(f64::INFINITY).unwrap();
    body.shapes.push(
        Shape::segment(20.0, FreePoint::origin(), Angle::ZERO)
            .unwrap()
            .with_material(material),
    );
    body
}

fn insert_at(scene: &mut Scene, name: &str, x: f64, y: f64, body: RigidBody) -> EntityId {
    scene
        .insert(
            name,
            EntityBuilder::new().position(FreePoint::new(x, y)).body(body),
        )
        .unwrap()
}

fn run(scene: &mut Scene, ticks: usize) {
    for _ in 0..ticks {
        scene.step();
    }
}

#[test]
fn free_fall_matches_semi_implicit_euler() {
    let mut scene = Scene::new();
    let mut body = RigidBody::new();
    body.gravity = FreeVector::new(0.0, -10.0);
    let id = insert_at(&mut scene, "stone", 0.0, 0.0, body);

    run(&mut scene, 60);

    let dt = 1.0 / 60.0;
    // Velocity is updated before position, so the sum includes the last tick's velocity.
    let expected_y = -10.0 * dt * dt * (60.0 * 61.0 / 2.0);
    let position = scene.pose(id).unwrap().position;
    assert!((position.y - expected_y).abs() < 1e-4, "{position:?}");
    assert!((scene.velocity(id).unwrap().y + 10.0).abs() < 1e-4);
    assert_eq!(position.x, 0.0);
}

#[test]
fn ball_comes_to_rest_on_floor() {
    let mut scene = Scene::new();
    let mut body = ball(0.5, 1.0, Material::DEFAULT);
    body.gravity = FreeVector::new(0.0, -10.0);
    let id = insert_at(&mut scene, "ball", 0.0, 2.0, body);
    insert_at(&mut scene, "floor", 0.0, 0.0, floor(Material::DEFAULT));

    run(&mut scene, 600);

    let y = scene.pose(id).unwrap().position.y;
    assert!(y > 0.4 && y < 0.55, "ball fell through or floated: y = {y}");
    assert!(scene.velocity(id).unwrap().y.abs() < 0.5);
    // Nothing pushes sideways or spins a ball dropped straight down.
    assert_eq!(scene.velocity(id).unwrap().x, 0.0);
    assert_eq!(scene.angular_speed(id).unwrap(), 0.0);
}

#[test]
fn elastic_balls_exchange_velocities() {
    let elastic = Material::new(1.0, 0.0, 0.0).unwrap();
    let mut scene = Scene::new();
    let a = insert_at(&mut scene, "a", -3.0, 0.0, ball(1.0, 1.0, elastic));
    let b = insert_at(&mut scene, "b", 3.0, 0.0, ball(1.0, 1.0, elastic));
    scene.set_velocity(a, FreeVector::new(6.0, 0.0)).unwrap();
    scene.set_velocity(b, FreeVector::new(-6.0, 0.0)).unwrap();

    let mut resolved = 0;
    for _ in 0..60 {
        resolved += scene.step().physics.resolved;
    }

    assert_eq!(resolved, 1);
    let va = scene.velocity(a).unwrap();
    let vb = scene.velocity(b).unwrap();
    assert!((va - FreeVector::new(-6.0, 0.0)).length() < 1e-9, "{va:?}");
    assert!((vb - FreeVector::new(6.0, 0.0)).length() < 1e-9, "{vb:?}");
    let xa = scene.pose(a).unwrap().position.x;
    let xb = scene.pose(b).unwrap().position.x;
    assert!((xa + xb).abs() < 1e-9, "not symmetric: {xa} {xb}");
}

#[test]
fn heavy_ball_barely_slows() {
    let elastic = Material::new(1.0, 0.0, 0.0).unwrap();
    let mut scene = Scene::new();
    let heavy = insert_at(&mut scene, "heavy", -3.0, 0.0, ball(1.0, 1000.0, elastic));
    let light = insert_at(&mut scene, "light", 0.0, 0.0, ball(1.0, 1.0, elastic));
    scene.set_velocity(heavy, FreeVector::new(6.0, 0.0)).unwrap();

    run(&mut scene, 60);

    let momentum =
        scene.velocity(heavy).unwrap() * 1000.0 + scene.velocity(light).unwrap() * 1.0;
    assert!((momentum.x - 6000.0).abs() < 1e-6, "{momentum:?}");
    assert!(scene.velocity(heavy).unwrap().x > 5.9);
    assert!(scene.velocity(light).unwrap().x > 11.0);
}

#[test]
fn sensor_reports_without_deflecting() {
    let mut scene = Scene::new();
    let mut zone = RigidBody::new();
    zone.set_mass(f64::INFINITY).unwrap();
    zone.shapes.push(
        Shape::circle(2.0, FreePoint::origin())
            .unwrap()
            .with_role(ShapeRole::Sensor),
    );
    let zone = insert_at(&mut scene, "zone", 0.0, 0.0, zone);
    let runner = insert_at(&mut scene, "runner", -5.0, 0.0, ball(0.5, 1.0, Material::DEFAULT));
    scene.set_velocity(runner, FreeVector::new(6.0, 0.0)).unwrap();

    let mut overlaps = Vec::new();
    for _ in 0..120 {
        overlaps.extend(scene.step().physics.sensor_overlaps);
    }

    assert!(!overlaps.is_empty());
    assert!(overlaps.iter().all(|c| c.sensor && c.a.entity == zone && c.b.entity == runner));
    assert_eq!(scene.velocity(runner).unwrap(), FreeVector::new(6.0, 0.0));
    assert!(scene.pose(runner).unwrap().position.x > 5.0);
}

#[test]
fn disjoint_layers_do_not_collide() {
    let mut scene = Scene::new();
    let a = scene
        .insert(
            "a",
            EntityBuilder::new()
                .layers(LayerMask::layer(1).unwrap())
                .body(ball(1.0, 1.0, Material::DEFAULT)),
        )
        .unwrap();
    scene
        .insert(
            "b",
            EntityBuilder::new()
                .position(FreePoint::new(0.5, 0.0))
                .layers(LayerMask::layer(2).unwrap())
                .body(ball(1.0, 1.0, Material::DEFAULT)),
        )
        .unwrap();

    let info = scene.step();

    assert_eq!(info.physics.pairs_considered, 0);
    assert_eq!(info.physics.contacts, 0);
    assert_eq!(scene.pose(a).unwrap().position, FreePoint::origin());
}

#[test]
fn drag_slows_without_turning() {
    let mut scene = Scene::new();
    let mut body = RigidBody::new();
    body.drag = Drag::new(0.01, 2.0, DragModel::Omnidirectional).unwrap();
    let id = insert_at(&mut scene, "kite", 0.0, 0.0, body);
    scene.set_velocity(id, FreeVector::new(10.0, 0.0)).unwrap();

    let mut previous = 10.0;
    for _ in 0..10 {
        scene.step();
        let speed = scene.velocity(id).unwrap().x;
        assert!(speed < previous && speed > 0.0, "{speed} after {previous}");
        previous = speed;
    }
    assert_eq!(scene.velocity(id).unwrap().y, 0.0);
    assert_eq!(scene.angular_speed(id).unwrap(), 0.0);
}

#[test]
fn step_rate_from_config() {
    let mut config = PhysicsConfig::DEFAULT;
    config.fixed_step_hz = pos64(30.0);
    let mut scene = Scene::with_config(config).unwrap();
    let id = insert_at(&mut scene, "a", 0.0, 0.0, RigidBody::new());
    scene.set_velocity(id, FreeVector::new(1.0, 0.0)).unwrap();

    run(&mut scene, 30);

    assert!((scene.pose(id).unwrap().position.x - 1.0).abs() < 1e-6);
}

#[test]
fn children_ride_along() {
    let mut scene = Scene::new();
    let cart = insert_at(&mut scene, "cart", 0.0, 0.0, RigidBody::new());
    let flag = scene
        .insert(
            "flag",
            EntityBuilder::new()
                .position(FreePoint::new(0.0, 1.0))
                .parent(cart),
        )
        .unwrap();
    scene.set_velocity(cart, FreeVector::new(2.0, 0.0)).unwrap();
    scene.set_angular_speed(cart, 1.0).unwrap();

    run(&mut scene, 60);

    let cart_pose = scene.pose(cart).unwrap();
    let flag_pose = scene.pose(flag).unwrap();
    assert!((cart_pose.position.x - 2.0).abs() < 1e-6);
    // The flag stays one unit "up" from the cart, in the cart's rotating frame.
    let offset = flag_pose.position - cart_pose.position;
    assert!((offset - cart_pose.up()).length() < 1e-9, "{offset:?}");
    assert!((scene.angular_speed(flag).unwrap() - 1.0).abs() < 1e-12);
}

#[test]
fn step_info_status_text() {
    let mut scene = Scene::new();
    insert_at(&mut scene, "a", 0.0, 0.0, ball(1.0, 1.0, Material::DEFAULT));
    insert_at(&mut scene, "b", 1.0, 0.0, ball(1.0, 1.0, Material::DEFAULT));
    let text = scene.step().refmt(&StatusText::ALL).to_string();
    assert!(text.contains("Bodies: 2"), "{text}");
    assert!(text.contains("Contacts: 1"), "{text}");
}
