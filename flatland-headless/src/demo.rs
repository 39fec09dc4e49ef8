//! The scene the runner simulates: two balls bouncing around inside a square box.

use flatland::math::{Angle, FreePoint, FreeVector, LayerMask};
use flatland::physics::{Material, PhysicsConfig, RigidBody, Shape};
use flatland::scene::{Camera, EntityBuilder, EntityId, Scene, SpriteId};

/// Half the side length of the box.
pub(crate) const HALF_WIDTH: f64 = 10.0;

const BALL_RADIUS: f64 = 1.5;

fn ball(gravity: f64) -> Result<RigidBody, anyhow::Error> {
    let mut body = RigidBody::new();
    body.set_mass(5.0)?;
    body.set_moment_of_inertia(5.0)?;
    body.gravity = FreeVector::new(0.0, -gravity);
    body.shapes.push(
        Shape::circle(BALL_RADIUS, FreePoint::origin())?
            .with_material(Material::DEFAULT.with_bounciness(0.3)?),
    );
    Ok(body)
}

fn wall(angle: Angle) -> Result<RigidBody, anyhow::Error> {
    let mut body = RigidBody::new();
    body.set_mass(f64::INFINITY)?;
    body.set_moment_of_inertia(f64::INFINITY)?;
    body.shapes.push(
        Shape::segment(HALF_WIDTH * 2.0, FreePoint::origin(), angle)?
            .with_material(Material::DEFAULT.with_bounciness(1.0)?),
    );
    Ok(body)
}

/// Builds the demo scene, returning it and the camera that sees all of it.
pub(crate) fn demo_scene(
    config: PhysicsConfig,
    gravity: f64,
) -> Result<(Scene, EntityId), anyhow::Error> {
    let mut scene = Scene::with_config(config)?;

    let walls = [
        ("floor", FreePoint::new(0.0, -HALF_WIDTH), Angle::ZERO),
        ("ceiling", FreePoint::new(0.0, HALF_WIDTH), Angle::ZERO),
        ("left wall", FreePoint::new(-HALF_WIDTH, 0.0), Angle::HALF_PI),
        ("right wall", FreePoint::new(HALF_WIDTH, 0.0), Angle::HALF_PI),
    ];
    for (name, position, angle) in walls {
        scene.insert(
            name,
            EntityBuilder::new()
                .position(position)
                .body(wall(angle)?)
                .sprite(SpriteId(0)),
        )?;
    }

    let balls = [
        ("left ball", FreePoint::new(-4.0, 3.0), FreeVector::new(5.0, 0.0)),
        ("right ball", FreePoint::new(4.0, 5.0), FreeVector::new(-3.0, 2.0)),
    ];
    for (name, position, velocity) in balls {
        let id = scene.insert(
            name,
            EntityBuilder::new()
                .position(position)
                .body(ball(gravity)?)
                .sprite(SpriteId(1)),
        )?;
        scene.set_velocity(id, velocity)?;
    }

    let camera = scene.insert(
        "camera",
        EntityBuilder::new()
            .layers(LayerMask::all())
            .camera(Camera::new(1.0)?),
    )?;
    scene.set_current_camera(camera)?;

    log::debug!("built demo scene with {} entities", scene.len());
    Ok((scene, camera))
}
