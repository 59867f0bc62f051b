use std::collections::HashMap;

use bevy::prelude::*;

use crate::simulation::engine::Simulation;
use crate::simulation::render::{self, RenderBody};
use crate::simulation::scenario::Scenario;
use crate::simulation::states::{BodyId, NVec3};

/// Component tagging each sphere with the body it draws
#[derive(Component)]
struct BodyMarker(BodyId);

/// World-space → view-space scaling factor for positions and radii
const VIEW_SCALE: f32 = 0.05;

/// Smallest sphere drawn, in view units, so black holes stay visible
const MIN_VIEW_RADIUS: f32 = 0.05;

/// Live simulation plus the camera origin the snapshot is taken from
#[derive(Resource)]
struct Live {
    sim: Simulation,
    camera: NVec3,
}

/// Open a bevy window and run the scenario until it is closed
pub fn run_viewer(scenario: Scenario) {
    log::info!("starting viewer with {} bodies", scenario.state.body_count());

    let camera = scenario.camera;
    App::new()
        .insert_resource(Live {
            sim: scenario.into_simulation(),
            camera,
        })
        .add_plugins(DefaultPlugins)
        .add_systems(Startup, setup)
        // controls, then the frame (and any due recentering), then the hand-off
        .add_systems(Update, (controls, physics_tick, sync_bodies).chain())
        .run();
}

fn setup(mut commands: Commands) {
    commands.spawn(Camera3dBundle {
        camera: Camera {
            clear_color: ClearColorConfig::Custom(Color::srgb(0.0, 0.0, 0.0)),
            ..Default::default()
        },
        transform: Transform::from_xyz(0.0, 0.0, 0.0).looking_at(Vec3::Z, Vec3::Y),
        ..Default::default()
    });

    commands.spawn(PointLightBundle {
        point_light: PointLight {
            intensity: 1500.0,
            range: 1000.0,
            ..Default::default()
        },
        ..Default::default()
    });
}

/// R / T slow down and speed up while held, Space toggles the simulation
fn controls(keys: Res<ButtonInput<KeyCode>>, mut live: ResMut<Live>) {
    let state = &mut live.sim.state;
    if keys.pressed(KeyCode::KeyR) {
        render::slow_down(state);
    }
    if keys.pressed(KeyCode::KeyT) {
        render::speed_up(state);
    }
    if keys.just_pressed(KeyCode::Space) {
        render::toggle_enabled(state);
    }
}

fn physics_tick(time: Res<Time>, mut live: ResMut<Live>) {
    let report = live.sim.tick(time.delta());
    if report.recentered {
        let t = render::telemetry(&live.sim.state);
        log::info!(
            "{} | bodies: {} | running: {}",
            render::speed_label(t.sim_speed),
            t.body_count,
            t.sim_enabled
        );
    }
}

fn to_view(v: NVec3) -> Vec3 {
    Vec3::new(v.x as f32, v.y as f32, v.z as f32) * VIEW_SCALE
}

fn material_for(rb: &RenderBody) -> StandardMaterial {
    StandardMaterial {
        base_color: Color::srgb(rb.color.r, rb.color.g, rb.color.b),
        unlit: true,
        ..Default::default()
    }
}

/// Keep one sphere per surviving body: despawn absorbed or culled bodies,
/// spawn new ones, move the rest
fn sync_bodies(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    live: Res<Live>,
    mut query: Query<(Entity, &BodyMarker, &mut Transform)>,
) {
    let mut pending: HashMap<BodyId, RenderBody> = live
        .sim
        .state
        .bodies
        .iter()
        .map(|b| (b.id, RenderBody::from_body(b, live.camera)))
        .collect();

    for (entity, BodyMarker(id), mut transform) in &mut query {
        match pending.remove(id) {
            Some(rb) => {
                transform.translation = to_view(rb.position);
                // radius grows on merges; the unit mesh is scaled instead of rebuilt
                transform.scale = Vec3::splat(((rb.radius as f32) * VIEW_SCALE).max(MIN_VIEW_RADIUS));
            }
            None => commands.entity(entity).despawn(),
        }
    }

    for (id, rb) in pending {
        commands.spawn((
            PbrBundle {
                mesh: meshes.add(Sphere::new(1.0).mesh()),
                material: materials.add(material_for(&rb)),
                transform: Transform::from_translation(to_view(rb.position))
                    .with_scale(Vec3::splat(((rb.radius as f32) * VIEW_SCALE).max(MIN_VIEW_RADIUS))),
                ..Default::default()
            },
            BodyMarker(id),
        ));
    }
}
