//! The fixed camera looking at the canvas. The world never follows the player; scrolling is done
//! by moving the level, so the camera only needs to frame the 1024×576 canvas and letterbox it
//! when the window's aspect ratio differs.

use bevy::prelude::*;
use bevy::render::camera::ScalingMode;

use crate::config::GameConfig;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_canvas_camera);
    }
}

/// Marker for the camera that frames the canvas.
#[derive(Component)]
pub struct CanvasCamera;

fn canvas_projection(config: &GameConfig) -> OrthographicProjection {
    let mut projection = Camera2dBundle::default().projection;
    projection.scaling_mode = ScalingMode::AutoMin {
        min_width: config.canvas_width,
        min_height: config.canvas_height,
    };
    projection
}

/// Spawned once at startup; the canvas is letterboxed into whatever window size is current.
fn spawn_canvas_camera(mut commands: Commands, config: Res<GameConfig>) {
    commands.spawn((
        Name::new("CanvasCamera"),
        Camera2dBundle {
            projection: canvas_projection(&config),
            ..default()
        },
        CanvasCamera,
    ));
}
