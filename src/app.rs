//! High-level plugin composition.
//!
//! `SideScrollerPlugin` registers every domain plugin and fixes the order of per-frame work.
//! Each subsystem owns its own resources; this plugin only wires them together.

use bevy::prelude::*;

use crate::assets::SpriteAssetsPlugin;
use crate::camera::CameraPlugin;
use crate::config::ConfigPlugin;
use crate::input::ControlsPlugin;
use crate::render::CanvasPlugin;
use crate::simulation::SimulationPlugin;
use crate::state::GameFlowPlugin;
use crate::ui::UiPlugin;

pub struct SideScrollerPlugin;

impl Plugin for SideScrollerPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            GameFlowPlugin,     // States + Input -> Simulation -> Present ordering.
            ConfigPlugin,       // Tunables, read before anything else needs them.
            SpriteAssetsPlugin, // Texture loading + natural image sizes.
            CameraPlugin,       // Fixed letterboxed canvas camera.
            ControlsPlugin,     // Keyboard edges -> control events.
            SimulationPlugin,   // One step per frame.
            CanvasPlugin,       // Draw calls -> sprites.
            UiPlugin,           // Pause and win overlays.
        ));
    }
}
