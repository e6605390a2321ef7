//! Application entry point: composes the Bevy runtime, window configuration and the game plugin.
//!
//! The playfield is a 1024×576 canvas. The window opens at that size and can be resized; the
//! camera letterboxes so the canvas keeps its 16:9 shape.

mod app;
mod assets;
mod camera;
mod collision;
mod config;
mod input;
mod level;
mod movement;
mod player;
mod render;
mod simulation;
mod state;
mod ui;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod wasm;

use app::SideScrollerPlugin;
use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use bevy::window::{Window, WindowResizeConstraints, WindowResolution};

fn main() {
    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    wasm::set_panic_hook();

    let primary_window = Window {
        title: "Side Scroller".to_string(),
        resolution: WindowResolution::new(1024.0, 576.0),
        resizable: true,
        resize_constraints: WindowResizeConstraints {
            min_width: 512.0,
            min_height: 288.0,
            max_width: f32::INFINITY,
            max_height: f32::INFINITY,
        },
        canvas: cfg!(all(target_arch = "wasm32", feature = "web"))
            .then(|| "#bevy-canvas".to_owned()),
        ..default()
    };

    // Sprite strips are scaled down a lot, so keep linear filtering rather than nearest.
    let default_plugins = DefaultPlugins
        .set(WindowPlugin {
            primary_window: Some(primary_window),
            ..default()
        })
        .set(AssetPlugin {
            file_path: "assets".to_owned(),
            watch_for_changes_override: Some(cfg!(not(target_arch = "wasm32"))),
            ..default()
        });

    App::new()
        .add_plugins(default_plugins)
        .add_plugins(SideScrollerPlugin)
        .run();
}
