//! Overlays drawn on top of the canvas: the pause screen and the win banner.
//!
//! The win banner appears the first time the level is cleared and is removed when the player
//! falls and the level restarts. Clearing the level again re-shows it.

use bevy::prelude::*;

use crate::simulation::{LevelCleared, PlayerFell};
use crate::state::GameState;

/// Registers overlay spawn/despawn systems.
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Paused), spawn_pause_menu)
            .add_systems(OnExit(GameState::Paused), despawn_pause_menu)
            .add_systems(
                Update,
                (show_win_banner, clear_win_banner.after(show_win_banner))
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

#[derive(Component)]
struct PauseMenu;

#[derive(Component)]
struct WinBanner;

fn full_screen_node(background: Color) -> NodeBundle {
    NodeBundle {
        background_color: BackgroundColor(background),
        style: Style {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            align_items: AlignItems::Center,
            justify_content: JustifyContent::Center,
            ..default()
        },
        ..default()
    }
}

/// Dims the frozen frame and tells the player how to resume.
fn spawn_pause_menu(mut commands: Commands) {
    commands
        .spawn((
            PauseMenu,
            Name::new("PauseMenu"),
            full_screen_node(Color::srgba(0.0, 0.0, 0.0, 0.6)),
        ))
        .with_children(|parent| {
            parent.spawn(TextBundle::from_section(
                "Paused\nPress ESC to resume",
                TextStyle {
                    font_size: 36.0,
                    color: Color::srgba(0.9, 0.9, 0.9, 1.0),
                    ..default()
                },
            ));
        });
}

fn despawn_pause_menu(mut commands: Commands, query: Query<Entity, With<PauseMenu>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}

/// Shows the banner on the first `LevelCleared` of a run.
fn show_win_banner(
    mut commands: Commands,
    mut cleared: EventReader<LevelCleared>,
    banner: Query<(), With<WinBanner>>,
) {
    if cleared.read().last().is_none() || !banner.is_empty() {
        return;
    }

    info!("You win!");
    commands
        .spawn((
            WinBanner,
            Name::new("WinBanner"),
            full_screen_node(Color::NONE),
        ))
        .with_children(|parent| {
            parent.spawn(TextBundle::from_section(
                "You win!",
                TextStyle {
                    font_size: 64.0,
                    color: Color::srgb(0.1, 0.1, 0.1),
                    ..default()
                },
            ));
        });
}

/// A restart wipes the banner.
fn clear_win_banner(
    mut commands: Commands,
    mut fell: EventReader<PlayerFell>,
    banner: Query<Entity, With<WinBanner>>,
) {
    if fell.read().last().is_none() {
        return;
    }
    for entity in &banner {
        commands.entity(entity).despawn_recursive();
    }
}
