//! App-level states and the per-frame system sets. Switching states only swaps an enum value and
//! runs the matching on-enter/on-exit schedules.

use bevy::input::keyboard::KeyCode;
use bevy::prelude::*;

/// Owns the `GameState` machine and the ordering of the per-frame sets. Input and the simulation
/// step only run while `Playing`; presenting keeps running while paused so the last frame stays
/// on screen under the pause overlay.
pub struct GameFlowPlugin;

impl Plugin for GameFlowPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .configure_sets(
                Update,
                (GameSet::Input, GameSet::Simulation, GameSet::Present).chain(),
            )
            .configure_sets(
                Update,
                (GameSet::Input, GameSet::Simulation).run_if(in_state(GameState::Playing)),
            )
            .add_systems(Update, toggle_pause);
    }
}

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum GameState {
    /// Textures in flight; nothing to simulate yet.
    #[default]
    Loading,
    Playing,
    Paused,
}

/// Named system sets that order each frame: read input, step the simulation, present the frame.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum GameSet {
    Input,
    Simulation,
    Present,
}

/// Escape flips between playing and paused. Ignored while textures are still loading.
fn toggle_pause(
    keyboard: Res<ButtonInput<KeyCode>>,
    state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if !keyboard.just_pressed(KeyCode::Escape) {
        return;
    }

    let next = match state.get() {
        GameState::Playing => GameState::Paused,
        GameState::Paused => GameState::Playing,
        GameState::Loading => return,
    };
    next_state.set(next);
}
