//! Keyboard handling. The keyboard side only publishes press/release edges as `ControlEvent`s;
//! the simulation folds them into `Controls` at the start of its tick, so there is exactly one
//! writer of the held-key state.

use bevy::input::keyboard::KeyCode;
use bevy::prelude::*;

use crate::state::{GameSet, GameState};

pub struct ControlsPlugin;

impl Plugin for ControlsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Controls>()
            .add_event::<ControlEvent>()
            .add_systems(Update, read_keyboard.in_set(GameSet::Input))
            .add_systems(OnExit(GameState::Paused), resync_controls);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    /// Reported but not used by the game.
    Down,
    Jump,
}

impl Key {
    pub const ALL: [Key; 4] = [Key::Left, Key::Right, Key::Down, Key::Jump];

    /// Physical keys bound to this logical key. Any of them holds it down.
    pub fn key_codes(self) -> &'static [KeyCode] {
        match self {
            Key::Left => &[KeyCode::KeyA, KeyCode::ArrowLeft],
            Key::Right => &[KeyCode::KeyD, KeyCode::ArrowRight],
            Key::Down => &[KeyCode::KeyS, KeyCode::ArrowDown],
            Key::Jump => &[KeyCode::KeyW, KeyCode::ArrowUp, KeyCode::Space],
        }
    }

    fn held(self, keyboard: &ButtonInput<KeyCode>) -> bool {
        keyboard.any_pressed(self.key_codes().iter().copied())
    }

    /// Edges of the logical key this frame. The bound keys act as one button: pressing a second
    /// binding while the first is held, or releasing one while another is still down, is not an
    /// edge. A binding pressed and released within the same frame yields both edges.
    pub fn edges(self, keyboard: &ButtonInput<KeyCode>) -> (bool, bool) {
        let codes = self.key_codes();
        let held_before = codes.iter().any(|code| {
            (keyboard.pressed(*code) || keyboard.just_released(*code))
                && !keyboard.just_pressed(*code)
        });
        let held_now = self.held(keyboard);
        let tapped = keyboard.any_just_pressed(codes.iter().copied());

        let pressed = !held_before && (held_now || tapped);
        let released = !held_now && (held_before || tapped);
        (pressed, released)
    }
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    Pressed(Key),
    Released(Key),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    None,
    Left,
    Right,
}

/// Held-key state. `last_direction` only steers the animation, never movement.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
    pub last_direction: Direction,
    jump_held: bool,
}

impl Controls {
    /// Folds one edge into the held state. Returns true when the edge should fire a jump: a jump
    /// press with no earlier jump press still held, so auto-repeat cannot chain jumps.
    pub fn apply(&mut self, event: ControlEvent) -> bool {
        match event {
            ControlEvent::Pressed(Key::Left) => {
                self.left = true;
                self.last_direction = Direction::Left;
            }
            ControlEvent::Pressed(Key::Right) => {
                self.right = true;
                self.last_direction = Direction::Right;
            }
            ControlEvent::Pressed(Key::Jump) => {
                let fire = !self.jump_held;
                self.jump_held = true;
                return fire;
            }
            ControlEvent::Released(Key::Left) => self.left = false,
            ControlEvent::Released(Key::Right) => self.right = false,
            ControlEvent::Released(Key::Jump) => self.jump_held = false,
            ControlEvent::Pressed(Key::Down) | ControlEvent::Released(Key::Down) => {}
        }
        false
    }
}

/// Publishes one press/release edge per logical key per frame.
fn read_keyboard(keyboard: Res<ButtonInput<KeyCode>>, mut events: EventWriter<ControlEvent>) {
    for key in Key::ALL {
        let (pressed, released) = key.edges(&keyboard);
        if pressed {
            debug!("{:?} pressed", key);
            events.send(ControlEvent::Pressed(key));
        }
        if released {
            events.send(ControlEvent::Released(key));
        }
    }
}

/// Keys can change while paused without any edges reaching the game. Re-read what is actually
/// held when play resumes so no key stays stuck.
fn resync_controls(keyboard: Res<ButtonInput<KeyCode>>, mut controls: ResMut<Controls>) {
    controls.left = Key::Left.held(&keyboard);
    controls.right = Key::Right.held(&keyboard);
    controls.jump_held = Key::Jump.held(&keyboard);
}

#[cfg(test)]
mod tests {
    use bevy::ecs::event::Events;

    use super::*;

    #[test]
    fn presses_set_held_state_and_last_direction() {
        let mut controls = Controls::default();
        controls.apply(ControlEvent::Pressed(Key::Right));
        controls.apply(ControlEvent::Pressed(Key::Left));
        assert!(controls.left && controls.right);
        assert_eq!(controls.last_direction, Direction::Left);

        controls.apply(ControlEvent::Released(Key::Left));
        assert!(!controls.left);
        assert_eq!(controls.last_direction, Direction::Left);
    }

    #[test]
    fn jump_fires_once_per_press() {
        let mut controls = Controls::default();
        assert!(controls.apply(ControlEvent::Pressed(Key::Jump)));
        assert!(!controls.apply(ControlEvent::Pressed(Key::Jump)));
        assert!(!controls.apply(ControlEvent::Pressed(Key::Jump)));
        controls.apply(ControlEvent::Released(Key::Jump));
        assert!(controls.apply(ControlEvent::Pressed(Key::Jump)));
    }

    #[test]
    fn down_is_ignored() {
        let mut controls = Controls::default();
        assert!(!controls.apply(ControlEvent::Pressed(Key::Down)));
        assert_eq!(controls, Controls::default());
    }

    #[test]
    fn keyboard_edges_become_control_events() {
        let mut app = App::new();
        app.init_resource::<ButtonInput<KeyCode>>()
            .add_event::<ControlEvent>()
            .add_systems(Update, read_keyboard);

        {
            let mut keyboard = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
            keyboard.press(KeyCode::KeyD);
            keyboard.press(KeyCode::Space);
            keyboard.press(KeyCode::KeyQ);
        }
        app.update();

        let events = app.world().resource::<Events<ControlEvent>>();
        let mut reader = events.get_reader();
        let mut seen: Vec<_> = reader.read(events).copied().collect();
        seen.sort_by_key(|event| format!("{:?}", event));
        assert_eq!(
            seen,
            vec![
                ControlEvent::Pressed(Key::Jump),
                ControlEvent::Pressed(Key::Right),
            ]
        );
    }

    #[test]
    fn resuming_picks_up_keys_released_while_paused() {
        let mut app = App::new();
        app.init_resource::<ButtonInput<KeyCode>>()
            .insert_resource(Controls {
                right: true,
                last_direction: Direction::Right,
                ..default()
            })
            .add_systems(Update, resync_controls);

        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::ArrowLeft);
        app.update();

        let controls = app.world().resource::<Controls>();
        assert!(controls.left);
        assert!(!controls.right);
        assert_eq!(controls.last_direction, Direction::Right);
    }

    /// Folds published edges into `Controls` the way the simulation does at the top of a tick.
    fn fold_events(mut events: EventReader<ControlEvent>, mut controls: ResMut<Controls>) {
        for event in events.read() {
            controls.apply(*event);
        }
    }

    fn keyboard_app() -> App {
        let mut app = App::new();
        app.init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<Controls>()
            .add_event::<ControlEvent>()
            .add_systems(Update, (read_keyboard, fold_events).chain());
        app
    }

    /// Starts a new input frame (clearing last frame's edges), applies `change`, then updates.
    fn frame(app: &mut App, change: impl FnOnce(&mut ButtonInput<KeyCode>)) {
        {
            let mut keyboard = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
            keyboard.clear();
            change(&mut keyboard);
        }
        app.update();
    }

    #[test]
    fn releasing_one_binding_keeps_the_key_held_by_the_other() {
        let mut app = keyboard_app();

        frame(&mut app, |keys| keys.press(KeyCode::KeyA));
        frame(&mut app, |keys| keys.press(KeyCode::ArrowLeft));
        frame(&mut app, |keys| keys.release(KeyCode::KeyA));
        assert!(app.world().resource::<Controls>().left);

        frame(&mut app, |keys| keys.release(KeyCode::ArrowLeft));
        assert!(!app.world().resource::<Controls>().left);
    }

    #[test]
    fn switching_jump_bindings_does_not_rearm_the_jump() {
        let mut app = keyboard_app();

        frame(&mut app, |keys| keys.press(KeyCode::KeyW));
        frame(&mut app, |keys| keys.press(KeyCode::Space));
        frame(&mut app, |keys| keys.release(KeyCode::KeyW));
        assert!(app.world().resource::<Controls>().jump_held);

        let mut controls = app.world().resource::<Controls>().clone();
        assert!(!controls.apply(ControlEvent::Pressed(Key::Jump)));
    }

    #[test]
    fn a_second_binding_is_not_a_new_press() {
        let mut keyboard = ButtonInput::<KeyCode>::default();
        keyboard.press(KeyCode::KeyD);
        assert_eq!(Key::Right.edges(&keyboard), (true, false));

        keyboard.clear();
        keyboard.press(KeyCode::ArrowRight);
        assert_eq!(Key::Right.edges(&keyboard), (false, false));

        keyboard.clear();
        keyboard.release(KeyCode::KeyD);
        keyboard.release(KeyCode::ArrowRight);
        assert_eq!(Key::Right.edges(&keyboard), (false, true));
    }

    #[test]
    fn a_tap_within_one_frame_reports_both_edges() {
        let mut keyboard = ButtonInput::<KeyCode>::default();
        keyboard.press(KeyCode::Space);
        keyboard.release(KeyCode::Space);
        assert_eq!(Key::Jump.edges(&keyboard), (true, true));
    }
}
