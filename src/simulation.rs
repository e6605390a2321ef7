//! The per-frame step. `Simulation` owns the level and the player outright; the Bevy system below
//! feeds it input edges, runs one step per rendered frame, and turns the outcome into events.
//!
//! A step always runs in the same order: clear, draw the level, advance and draw the player, move
//! it, then walk or scroll, land on platforms, pick a pose, and finally check for a win or a fall.

use bevy::prelude::*;

use crate::assets::ImageMetrics;
use crate::collision;
use crate::config::GameConfig;
use crate::input::{ControlEvent, Controls};
use crate::level::{self, Level};
use crate::movement::{self, Stride};
use crate::player::Player;
use crate::render::{Canvas, FrameBuffer};
use crate::state::{GameSet, GameState};

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<LevelCleared>()
            .add_event::<PlayerFell>()
            .add_systems(OnExit(GameState::Loading), start_simulation)
            .add_systems(
                Update,
                advance_simulation
                    .in_set(GameSet::Simulation)
                    .run_if(resource_exists::<Simulation>),
            );
    }
}

/// Sent every frame the scroll offset is past the finish line. Play carries on regardless.
#[derive(Event, Debug, Clone, Copy)]
pub struct LevelCleared;

/// Sent when the player dropped below the canvas and the level was rebuilt.
#[derive(Event, Debug, Clone, Copy)]
pub struct PlayerFell;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    pub won: bool,
    pub restarted: bool,
}

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct Simulation {
    pub level: Level,
    pub player: Player,
    finish_line: f32,
}

impl Simulation {
    pub fn new(config: &GameConfig, metrics: &ImageMetrics) -> Self {
        Self {
            level: Level::build(metrics),
            player: Player::spawn(config),
            finish_line: level::finish_line(metrics),
        }
    }

    pub fn finish_line(&self) -> f32 {
        self.finish_line
    }

    /// Throws away the current level and player and starts over.
    pub fn restart(&mut self, config: &GameConfig, metrics: &ImageMetrics) {
        *self = Self::new(config, metrics);
    }

    /// Folds one input edge into `controls`, kicking the player upward on a fresh jump press.
    pub fn handle(&mut self, event: ControlEvent, controls: &mut Controls, config: &GameConfig) {
        if controls.apply(event) {
            self.player.jump(config.jump_impulse);
        }
    }

    pub fn step(
        &mut self,
        controls: &Controls,
        config: &GameConfig,
        metrics: &ImageMetrics,
        canvas: &mut impl Canvas,
    ) -> StepReport {
        canvas.clear(config.canvas_size());
        self.level.draw(canvas);

        let player = &mut self.player;
        player.advance_frame(config);
        player.draw(canvas, config.strip_height);
        player.integrate_position();
        player.apply_gravity(config.gravity, config.canvas_height);

        if movement::walk_or_scroll(player, &mut self.level, controls, config) == Stride::Scroll {
            debug!("scroll offset {}", self.level.scroll_offset);
        }
        collision::resolve_landings(player, &self.level.platforms);
        player.select_pose(controls, config);

        let mut report = StepReport {
            won: self.level.scroll_offset > self.finish_line,
            restarted: false,
        };

        if self.player.position.y > config.canvas_height {
            self.restart(config, metrics);
            report.restarted = true;
        }

        report
    }
}

/// Builds the level from the measured image sizes once loading ends.
fn start_simulation(
    mut commands: Commands,
    config: Res<GameConfig>,
    metrics: Res<ImageMetrics>,
) {
    let simulation = Simulation::new(&config, &metrics);
    info!(
        "Level built with {} platforms; finish line at {}",
        simulation.level.platforms.len(),
        simulation.finish_line()
    );
    commands.insert_resource(simulation);
}

/// One tick per frame: fold this frame's key edges into `Controls`, step, then publish the outcome.
#[allow(clippy::too_many_arguments)]
fn advance_simulation(
    mut control_events: EventReader<ControlEvent>,
    mut controls: ResMut<Controls>,
    mut simulation: ResMut<Simulation>,
    mut frame: ResMut<FrameBuffer>,
    config: Res<GameConfig>,
    metrics: Res<ImageMetrics>,
    mut cleared: EventWriter<LevelCleared>,
    mut fell: EventWriter<PlayerFell>,
) {
    for event in control_events.read() {
        simulation.handle(*event, &mut controls, &config);
    }

    let report = simulation.step(&controls, &config, &metrics, &mut *frame);
    if report.won {
        cleared.send(LevelCleared);
    }
    if report.restarted {
        info!("Player fell off the level; restarting.");
        fell.send(PlayerFell);
    }
}

#[cfg(test)]
mod tests {
    use bevy::ecs::event::Events;

    use super::*;
    use crate::input::{Direction, Key};
    use crate::player::Pose;
    use crate::render::DrawCommand;

    struct Harness {
        simulation: Simulation,
        controls: Controls,
        config: GameConfig,
        metrics: ImageMetrics,
        frame: FrameBuffer,
    }

    impl Harness {
        fn new() -> Self {
            let config = GameConfig::default();
            let metrics = ImageMetrics::fallback();
            Self {
                simulation: Simulation::new(&config, &metrics),
                controls: Controls::default(),
                config,
                metrics,
                frame: FrameBuffer::default(),
            }
        }

        fn send(&mut self, event: ControlEvent) {
            self.simulation
                .handle(event, &mut self.controls, &self.config);
        }

        fn step(&mut self) -> StepReport {
            self.simulation
                .step(&self.controls, &self.config, &self.metrics, &mut self.frame)
        }

        /// Puts the player's feet on the first ground platform, at rest.
        fn stand_on_ground(&mut self, x: f32) {
            let player = &mut self.simulation.player;
            player.position = Vec2::new(x, 470.0 - player.height);
            player.velocity = Vec2::ZERO;
        }

        fn platform_xs(&self) -> Vec<f32> {
            self.simulation
                .level
                .platforms
                .iter()
                .map(|platform| platform.position.x)
                .collect()
        }

        fn player_crop(&self) -> Rect {
            self.frame
                .visible()
                .iter()
                .find_map(|command| match command {
                    DrawCommand::Cropped { source, .. } => Some(*source),
                    _ => None,
                })
                .expect("player drawn every frame")
        }
    }

    #[test]
    fn falling_accelerates_by_gravity_each_frame() {
        let mut harness = Harness::new();
        let mut last = harness.simulation.player.velocity.y;
        for _ in 0..10 {
            harness.step();
            let now = harness.simulation.player.velocity.y;
            assert_eq!(now, last + 0.5);
            last = now;
        }
    }

    #[test]
    fn the_player_comes_to_rest_on_the_ground() {
        let mut harness = Harness::new();
        for _ in 0..120 {
            harness.step();
        }
        let player = &harness.simulation.player;
        assert_eq!(player.velocity.y, 0.0);
        assert!(player.bottom() <= 470.0);

        let resting = player.position;
        for _ in 0..30 {
            harness.step();
            assert_eq!(harness.simulation.player.position, resting);
        }
    }

    #[test]
    fn a_supported_player_has_no_vertical_velocity_after_a_step() {
        let mut harness = Harness::new();
        harness.stand_on_ground(150.0);
        harness.step();
        assert_eq!(harness.simulation.player.velocity.y, 0.0);
    }

    #[test]
    fn walking_right_inside_the_band_leaves_the_level_alone() {
        let mut harness = Harness::new();
        harness.stand_on_ground(100.0);
        let platforms = harness.platform_xs();
        harness.send(ControlEvent::Pressed(Key::Right));

        // First frame only sets the velocity; motion starts on the next.
        harness.step();
        let mut x = harness.simulation.player.position.x;
        while x < 390.0 {
            harness.step();
            let now = harness.simulation.player.position.x;
            assert_eq!(now, x + 10.0);
            x = now;
        }
        assert_eq!(harness.simulation.level.scroll_offset, 0.0);
        assert_eq!(harness.platform_xs(), platforms);
    }

    #[test]
    fn pushing_past_the_band_scrolls_the_level() {
        let mut harness = Harness::new();
        harness.stand_on_ground(400.0);
        let before = harness.platform_xs();
        harness.send(ControlEvent::Pressed(Key::Right));

        harness.step();

        assert_eq!(harness.simulation.level.scroll_offset, 10.0);
        assert_eq!(harness.simulation.player.position.x, 400.0);
        for (after, before) in harness.platform_xs().iter().zip(&before) {
            assert_eq!(*after, before - 10.0);
        }
    }

    #[test]
    fn scroll_offset_stays_non_negative_when_backing_up() {
        let mut harness = Harness::new();
        harness.stand_on_ground(400.0);
        harness.send(ControlEvent::Pressed(Key::Right));
        for _ in 0..3 {
            harness.step();
        }
        harness.send(ControlEvent::Released(Key::Right));
        harness.simulation.player.position.x = 100.0;
        harness.send(ControlEvent::Pressed(Key::Left));
        for _ in 0..10 {
            harness.step();
            assert!(harness.simulation.level.scroll_offset >= 0.0);
        }
        assert_eq!(harness.simulation.level.scroll_offset, 0.0);
    }

    #[test]
    fn falling_off_the_canvas_rebuilds_everything() {
        let mut harness = Harness::new();
        let fresh = harness.simulation.clone();

        harness.simulation.level.scroll(250.0, 0.66);
        harness.send(ControlEvent::Pressed(Key::Left));
        harness.simulation.player.position = Vec2::new(300.0, 580.0);

        let report = harness.step();
        assert!(report.restarted);
        assert_eq!(harness.simulation, fresh);
        assert_eq!(harness.simulation.level.scroll_offset, 0.0);
        assert_eq!(
            harness.simulation.level.platforms[0].position,
            Vec2::new(2907.0, 270.0)
        );
        // Held keys survive the restart.
        assert!(harness.controls.left);
        assert_eq!(harness.controls.last_direction, Direction::Left);
    }

    #[test]
    fn jump_kicks_once_per_press() {
        let mut harness = Harness::new();
        harness.stand_on_ground(150.0);
        harness.step();

        harness.send(ControlEvent::Pressed(Key::Jump));
        assert_eq!(harness.simulation.player.velocity.y, -10.0);

        // Auto-repeat while held does nothing.
        harness.send(ControlEvent::Pressed(Key::Jump));
        assert_eq!(harness.simulation.player.velocity.y, -10.0);

        harness.send(ControlEvent::Released(Key::Jump));
        harness.send(ControlEvent::Pressed(Key::Jump));
        assert_eq!(harness.simulation.player.velocity.y, -20.0);
    }

    #[test]
    fn crossing_the_finish_line_wins_without_stopping_play() {
        let mut harness = Harness::new();
        harness.stand_on_ground(150.0);
        let finish = harness.simulation.finish_line();

        harness.simulation.level.scroll_offset = finish;
        assert!(!harness.step().won);

        harness.simulation.level.scroll_offset = finish + 10.0;
        let report = harness.step();
        assert!(report.won);
        assert!(!report.restarted);
        assert!(harness.step().won);
    }

    #[test]
    fn crop_index_stays_inside_the_strip() {
        let mut harness = Harness::new();
        harness.stand_on_ground(150.0);

        // Stand long enough to reach a high stand frame, then run left without a reset.
        for _ in 0..45 {
            harness.step();
            assert!(harness.player_crop().min.x <= 177.0 * 59.0);
        }
        harness.send(ControlEvent::Pressed(Key::Left));
        for _ in 0..90 {
            harness.step();
            let crop = harness.player_crop();
            let cap = match harness.simulation.player.pose {
                Pose::RunLeft | Pose::RunRight => 341.0 * 29.0,
                Pose::StandLeft | Pose::StandRight => 177.0 * 59.0,
            };
            assert!(crop.min.x <= cap, "crop {:?} past strip", crop);
        }
    }

    #[test]
    fn draws_scenery_then_platforms_then_player() {
        let mut harness = Harness::new();
        harness.step();

        let commands = harness.frame.commands();
        assert!(matches!(commands[0], DrawCommand::Clear { .. }));
        let visible = harness.frame.visible();
        assert_eq!(visible.len(), 2 + 13 + 1);
        assert!(matches!(visible[15], DrawCommand::Cropped { .. }));
    }

    #[test]
    fn system_turns_a_fall_into_an_event() {
        let config = GameConfig::default();
        let metrics = ImageMetrics::fallback();
        let mut simulation = Simulation::new(&config, &metrics);
        simulation.player.position.y = 600.0;

        let mut app = App::new();
        app.insert_resource(config)
            .insert_resource(metrics)
            .insert_resource(simulation)
            .init_resource::<Controls>()
            .init_resource::<FrameBuffer>()
            .add_event::<ControlEvent>()
            .add_event::<LevelCleared>()
            .add_event::<PlayerFell>()
            .add_systems(Update, advance_simulation);

        app.world_mut()
            .send_event(ControlEvent::Pressed(Key::Right));
        app.update();

        let fell = app.world().resource::<Events<PlayerFell>>();
        assert_eq!(fell.len(), 1);
        assert!(app.world().resource::<Controls>().right);
        assert_eq!(
            app.world().resource::<Simulation>().player.position,
            Vec2::new(100.0, 100.0)
        );
    }
}
