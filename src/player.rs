//! The player avatar: kinematics plus the four-pose animation state machine that picks which
//! sprite strip to draw and where to crop it.
//!
//! A `Player` is plain data owned by the `Simulation` resource. Restarting builds a fresh one and
//! drops the old value, so there is nothing to despawn.

use bevy::prelude::*;

use crate::assets::ImageKey;
use crate::config::{GameConfig, SheetConfig};
use crate::input::{Controls, Direction};
use crate::render::Canvas;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Pose {
    #[default]
    StandRight,
    StandLeft,
    RunRight,
    RunLeft,
}

impl Pose {
    pub fn image(self) -> ImageKey {
        match self {
            Pose::StandRight => ImageKey::SpriteStandRight,
            Pose::StandLeft => ImageKey::SpriteStandLeft,
            Pose::RunRight => ImageKey::SpriteRunRight,
            Pose::RunLeft => ImageKey::SpriteRunLeft,
        }
    }

    pub fn is_running(self) -> bool {
        matches!(self, Pose::RunRight | Pose::RunLeft)
    }

    pub fn sheet(self, config: &GameConfig) -> SheetConfig {
        if self.is_running() {
            config.run_sheet
        } else {
            config.stand_sheet
        }
    }

    /// Highest frame index the pose's strip holds.
    pub fn frame_cap(self, config: &GameConfig) -> u32 {
        if self.is_running() {
            config.run_frame_cap
        } else {
            config.stand_frame_cap
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub position: Vec2,
    pub velocity: Vec2,
    pub speed: f32,
    /// Follows the current pose's display width.
    pub width: f32,
    pub height: f32,
    pub pose: Pose,
    pub crop_width: f32,
    pub frame: u32,
}

impl Player {
    pub fn spawn(config: &GameConfig) -> Self {
        let pose = Pose::default();
        let sheet = pose.sheet(config);
        Self {
            position: config.player_start(),
            velocity: Vec2::ZERO,
            speed: config.player_speed,
            width: sheet.display_width,
            height: config.player_height,
            pose,
            crop_width: sheet.crop_width,
            frame: 0,
        }
    }

    pub fn left(&self) -> f32 {
        self.position.x
    }

    pub fn right(&self) -> f32 {
        self.position.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.position.y + self.height
    }

    pub fn advance_frame(&mut self, config: &GameConfig) {
        self.frame += 1;
        if self.frame > self.pose.frame_cap(config) {
            self.frame = 0;
        }
    }

    pub fn integrate_position(&mut self) {
        self.position += self.velocity;
    }

    /// Accelerates downward unless the next move would carry the feet past `floor`. This only
    /// stops acceleration; it is not a collision, so the player can still sink through the floor.
    pub fn apply_gravity(&mut self, gravity: f32, floor: f32) {
        if self.bottom() + self.velocity.y <= floor {
            self.velocity.y += gravity;
        }
    }

    /// Upward kick. Applies in mid-air as well.
    pub fn jump(&mut self, impulse: f32) {
        self.velocity.y -= impulse;
    }

    fn set_pose(&mut self, pose: Pose, config: &GameConfig) {
        let sheet = pose.sheet(config);
        self.pose = pose;
        self.crop_width = sheet.crop_width;
        self.width = sheet.display_width;
    }

    /// Picks the pose for this frame. The first matching rule wins, and nothing happens when the
    /// player already holds the target pose. Only a switch into `RunRight` restarts the strip at
    /// frame 1; `RunLeft` keeps whatever frame it inherited.
    pub fn select_pose(&mut self, controls: &Controls, config: &GameConfig) {
        let last = controls.last_direction;

        if controls.right && last == Direction::Right && self.pose != Pose::RunRight {
            self.frame = 1;
            self.set_pose(Pose::RunRight, config);
        } else if controls.left && last == Direction::Left && self.pose != Pose::RunLeft {
            self.set_pose(Pose::RunLeft, config);
        } else if !controls.left && last == Direction::Left && self.pose != Pose::StandLeft {
            self.set_pose(Pose::StandLeft, config);
        } else if !controls.right && last == Direction::Right && self.pose != Pose::StandRight {
            self.set_pose(Pose::StandRight, config);
        }
    }

    pub fn crop_rect(&self, strip_height: f32) -> Rect {
        let x = self.crop_width * self.frame as f32;
        Rect::new(x, 0.0, x + self.crop_width, strip_height)
    }

    pub fn draw(&self, canvas: &mut impl Canvas, strip_height: f32) {
        let dest = Rect::from_corners(
            self.position,
            self.position + Vec2::new(self.width, self.height),
        );
        canvas.draw_cropped(self.pose.image(), self.crop_rect(strip_height), dest);
    }
}
