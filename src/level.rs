//! The level: static platforms and parallax scenery laid out left to right, plus the scroll
//! offset that stands in for a moving camera.
//!
//! Nothing here moves on its own. Bodies only shift when the whole level is translated by
//! `Level::scroll`, and the level is rebuilt wholesale on restart.

use bevy::prelude::*;

use crate::assets::{ImageHandle, ImageKey, ImageMetrics};
use crate::render::Canvas;

const GROUND_Y: f32 = 470.0;

/// An axis-aligned rectangle drawn with a fixed image. The size is the image's natural size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub width: f32,
    pub height: f32,
    pub image: ImageKey,
}

impl Body {
    pub fn new(position: Vec2, image: ImageHandle) -> Self {
        Self {
            position,
            width: image.width,
            height: image.height,
            image: image.key,
        }
    }

    pub fn left(&self) -> f32 {
        self.position.x
    }

    pub fn right(&self) -> f32 {
        self.position.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.position.y
    }

    pub fn draw(&self, canvas: &mut impl Canvas) {
        canvas.draw_image(self.image, self.position);
    }
}

/// Where one platform goes. `x = platform_width * platforms - small_width * smalls + offset`.
struct Placement {
    image: ImageKey,
    platforms: f32,
    smalls: f32,
    offset: f32,
    y: f32,
}

const fn place(image: ImageKey, platforms: f32, smalls: f32, offset: f32, y: f32) -> Placement {
    Placement {
        image,
        platforms,
        smalls,
        offset,
        y,
    }
}

// Elevated platforms come first so the ground draws over them where they overlap.
const LAYOUT: [Placement; 13] = [
    place(ImageKey::PlatformSmallTall, 5.0, 1.0, 298.0, 270.0),
    place(ImageKey::PlatformSmallTall, 6.0, 0.0, 698.0, 360.0),
    place(ImageKey::Platform, 0.0, 0.0, -1.0, GROUND_Y),
    place(ImageKey::Platform, 1.0, 0.0, -3.0, GROUND_Y),
    place(ImageKey::Platform, 2.0, 0.0, 100.0, GROUND_Y),
    place(ImageKey::Platform, 3.0, 0.0, 300.0, GROUND_Y),
    place(ImageKey::Platform, 4.0, 0.0, 298.0, GROUND_Y),
    place(ImageKey::Platform, 5.0, 0.0, 698.0, GROUND_Y),
    place(ImageKey::Platform, 6.0, 0.0, 696.0, GROUND_Y),
    place(ImageKey::PlatformSmallTall, 7.0, 0.0, 698.0, 367.0),
    place(ImageKey::PlatformSmallTall, 8.0, 0.0, 698.0, 267.0),
    place(ImageKey::Platform, 9.0, 0.0, 698.0, 167.0),
    place(ImageKey::Platform, 9.0, 0.0, 1900.0, GROUND_Y),
];

/// Scroll distance past which the level counts as cleared.
pub fn finish_line(metrics: &ImageMetrics) -> f32 {
    metrics.handle(ImageKey::Platform).width * 9.0 + 1900.0
}

#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    pub platforms: Vec<Body>,
    pub scenery: Vec<Body>,
    /// How far the level has moved left in total. Never negative.
    pub scroll_offset: f32,
}

impl Level {
    pub fn build(metrics: &ImageMetrics) -> Self {
        let platform_width = metrics.handle(ImageKey::Platform).width;
        let small_width = metrics.handle(ImageKey::PlatformSmallTall).width;

        let platforms = LAYOUT
            .iter()
            .map(|slot| {
                let x = platform_width * slot.platforms - small_width * slot.smalls + slot.offset;
                Body::new(Vec2::new(x, slot.y), metrics.handle(slot.image))
            })
            .collect();

        let scenery = [ImageKey::Background, ImageKey::Hills]
            .into_iter()
            .map(|key| Body::new(Vec2::new(-1.0, -1.0), metrics.handle(key)))
            .collect();

        Self {
            platforms,
            scenery,
            scroll_offset: 0.0,
        }
    }

    /// Moves the level left by `distance` (right when negative). Scenery moves by the parallax
    /// fraction of that. The offset is floored at zero.
    pub fn scroll(&mut self, distance: f32, parallax: f32) {
        self.scroll_offset = (self.scroll_offset + distance).max(0.0);

        for platform in &mut self.platforms {
            platform.position.x -= distance;
        }
        for scenery in &mut self.scenery {
            scenery.position.x -= distance * parallax;
        }
    }

    pub fn draw(&self, canvas: &mut impl Canvas) {
        for body in self.scenery.iter().chain(&self.platforms) {
            body.draw(canvas);
        }
    }
}
