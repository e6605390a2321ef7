//! Horizontal movement. Inside the walking band the player moves. Past the band's edges the
//! player's horizontal velocity drops to zero and the level slides the other way.
//!
//! Velocity chosen here is applied on the next frame's integration, so the player keeps a one
//! frame lag between input and motion.

use crate::config::GameConfig;
use crate::input::Controls;
use crate::level::Level;
use crate::player::Player;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stride {
    Walk,
    Scroll,
    Still,
}

/// Sets the horizontal velocity, or scrolls the level when the player is at a band edge. Reports
/// which of the two happened.
pub fn walk_or_scroll(
    player: &mut Player,
    level: &mut Level,
    controls: &Controls,
    config: &GameConfig,
) -> Stride {
    let x = player.position.x;
    // At the very start of the level the player may walk all the way to the left wall.
    let at_level_start = level.scroll_offset == 0.0 && x > 0.0;

    if controls.right && x < config.walk_max_x {
        player.velocity.x = player.speed;
        return Stride::Walk;
    }
    if controls.left && (x > config.walk_min_x || at_level_start) {
        player.velocity.x = -player.speed;
        return Stride::Walk;
    }

    player.velocity.x = 0.0;

    if controls.right {
        level.scroll(player.speed, config.parallax);
        Stride::Scroll
    } else if controls.left && level.scroll_offset > 0.0 {
        level.scroll(-player.speed, config.parallax);
        Stride::Scroll
    } else {
        Stride::Still
    }
}
