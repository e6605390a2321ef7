//! Platform support. Only platform tops are solid, and only for a player coming down onto them.
//!
//! The test is discrete: it looks at where the feet are now and where the pending vertical
//! velocity would put them next frame. A fall fast enough to clear a platform in one frame passes
//! straight through it.

use crate::level::Body;
use crate::player::Player;

/// True when the player's feet are at or above the platform top, the pending fall would reach it,
/// and the two overlap horizontally (touching edges count).
pub fn lands_on(player: &Player, platform: &Body) -> bool {
    player.bottom() <= platform.top()
        && player.bottom() + player.velocity.y >= platform.top()
        && player.right() >= platform.left()
        && player.left() <= platform.right()
}

/// Stops the fall if any platform supports the player.
pub fn resolve_landings(player: &mut Player, platforms: &[Body]) {
    if platforms.iter().any(|platform| lands_on(player, platform)) {
        player.velocity.y = 0.0;
    }
}
