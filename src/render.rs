//! Drawing surface. The simulation issues immediate-mode draw calls against a `Canvas`; the Bevy
//! implementation records them into a `FrameBuffer` and then mirrors the list onto a pool of
//! sprite entities, one entity per draw call, stacked in call order.
//!
//! Canvas coordinates put the origin at the top-left corner with +y pointing down. Sprites use a
//! top-left anchor so the conversion into Bevy's centred, y-up world is a plain offset.

use bevy::prelude::*;
use bevy::sprite::Anchor;

use crate::assets::{ImageKey, SpriteTextures};
use crate::config::GameConfig;
use crate::state::GameSet;

const LAYER_STEP: f32 = 0.01;

pub struct CanvasPlugin;

impl Plugin for CanvasPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FrameBuffer>()
            .init_resource::<SpritePool>()
            .insert_resource(ClearColor(Color::WHITE))
            .add_systems(Update, present_frame.in_set(GameSet::Present));
    }
}

pub trait Canvas {
    fn clear(&mut self, size: Vec2);
    fn draw_image(&mut self, image: ImageKey, position: Vec2);
    fn draw_cropped(&mut self, image: ImageKey, source: Rect, dest: Rect);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear { size: Vec2 },
    Image { image: ImageKey, position: Vec2 },
    Cropped { image: ImageKey, source: Rect, dest: Rect },
}

/// Draw calls issued since the last frame was presented.
#[derive(Resource, Debug, Default)]
pub struct FrameBuffer {
    commands: Vec<DrawCommand>,
}

impl FrameBuffer {
    #[cfg(test)]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Everything drawn after the most recent clear, back to front.
    pub fn visible(&self) -> &[DrawCommand] {
        let start = self
            .commands
            .iter()
            .rposition(|command| matches!(command, DrawCommand::Clear { .. }))
            .map_or(0, |index| index + 1);
        &self.commands[start..]
    }
}

impl Canvas for FrameBuffer {
    fn clear(&mut self, size: Vec2) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear { size });
    }

    fn draw_image(&mut self, image: ImageKey, position: Vec2) {
        self.commands.push(DrawCommand::Image { image, position });
    }

    fn draw_cropped(&mut self, image: ImageKey, source: Rect, dest: Rect) {
        self.commands.push(DrawCommand::Cropped {
            image,
            source,
            dest,
        });
    }
}

#[derive(Component)]
pub struct CanvasSprite;

/// Sprite entities reused across frames. Entry `i` shows the `i`th visible draw call.
#[derive(Resource, Default)]
struct SpritePool {
    entities: Vec<Entity>,
}

/// Translation of a top-left anchored sprite whose corner sits at `top_left` on the canvas.
pub fn canvas_to_world(top_left: Vec2, canvas: Vec2, layer: usize) -> Vec3 {
    Vec3::new(
        top_left.x - canvas.x * 0.5,
        canvas.y * 0.5 - top_left.y,
        layer as f32 * LAYER_STEP,
    )
}

/// The sprite a draw call becomes, or `None` for a clear.
fn sprite_for(command: &DrawCommand) -> Option<(ImageKey, Vec2, Sprite)> {
    match command {
        DrawCommand::Clear { .. } => None,
        DrawCommand::Image { image, position } => Some((
            *image,
            *position,
            Sprite {
                anchor: Anchor::TopLeft,
                ..default()
            },
        )),
        DrawCommand::Cropped {
            image,
            source,
            dest,
        } => Some((
            *image,
            dest.min,
            Sprite {
                anchor: Anchor::TopLeft,
                rect: Some(*source),
                custom_size: Some(dest.size()),
                ..default()
            },
        )),
    }
}

/// Mirrors the visible draw calls onto pooled sprites, growing the pool as needed and hiding
/// entries past the end of the list. Does nothing on frames where the buffer is unchanged, so a
/// paused game keeps showing its last frame.
fn present_frame(
    mut commands: Commands,
    frame: Res<FrameBuffer>,
    textures: Res<SpriteTextures>,
    config: Res<GameConfig>,
    mut pool: ResMut<SpritePool>,
    mut sprites: Query<
        (&mut Handle<Image>, &mut Sprite, &mut Transform, &mut Visibility),
        With<CanvasSprite>,
    >,
) {
    if !frame.is_changed() {
        return;
    }

    let canvas = config.canvas_size();
    let mut shown = 0;

    for command in frame.visible() {
        let Some((image, top_left, sprite)) = sprite_for(command) else {
            continue;
        };
        let Some(texture) = textures.get(image) else {
            continue;
        };
        let translation = canvas_to_world(top_left, canvas, shown);

        match pool.entities.get(shown) {
            Some(&entity) => {
                if let Ok((mut handle, mut current, mut transform, mut visibility)) =
                    sprites.get_mut(entity)
                {
                    *handle = texture;
                    *current = sprite;
                    transform.translation = translation;
                    *visibility = Visibility::Inherited;
                }
            }
            None => {
                let entity = commands
                    .spawn((
                        CanvasSprite,
                        Name::new(format!("CanvasSprite{}", shown)),
                        SpriteBundle {
                            texture,
                            sprite,
                            transform: Transform::from_translation(translation),
                            ..default()
                        },
                    ))
                    .id();
                pool.entities.push(entity);
            }
        }
        shown += 1;
    }

    for &entity in pool.entities.iter().skip(shown) {
        if let Ok((_, _, _, mut visibility)) = sprites.get_mut(entity) {
            *visibility = Visibility::Hidden;
        }
    }
}
