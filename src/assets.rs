//! Texture loading for the eight images the game draws.
//!
//! The simulation only ever sees `ImageHandle` values (a key plus natural dimensions). The Bevy
//! `Handle<Image>` side stays in `SpriteTextures`, which the renderer uses to resolve keys back
//! into GPU textures. Handles are reference counted; keeping them in a resource keeps the pixel
//! data alive for the lifetime of the app.

use bevy::asset::LoadState;
use bevy::prelude::*;
use bevy::utils::HashMap;

use crate::state::GameState;

/// Queues every texture on entering `Loading` and moves to `Playing` once they have settled.
pub struct SpriteAssetsPlugin;

impl Plugin for SpriteAssetsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SpriteTextures>()
            .insert_resource(ImageMetrics::fallback())
            .add_systems(OnEnter(GameState::Loading), queue_textures)
            .add_systems(
                Update,
                monitor_texture_loading.run_if(in_state(GameState::Loading)),
            );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKey {
    Background,
    Hills,
    Platform,
    PlatformSmallTall,
    SpriteStandRight,
    SpriteStandLeft,
    SpriteRunRight,
    SpriteRunLeft,
}

impl ImageKey {
    pub const ALL: [ImageKey; 8] = [
        ImageKey::Background,
        ImageKey::Hills,
        ImageKey::Platform,
        ImageKey::PlatformSmallTall,
        ImageKey::SpriteStandRight,
        ImageKey::SpriteStandLeft,
        ImageKey::SpriteRunRight,
        ImageKey::SpriteRunLeft,
    ];

    pub fn path(self) -> &'static str {
        match self {
            ImageKey::Background => "textures/background.png",
            ImageKey::Hills => "textures/hills.png",
            ImageKey::Platform => "textures/platform.png",
            ImageKey::PlatformSmallTall => "textures/platformSmallTall.png",
            ImageKey::SpriteStandRight => "textures/spriteStandRight.png",
            ImageKey::SpriteStandLeft => "textures/spriteStandLeft.png",
            ImageKey::SpriteRunRight => "textures/spriteRunRight.png",
            ImageKey::SpriteRunLeft => "textures/spriteRunLeft.png",
        }
    }

    /// Natural size of the shipped artwork, used when a texture fails to load so the level layout
    /// still comes out right.
    pub fn fallback_size(self) -> Vec2 {
        match self {
            ImageKey::Background => Vec2::new(11643.0, 732.0),
            ImageKey::Hills => Vec2::new(7545.0, 592.0),
            ImageKey::Platform => Vec2::new(580.0, 125.0),
            ImageKey::PlatformSmallTall => Vec2::new(291.0, 227.0),
            ImageKey::SpriteStandRight | ImageKey::SpriteStandLeft => Vec2::new(10620.0, 400.0),
            ImageKey::SpriteRunRight | ImageKey::SpriteRunLeft => Vec2::new(10230.0, 400.0),
        }
    }
}

/// An image as far as the simulation cares: which one, and how big it is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageHandle {
    pub key: ImageKey,
    pub width: f32,
    pub height: f32,
}

/// Natural dimensions of every image, filled in once loading completes.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct ImageMetrics {
    sizes: HashMap<ImageKey, Vec2>,
}

impl ImageMetrics {
    pub fn fallback() -> Self {
        Self {
            sizes: ImageKey::ALL
                .iter()
                .map(|key| (*key, key.fallback_size()))
                .collect(),
        }
    }

    pub fn set(&mut self, key: ImageKey, size: Vec2) {
        self.sizes.insert(key, size);
    }

    pub fn handle(&self, key: ImageKey) -> ImageHandle {
        let size = self
            .sizes
            .get(&key)
            .copied()
            .unwrap_or_else(|| key.fallback_size());
        ImageHandle {
            key,
            width: size.x,
            height: size.y,
        }
    }
}

/// Bevy texture handles keyed by logical image.
#[derive(Resource, Default)]
pub struct SpriteTextures {
    handles: HashMap<ImageKey, Handle<Image>>,
}

impl SpriteTextures {
    pub fn get(&self, key: ImageKey) -> Option<Handle<Image>> {
        self.handles.get(&key).cloned()
    }
}

/// Requests every texture up front; `monitor_texture_loading` waits on them.
fn queue_textures(asset_server: Res<AssetServer>, mut textures: ResMut<SpriteTextures>) {
    for key in ImageKey::ALL {
        textures.handles.insert(key, asset_server.load(key.path()));
    }
}

/// A texture has settled once it either loaded or failed. Anything still in flight holds play back.
fn all_settled(states: impl IntoIterator<Item = Option<LoadState>>) -> bool {
    states
        .into_iter()
        .all(|state| matches!(state, Some(LoadState::Loaded) | Some(LoadState::Failed(_))))
}

/// Reads natural sizes once every texture has settled, then starts play. Failures keep their
/// fallback size.
fn monitor_texture_loading(
    asset_server: Res<AssetServer>,
    textures: Res<SpriteTextures>,
    images: Res<Assets<Image>>,
    mut metrics: ResMut<ImageMetrics>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let mut handles = Vec::with_capacity(ImageKey::ALL.len());
    for key in ImageKey::ALL {
        let Some(handle) = textures.handles.get(&key) else {
            return;
        };
        handles.push((key, handle));
    }
    if !all_settled(
        handles
            .iter()
            .map(|(_, handle)| asset_server.get_load_state(handle.id())),
    ) {
        return;
    }

    let mut resolved = ImageMetrics::fallback();
    for (key, handle) in handles {
        match images.get(handle) {
            Some(image) => resolved.set(key, image.size().as_vec2()),
            None => warn!(
                "Unable to load '{}'; laying out with its default size {:?}.",
                key.path(),
                key.fallback_size()
            ),
        }
    }

    *metrics = resolved;
    info!("All textures settled; starting play.");
    next_state.set(GameState::Playing);
}
