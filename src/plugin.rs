use bevy::{prelude::*, sprite::Material2dPlugin};

use crate::material::TilemapMaterial;
use crate::node::flush_tilemaps;
use crate::shader::load_tilemap_shader;
use crate::tilemap::Tilemap;

/// Systems of this crate, for ordering your own systems against.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum TilemapSet {
    /// Pending tile writes are applied to the data textures.
    /// Writes made after this set in the same frame show up one frame later.
    Flush,
}

/// Plugin for data texture tilemaps.
/// Add this to your app, then put [`Tilemap`]s into `Assets<Tilemap>`
/// and spawn nodes for them using [`crate::node::TilemapNodeBuilder`].
#[derive(Default)]
pub struct TilemapPlugin;

impl Plugin for TilemapPlugin {
    fn build(&self, app: &mut App) {
        load_tilemap_shader(&mut app.world.resource_mut::<Assets<Shader>>());

        app.add_asset::<Tilemap>()
            .add_plugins(Material2dPlugin::<TilemapMaterial>::default())
            .add_systems(PostUpdate, flush_tilemaps.in_set(TilemapSet::Flush));
    }
}
