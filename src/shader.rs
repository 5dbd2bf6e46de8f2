use bevy::{prelude::*, reflect::TypeUuid};

/// Fragment shader of [`crate::material::TilemapMaterial`]: decodes the three data texels
/// of the cell under each pixel and samples the matching atlas tile.
pub const TILEMAP_SHADER: &str = include_str!("../assets/tilemap_shader.wgsl");

pub const TILEMAP_SHADER_HANDLE: HandleUntyped =
    HandleUntyped::weak_from_u64(Shader::TYPE_UUID, 9054315128867720321);

/// Register [`TILEMAP_SHADER`] under [`TILEMAP_SHADER_HANDLE`].
pub(crate) fn load_tilemap_shader(shaders: &mut Assets<Shader>) {
    shaders.set_untracked(
        TILEMAP_SHADER_HANDLE,
        Shader::from_wgsl(TILEMAP_SHADER, "tilemap_shader.wgsl"),
    );
}
