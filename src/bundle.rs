use crate::material::TilemapMaterial;
use crate::node::TilemapNode;
use bevy::{prelude::*, sprite::Mesh2dHandle};

/// Bundle of components you should typically have for a tilemap node.
/// Build one with [`crate::node::TilemapNodeBuilder`].
#[derive(Bundle, Clone)]
pub struct TilemapNodeBundle {
    pub node: TilemapNode,

    pub material: Handle<TilemapMaterial>,
    pub mesh: Mesh2dHandle,
    pub transform: Transform,
    pub global_transform: GlobalTransform,
    pub visibility: Visibility,
    pub computed_visibility: ComputedVisibility,
}
