use bevy::{math::uvec2, prelude::*};
use bevy_data_tilemap::{
    node::flush_tilemaps,
    prelude::*,
};
use image::RgbaImage;

fn app() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, AssetPlugin::default()))
        .add_asset::<Image>()
        .add_asset::<Mesh>()
        .add_asset::<Tilemap>()
        .add_asset::<TilemapMaterial>()
        .add_systems(PostUpdate, flush_tilemaps);
    app
}

fn spawn_node(app: &mut App, handle: &Handle<Tilemap>, atlas: &Atlas) -> Entity {
    let builder = TilemapNodeBuilder::new(
        handle.clone(),
        app.world.resource::<Assets<Tilemap>>(),
        atlas,
    )
    .unwrap();

    let bundle = app.world.resource_scope(|world, mut images: Mut<Assets<Image>>| {
        world.resource_scope(|world, mut meshes: Mut<Assets<Mesh>>| {
            let mut materials = world.resource_mut::<Assets<TilemapMaterial>>();
            builder.build(&mut images, &mut meshes, &mut materials)
        })
    });
    app.world.spawn(bundle).id()
}

fn data_bytes(app: &App, entity: Entity) -> Vec<u8> {
    let node = app.world.get::<TilemapNode>(entity).unwrap();
    let images = app.world.resource::<Assets<Image>>();
    images.get(node.data_texture()).unwrap().data.clone()
}

fn atlas() -> Atlas {
    Atlas::builder(RgbaImage::new(64, 64), uvec2(16, 16))
        .build()
        .unwrap()
}

#[test]
fn writes_reach_every_node_once_per_frame() {
    let mut app = app();
    let handle = app
        .world
        .resource_mut::<Assets<Tilemap>>()
        .add(Tilemap::new(8, 8));
    let atlas = atlas();
    let first = spawn_node(&mut app, &handle, &atlas);
    let second = spawn_node(&mut app, &handle, &atlas);

    {
        let mut tilemaps = app.world.resource_mut::<Assets<Tilemap>>();
        let tilemap = tilemaps.get_mut(&handle).unwrap();
        for i in 0..8 {
            tilemap.set(i, i, Some(atlas.tile(i as i32 % 4, 0).with_color(TileColor::SKY)));
            tilemap.set(i, i, Some(atlas.tile(i as i32 % 4, 1)));
        }
        assert_eq!(tilemap.pending_len(), 8);
    }

    app.update();

    let tilemaps = app.world.resource::<Assets<Tilemap>>();
    let tilemap = tilemaps.get(&handle).unwrap();
    assert!(!tilemap.is_dirty());
    assert_eq!(tilemap.flush_count(), 1);
    let expected = tilemap.packed().as_bytes().to_vec();

    assert_eq!(data_bytes(&app, first), expected);
    assert_eq!(data_bytes(&app, second), expected);
}

#[test]
fn clean_maps_are_not_flushed() {
    let mut app = app();
    let handle = app
        .world
        .resource_mut::<Assets<Tilemap>>()
        .add(Tilemap::new(4, 4));
    let node = spawn_node(&mut app, &handle, &atlas());
    let before = data_bytes(&app, node);

    app.update();
    app.update();

    let tilemaps = app.world.resource::<Assets<Tilemap>>();
    assert_eq!(tilemaps.get(&handle).unwrap().flush_count(), 0);
    assert_eq!(data_bytes(&app, node), before);
}

#[test]
fn material_carries_bind_time_parameters() {
    let mut app = app();
    let handle = app
        .world
        .resource_mut::<Assets<Tilemap>>()
        .add(Tilemap::new(10, 6));
    let node = spawn_node(&mut app, &handle, &atlas());

    let material = app
        .world
        .get::<Handle<TilemapMaterial>>(node)
        .unwrap()
        .clone();
    let materials = app.world.resource::<Assets<TilemapMaterial>>();
    let material = materials.get(&material).unwrap();
    assert_eq!(material.uniform().map_size(), Vec2::new(10., 6.));
    assert_eq!(material.uniform().world_size(), Vec2::new(160., 96.));
    assert_eq!(
        material.data_texture(),
        app.world.get::<TilemapNode>(node).unwrap().data_texture()
    );
}

#[test]
fn builder_needs_a_known_tilemap() {
    let app = app();
    let tilemaps = app.world.resource::<Assets<Tilemap>>();
    assert!(TilemapNodeBuilder::new(Handle::default(), tilemaps, &atlas()).is_none());
}

#[test]
fn node_keeps_its_atlas() {
    let mut app = app();
    let handle = app
        .world
        .resource_mut::<Assets<Tilemap>>()
        .add(Tilemap::new(2, 2));
    let node = spawn_node(&mut app, &handle, &atlas());

    let node = app.world.get::<TilemapNode>(node).unwrap();
    assert_eq!(node.atlas().width(), 4);
    assert_eq!(node.atlas().height(), 4);
    assert_eq!(node.atlas().tile_id(3, 1), 7);
}

#[test]
fn node_retargeted_to_a_smaller_map_is_skipped() {
    let mut app = app();
    let large = app
        .world
        .resource_mut::<Assets<Tilemap>>()
        .add(Tilemap::new(8, 8));
    let small = app
        .world
        .resource_mut::<Assets<Tilemap>>()
        .add(Tilemap::new(4, 4));
    let atlas = atlas();
    let node = spawn_node(&mut app, &large, &atlas);
    let before = data_bytes(&app, node);

    app.world.get_mut::<TilemapNode>(node).unwrap().tilemap = small.clone();
    app.world
        .resource_mut::<Assets<Tilemap>>()
        .get_mut(&small)
        .unwrap()
        .set(1, 1, Some(atlas.tile(1, 1)));

    app.update();

    let tilemaps = app.world.resource::<Assets<Tilemap>>();
    let small = tilemaps.get(&small).unwrap();
    assert!(!small.is_dirty());
    assert_eq!(small.flush_count(), 1);
    assert_eq!(data_bytes(&app, node), before);
}
