//! Example illustrating live updates.
//! We're maintaining a 1024x1024 map here of which random patches are changed every frame.
//! All writes of a frame are coalesced into a single flush per map.
//!
//! The same map is shown twice, the second node (a "minimap") uses its own scaled transform.

use bevy::{
    diagnostic::{FrameTimeDiagnosticsPlugin, LogDiagnosticsPlugin},
    prelude::*,
    window::PresentMode,
};
use bevy_data_tilemap::prelude::*;
use rand::Rng;

#[path = "common.rs"]
mod common;

/// Marks the second, scaled down view of the map.
#[derive(Component)]
struct Minimap;

fn main() {
    App::new()
        .add_plugins((
            DefaultPlugins.set(WindowPlugin {
                primary_window: Some(Window {
                    title: String::from("Data texture tilemap example"),
                    resolution: (1820., 920.).into(),
                    // disable vsync so we can see the raw FPS speed
                    present_mode: PresentMode::Immediate,
                    ..default()
                }),
                ..default()
            }),
            LogDiagnosticsPlugin::default(),
            FrameTimeDiagnosticsPlugin::default(),
            TilemapPlugin::default(),
        ))
        .add_systems(Startup, startup)
        .add_systems(Update, change_map)
        .run();
}

fn startup(
    mut commands: Commands,
    mut tilemaps: ResMut<Assets<Tilemap>>,
    mut images: ResMut<Assets<Image>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<TilemapMaterial>>,
) {
    commands.spawn(Camera2dBundle::default());

    let atlas = common::ring_atlas();
    let mut tilemap = Tilemap::new(1024, 1024);
    tilemap.fill_with(|_, _| Some(atlas.tile(2, 0)));
    let handle = tilemaps.add(tilemap);

    let main = TilemapNodeBuilder::new(handle.clone(), &tilemaps, &atlas)
        .expect("tilemap was just added")
        .build(&mut images, &mut meshes, &mut materials);
    let minimap = TilemapNodeBuilder::new(handle, &tilemaps, &atlas)
        .expect("tilemap was just added")
        .with_atlas_texture(
            materials
                .get(&main.material)
                .map(|m| m.atlas_texture().clone())
                .unwrap_or_default(),
        )
        .with_transform(Transform::from_xyz(700., 250., 1.).with_scale(Vec3::splat(0.02)))
        .build(&mut images, &mut meshes, &mut materials);

    commands.spawn(main);
    commands.spawn((minimap, Minimap));
}

/// Update random patches of tiles in the map.
fn change_map(
    nodes: Query<&TilemapNode, Without<Minimap>>,
    mut tilemaps: ResMut<Assets<Tilemap>>,
) {
    let mut rng = rand::thread_rng();

    for node in nodes.iter() {
        let Some(m) = tilemaps.get_mut(&node.tilemap) else {
            continue;
        };

        let k = rng.gen_range(5..50);
        let x_min = rng.gen_range(0..m.width() - k);
        let y_min = rng.gen_range(0..m.height() - k);
        let tile = node
            .atlas()
            .tile(rng.gen_range(0..8), rng.gen_range(0..8))
            .with_color(TileColor::from_hue(rng.gen_range(0.0..360.0), 1.0, 1.0, 1.0))
            .with_background(TileColor::DARKEST_GRAY.scaled_alpha(0.5));

        for y in y_min..y_min + k {
            for x in x_min..x_min + k {
                // punch some holes
                let tile = if rng.gen_ratio(1, 10) { None } else { Some(tile) };
                m.set(x, y, tile);
            }
        }
    }
} // fn change_map
