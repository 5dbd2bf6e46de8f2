//! A static map of tinted tiles with a background tint for the transparent parts.

use bevy::{
    diagnostic::{FrameTimeDiagnosticsPlugin, LogDiagnosticsPlugin},
    prelude::*,
};
use bevy_data_tilemap::prelude::*;

#[path = "common.rs"]
mod common;

fn main() {
    App::new()
        .add_plugins((
            DefaultPlugins.set(WindowPlugin {
                primary_window: Some(Window {
                    title: String::from("Data texture tilemap example"),
                    resolution: (1820., 920.).into(),
                    ..default()
                }),
                ..default()
            }),
            LogDiagnosticsPlugin::default(),
            FrameTimeDiagnosticsPlugin::default(),
            TilemapPlugin::default(),
        ))
        .add_systems(Startup, startup)
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
    let mut tilemap = Tilemap::new(100, 50);
    tilemap.fill_with(|x, y| {
        if (x + y) % 7 == 0 {
            return None;
        }
        let hue = (x * 360 / 100) as f32;
        Some(
            atlas
                .tile((x % 8) as i32, (y % 8) as i32)
                .with_color(TileColor::from_hue(hue, 1.0, 1.0, 1.0))
                .with_background(TileColor::DARKEST_GRAY),
        )
    });

    let handle = tilemaps.add(tilemap);
    commands.spawn(
        TilemapNodeBuilder::new(handle, &tilemaps, &atlas)
            .expect("tilemap was just added")
            .build(&mut images, &mut meshes, &mut materials),
    );
}
