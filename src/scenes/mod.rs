use bevy::prelude::*;

pub mod browse;

pub use browse::setup_browse;

pub fn setup_camera(mut commands: Commands){
    commands.spawn(Camera2d::default());
}
