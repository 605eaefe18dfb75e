pub mod collision;
pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod game;
pub mod raster;
pub mod scale;
pub mod score;
pub mod sprites;
