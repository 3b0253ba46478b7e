pub mod all;
pub mod entity;
pub mod inventory;
pub mod overview;
pub mod score;
pub mod status;
pub mod style;
pub mod text;
pub mod volatility;

mod run_manifest;
