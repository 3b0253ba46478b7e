pub mod entity;
pub mod score;
pub mod stats;
pub mod style;
pub mod text;
