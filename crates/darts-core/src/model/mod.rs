pub mod config;
pub mod dart;
pub mod hit;
pub mod player;
pub mod turn;
