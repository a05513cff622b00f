pub mod config;
pub mod dynamics;
pub mod error;
pub mod state;
pub mod view;
