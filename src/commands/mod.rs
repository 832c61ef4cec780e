pub mod assets;
pub mod build;
pub mod config;
pub mod logs;
pub mod package;
