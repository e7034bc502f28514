pub mod cell;
pub mod config;
mod effects;
pub mod logging;
pub mod policy;
pub mod ui;
