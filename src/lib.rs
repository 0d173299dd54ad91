// src/lib.rs
pub mod app;
pub mod audio;
pub mod catalog;
pub mod errors;
pub mod filter;
pub mod opener;
pub mod playback;
pub mod podcast;
pub mod ui;
