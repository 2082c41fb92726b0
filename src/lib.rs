pub mod app;
pub mod bookmarks;
pub mod config;
pub mod render;
pub mod screens;
pub mod tmdb;
