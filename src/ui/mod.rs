//! Terminal front end: menus, input, rendering and bell feedback.

pub mod app;
pub mod audio;
pub mod input;
pub mod render;
