pub mod app;
pub mod grid;
pub mod layout;
pub mod statusbar;
pub mod theme;
