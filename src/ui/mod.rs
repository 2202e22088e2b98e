pub mod ansi;
pub mod components;
pub mod paragraph;
pub mod theme;
