pub mod carousel;
pub mod file;
pub mod scenes;
pub mod states;
pub mod widgets;

#[cfg(not(feature = "production"))]
pub mod debug;
