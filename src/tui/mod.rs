pub mod app;
pub mod focus;
pub mod input;
pub mod render;
pub mod theme;

pub use app::run;
