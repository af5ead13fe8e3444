//! Terminal fireworks: rising stars burst into fading stars, sparks and
//! flashes, painted onto a trail-accumulating canvas.

pub mod color;
pub mod config;
pub mod driver;
pub mod error;
pub mod render;
pub mod scheduler;
pub mod show;

pub use color::{Rgb, Rgba};
pub use config::Config;
pub use driver::Driver;
pub use error::{Error, Result};
