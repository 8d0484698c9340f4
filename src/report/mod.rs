//! Display and persistence of finished analyses.

mod export;
mod render;

pub use export::{export, file_name, load};
pub use render::render;
