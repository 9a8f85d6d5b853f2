pub mod utils;
pub mod vec2;

pub use utils::{random_range, random_unit};
pub use vec2::Vec2;
