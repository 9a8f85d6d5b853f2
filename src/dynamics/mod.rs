pub mod body;
pub mod constraint;
pub mod shape;

pub use body::{Body, BodyDef, BodyError, BodyOptions};
pub use constraint::{closing_speed, resolve_pin};
pub use shape::Shape;
