pub mod aabb;

pub use aabb::Aabb;
