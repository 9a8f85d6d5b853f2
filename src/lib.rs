pub mod collision;
pub mod dynamics;
pub mod math;
