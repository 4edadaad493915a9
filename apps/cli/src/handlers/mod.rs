pub mod keyed;
pub mod markers;
pub mod name;
