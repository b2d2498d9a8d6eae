pub mod orientation;
pub mod roi;
