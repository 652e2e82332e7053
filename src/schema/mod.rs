pub mod chapter;
pub mod ending;
pub mod foundation;
