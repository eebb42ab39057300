pub mod catalog;
pub mod generator;
pub mod utils;


pub use catalog::*;
pub use generator::*;
