extern crate core;

pub mod error;
pub mod rtree;
mod types;

pub use error::Error;
pub use rtree::{Dispatcher, Tree};
