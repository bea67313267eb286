pub mod batch;
pub mod binarize;
pub mod color;
pub mod compare;
pub mod imageops;
pub mod locate;
pub mod mask;
pub mod recolor;

mod error;

pub use error::{Error, Result};
