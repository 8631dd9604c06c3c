pub mod entity;
pub mod jurisdiction;
pub mod ordinal;
pub mod rules;
pub mod section_number;
pub mod text;

mod error;

pub use error::{Error, Result};
