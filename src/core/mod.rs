pub mod normalized_error;
pub mod services;

pub use normalized_error::{NormalizedError, normalize};
