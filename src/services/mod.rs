pub mod editor;
pub mod errors;
pub mod inflight;
pub mod products;

pub use errors::{ServiceError, ServiceResult};
