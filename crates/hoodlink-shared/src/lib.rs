// Domain types shared by the backend API adapter and the client core.

pub mod constants;
pub mod error;
pub mod types;

pub use error::ErrorInfo;
pub use types::*;
