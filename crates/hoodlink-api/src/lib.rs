// Contract with the backend VPN process, plus its HTTP adapter.

pub mod contract;
pub mod error;
pub mod http;

pub use contract::{AccountApi, AppApi};
pub use error::{ApiError, Result};
pub use http::{ApiClientFactory, HttpAccountClient, HttpAppClient};
