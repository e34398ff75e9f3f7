pub mod analysis;
pub mod color;
pub mod config;
pub mod error;
pub mod http;
pub mod network;
pub mod season;
pub mod storage;

pub use config::Configuration;
pub use error::{AnalysisError, AppError, RequestError, StorageError};
pub use network::{Server, ServerBuilder};
pub use season::{Season, determine_season};
