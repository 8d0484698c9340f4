pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod provider;
pub mod report;
pub mod session;

pub use error::FishboneError;
pub use pipeline::FishboneAnalyzer;
