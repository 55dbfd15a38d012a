pub mod config;

pub use config::ModelConfig;
