pub mod client;
pub mod config;
pub mod error;
pub mod io_struct;
pub mod llm;
pub mod prompts;
pub mod server;
pub mod services;
pub mod stages;

pub use config::GatewayConfig;
pub use error::{ApiError, GatewayError, GatewayResult};
pub use server::{AppState, startup};
pub use stages::Orchestrator;
