#![allow(dead_code)]

pub mod mock_upstream;

use mock_upstream::MockUpstream;
use nivo_rs::GatewayConfig;
use nivo_rs::config::{LlmConfig, ServiceUrls};

pub const TEST_API_KEY: &str = "test-key";

/// Points every service and the chat API at `upstream`.
pub fn gateway_config(upstream: &MockUpstream, api_key: Option<&str>) -> GatewayConfig {
    let base = upstream.base_url();
    GatewayConfig {
        services: ServiceUrls {
            chunk_store: base.clone(),
            vision: base.clone(),
            audio: base.clone(),
        },
        llm: LlmConfig {
            api_base: base,
            api_key: api_key.map(str::to_string),
            ..LlmConfig::default()
        },
        ..GatewayConfig::default()
    }
}

/// Builds the gateway app in-process with the same middleware and routes as `startup`.
#[macro_export]
macro_rules! init_gateway {
    ($config:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(nivo_rs::server::cors())
                .app_data(actix_web::web::Data::new(
                    nivo_rs::AppState::new(&$config).unwrap(),
                ))
                .app_data(nivo_rs::server::json_config())
                .configure(nivo_rs::server::configure),
        )
        .await
    };
}
