use clap::Parser;
use nivo_rs::config::{
    DEFAULT_ANSWER_MODEL, DEFAULT_AUDIO_URL, DEFAULT_CHUNK_STORE_URL, DEFAULT_GENERATION_MODEL,
    DEFAULT_LLM_API_BASE, DEFAULT_REASONING_MODEL, DEFAULT_VISION_URL, LlmConfig, ServiceUrls,
};
use nivo_rs::server::{self, AppState};
use nivo_rs::GatewayConfig;
use tokio::signal;

#[derive(Parser, Debug)]
#[command(name = "nivo")]
#[command(about = "Nivo - HTTP gateway over the chunk store, vision, audio and chat-completion services")]
struct CliArgs {
    /// Host address to bind the gateway
    #[arg(long, env = "NIVO_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port number to bind the gateway
    #[arg(long, env = "NIVO_PORT", default_value_t = 8090)]
    port: u16,

    /// Base URL of the chunk store (serves /chunk and /lookup)
    #[arg(long, env = "CHISEL_IP", default_value = DEFAULT_CHUNK_STORE_URL)]
    chunk_store_url: String,

    /// Base URL of the image description service (serves /view)
    #[arg(long, env = "GLINT_IP", default_value = DEFAULT_VISION_URL)]
    vision_url: String,

    /// Base URL of the audio transcription service (serves /transcribe)
    #[arg(long, env = "RESONO_IP", default_value = DEFAULT_AUDIO_URL)]
    audio_url: String,

    /// Base URL of the OpenAI-compatible chat API
    #[arg(long, env = "GROQ_API_BASE", default_value = DEFAULT_LLM_API_BASE)]
    llm_api_base: String,

    /// Bearer credential for the chat API
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model used to plan content
    #[arg(long, env = "NIVO_REASONING_MODEL", default_value = DEFAULT_REASONING_MODEL)]
    reasoning_model: String,

    /// Model used to write content
    #[arg(long, env = "NIVO_GENERATION_MODEL", default_value = DEFAULT_GENERATION_MODEL)]
    generation_model: String,

    /// Model used to answer /ask queries
    #[arg(long, env = "NIVO_ANSWER_MODEL", default_value = DEFAULT_ANSWER_MODEL)]
    answer_model: String,

    /// Log level
    #[arg(long, env = "NIVO_LOG_LEVEL", default_value = "info", value_parser = ["trace", "debug", "info", "warn", "error"])]
    log_level: String,
}

impl CliArgs {
    fn to_gateway_config(&self) -> anyhow::Result<GatewayConfig> {
        Ok(GatewayConfig {
            host: self.host.clone(),
            port: self.port,
            log_level: self
                .log_level
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid log level {}: {}", self.log_level, e))?,
            services: ServiceUrls {
                chunk_store: self.chunk_store_url.clone(),
                vision: self.vision_url.clone(),
                audio: self.audio_url.clone(),
            },
            llm: LlmConfig {
                api_base: self.llm_api_base.clone(),
                api_key: self.api_key.clone().filter(|key| !key.trim().is_empty()),
                reasoning_model: self.reasoning_model.clone(),
                generation_model: self.generation_model.clone(),
                answer_model: self.answer_model.clone(),
            },
        })
    }
}

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let config = args.to_gateway_config()?;
    server::init_logging(config.log_level);

    let app_state = AppState::new(&config)?;
    actix_web::rt::System::new().block_on(async move {
        tokio::select! {
            res = server::startup(config, app_state) => res?,
            _ = signal::ctrl_c() => {
                log::info!("Received Ctrl+C, shutting down");
            }
        }
        Ok::<(), anyhow::Error>(())
    })
}
