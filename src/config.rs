use log::LevelFilter;

pub const DEFAULT_CHUNK_STORE_URL: &str = "http://localhost:8080";
pub const DEFAULT_VISION_URL: &str = "http://localhost:8060";
pub const DEFAULT_AUDIO_URL: &str = "http://localhost:8040";
pub const DEFAULT_LLM_API_BASE: &str = "https://api.groq.com/openai/v1";

pub const DEFAULT_REASONING_MODEL: &str = "deepseek-r1-distill-llama-70b";
pub const DEFAULT_GENERATION_MODEL: &str = "llama3-70b-8192";
pub const DEFAULT_ANSWER_MODEL: &str = "llama3-70b-8192";

/// Collection used by the storage and prompt routes when the caller leaves it empty.
pub const MEMORY_COLLECTION: &str = "Memory";
/// Collection searched by `/ask` when the caller leaves it empty.
pub const ASK_COLLECTION: &str = "Database";

/// Returns `collection`, or `default` when it is empty.
pub fn resolve_collection(collection: &str, default: &str) -> String {
    if collection.is_empty() {
        default.to_string()
    } else {
        collection.to_string()
    }
}

/// Base URLs of the services the gateway relays to.
#[derive(Debug, Clone)]
pub struct ServiceUrls {
    pub chunk_store: String,
    pub vision: String,
    pub audio: String,
}

impl ServiceUrls {
    pub fn chunk(&self) -> String {
        join_url(&self.chunk_store, "/chunk")
    }

    pub fn lookup(&self) -> String {
        join_url(&self.chunk_store, "/lookup")
    }

    pub fn view(&self) -> String {
        join_url(&self.vision, "/view")
    }

    pub fn transcribe(&self) -> String {
        join_url(&self.audio, "/transcribe")
    }
}

impl Default for ServiceUrls {
    fn default() -> Self {
        Self {
            chunk_store: DEFAULT_CHUNK_STORE_URL.to_string(),
            vision: DEFAULT_VISION_URL.to_string(),
            audio: DEFAULT_AUDIO_URL.to_string(),
        }
    }
}

/// Chat-completion endpoint settings.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_base: String,
    /// Bearer credential. `None` makes every model call fail before it is sent.
    pub api_key: Option<String>,
    pub reasoning_model: String,
    pub generation_model: String,
    pub answer_model: String,
}

impl LlmConfig {
    pub fn chat_completions_url(&self) -> String {
        join_url(&self.api_base, "/chat/completions")
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_LLM_API_BASE.to_string(),
            api_key: None,
            reasoning_model: DEFAULT_REASONING_MODEL.to_string(),
            generation_model: DEFAULT_GENERATION_MODEL.to_string(),
            answer_model: DEFAULT_ANSWER_MODEL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    pub log_level: LevelFilter,
    pub services: ServiceUrls,
    pub llm: LlmConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8090,
            log_level: LevelFilter::Info,
            services: ServiceUrls::default(),
            llm: LlmConfig::default(),
        }
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}
