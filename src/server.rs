use crate::client::OutboundClient;
use crate::config::{GatewayConfig, MEMORY_COLLECTION, resolve_collection};
use crate::error::{ApiError, GatewayError, StageExt};
use crate::io_struct::{
    AnswerResponse, AskReqInput, DocumentResponse, ListenReqInput, PlanResponse, PromptReqInput,
    ReadReqInput, RememberReqInput, TextResponse, Validate, ViewReqInput,
};
use crate::llm::ChatClient;
use crate::services::{ExternalServices, Memory};
use crate::stages::Orchestrator;
use actix_cors::Cors;
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, HttpServer, error, get, post, web};
use bytes::Bytes;
use std::io::Write;

#[derive(Debug, Clone)]
pub struct AppState {
    pub orchestrator: Orchestrator,
}

impl AppState {
    pub fn new(config: &GatewayConfig) -> anyhow::Result<Self> {
        Ok(Self::with_client(config, OutboundClient::new()?))
    }

    pub fn with_client(config: &GatewayConfig, client: OutboundClient) -> Self {
        let services = ExternalServices::new(client.clone(), config.services.clone());
        let chat = ChatClient::new(client, config.llm.clone());
        Self {
            orchestrator: Orchestrator::new(chat, services),
        }
    }

    fn services(&self) -> &ExternalServices {
        self.orchestrator.services()
    }
}

/// Relays a chunk-store reply to the caller as-is.
fn relay(body: Bytes) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(header::ContentType::json())
        .body(body)
}

fn validated<T: Validate>(req: web::Json<T>) -> Result<T, ApiError> {
    let req = req.into_inner();
    req.validate().stage("Invalid request")?;
    Ok(req)
}

#[get("/health")]
pub async fn health(_req: HttpRequest) -> HttpResponse {
    HttpResponse::Ok().body("Ok")
}

#[post("/view")]
pub async fn view(
    req: web::Json<ViewReqInput>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let req = validated(req)?;
    let text = app_state
        .services()
        .describe_image(&req.image_base64, &req.origin, &req.name)
        .await
        .stage("Image processing failed")?;
    let body = app_state
        .services()
        .submit_chunk(&text, &req.origin, &req.collection)
        .await
        .stage("Failed to chunk result")?;
    Ok(relay(body))
}

#[post("/listen")]
pub async fn listen(
    req: web::Json<ListenReqInput>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let req = validated(req)?;
    let text = app_state
        .services()
        .transcribe_audio(&req.audio_base64, &req.origin, &req.name)
        .await
        .stage("Audio transcription failed")?;
    let body = app_state
        .services()
        .submit_chunk(&text, &req.origin, &req.collection)
        .await
        .stage("Failed to chunk result")?;
    Ok(relay(body))
}

#[post("/read")]
pub async fn read(
    req: web::Json<ReadReqInput>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let req = validated(req)?;
    let body = app_state
        .services()
        .submit_chunk(&req.text, &req.origin, &req.collection)
        .await
        .stage("Failed to store text")?;
    Ok(relay(body))
}

#[post("/document")]
pub async fn document(
    req: web::Json<PromptReqInput>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let req = validated(req)?;
    let orchestrator = &app_state.orchestrator;
    // The write stage only runs once a plan exists.
    let plan = orchestrator
        .think_documentation(&req.prompt)
        .await
        .stage("Planning failed")?;
    log::debug!("writing documentation from a {} byte plan", plan.len());
    let documentation = orchestrator
        .talk_documentation(&plan)
        .await
        .stage("Generation failed")?;
    Ok(HttpResponse::Ok().json(DocumentResponse {
        plan,
        documentation,
    }))
}

#[post("/think")]
pub async fn think(
    req: web::Json<PromptReqInput>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let req = validated(req)?;
    let plan = app_state
        .orchestrator
        .think(&req.prompt)
        .await
        .stage("Thinking failed")?;
    Ok(HttpResponse::Ok().json(PlanResponse { plan }))
}

#[post("/explain")]
pub async fn explain(
    req: web::Json<PromptReqInput>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let req = validated(req)?;
    let text = app_state
        .orchestrator
        .talk(&req.prompt)
        .await
        .stage("Explanation failed")?;
    Ok(HttpResponse::Ok().json(TextResponse { text }))
}

#[post("/remember")]
pub async fn remember(
    req: web::Json<RememberReqInput>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let req = validated(req)?;
    let collection = resolve_collection(&req.collection, MEMORY_COLLECTION);
    let memory = Memory {
        text: &req.text,
        subject: &req.subject,
        origin: &req.origin,
        collection: &collection,
        tags: req.tags.as_deref(),
        timestamp: req.timestamp.as_deref(),
    };
    let body = app_state
        .services()
        .remember_chunk(memory)
        .await
        .stage("Failed to remember")?;
    Ok(relay(body))
}

#[post("/ask")]
pub async fn ask(
    req: web::Json<AskReqInput>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let req = validated(req)?;
    let collection = resolve_collection(&req.collection, MEMORY_COLLECTION);
    let answer = app_state
        .orchestrator
        .ask(&req.query, &collection)
        .await
        .stage("Ask failed")?;
    Ok(HttpResponse::Ok().json(AnswerResponse { answer }))
}

// Malformed bodies are validation failures, reported like a missing field.
fn json_error_handler(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    log::warn!("Invalid JSON payload on {}: {}", req.path(), err);
    let msg = match req.path() {
        "/view" => "Missing image",
        "/listen" => "Missing audio",
        "/read" => "Missing text",
        "/remember" => "Missing 'text' or 'subject'",
        "/ask" => "Invalid JSON or missing 'query'",
        _ => crate::io_struct::MISSING_PROMPT,
    };
    GatewayError::Validation(msg.to_string())
        .at("Invalid request")
        .into()
}

pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024 * 1024)
        .content_type_required(false)
        .error_handler(json_error_handler)
}

/// Any origin may POST JSON; preflight requests are answered directly.
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .send_wildcard()
        .allowed_methods(vec!["POST", "OPTIONS"])
        .allowed_header(header::CONTENT_TYPE)
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health)
        .service(view)
        .service(listen)
        .service(read)
        .service(document)
        .service(think)
        .service(explain)
        .service(remember)
        .service(ask);
}

pub fn init_logging(level: log::LevelFilter) {
    let _ = env_logger::Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter(None, level)
        .parse_default_env()
        .try_init();
}

pub async fn startup(config: GatewayConfig, app_state: AppState) -> std::io::Result<()> {
    let app_state = web::Data::new(app_state);

    log::info!("Starting nivo gateway at {}:{}", config.host, config.port);
    log::info!(
        "Chunk store: {}, vision: {}, audio: {}",
        config.services.chunk_store,
        config.services.vision,
        config.services.audio
    );
    if config.llm.api_key.is_none() {
        log::warn!("GROQ_API_KEY is not set; language-model routes will fail");
    }

    HttpServer::new(move || {
        actix_web::App::new()
            .wrap(cors())
            .wrap(actix_web::middleware::Logger::default())
            .app_data(app_state.clone())
            .app_data(json_config())
            .configure(configure)
    })
    .bind((config.host, config.port))?
    .run()
    .await?;

    std::io::Result::Ok(())
}
