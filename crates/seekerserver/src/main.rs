use actix_cors::Cors;
use actix_web::{
    get, http::header, post, web, App, HttpResponse, HttpServer, Responder, Result as ActixResult,
};
use actix_ws::Message;
use seekercore::ErrorKind;
use seekerflows::export::{export_file_name, export_queries, ExportFormat};
use seekerflows::{presentation, ActionError, GeminiConfig, GeminiModel, SeekerActions};
use seekerruntime::{FlowRegistry, SeekerRuntime};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Application state shared across handlers
struct AppState {
    runtime: Arc<SeekerRuntime>,
    actions: SeekerActions,
}

#[derive(Debug, Deserialize)]
struct AnalyzeRequest {
    input: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RelatedTermsRequest {
    search_term: String,
}

#[derive(Debug, Deserialize)]
struct StrategicRequest {
    objective: String,
    context: String,
}

#[derive(Debug, Deserialize)]
struct ExportRequest {
    queries: Vec<String>,
    format: ExportFormat,
    #[serde(default = "default_platform")]
    platform: String,
}

fn default_platform() -> String {
    "all".to_string()
}

/// Platform labels end up in a Content-Disposition filename
fn is_valid_platform(platform: &str) -> bool {
    !platform.is_empty()
        && platform
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Error response
#[derive(Debug, Serialize)]
struct ErrorResponse {
    title: &'static str,
    error: &'static str,
    kind: ErrorKind,
    message: String,
}

fn error_response(err: &ActionError) -> HttpResponse {
    let body = ErrorResponse {
        title: presentation::title(err.capability),
        error: presentation::friendly_message(err),
        kind: err.kind(),
        message: err.to_string(),
    };
    match err.kind() {
        ErrorKind::EmptyInput | ErrorKind::InvalidInput => HttpResponse::BadRequest().json(body),
        ErrorKind::ModelCallFailed
        | ErrorKind::ModelResponseMalformed
        | ErrorKind::InvalidModelOutput => HttpResponse::BadGateway().json(body),
        ErrorKind::UnknownFlow | ErrorKind::DuplicateFlow | ErrorKind::MissingVariable => {
            HttpResponse::InternalServerError().json(body)
        }
    }
}

/// Health check endpoint
#[get("/health")]
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "seeker"
    }))
}

/// List registered flows
#[get("/api/flows")]
async fn list_flows(data: web::Data<AppState>) -> ActixResult<impl Responder> {
    let flows: Vec<_> = data
        .runtime
        .registry()
        .definitions()
        .map(|flow| {
            serde_json::json!({
                "name": flow.name,
                "description": flow.description,
                "input": flow.input_schema,
                "output": flow.output_schema,
            })
        })
        .collect();

    Ok(HttpResponse::Ok().json(flows))
}

#[get("/api/objectives")]
async fn list_objectives() -> impl Responder {
    HttpResponse::Ok().json(seekerflows::OSINT_OBJECTIVES)
}

/// Analyse free text and generate optimised queries
#[post("/api/analyze")]
async fn analyze(
    data: web::Data<AppState>,
    req: web::Json<AnalyzeRequest>,
) -> ActixResult<impl Responder> {
    match data.actions.analyze_and_generate(&req.input).await {
        Ok(result) => Ok(HttpResponse::Ok().json(result)),
        Err(e) => Ok(error_response(&e)),
    }
}

#[post("/api/related-terms")]
async fn related_terms(
    data: web::Data<AppState>,
    req: web::Json<RelatedTermsRequest>,
) -> ActixResult<impl Responder> {
    match data.actions.suggest_related_terms(&req.search_term).await {
        Ok(result) => Ok(HttpResponse::Ok().json(result)),
        Err(e) => Ok(error_response(&e)),
    }
}

#[post("/api/strategic-queries")]
async fn strategic_queries(
    data: web::Data<AppState>,
    req: web::Json<StrategicRequest>,
) -> ActixResult<impl Responder> {
    match data
        .actions
        .generate_strategic_queries(&req.objective, &req.context)
        .await
    {
        Ok(result) => Ok(HttpResponse::Ok().json(result)),
        Err(e) => Ok(error_response(&e)),
    }
}

/// Render a query list as a downloadable file
#[post("/api/export")]
async fn export(req: web::Json<ExportRequest>) -> impl Responder {
    let req = req.into_inner();
    if !is_valid_platform(&req.platform) {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Platform may only contain letters, digits, '_' and '-'.",
            "kind": ErrorKind::InvalidInput,
        }));
    }
    let body = export_queries(&req.queries, req.format);
    let file_name = export_file_name(&req.platform, req.format);

    HttpResponse::Ok()
        .content_type(req.format.mime_type())
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file_name),
        ))
        .body(body)
}

/// WebSocket endpoint for real-time execution events
#[get("/api/events")]
async fn websocket_events(
    req: actix_web::HttpRequest,
    stream: web::Payload,
    data: web::Data<AppState>,
) -> ActixResult<HttpResponse> {
    let (res, mut session, mut msg_stream) = actix_ws::handle(&req, stream)?;

    info!("WebSocket client connected");

    let mut events = data.runtime.subscribe_events();

    actix_web::rt::spawn(async move {
        loop {
            tokio::select! {
                event = events.recv() => {
                    match event {
                        Ok(event) => {
                            if let Ok(json) = serde_json::to_string(&event) {
                                if session.text(json).await.is_err() {
                                    break;
                                }
                            }
                        }
                        Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                            warn!("WebSocket client lagged, skipped {} events", skipped);
                        }
                        Err(_) => break,
                    }
                }

                Some(Ok(msg)) = msg_stream.recv() => {
                    match msg {
                        Message::Ping(bytes) => {
                            if session.pong(&bytes).await.is_err() {
                                break;
                            }
                        }
                        Message::Close(_) => break,
                        _ => {}
                    }
                }

                else => break,
            }
        }

        info!("WebSocket client disconnected");
        let _ = session.close(None).await;
    });

    Ok(res)
}

fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check)
        .service(list_flows)
        .service(list_objectives)
        .service(analyze)
        .service(related_terms)
        .service(strategic_queries)
        .service(export)
        .service(websocket_events);
}

fn app_state(runtime: SeekerRuntime) -> web::Data<AppState> {
    let actions = SeekerActions::new(runtime.executor().clone());
    web::Data::new(AppState {
        runtime: Arc::new(runtime),
        actions,
    })
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("🚀 Starting Seeker Lens server");

    let config = GeminiConfig::from_env();
    if config.api_key.is_none() {
        warn!("No GEMINI_API_KEY or GOOGLE_API_KEY set; model calls will fail");
    }
    info!("Using model {}", config.model);
    let model = Arc::new(GeminiModel::new(config)?);

    let mut registry = FlowRegistry::new();
    seekerflows::register_all_flows(&mut registry)?;
    let state = app_state(SeekerRuntime::new(registry, model));

    let bind_address =
        std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

    info!("🌐 Server starting on http://{}", bind_address);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(state.clone())
            .wrap(cors)
            .wrap(actix_web::middleware::Logger::default())
            .configure(configure)
    })
    .bind(&bind_address)?
    .run()
    .await?;

    Ok(())
}
