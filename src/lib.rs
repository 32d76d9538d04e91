use axum::{
    Router,
    extract::{FromRef, Request},
    http::{HeaderName, HeaderValue},
    middleware::{self, Next},
    response::Response,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// Ports to the hosted backend and their implementations.
pub mod backend;
pub mod memory;
pub mod supabase;

// Blog-management workflow.
pub mod console;
pub mod editor;
pub mod guard;
pub mod login;
pub mod posts;
pub mod slug;
pub mod validation;

// Shared types, configuration and HTTP plumbing.
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod notify;

// Routing segregation (Public, Admin).
pub mod routes;
use auth::AdminUser;
use routes::{admin, public};

// Re-exports used by main and the integration tests.
pub use backend::{AuthProvider, BackendError, BackendState, DataStore};
pub use config::{AppConfig, Env};
pub use console::AdminConsole;
pub use guard::{AdminSession, GuardError, SessionGuard};
pub use login::{AuthEntry, Authenticator};
pub use memory::MemoryBackend;
pub use posts::{Confirmation, PostService};
pub use supabase::SupabaseClient;

/// ApiDoc
///
/// OpenAPI document for the service, served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::login, handlers::register, handlers::logout,
        handlers::get_admin_session, handlers::list_posts, handlers::create_post,
        handlers::update_post, handlers::delete_post, handlers::preview_slug
    ),
    components(
        schemas(
            models::BlogPost, models::PostForm, models::PostSummary, models::PostListResponse,
            models::Session, models::SessionUser, models::Role, models::CredentialsRequest,
            models::LoginResponse, models::MessageResponse, models::AdminSessionResponse,
            models::SlugResponse, notify::Notification, notify::Variant, notify::Route,
            error::ErrorBody,
        )
    ),
    tags(
        (name = "kopi-keliling-admin", description = "Kopi Keliling blog administration API")
    )
)]
struct ApiDoc;

/// AppState
///
/// Single shared container for the backend ports, the services built on them,
/// and the immutable configuration.
#[derive(Clone)]
pub struct AppState {
    pub backend: BackendState,
    pub posts: PostService,
    pub authenticator: Authenticator,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(backend: BackendState, config: AppConfig) -> Self {
        Self {
            posts: PostService::new(backend.store.clone()),
            authenticator: Authenticator::new(backend.auth.clone(), Some(config.site_url.clone())),
            backend,
            config,
        }
    }
}

impl FromRef<AppState> for BackendState {
    fn from_ref(app_state: &AppState) -> BackendState {
        app_state.backend.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// admin_middleware
///
/// Gate for every `/admin` route. Extracting `AdminUser` runs the session guard;
/// on failure the extractor's rejection (401/403/502) is returned and the handler
/// never runs. On success the result is cached in the request extensions.
async fn admin_middleware(admin: AdminUser, mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(admin);
    next.run(request).await
}

const REQUEST_ID_HEADER: &str = "x-request-id";

/// CORS policy: any origin locally; in production only the public site, which is
/// where the admin front-end is served from.
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match (&config.env, HeaderValue::from_str(&config.site_url)) {
        (Env::Production, Ok(origin)) => cors.allow_origin(origin),
        _ => cors.allow_origin(Any),
    }
}

/// create_router
///
/// Public routes, the guarded `/admin` tree and the API docs, wrapped in request
/// correlation, tracing and CORS.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    let admin = admin::admin_routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        admin_middleware,
    ));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .nest("/admin", admin)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(request_span)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(request_id)),
        )
        .layer(cors)
}

/// request_span
///
/// Span for one request, tagged with the id set by `SetRequestIdLayer`.
fn request_span(request: &Request) -> Span {
    let req_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = %request.method(),
        path = %request.uri().path(),
        %req_id,
    )
}
