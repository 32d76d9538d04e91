use kopi_keliling_admin::{
    AppState, BackendState, MemoryBackend, SupabaseClient,
    config::{AppConfig, Env},
    create_router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Boots configuration, logging, the backend ports and the HTTP server.
#[tokio::main]
async fn main() {
    // 1. Configuration & Environment Loading (Fail-Fast)
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging Filter Setup
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "kopi_keliling_admin=debug,tower_http=info,axum=trace".into());

    // 3. Initialize Logging based on Environment
    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    // 4. Backend Initialization
    let backend = match &config.supabase_url {
        Some(url) => {
            tracing::info!("Using Supabase project at {}", url);
            BackendState::from_shared(Arc::new(SupabaseClient::new(
                url,
                &config.supabase_anon_key,
                &config.jwt_secret,
            )))
        }
        None => {
            // LOCAL-ONLY: production config always carries a Supabase URL.
            tracing::warn!("SUPABASE_URL not set; using the in-memory backend");
            let memory = MemoryBackend::new();
            if let Some((email, password)) = &config.local_admin {
                let id = memory.create_account(email, password).await;
                if let Some(role) = config.allowed_roles.first() {
                    memory.grant_role(id, role.clone()).await;
                }
                tracing::info!("Seeded local admin {}", email);
            }
            BackendState::from_shared(Arc::new(memory))
        }
    };

    // 5. Unified State Assembly
    let bind_addr = config.bind_addr.clone();
    let app = create_router(AppState::new(backend, config));

    // 6. Server Startup
    let listener = TcpListener::bind(&bind_addr)
        .await
        .expect("FATAL: Failed to bind the HTTP listener. Check BIND_ADDR.");

    tracing::info!("Listening on {}", bind_addr);
    tracing::info!("API Documentation (Swagger UI) available at /swagger-ui");

    axum::serve(listener, app)
        .await
        .expect("FATAL: HTTP server terminated unexpectedly");
}
