use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nihongo::{config, conjugation, content, db, handlers, paths, services, state};

#[tokio::main]
async fn main() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "nihongo=debug,tower_http=debug".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  let db_path = config::load_database_path();
  let pool = db::init_db(&db_path).expect("Failed to initialize database");

  {
    let conn = pool.lock().expect("Database lock failed during startup");
    content::seed_baseline(&conn).expect("Failed to seed baseline decks");
  }

  let conjugator = conjugation::Conjugator::load(paths::data_dir());
  let tts = services::tts::detect_engine();

  let app_state = state::AppState::new(pool, db_path, conjugator, tts);
  let app = handlers::router(app_state)
    .layer(tower_http::trace::TraceLayer::new_for_http());

  let addr = config::server_bind_addr();
  tracing::info!("Listening on http://{}", addr);

  let listener = tokio::net::TcpListener::bind(&addr)
    .await
    .expect("Failed to bind server address");
  axum::serve(listener, app).await.expect("Server error");
}
