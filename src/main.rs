use std::{sync::Arc, time::Duration};

use clap::Parser;

use deploy_today::{
  cli::Args,
  logging,
  refresh::spawn_periodic,
  routers,
  source::AssetSource,
  state::AppState,
};

#[tokio::main]
async fn main() {
  logging::init();

  let args = Args::parse();

  let source = AssetSource::parse(&args.assets);
  let init_state = AppState::new(source, &args.default_country, &args.geoip_url);

  let shared_state = Arc::new(init_state);

  // Loaded once per process. Falls back to the built-in table on failure.
  shared_state.loader.load().await;

  let refresh_state = shared_state.clone();
  let refresh_task = spawn_periodic(Duration::from_secs(args.refresh_secs.max(1)), move || {
    refresh_state.clone().refresh_current()
  });

  let app = routers::router(shared_state);

  tracing::info!(listen = %args.listen, assets = %args.assets, "Listening");

  let web_task = axum::Server::bind(&args.listen)
    .serve(app.into_make_service());

  let res = refresh_task.stop_after(web_task).await;

  if let Err(err) = res {
    tracing::error!(error = %err, "Server stopped");
    std::process::exit(1);
  }
}
