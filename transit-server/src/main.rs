use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use transit_server::dataset::TransitDataset;
use transit_server::render::MapRenderer;
use transit_server::requests::RequestHandler;
use transit_server::routing::RoutePlanner;
use transit_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let Some(dataset_path) = args.next() else {
        eprintln!("Usage: transit-server <dataset.json> [--batch]");
        return ExitCode::from(2);
    };
    let batch_mode = args.next().as_deref() == Some("--batch");

    // Load the world: data errors here are fatal, not query errors.
    let dataset = match TransitDataset::from_file(&dataset_path) {
        Ok(dataset) => dataset,
        Err(e) => {
            eprintln!("Failed to load dataset: {e}");
            return ExitCode::FAILURE;
        }
    };

    let catalogue = Arc::new(dataset.build_catalogue());
    println!(
        "Loaded {} stops and {} buses from {dataset_path}",
        catalogue.stop_count(),
        catalogue.bus_count()
    );

    let planner = match RoutePlanner::new(catalogue.clone(), dataset.routing_settings.clone()) {
        Ok(planner) => Arc::new(planner),
        Err(e) => {
            eprintln!("Failed to build routing graph: {e}");
            return ExitCode::FAILURE;
        }
    };
    let renderer = Arc::new(MapRenderer::new(dataset.render_settings.clone()));

    if batch_mode {
        // One-shot mode: answer the document's own stat requests on stdout.
        let handler = RequestHandler::new(catalogue, planner, renderer);
        let responses = handler.handle_all(&dataset.stat_requests);
        let output =
            serde_json::to_string_pretty(&responses).expect("responses always serialize");
        println!("{output}");
        return ExitCode::SUCCESS;
    }

    let state = AppState::new(catalogue, planner, renderer);
    let app = create_router(state);

    let port: u16 = std::env::var("TRANSIT_PORT")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(3000);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    println!("Transit Catalogue listening on http://{addr}");
    println!();
    println!("API Endpoints:");
    println!("  GET  /health       - Health check");
    println!("  GET  /bus/:name    - Route statistics for a bus");
    println!("  GET  /stop/:name   - Buses serving a stop");
    println!("  GET  /route        - Fastest itinerary (?from=&to=)");
    println!("  GET  /map          - Schematic network map (SVG)");
    println!("  POST /requests     - Batch stat-request protocol");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app).await.expect("server failed");
    ExitCode::SUCCESS
}
