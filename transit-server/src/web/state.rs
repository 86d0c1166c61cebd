//! Application state for the web layer.

use std::sync::Arc;

use crate::catalogue::TransitCatalogue;
use crate::render::MapRenderer;
use crate::requests::RequestHandler;
use crate::routing::RoutePlanner;

/// Shared application state.
///
/// Everything inside is immutable after startup, so handlers only ever
/// read through the `Arc`s.
#[derive(Clone)]
pub struct AppState {
    pub catalogue: Arc<TransitCatalogue>,
    pub planner: Arc<RoutePlanner>,
    pub renderer: Arc<MapRenderer>,
    pub handler: Arc<RequestHandler>,
}

impl AppState {
    /// Create the app state, wiring the protocol facade to the same shared
    /// components the handlers use.
    pub fn new(
        catalogue: Arc<TransitCatalogue>,
        planner: Arc<RoutePlanner>,
        renderer: Arc<MapRenderer>,
    ) -> Self {
        let handler = Arc::new(RequestHandler::new(
            catalogue.clone(),
            planner.clone(),
            renderer.clone(),
        ));
        Self {
            catalogue,
            planner,
            renderer,
            handler,
        }
    }
}
