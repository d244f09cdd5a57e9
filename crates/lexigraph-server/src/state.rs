//! Shared application state.

use std::sync::Arc;

use lexigraph_core::LexigraphConfig;
use lexigraph_extract::HeuristicAnnotator;
use lexigraph_llm::CompletionBackend;
use lexigraph_runtime::KnowledgeGraphService;
use lexigraph_store::GraphStore;

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: LexigraphConfig,
    pub service: KnowledgeGraphService,
    /// Name of the remote completion backend, if one is configured.
    pub backend_name: Option<String>,
}

impl AppState {
    pub fn new(config: LexigraphConfig, backend: Option<Arc<dyn CompletionBackend>>) -> Self {
        let backend_name = backend.as_ref().map(|b| b.name().to_string());
        let service = KnowledgeGraphService::new(
            GraphStore::new().into_handle(),
            Some(Arc::new(HeuristicAnnotator::new())),
            backend,
            config.limits.clone(),
        );

        Self {
            config,
            service,
            backend_name,
        }
    }
}
