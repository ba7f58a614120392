//! Shared state of the HTTP handlers.

use product_search_repository::ProductSearchService;

/// State cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub service: ProductSearchService,
}
