pub mod models;
pub mod render;
pub mod repo;
pub mod routes;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use shelf_db::StoreResult;
use shelf_http::error::AppError;
use shelf_kernel::settings::DatabaseSettings;
use shelf_kernel::{InitCtx, Module};

use models::CatalogueCounts;

/// Renders the books page from a fresh read of the store.
///
/// Holds only the store location; each call opens its own read-only
/// connection and drops it before returning, on success and on error.
#[derive(Debug, Clone)]
pub struct BooksPageRenderer {
    database: DatabaseSettings,
}

impl BooksPageRenderer {
    pub fn new(database: DatabaseSettings) -> Self {
        Self { database }
    }

    pub fn database(&self) -> &DatabaseSettings {
        &self.database
    }

    /// Blocking render: open, query, close, then build the document.
    pub fn render_blocking(&self) -> StoreResult<String> {
        let rows = {
            let conn = shelf_db::open_read_only(&self.database)?;
            repo::fetch_book_rows(&conn)?
        };

        tracing::debug!(rows = rows.len(), "books fetched");
        Ok(render::render_books_page(&rows))
    }

    /// Render on the blocking pool so the runtime threads never wait on SQLite.
    pub async fn render_books_page(&self) -> Result<String, AppError> {
        let renderer = self.clone();
        let rendered = tokio::task::spawn_blocking(move || renderer.render_blocking())
            .await
            .map_err(|err| AppError::Internal(err.into()))?;

        Ok(rendered?)
    }

    /// Blocking row counts for operational checks.
    pub fn counts_blocking(&self) -> StoreResult<CatalogueCounts> {
        let conn = shelf_db::open_read_only(&self.database)?;
        repo::count_catalogue(&conn)
    }
}

/// Books module: owns the `GET /books` route
pub struct BooksModule {
    renderer: Arc<BooksPageRenderer>,
}

impl BooksModule {
    pub fn new(database: DatabaseSettings) -> Self {
        Self {
            renderer: Arc::new(BooksPageRenderer::new(database)),
        }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            store = %self.renderer.database().path.display(),
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(Arc::clone(&self.renderer))
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(database: &DatabaseSettings) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(database.clone()))
}
