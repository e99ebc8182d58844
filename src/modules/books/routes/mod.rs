use std::sync::Arc;

use axum::{extract::State, response::Html, routing::get, Router};
use shelf_http::error::AppError;

use super::BooksPageRenderer;

/// Route table of the books module
pub fn router(renderer: Arc<BooksPageRenderer>) -> Router {
    Router::new()
        .route("/books", get(books_page))
        .with_state(renderer)
}

/// `GET /books`: the full listing as an HTML document
async fn books_page(
    State(renderer): State<Arc<BooksPageRenderer>>,
) -> Result<Html<String>, AppError> {
    let page = renderer.render_books_page().await?;
    Ok(Html(page))
}
