/// One row of the books listing: a book joined with its category name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRow {
    /// Store identifier; only used for ordering, never displayed
    pub id: i64,
    pub title: String,
    /// Romanized (Hepburn) rendering of the title
    pub hepburn: String,
    pub author: String,
    pub published_date: String,
    /// `None` when the book has no category or it does not resolve
    pub category_name: Option<String>,
}

/// Row totals reported by `shelf check`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogueCounts {
    pub books: u64,
    pub categories: u64,
}
