//! Read-only queries over the `books` and `categories` tables.

use rusqlite::types::ValueRef;
use rusqlite::{Connection, Row};
use shelf_db::{StoreError, StoreResult};

use super::models::{BookRow, CatalogueCounts};

const BOOKS_PAGE_SQL: &str = "SELECT
    b.id,
    b.title,
    b.hepburn,
    b.author,
    b.published_date,
    c.name AS category_name
FROM books b
LEFT JOIN categories c ON b.category_id = c.id
ORDER BY b.id";

/// Every book with its category name, ascending by id.
pub fn fetch_book_rows(conn: &Connection) -> StoreResult<Vec<BookRow>> {
    let mut stmt = conn
        .prepare(BOOKS_PAGE_SQL)
        .map_err(StoreError::QueryFailed)?;

    let rows = stmt
        .query_map([], map_book_row)
        .map_err(StoreError::QueryFailed)?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(StoreError::QueryFailed)
}

/// Number of rows in each of the two tables.
pub fn count_catalogue(conn: &Connection) -> StoreResult<CatalogueCounts> {
    let count = |table: &str| -> StoreResult<u64> {
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
            row.get::<_, i64>(0)
        })
        .map(|n| n.max(0) as u64)
        .map_err(StoreError::QueryFailed)
    };

    Ok(CatalogueCounts {
        books: count("books")?,
        categories: count("categories")?,
    })
}

fn map_book_row(row: &Row<'_>) -> rusqlite::Result<BookRow> {
    Ok(BookRow {
        id: row.get(0)?,
        title: cell_text(row, 1)?,
        hepburn: cell_text(row, 2)?,
        author: cell_text(row, 3)?,
        published_date: cell_text(row, 4)?,
        category_name: cell_text_opt(row, 5)?,
    })
}

/// Display text of a loosely typed column; `NULL` reads as empty.
fn cell_text(row: &Row<'_>, idx: usize) -> rusqlite::Result<String> {
    Ok(cell_text_opt(row, idx)?.unwrap_or_default())
}

/// Display text of a loosely typed column, keeping `NULL` as `None`.
fn cell_text_opt(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<String>> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => None,
        ValueRef::Integer(value) => Some(value.to_string()),
        ValueRef::Real(value) => Some(value.to_string()),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Some(String::from_utf8_lossy(bytes).into_owned())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        // Dangling category ids must be insertable.
        conn.execute_batch(
            "PRAGMA foreign_keys = OFF;
             CREATE TABLE categories (id INTEGER PRIMARY KEY, name);
             CREATE TABLE books (
                 id INTEGER PRIMARY KEY,
                 title TEXT,
                 hepburn TEXT,
                 author TEXT,
                 published_date TEXT,
                 category_id INTEGER REFERENCES categories(id)
             );",
        )
        .unwrap();
        conn
    }

    #[test]
    fn rows_come_back_in_id_order() {
        let conn = store();
        conn.execute_batch(
            "INSERT INTO books (id, title, hepburn, author, published_date) VALUES
                (9, 'C', 'c', 'x', '2001-01-01'),
                (2, 'A', 'a', 'x', '2002-01-01'),
                (5, 'B', 'b', 'x', '2003-01-01');",
        )
        .unwrap();

        let ids: Vec<i64> = fetch_book_rows(&conn)
            .unwrap()
            .iter()
            .map(|row| row.id)
            .collect();
        assert_eq!(ids, [2, 5, 9]);
    }

    #[test]
    fn uncategorised_and_dangling_books_are_kept() {
        let conn = store();
        conn.execute_batch(
            "INSERT INTO categories (id, name) VALUES (1, 'Fiction');
             INSERT INTO books (id, title, hepburn, author, published_date, category_id) VALUES
                (1, 'Kokoro', 'Kokoro', 'Natsume Soseki', '1914-01-01', NULL),
                (2, 'Rashomon', 'Rashomon', 'Akutagawa Ryunosuke', '1915-11-01', 1),
                (3, 'Orphan', 'Orphan', 'Nobody', '2000-01-01', 42);",
        )
        .unwrap();

        let rows = fetch_book_rows(&conn).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].category_name, None);
        assert_eq!(rows[1].category_name.as_deref(), Some("Fiction"));
        assert_eq!(rows[2].category_name, None);
    }

    #[test]
    fn null_and_numeric_text_columns_are_rendered_as_text() {
        let conn = store();
        conn.execute_batch(
            "INSERT INTO books (id, title, hepburn, author, published_date)
             VALUES (1, 'Sparse', NULL, NULL, 1914);",
        )
        .unwrap();

        let rows = fetch_book_rows(&conn).unwrap();
        assert_eq!(rows[0].hepburn, "");
        assert_eq!(rows[0].author, "");
        assert_eq!(rows[0].published_date, "1914");
    }

    #[test]
    fn numeric_category_names_are_rendered_as_text() {
        let conn = store();
        conn.execute_batch(
            "INSERT INTO categories (id, name) VALUES (1, 1984), (2, 2.5);
             INSERT INTO books (id, title, category_id) VALUES (1, 'Nineteen', 1), (2, 'Half', 2);",
        )
        .unwrap();

        let rows = fetch_book_rows(&conn).unwrap();
        assert_eq!(rows[0].category_name.as_deref(), Some("1984"));
        assert_eq!(rows[1].category_name.as_deref(), Some("2.5"));
    }

    #[test]
    fn missing_tables_are_query_failures() {
        let conn = Connection::open_in_memory().unwrap();
        let err = fetch_book_rows(&conn).unwrap_err();
        assert!(matches!(err, StoreError::QueryFailed(_)));
    }

    #[test]
    fn counts_both_tables() {
        let conn = store();
        conn.execute_batch(
            "INSERT INTO categories (id, name) VALUES (1, 'Fiction'), (2, 'Poetry');
             INSERT INTO books (id, title) VALUES (1, 'Kokoro');",
        )
        .unwrap();

        assert_eq!(
            count_catalogue(&conn).unwrap(),
            CatalogueCounts {
                books: 1,
                categories: 2
            }
        );
    }
}
