//! HTML rendering of the books page.

use super::models::BookRow;

const COLUMN_LABELS: [&str; 6] = ["#", "Title", "Hepburn", "Author", "Published", "Category"];

const EMPTY_ROW: &str = "<tr><td colspan='6'>No books found</td></tr>";

/// Escape the characters that are significant in HTML text and attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Render the complete books document.
///
/// Rows are numbered from 1 in the order given; the store id is not shown.
pub fn render_books_page(rows: &[BookRow]) -> String {
    let mut body = String::new();

    if rows.is_empty() {
        body.push_str("                ");
        body.push_str(EMPTY_ROW);
        body.push('\n');
    }

    for (index, book) in rows.iter().enumerate() {
        let cells = [
            (index + 1).to_string(),
            escape_html(&book.title),
            escape_html(&book.hepburn),
            escape_html(&book.author),
            escape_html(&book.published_date),
            escape_html(book.category_name.as_deref().unwrap_or_default()),
        ];

        let row: String = cells
            .iter()
            .map(|cell| format!("                    <td>{cell}</td>\n"))
            .collect();

        body.push_str("                <tr>\n");
        body.push_str(&row);
        body.push_str("                </tr>\n");
    }

    let header: String = COLUMN_LABELS
        .iter()
        .map(|label| format!("                    <th>{label}</th>\n"))
        .collect();

    format!(
        "<html>
<head>
    <title>Books</title>
    <style>
        table {{ border-collapse: collapse; width: 100%; }}
        th, td {{ border: 1px solid #ccc; padding: 6px; }}
        th {{ background: #eee; }}
    </style>
</head>
<body>
    <h2>Books</h2>
    <table>
        <thead>
            <tr>
{header}            </tr>
        </thead>
        <tbody>
{body}        </tbody>
    </table>
</body>
</html>
"
    )
}
