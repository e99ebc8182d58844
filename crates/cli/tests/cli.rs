use assert_cmd::Command;
use rusqlite::Connection;

fn shelf(config_dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("shelf").unwrap();
    cmd.env("SHELF_CONFIG_DIR", config_dir)
        .env("SHELF_ENV", "local")
        .env("RUST_LOG", "off");
    cmd
}

fn seeded_store(dir: &tempfile::TempDir, seed: &str) -> std::path::PathBuf {
    let path = dir.path().join("db.sqlite3");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE categories (id INTEGER PRIMARY KEY, name TEXT NOT NULL);
         CREATE TABLE books (
             id INTEGER PRIMARY KEY,
             title TEXT, hepburn TEXT, author TEXT, published_date TEXT,
             category_id INTEGER REFERENCES categories(id)
         );",
    )
    .unwrap();
    conn.execute_batch(seed).unwrap();
    path
}

#[test]
fn render_prints_placeholder_for_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = seeded_store(&dir, "");

    let output = shelf(dir.path())
        .arg("render")
        .arg("--database")
        .arg(&path)
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("<tr><td colspan='6'>No books found</td></tr>"));
}

#[test]
fn render_fails_for_missing_store() {
    let dir = tempfile::tempdir().unwrap();

    let output = shelf(dir.path())
        .arg("render")
        .arg("--database")
        .arg(dir.path().join("missing.sqlite3"))
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn check_reports_row_counts() {
    let dir = tempfile::tempdir().unwrap();
    let path = seeded_store(
        &dir,
        "INSERT INTO categories (id, name) VALUES (1, 'Fiction');
         INSERT INTO books (id, title, hepburn, author, published_date, category_id)
         VALUES (1, 'Kokoro', 'Kokoro', 'Natsume Soseki', '1914-01-01', 1),
                (2, 'Botchan', 'Botchan', 'Natsume Soseki', '1906-04-01', NULL);",
    );

    let output = shelf(dir.path())
        .arg("check")
        .arg("--database")
        .arg(&path)
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("2 books, 1 categories"));
}

#[test]
fn database_path_can_come_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = seeded_store(
        &dir,
        "INSERT INTO books (id, title, hepburn, author, published_date)
         VALUES (7, 'Sanshiro', 'Sanshiro', 'Natsume Soseki', '1908-09-01');",
    );
    std::fs::write(
        dir.path().join("base.toml"),
        format!("[database]\npath = {:?}\n", path.to_str().unwrap()),
    )
    .unwrap();

    let output = shelf(dir.path()).arg("render").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("<td>1</td>"));
    assert!(stdout.contains("<td>Sanshiro</td>"));
}
