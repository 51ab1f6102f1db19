use anyhow::Result;
use directories::ProjectDirs;
use rusqlite::Connection;
use std::path::{Path, PathBuf};

use crate::log::vlog;

pub fn default_db_path() -> PathBuf {
    if let Some(dirs) = ProjectDirs::from("dev", "wallow", "wallow") {
        let data = dirs.data_dir();
        std::fs::create_dir_all(data).ok();
        data.join("wallow.db")
    } else {
        PathBuf::from("wallow.db")
    }
}

pub fn open(path: &Path) -> Result<Connection> {
    vlog!("opening db: {}", path.display());
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode = WAL;")?;
    migrate(&conn)?;
    vlog!("db ready (WAL)");
    Ok(conn)
}

pub(crate) fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS wallpapers (
            id        INTEGER PRIMARY KEY,
            path      TEXT NOT NULL UNIQUE,
            added     INTEGER NOT NULL,
            seen      INTEGER NOT NULL,
            mime      TEXT,
            width     INTEGER,
            height    INTEGER,
            hash      TEXT,
            profile   TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_wallpapers_dims ON wallpapers(width, height);
        CREATE INDEX IF NOT EXISTS idx_wallpapers_seen ON wallpapers(seen);
        ",
    )?;
    Ok(())
}
