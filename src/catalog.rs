use rusqlite::Connection;
use std::sync::{Arc, Mutex};

// ---------------------------------------------------------------------------
// Catalog — thin wrapper around Arc<Mutex<Connection>>
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct Catalog(Arc<Mutex<Connection>>);

impl Catalog {
    pub fn new(conn: Connection) -> Self {
        Self(Arc::new(Mutex::new(conn)))
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.0.lock().unwrap()
    }
}

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// One row per image file. Metadata fields stay `None` until computed.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub path: String,
    pub added: i64,
    pub seen: i64,
    pub mime: Option<String>,
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub hash: Option<String>,
    pub profile: Option<String>,
}

const ENTRY_COLUMNS: &str = "path, added, seen, mime, width, height, hash, profile";

fn row_to_entry(row: &rusqlite::Row) -> rusqlite::Result<CatalogEntry> {
    Ok(CatalogEntry {
        path: row.get(0)?,
        added: row.get(1)?,
        seen: row.get(2)?,
        mime: row.get(3)?,
        width: row.get(4)?,
        height: row.get(5)?,
        hash: row.get(6)?,
        profile: row.get(7)?,
    })
}

#[derive(Debug)]
pub struct CatalogStats {
    pub entries: i64,
    pub with_mime: i64,
    pub sized: i64,
    pub hashed: i64,
    pub profiled: i64,
}

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

impl Catalog {
    pub fn entry(&self, path: &str) -> Option<CatalogEntry> {
        self.conn()
            .query_row(
                &format!("SELECT {ENTRY_COLUMNS} FROM wallpapers WHERE path = ?1"),
                [path],
                row_to_entry,
            )
            .ok()
    }

    /// Insert a fresh row with empty metadata. No-op if the path exists.
    pub fn insert(&self, path: &str, now: i64) {
        self.conn()
            .execute(
                "INSERT OR IGNORE INTO wallpapers (path, added, seen) VALUES (?1, ?2, ?2)",
                rusqlite::params![path, now],
            )
            .ok();
    }

    pub fn touch_seen(&self, path: &str, now: i64) {
        self.conn()
            .execute(
                "UPDATE wallpapers SET seen = ?2 WHERE path = ?1",
                rusqlite::params![path, now],
            )
            .ok();
    }

    /// Unix time of the most recently seen entry, if any entry exists.
    pub fn max_seen(&self) -> Option<i64> {
        self.conn()
            .query_row("SELECT MAX(seen) FROM wallpapers", [], |r| {
                r.get::<_, Option<i64>>(0)
            })
            .ok()
            .flatten()
    }
}

// ---------------------------------------------------------------------------
// Metadata fields
//
// Each update carries an `IS NULL` guard: a field, once written, is never
// overwritten. Field values track the file contents at first computation,
// not the current bytes on disk.
// ---------------------------------------------------------------------------

impl Catalog {
    pub fn set_mime(&self, path: &str, mime: &str) {
        self.conn()
            .execute(
                "UPDATE wallpapers SET mime = ?2 WHERE path = ?1 AND mime IS NULL",
                rusqlite::params![path, mime],
            )
            .ok();
    }

    pub fn set_dimensions(&self, path: &str, width: u32, height: u32) {
        self.conn()
            .execute(
                "UPDATE wallpapers SET width = ?2, height = ?3 WHERE path = ?1 AND width IS NULL",
                rusqlite::params![path, width as i64, height as i64],
            )
            .ok();
    }

    pub fn set_hash(&self, path: &str, hash: &str) {
        self.conn()
            .execute(
                "UPDATE wallpapers SET hash = ?2 WHERE path = ?1 AND hash IS NULL",
                rusqlite::params![path, hash],
            )
            .ok();
    }

    pub fn set_profile(&self, path: &str, profile: &str) {
        self.conn()
            .execute(
                "UPDATE wallpapers SET profile = ?2 WHERE path = ?1 AND profile IS NULL",
                rusqlite::params![path, profile],
            )
            .ok();
    }
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

impl Catalog {
    /// Uniform random entry whose dimensions exactly match.
    pub fn random_matching(&self, width: u32, height: u32) -> Option<CatalogEntry> {
        self.conn()
            .query_row(
                &format!(
                    "SELECT {ENTRY_COLUMNS} FROM wallpapers
                     WHERE width = ?1 AND height = ?2
                     ORDER BY RANDOM() LIMIT 1"
                ),
                rusqlite::params![width as i64, height as i64],
                row_to_entry,
            )
            .ok()
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

impl Catalog {
    pub fn stats(&self) -> CatalogStats {
        let db = self.conn();
        let count = |sql: &str| -> i64 { db.query_row(sql, [], |r| r.get(0)).unwrap_or(0) };

        CatalogStats {
            entries: count("SELECT COUNT(*) FROM wallpapers"),
            with_mime: count("SELECT COUNT(*) FROM wallpapers WHERE mime IS NOT NULL"),
            sized: count(
                "SELECT COUNT(*) FROM wallpapers WHERE width IS NOT NULL AND height IS NOT NULL",
            ),
            hashed: count("SELECT COUNT(*) FROM wallpapers WHERE hash IS NOT NULL"),
            profiled: count("SELECT COUNT(*) FROM wallpapers WHERE profile IS NOT NULL"),
        }
    }
}

/// In-memory catalog for tests, shared with other modules' test code.
#[cfg(test)]
pub(crate) fn test_catalog() -> Catalog {
    let conn = Connection::open_in_memory().unwrap();
    crate::db::migrate(&conn).unwrap();
    Catalog::new(conn)
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // -- Entries -------------------------------------------------------------

    #[test]
    fn insert_and_fetch() {
        let cat = test_catalog();
        cat.insert("/walls/a.png", 100);
        let e = cat.entry("/walls/a.png").unwrap();
        assert_eq!(e.path, "/walls/a.png");
        assert_eq!(e.added, 100);
        assert_eq!(e.seen, 100);
        assert!(e.mime.is_none());
        assert!(e.width.is_none());
        assert!(e.height.is_none());
        assert!(e.hash.is_none());
        assert!(e.profile.is_none());
    }

    #[test]
    fn entry_missing_returns_none() {
        let cat = test_catalog();
        assert!(cat.entry("/nope").is_none());
    }

    #[test]
    fn insert_duplicate_keeps_original_row() {
        let cat = test_catalog();
        cat.insert("/walls/a.png", 100);
        cat.insert("/walls/a.png", 200);
        let e = cat.entry("/walls/a.png").unwrap();
        assert_eq!(e.added, 100);
        assert_eq!(e.seen, 100);
        assert_eq!(cat.stats().entries, 1);
    }

    #[test]
    fn touch_seen_updates_only_seen() {
        let cat = test_catalog();
        cat.insert("/walls/a.png", 100);
        cat.touch_seen("/walls/a.png", 250);
        let e = cat.entry("/walls/a.png").unwrap();
        assert_eq!(e.added, 100);
        assert_eq!(e.seen, 250);
    }

    #[test]
    fn max_seen_empty_is_none() {
        let cat = test_catalog();
        assert!(cat.max_seen().is_none());
    }

    #[test]
    fn max_seen_picks_latest() {
        let cat = test_catalog();
        cat.insert("/a.png", 100);
        cat.insert("/b.png", 300);
        cat.insert("/c.png", 200);
        assert_eq!(cat.max_seen(), Some(300));
    }

    // -- Metadata fields -----------------------------------------------------

    #[test]
    fn set_mime_once() {
        let cat = test_catalog();
        cat.insert("/a.png", 1);
        cat.set_mime("/a.png", "image/png");
        cat.set_mime("/a.png", "image/jpeg");
        assert_eq!(cat.entry("/a.png").unwrap().mime.as_deref(), Some("image/png"));
    }

    #[test]
    fn set_dimensions_once() {
        let cat = test_catalog();
        cat.insert("/a.png", 1);
        cat.set_dimensions("/a.png", 1920, 1080);
        cat.set_dimensions("/a.png", 640, 480);
        let e = cat.entry("/a.png").unwrap();
        assert_eq!(e.width, Some(1920));
        assert_eq!(e.height, Some(1080));
    }

    #[test]
    fn set_hash_once() {
        let cat = test_catalog();
        cat.insert("/a.png", 1);
        cat.set_hash("/a.png", "aaaa");
        cat.set_hash("/a.png", "bbbb");
        assert_eq!(cat.entry("/a.png").unwrap().hash.as_deref(), Some("aaaa"));
    }

    #[test]
    fn set_profile_once() {
        let cat = test_catalog();
        cat.insert("/a.png", 1);
        cat.set_profile("/a.png", "ff0000");
        cat.set_profile("/a.png", "00ff00");
        assert_eq!(cat.entry("/a.png").unwrap().profile.as_deref(), Some("ff0000"));
    }

    #[test]
    fn set_field_on_missing_path_is_noop() {
        let cat = test_catalog();
        cat.set_hash("/missing", "aaaa");
        assert_eq!(cat.stats().entries, 0);
    }

    // -- Selection -----------------------------------------------------------

    #[test]
    fn random_matching_exact_dimensions_only() {
        let cat = test_catalog();
        cat.insert("/a.png", 1);
        cat.set_dimensions("/a.png", 1920, 1080);
        cat.insert("/b.png", 1);
        cat.set_dimensions("/b.png", 2560, 1440);

        let e = cat.random_matching(1920, 1080).unwrap();
        assert_eq!(e.path, "/a.png");
        assert!(cat.random_matching(1920, 1200).is_none());
    }

    #[test]
    fn random_matching_skips_unsized_entries() {
        let cat = test_catalog();
        cat.insert("/a.png", 1);
        assert!(cat.random_matching(1920, 1080).is_none());
    }

    #[test]
    fn random_matching_empty_catalog() {
        let cat = test_catalog();
        assert!(cat.random_matching(1920, 1080).is_none());
    }

    // -- Status --------------------------------------------------------------

    #[test]
    fn stats_counts_field_coverage() {
        let cat = test_catalog();
        cat.insert("/a.png", 1);
        cat.insert("/b.png", 1);
        cat.insert("/c.png", 1);
        cat.set_mime("/a.png", "image/png");
        cat.set_dimensions("/a.png", 10, 10);
        cat.set_dimensions("/b.png", 20, 20);
        cat.set_hash("/a.png", "h");

        let s = cat.stats();
        assert_eq!(s.entries, 3);
        assert_eq!(s.with_mime, 1);
        assert_eq!(s.sized, 2);
        assert_eq!(s.hashed, 1);
        assert_eq!(s.profiled, 0);
    }

    // -- Edge cases ----------------------------------------------------------

    #[test]
    fn unicode_path_roundtrips() {
        let cat = test_catalog();
        cat.insert("/walls/фон/壁紙.png", 1);
        assert!(cat.entry("/walls/фон/壁紙.png").is_some());
    }

    #[test]
    fn path_with_spaces_and_parens() {
        let cat = test_catalog();
        let p = "/walls/vacation (2019)/beach at noon.jpg";
        cat.insert(p, 1);
        assert_eq!(cat.entry(p).unwrap().path, p);
    }
}
