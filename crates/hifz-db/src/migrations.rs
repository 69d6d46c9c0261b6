use rusqlite::Connection;
use tracing::info;

use crate::Result;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);",
    )?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (users, memorizes)");
        conn.execute_batch(
            "
            CREATE TABLE users (
                id          TEXT PRIMARY KEY,
                username    TEXT NOT NULL,
                password    TEXT NOT NULL,
                fullname    TEXT NOT NULL DEFAULT '',
                description TEXT NOT NULL DEFAULT '',
                profile_pic TEXT NOT NULL DEFAULT '',
                created_at  TEXT NOT NULL DEFAULT (datetime('now')),
                updated_at  TEXT NOT NULL DEFAULT (datetime('now')),
                deleted_at  TEXT
            );

            -- Usernames are unique among live accounts only
            CREATE UNIQUE INDEX idx_users_username_live
                ON users(username) WHERE deleted_at IS NULL;

            CREATE TABLE memorizes (
                id                INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id           TEXT NOT NULL REFERENCES users(id),
                surah_name        TEXT NOT NULL,
                ayah_range        TEXT NOT NULL DEFAULT '',
                total_ayah        INTEGER NOT NULL DEFAULT 0,
                date_started      TEXT,
                date_completed    TEXT,
                review_frequency  TEXT NOT NULL DEFAULT '',
                last_review_date  TEXT,
                accuracy_level    TEXT NOT NULL DEFAULT '',
                next_review_date  TEXT,
                notes             TEXT NOT NULL DEFAULT '',
                created_at        TEXT NOT NULL DEFAULT (datetime('now')),
                updated_at        TEXT NOT NULL DEFAULT (datetime('now')),
                deleted_at        TEXT
            );

            CREATE INDEX idx_memorizes_user ON memorizes(user_id);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    if version < 2 {
        info!("Running migration v2 (photos)");
        conn.execute_batch(
            "
            CREATE TABLE photos (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id     TEXT NOT NULL REFERENCES users(id),
                url         TEXT NOT NULL,
                caption     TEXT NOT NULL DEFAULT '',
                created_at  TEXT NOT NULL DEFAULT (datetime('now')),
                updated_at  TEXT NOT NULL DEFAULT (datetime('now')),
                deleted_at  TEXT
            );

            CREATE INDEX idx_photos_user ON photos(user_id);

            INSERT INTO schema_version (version) VALUES (2);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
