use crate::api::models::{User, UserId, UserType};
use directories::ProjectDirs;
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("no data directory available")]
    NoDataDir,
    #[error("cannot create cache directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("cache database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// What the messaging screens need to know about another user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedUser {
    pub id: UserId,
    pub name: String,
    pub user_type: UserType,
    pub icon_url: Option<String>,
}

impl From<&User> for CachedUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            user_type: user.user_type,
            icon_url: user.icon_url().map(str::to_string),
        }
    }
}

fn db_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("com", "jobmatch", "jobmatch")?;
    Some(proj.data_dir().join("cache.sqlite"))
}

pub fn open() -> Result<Connection, StorageError> {
    let path = db_path().ok_or(StorageError::NoDataDir)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let conn = Connection::open(path)?;
    init(&conn)?;
    Ok(conn)
}

// The user directory is cached so conversation screens can show names
// without refetching every user.
pub fn init(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            user_type INTEGER NOT NULL,
            icon_url TEXT,
            updated_at INTEGER NOT NULL
        );
        "#,
    )?;
    Ok(())
}

pub fn upsert_users(conn: &mut Connection, users: &[User]) -> Result<(), StorageError> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default();
    let tx = conn.transaction()?;
    for user in users {
        let cached = CachedUser::from(user);
        tx.execute(
            r#"
            INSERT INTO users (id, name, user_type, icon_url, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                name=excluded.name,
                user_type=excluded.user_type,
                icon_url=excluded.icon_url,
                updated_at=excluded.updated_at
            "#,
            params![cached.id, cached.name, u8::from(cached.user_type), cached.icon_url, now],
        )?;
    }
    tx.commit()?;
    Ok(())
}

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<CachedUser> {
    Ok(CachedUser {
        id: row.get(0)?,
        name: row.get(1)?,
        user_type: UserType::from(row.get::<_, u8>(2)?),
        icon_url: row.get(3)?,
    })
}

pub fn user_directory(conn: &Connection) -> Result<HashMap<UserId, CachedUser>, StorageError> {
    let mut stmt = conn.prepare("SELECT id, name, user_type, icon_url FROM users")?;
    let rows = stmt.query_map([], row_to_user)?;
    let mut out = HashMap::new();
    for r in rows {
        let user = r?;
        out.insert(user.id, user);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::Profile;

    fn user(id: UserId, name: &str, icon: Option<&str>) -> User {
        User {
            id,
            name: name.to_string(),
            email: format!("{name}@example.com"),
            user_type: UserType::Student,
            profile: icon.map(|url| Profile {
                user_icon_url: Some(url.to_string()),
                ..Profile::default()
            }),
        }
    }

    #[test]
    fn upsert_replaces_existing_rows() {
        let mut conn = Connection::open_in_memory().unwrap();
        init(&conn).unwrap();

        let first = [user(1, "aoi", None), user(2, "ren", Some("http://i/2.png"))];
        upsert_users(&mut conn, &first).unwrap();
        upsert_users(&mut conn, &[user(1, "aoi tanaka", Some("http://i/1.png"))]).unwrap();

        let all = user_directory(&conn).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[&1].name, "aoi tanaka");
        assert_eq!(all[&1].icon_url.as_deref(), Some("http://i/1.png"));
        assert_eq!(all[&2].user_type, UserType::Student);
        assert!(!all.contains_key(&99));
    }
}
