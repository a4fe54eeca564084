//! SQLite-backed vehicle profiles.
//!
//! Profiles are stored for the user's convenience only; trip planning does not
//! take vehicle dimensions into account.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleProfile {
    /// Assigned by the store; ignored on insert.
    pub id: i64,
    pub nickname: String,
    pub make: String,
    pub model: String,
    pub year: Option<i32>,
    pub height_m: Option<f64>,
    pub weight_kg: Option<f64>,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to open vehicle store at {path:?}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    #[error("failed to create vehicle_profiles table")]
    Migrate(#[source] rusqlite::Error),
    #[error("vehicle store query failed")]
    Query(#[from] rusqlite::Error),
}

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS vehicle_profiles(
        id        INTEGER PRIMARY KEY,
        nickname  TEXT NOT NULL,
        make      TEXT NOT NULL,
        model     TEXT NOT NULL,
        year      INTEGER,
        height_m  REAL,
        weight_kg REAL
    )";

pub struct VehicleStore {
    conn: Connection,
}

impl VehicleStore {
    /// Open (creating if needed) the store at `path` and apply the schema.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| StoreError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(|source| StoreError::Open {
            path: PathBuf::from(":memory:"),
            source,
        })?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA).map_err(StoreError::Migrate)?;
        Ok(Self { conn })
    }

    /// All profiles, ordered by id.
    pub fn list(&self) -> Result<Vec<VehicleProfile>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, nickname, make, model, year, height_m, weight_kg
             FROM vehicle_profiles ORDER BY id",
        )?;
        let profiles = stmt
            .query_map([], profile_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(profiles)
    }

    /// Insert `profile` and return the id the store assigned to it.
    pub fn insert(&self, profile: &VehicleProfile) -> Result<i64, StoreError> {
        self.conn.execute(
            "INSERT INTO vehicle_profiles(nickname, make, model, year, height_m, weight_kg)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                profile.nickname,
                profile.make,
                profile.model,
                profile.year,
                profile.height_m,
                profile.weight_kg,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(id, nickname = %profile.nickname, "vehicle profile stored");
        Ok(id)
    }
}

fn profile_from_row(row: &Row<'_>) -> rusqlite::Result<VehicleProfile> {
    Ok(VehicleProfile {
        id: row.get(0)?,
        nickname: row.get(1)?,
        make: row.get(2)?,
        model: row.get(3)?,
        year: row.get(4)?,
        height_m: row.get(5)?,
        weight_kg: row.get(6)?,
    })
}
