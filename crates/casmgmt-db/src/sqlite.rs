use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension, Row};

use casmgmt_core::{RegisteredService, RegistryError, ServicesManager, sort_by_evaluation_order};

use crate::DbError;

const SELECT_COLUMNS: &str = "SELECT id, name, service_id, description, evaluation_order, theme FROM registered_services";

/// SQLite-backed registry. `":memory:"` opens a private in-memory database.
pub struct DbRegistry {
    conn: Mutex<Connection>,
}

impl DbRegistry {
    pub fn new(path: &str) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn: Mutex::new(conn) };
        db.init_tables()?;
        tracing::debug!(path, "registry database opened");
        Ok(db)
    }

    fn init_tables(&self) -> Result<(), DbError> {
        self.lock()?.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS registered_services (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                service_id TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                evaluation_order INTEGER NOT NULL DEFAULT 0,
                theme TEXT
            );
            "
        )?;
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, RegistryError> {
        self.conn
            .lock()
            .map_err(|_| RegistryError::Storage("connection lock poisoned".to_string()))
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<RegisteredService> {
        Ok(RegisteredService {
            id: row.get(0)?,
            name: row.get(1)?,
            service_id: row.get(2)?,
            description: row.get(3)?,
            evaluation_order: row.get(4)?,
            theme: row.get(5)?,
        })
    }

    fn select_one(conn: &Connection, id: i64) -> Result<Option<RegisteredService>, RegistryError> {
        conn.query_row(&format!("{} WHERE id = ?1", SELECT_COLUMNS), [id], Self::from_row)
            .optional()
            .map_err(storage)
    }
}

fn storage(err: rusqlite::Error) -> RegistryError {
    RegistryError::Storage(err.to_string())
}

impl ServicesManager for DbRegistry {
    fn save(&self, service: RegisteredService) -> Result<RegisteredService, RegistryError> {
        let conn = self.lock()?;
        let id = if service.is_assigned() {
            conn.execute(
                "INSERT OR REPLACE INTO registered_services (id, name, service_id, description, evaluation_order, theme)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    service.id,
                    service.name,
                    service.service_id,
                    service.description,
                    service.evaluation_order,
                    service.theme
                ]
            ).map_err(storage)?;
            service.id
        } else {
            conn.execute(
                "INSERT INTO registered_services (name, service_id, description, evaluation_order, theme)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    service.name,
                    service.service_id,
                    service.description,
                    service.evaluation_order,
                    service.theme
                ]
            ).map_err(storage)?;
            conn.last_insert_rowid()
        };
        tracing::debug!(id, name = %service.name, "service saved");
        Ok(RegisteredService { id, ..service })
    }

    fn delete(&self, id: i64) -> Result<RegisteredService, RegistryError> {
        let conn = self.lock()?;
        let existing = Self::select_one(&conn, id)?.ok_or(RegistryError::NotFound(id))?;
        conn.execute("DELETE FROM registered_services WHERE id = ?1", [id])
            .map_err(storage)?;
        Ok(existing)
    }

    fn find_by_id(&self, id: i64) -> Result<RegisteredService, RegistryError> {
        let conn = self.lock()?;
        Self::select_one(&conn, id)?.ok_or(RegistryError::NotFound(id))
    }

    fn all_services(&self) -> Result<Vec<RegisteredService>, RegistryError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(&format!("{} ORDER BY evaluation_order, id", SELECT_COLUMNS))
            .map_err(storage)?;
        let rows = stmt.query_map([], Self::from_row).map_err(storage)?;
        let mut services = rows.collect::<rusqlite::Result<Vec<_>>>().map_err(storage)?;
        sort_by_evaluation_order(&mut services);
        Ok(services)
    }
}
