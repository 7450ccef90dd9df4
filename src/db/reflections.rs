use super::db::Db;
use crate::libs::error::{SourceError, SourceResult};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

const INSERT_REFLECTION: &str = "INSERT INTO reflections (type, date, priorities, intention, reflection, challenges, tomorrow)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";
const SELECT_REFLECTION: &str = "SELECT id, type, date, priorities, intention, reflection, challenges, tomorrow FROM reflections";
const INSERT_IMAGE: &str = "INSERT INTO images (reflection_id, filename, path) VALUES (?1, ?2, ?3)";
const SELECT_IMAGES: &str = "SELECT id, filename, path FROM images WHERE reflection_id = ?1 ORDER BY id";

/// Accepted values for a reflection's `type` field.
pub const REFLECTION_KINDS: [&str; 2] = ["morning", "evening"];

/// A journal reflection row.
#[derive(Debug, Clone, Serialize)]
pub struct Reflection {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub date: NaiveDateTime,
    pub priorities: Option<String>,
    pub intention: Option<String>,
    pub reflection: Option<String>,
    pub challenges: Option<String>,
    pub tomorrow: Option<String>,
}

/// Request body for creating a reflection.
#[derive(Debug, Clone, Deserialize)]
pub struct NewReflection {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub priorities: Option<String>,
    #[serde(default)]
    pub intention: Option<String>,
    #[serde(default)]
    pub reflection: Option<String>,
    #[serde(default)]
    pub challenges: Option<String>,
    #[serde(default)]
    pub tomorrow: Option<String>,
}

/// An image attached to a reflection.
#[derive(Debug, Clone, Serialize)]
pub struct ImageRef {
    pub id: i64,
    pub filename: String,
    pub path: String,
}

pub struct Reflections {
    pub conn: Connection,
}

impl Reflections {
    pub fn new() -> SourceResult<Reflections> {
        let db = Db::new().map_err(|e| SourceError::QueryFailed(e.to_string()))?;
        Ok(Reflections { conn: db.conn })
    }

    pub fn insert(&self, new: &NewReflection, date: NaiveDateTime) -> SourceResult<i64> {
        self.conn.execute(
            INSERT_REFLECTION,
            params![new.kind, date, new.priorities, new.intention, new.reflection, new.challenges, new.tomorrow],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Fetches the reflection of the given kind recorded on the given
    /// calendar day, with its attached image references.
    pub fn get(&self, date: NaiveDate, kind: &str) -> SourceResult<Option<(Reflection, Vec<ImageRef>)>> {
        let sql = format!("{} WHERE DATE(date) = ?1 AND type = ?2 ORDER BY id LIMIT 1", SELECT_REFLECTION);
        let reflection = self
            .conn
            .query_row(&sql, params![date.format("%Y-%m-%d").to_string(), kind], Self::map_reflection)
            .optional()?;

        match reflection {
            Some(reflection) => {
                let images = self.images_for(reflection.id)?;
                Ok(Some((reflection, images)))
            }
            None => Ok(None),
        }
    }

    /// Returns all reflections recorded within the last seven days.
    pub fn weekly(&self, now: NaiveDateTime) -> SourceResult<Vec<Reflection>> {
        let start = now - chrono::Duration::days(7);
        let sql = format!("{} WHERE date BETWEEN ?1 AND ?2 ORDER BY date", SELECT_REFLECTION);
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![start, now], Self::map_reflection)?;

        let mut reflections = Vec::new();
        for row in rows {
            reflections.push(row?);
        }
        Ok(reflections)
    }

    /// Deletes a reflection; attached images go with it via the foreign
    /// key cascade. Returns whether a row was actually removed.
    pub fn delete(&self, id: i64) -> SourceResult<bool> {
        let affected = self.conn.execute("DELETE FROM reflections WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    pub fn add_image(&self, reflection_id: i64, filename: &str, path: &str) -> SourceResult<i64> {
        self.conn.execute(INSERT_IMAGE, params![reflection_id, filename, path])?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn images_for(&self, reflection_id: i64) -> SourceResult<Vec<ImageRef>> {
        let mut stmt = self.conn.prepare(SELECT_IMAGES)?;
        let rows = stmt.query_map(params![reflection_id], |row| {
            Ok(ImageRef {
                id: row.get(0)?,
                filename: row.get(1)?,
                path: row.get(2)?,
            })
        })?;

        let mut images = Vec::new();
        for row in rows {
            images.push(row?);
        }
        Ok(images)
    }

    fn map_reflection(row: &rusqlite::Row<'_>) -> rusqlite::Result<Reflection> {
        Ok(Reflection {
            id: row.get(0)?,
            kind: row.get(1)?,
            date: row.get(2)?,
            priorities: row.get(3)?,
            intention: row.get(4)?,
            reflection: row.get(5)?,
            challenges: row.get(6)?,
            tomorrow: row.get(7)?,
        })
    }
}
