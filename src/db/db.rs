use crate::libs::data_storage::DataStorage;
use anyhow::Result;
use rusqlite::Connection;

pub const DB_FILE_NAME: &str = "dayboard.db";

pub struct Db {
    pub conn: Connection,
}

impl Db {
    pub fn new() -> Result<Db> {
        let db_file_path = DataStorage::new().get_path(DB_FILE_NAME)?;
        let mut conn: Connection = Connection::open(db_file_path)?;

        // Cascade deletes from reflections to images rely on this pragma
        conn.pragma_update(None, "foreign_keys", true)?;
        super::migrations::migrate(&mut conn)?;

        Ok(Db { conn })
    }
}
