use crate::db::error::DbError;
use crate::libs::data_storage::DataStorage;
use rusqlite::Connection;

pub const DB_FILE_NAME: &str = "lumen.db";

pub struct Db {
    pub conn: Connection,
}

impl Db {
    pub fn new() -> Result<Db, DbError> {
        let db_file_path = DataStorage::new().get_path(DB_FILE_NAME).map_err(|e| DbError::DataDir(e.to_string()))?;
        let conn: Connection = Connection::open(db_file_path)?;

        Ok(Db { conn })
    }
}
