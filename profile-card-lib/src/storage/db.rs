use std::{io, path::Path, sync::Arc};

use agdb::{DbAny, DbValue, QueryBuilder};
use parking_lot::RwLock;
use tracing::debug;

use crate::{
    fs::state_dir,
    storage::{Backend, Result, StorageError},
};

const FILE_NAME: &str = "data.db";
/// Node whose key-value pairs hold every stored entry
const ENTRIES: &str = "entries";

/// Durable store backed by an `agdb` database file.
#[derive(Debug, Clone)]
pub struct DbBackend {
    db: Arc<RwLock<DbAny>>,
}

impl DbBackend {
    /// Open (or create) the database in the state directory.
    pub fn open() -> Result<Self> {
        Self::open_file(&state_dir()?.join(FILE_NAME))
    }

    pub fn open_file(path: &Path) -> Result<Self> {
        let path_str = path.to_str().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("database path is not valid UTF-8: {}", path.display()),
            )
        })?;

        let db = Self {
            db: Arc::new(RwLock::new(DbAny::new_file(path_str)?)),
        };

        db.init()?;
        debug!("Opened store at {path_str}");

        Ok(db)
    }

    /// Create a memory backed database
    pub fn in_memory(name: &str) -> Result<Self> {
        let db = Self {
            db: Arc::new(RwLock::new(DbAny::new_memory(name)?)),
        };

        db.init()?;

        Ok(db)
    }

    fn init(&self) -> Result<()> {
        let alias_count = self
            .db
            .read()
            .exec(QueryBuilder::select().aliases().query())?
            .result;

        if alias_count == 0 {
            self.db
                .write()
                .exec_mut(QueryBuilder::insert().nodes().aliases([ENTRIES]).query())?;
        }

        Ok(())
    }
}

impl Backend for DbBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let Some(element) = self
            .db
            .read()
            .exec(QueryBuilder::select().ids(ENTRIES).query())?
            .elements
            .pop()
        else {
            return Ok(None);
        };

        let wanted = DbValue::from(key);
        match element.values.into_iter().find(|kv| kv.key == wanted) {
            Some(kv) => match kv.value {
                DbValue::String(text) => Ok(Some(text)),
                _ => Err(StorageError::NotText(key.to_string())),
            },
            None => Ok(None),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.db.write().exec_mut(
            QueryBuilder::insert()
                .values([[(key, value).into()]])
                .ids(ENTRIES)
                .query(),
        )?;

        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        if self.read(key)?.is_none() {
            return Ok(());
        }

        self.db
            .write()
            .exec_mut(QueryBuilder::remove().values(key).ids(ENTRIES).query())?;

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use tempfile::tempdir;

    use super::*;
    use crate::storage::{Field, StorageAdapter};

    #[test]
    fn test_write_read_delete() {
        let db = DbBackend::in_memory("test").unwrap();

        assert_eq!(db.read("profileCard_name").unwrap(), None);

        db.write("profileCard_name", "\"Ada\"").unwrap();
        db.write("profileCard_name", "\"Grace\"").unwrap();
        assert_eq!(
            db.read("profileCard_name").unwrap().as_deref(),
            Some("\"Grace\"")
        );

        db.delete("profileCard_name").unwrap();
        assert_eq!(db.read("profileCard_name").unwrap(), None);

        // Deleting a missing entry succeeds
        db.delete("profileCard_name").unwrap();
    }

    #[test]
    fn test_entries_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(FILE_NAME);

        {
            let storage = StorageAdapter::new("profileCard", DbBackend::open_file(&path).unwrap());
            storage.set(Field::Likes, &43u64).unwrap();
            storage.set(Field::IsLiked, &true).unwrap();
        }

        let storage = StorageAdapter::new("profileCard", DbBackend::open_file(&path).unwrap());
        assert_eq!(storage.get::<u64>(Field::Likes), Some(43));
        assert_eq!(storage.get::<bool>(Field::IsLiked), Some(true));
    }
}
