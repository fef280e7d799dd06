use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension};

use super::{Character, FieldValue};

/// Persistence-layer failures. Never swallowed; the command layer maps these
/// to a generic user message and logs the detail.
#[derive(Debug)]
pub enum StoreError {
    Sqlite(rusqlite::Error),
    Encode(serde_json::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Sqlite(e) => write!(f, "database error: {e}"),
            StoreError::Encode(e) => write!(f, "character data could not be encoded: {e}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Sqlite(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Encode(e)
    }
}

/// Character registry keyed by sheet URL. All writes go through a single
/// connection behind a mutex, and the upsert is one statement, so concurrent
/// registrations of the same sheet cannot interleave or half-apply.
pub struct CharacterStore {
    conn: Mutex<Connection>,
}

impl CharacterStore {
    /// Open (or create) the store at `path`. `:memory:` works for tests.
    pub fn new(path: &str) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS characters (
                sheet_url TEXT PRIMARY KEY,
                owner_id TEXT NOT NULL,
                fields TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_characters_owner
                ON characters(owner_id);",
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Insert or overwrite the record for `character.sheet_url`. On conflict
    /// the original `created_at` is kept and `updated_at` advances.
    pub fn upsert(&self, character: &Character) -> Result<(), StoreError> {
        let fields = serde_json::to_string(&character.fields)?;
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO characters (sheet_url, owner_id, fields, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(sheet_url) DO UPDATE SET
                 owner_id = excluded.owner_id,
                 fields = excluded.fields,
                 updated_at = excluded.updated_at",
            params![
                character.sheet_url,
                character.owner_id,
                fields,
                character.created_at,
                character.updated_at
            ],
        )?;
        Ok(())
    }

    pub fn lookup(&self, sheet_url: &str) -> Result<Option<Character>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let row = conn
            .query_row(
                "SELECT sheet_url, owner_id, fields, created_at, updated_at
                 FROM characters WHERE sheet_url = ?1",
                params![sheet_url],
                row_to_raw,
            )
            .optional()?;
        row.map(raw_to_character).transpose()
    }

    pub fn lookup_by_owner(&self, owner_id: &str) -> Result<Option<Character>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let row = conn
            .query_row(
                "SELECT sheet_url, owner_id, fields, created_at, updated_at
                 FROM characters WHERE owner_id = ?1
                 ORDER BY created_at LIMIT 1",
                params![owner_id],
                row_to_raw,
            )
            .optional()?;
        row.map(raw_to_character).transpose()
    }

    pub fn list_all(&self) -> Result<Vec<Character>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT sheet_url, owner_id, fields, created_at, updated_at
             FROM characters ORDER BY created_at",
        )?;
        let rows = stmt.query_map([], row_to_raw)?;

        let mut characters = Vec::new();
        for row in rows {
            characters.push(raw_to_character(row?)?);
        }
        Ok(characters)
    }

    /// Returns false when no record existed for the URL.
    pub fn delete(&self, sheet_url: &str) -> Result<bool, StoreError> {
        let conn = self.conn.lock().unwrap();
        let affected = conn.execute(
            "DELETE FROM characters WHERE sheet_url = ?1",
            params![sheet_url],
        )?;
        Ok(affected > 0)
    }
}

type RawRow = (String, String, String, String, String);

fn row_to_raw(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
    ))
}

fn raw_to_character(raw: RawRow) -> Result<Character, StoreError> {
    let (sheet_url, owner_id, fields_json, created_at, updated_at) = raw;
    let fields: std::collections::BTreeMap<String, FieldValue> =
        serde_json::from_str(&fields_json)?;
    Ok(Character {
        sheet_url,
        owner_id,
        fields,
        created_at,
        updated_at,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use super::*;

    fn character(url: &str, owner: &str, name: &str) -> Character {
        let mut fields = BTreeMap::new();
        fields.insert("name".to_string(), FieldValue::Text(name.to_string()));
        fields.insert("strength".to_string(), FieldValue::Dots(3));
        Character::new(url.to_string(), owner.to_string(), fields)
    }

    #[test]
    fn test_upsert_and_lookup() {
        let store = CharacterStore::new(":memory:").unwrap();
        store.upsert(&character("https://sheet/a", "1", "Lucien")).unwrap();

        let loaded = store.lookup("https://sheet/a").unwrap().unwrap();
        assert_eq!(loaded.owner_id, "1");
        assert_eq!(loaded.name(), "Lucien");
        assert_eq!(loaded.field("strength"), Some(&FieldValue::Dots(3)));
    }

    #[test]
    fn test_lookup_absent_is_none() {
        let store = CharacterStore::new(":memory:").unwrap();
        assert!(store.lookup("https://sheet/missing").unwrap().is_none());
    }

    #[test]
    fn test_upsert_same_url_is_idempotent() {
        let store = CharacterStore::new(":memory:").unwrap();
        let first = character("https://sheet/a", "1", "Lucien");
        store.upsert(&first).unwrap();

        std::thread::sleep(std::time::Duration::from_millis(5));
        store.upsert(&character("https://sheet/a", "1", "Lucien Reborn")).unwrap();

        let all = store.list_all().unwrap();
        assert_eq!(all.len(), 1, "re-init must not duplicate the record");

        let loaded = &all[0];
        assert_eq!(loaded.name(), "Lucien Reborn");
        assert_eq!(loaded.created_at, first.created_at);
        assert!(loaded.updated_at > loaded.created_at);
    }

    #[test]
    fn test_upsert_overwrites_owner() {
        let store = CharacterStore::new(":memory:").unwrap();
        store.upsert(&character("https://sheet/a", "1", "Lucien")).unwrap();
        store.upsert(&character("https://sheet/a", "2", "Lucien")).unwrap();

        let loaded = store.lookup("https://sheet/a").unwrap().unwrap();
        assert_eq!(loaded.owner_id, "2");
    }

    #[test]
    fn test_lookup_by_owner() {
        let store = CharacterStore::new(":memory:").unwrap();
        store.upsert(&character("https://sheet/a", "1", "Lucien")).unwrap();
        store.upsert(&character("https://sheet/b", "2", "Marta")).unwrap();

        let loaded = store.lookup_by_owner("2").unwrap().unwrap();
        assert_eq!(loaded.name(), "Marta");
        assert!(store.lookup_by_owner("3").unwrap().is_none());
    }

    #[test]
    fn test_delete() {
        let store = CharacterStore::new(":memory:").unwrap();
        store.upsert(&character("https://sheet/a", "1", "Lucien")).unwrap();

        assert!(store.delete("https://sheet/a").unwrap());
        assert!(store.lookup("https://sheet/a").unwrap().is_none());
        assert!(!store.delete("https://sheet/a").unwrap());
    }

    #[test]
    fn test_concurrent_upserts_same_url() {
        let store = Arc::new(CharacterStore::new(":memory:").unwrap());
        let mut handles = Vec::new();

        for i in 0..8 {
            let store = Arc::clone(&store);
            handles.push(std::thread::spawn(move || {
                let c = character("https://sheet/shared", &i.to_string(), "Lucien");
                store.upsert(&c).unwrap();
            }));
        }
        for h in handles {
            h.join().unwrap();
        }

        let all = store.list_all().unwrap();
        assert_eq!(all.len(), 1);
        // The surviving record is one writer's intact row, not a blend.
        let survivor = &all[0];
        assert_eq!(survivor.name(), "Lucien");
        assert!(survivor.owner_id.parse::<u32>().unwrap() < 8);
    }
}
