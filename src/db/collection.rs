use log::Level;
use logging_timer::timer;
use rusqlite::{named_params, Transaction};
use serde_json::{Map, Value};

use crate::error::DashboardError;

use super::DbPool;

pub const ID_FIELD: &str = "_id";

/// A stored document: the store-assigned identifier plus the document body
/// exactly as it was inserted (minus any `_id` the producer supplied).
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: i64,
    pub body: Map<String, Value>,
}

impl Document {
    /// Renders the document as JSON with `_id` first, in string form.
    /// No other field is touched.
    pub fn into_json(self) -> Value {
        let mut map = Map::with_capacity(self.body.len() + 1);
        map.insert(ID_FIELD.to_owned(), Value::String(self.id.to_string()));
        for (key, value) in self.body {
            if key != ID_FIELD {
                map.insert(key, value);
            }
        }
        Value::Object(map)
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ReplaceCounts {
    pub deleted: usize,
    pub inserted: usize,
    pub total: i64,
}

/// One collection of JSON documents backed by a table of the same name.
pub struct Collection {
    pool: DbPool,
    table: String,
}

impl Collection {
    pub(super) fn new(pool: DbPool, name: &str) -> Self {
        Self {
            pool,
            table: name.to_owned(),
        }
    }

    pub fn name(&self) -> &str {
        &self.table
    }

    fn quoted_table(&self) -> String {
        format!("\"{}\"", self.table.replace('"', "\"\""))
    }

    /// Every document in the collection, most recently inserted first.
    /// Ordered by `_id`, which AUTOINCREMENT assigns in insertion order.
    pub fn find_all_newest_first(&self) -> Result<Vec<Document>, DashboardError> {
        let _tmr = timer!(Level::Trace; "Collection::find_all_newest_first", "{}", self.table);

        let conn = self.pool.get()?;
        let sql = format!(
            "SELECT _id, doc FROM {} ORDER BY _id DESC",
            self.quoted_table()
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut documents = Vec::new();
        for row in rows {
            let (id, doc) = row?;
            documents.push(Document {
                id,
                body: parse_body(id, &doc)?,
            });
        }

        Ok(documents)
    }

    /// Deletes every document then inserts `docs`, atomically.
    pub fn replace_all(&self, docs: &[Map<String, Value>]) -> Result<ReplaceCounts, DashboardError> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;

        let deleted = tx.execute(&format!("DELETE FROM {}", self.quoted_table()), [])?;
        let inserted = self.insert_in(&tx, docs)?;
        let total: i64 = tx.query_row(
            &format!("SELECT COUNT(*) FROM {}", self.quoted_table()),
            [],
            |row| row.get(0),
        )?;

        tx.commit()?;

        Ok(ReplaceCounts {
            deleted,
            inserted,
            total,
        })
    }

    fn insert_in(&self, tx: &Transaction, docs: &[Map<String, Value>]) -> Result<usize, DashboardError> {
        let sql = format!(
            "INSERT INTO {} (created_at, doc) VALUES (:created_at, :doc)",
            self.quoted_table()
        );
        let created_at = chrono::Utc::now().timestamp();
        let mut stmt = tx.prepare(&sql)?;

        for doc in docs {
            let mut body = doc.clone();
            body.shift_remove(ID_FIELD);
            let text = serde_json::to_string(&body)?;
            stmt.execute(named_params! {
                ":created_at": created_at,
                ":doc":        text,
            })?;
        }

        Ok(docs.len())
    }
}

fn parse_body(id: i64, doc: &str) -> Result<Map<String, Value>, DashboardError> {
    match serde_json::from_str::<Value>(doc)? {
        Value::Object(map) => Ok(map),
        other => Err(DashboardError::Error(format!(
            "Document {} is not a JSON object (found {})",
            id,
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
