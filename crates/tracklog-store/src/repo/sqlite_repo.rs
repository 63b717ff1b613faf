//! SQLite implementation of the library store
//!
//! Snapshot entries live in `tracks`, one column per field; events live in
//! the append-only `changes` table; the generation counter lives in the single
//! `store_state` row.

#![allow(clippy::result_large_err)]

use std::path::Path;

use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OptionalExtension, Transaction, TransactionBehavior};
use tracklog_core::errors::{ExError, ExErrorKind};
use tracklog_core::model::{ChangeEvent, ChangeKind, Field, FieldKind, FieldValue, Track};
use tracklog_core::ops::{
    ChangeLogStore, CommitReceipt, LibraryStore, ReportStore, Snapshot, SnapshotStore,
    UpdateBatch,
};

use crate::db;
use crate::errors::{corrupt_row, from_rusqlite, Result};
use crate::migrations::apply_migrations;

const CHANGE_COLUMNS: &str =
    "seq, timestamp, kind, persistent_id, track_title, field, value_text, value_int, delta";

/// Column holding a field in the `tracks` table
pub fn column_name(field: Field) -> &'static str {
    match field {
        Field::Title => "title",
        Field::Artist => "artist",
        Field::AlbumArtist => "album_artist",
        Field::AlbumTitle => "album_title",
        Field::Genre => "genre",
        Field::Composer => "composer",
        Field::Year => "year",
        Field::TrackNumber => "track_number",
        Field::DiscNumber => "disc_number",
        Field::TotalTime => "total_time",
        Field::Rating => "rating",
        Field::PlayCount => "play_count",
        Field::SkipCount => "skip_count",
        Field::DateAdded => "date_added",
        Field::ReleaseDate => "release_date",
        Field::LastPlayedDate => "last_played_date",
    }
}

/// SQLite-backed snapshot and change log
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `path` and migrate it
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_connection(db::open(path)?)
    }

    /// A private in-memory database, for tests
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(db::open_in_memory()?)
    }

    /// Configure and migrate an existing connection
    pub fn from_connection(mut conn: Connection) -> Result<Self> {
        db::configure(&conn)?;
        apply_migrations(&mut conn)?;
        Ok(Self { conn })
    }

    /// Underlying connection, for diagnostics and tests
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Current generation of the stored snapshot
    pub fn generation(&self) -> Result<u64> {
        read_generation(&self.conn)
    }

    /// Total number of events in the change log
    pub fn event_count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM changes", [], |row| row.get(0))
            .map_err(from_rusqlite)?;
        Ok(count as u64)
    }

    fn query_events(&self, sql: &str, params: &[Value]) -> Result<Vec<ChangeEvent>> {
        events_in(&self.conn, sql, params)
    }
}

impl SnapshotStore for SqliteStore {
    fn load_snapshot(&self) -> std::result::Result<Snapshot, ExError> {
        // Generation and rows must come from the same read snapshot
        let tx = self.conn.unchecked_transaction().map_err(from_rusqlite)?;
        let snapshot = snapshot_in(&tx)?;
        tx.finish().map_err(from_rusqlite)?;
        Ok(snapshot)
    }
}

impl ChangeLogStore for SqliteStore {
    fn recent_events(&self, limit: usize) -> std::result::Result<Vec<ChangeEvent>, ExError> {
        let sql = format!(
            "SELECT {} FROM changes ORDER BY timestamp DESC, seq DESC LIMIT ?1",
            CHANGE_COLUMNS
        );
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.query_events(&sql, &[Value::Integer(limit)])
    }

    fn events_between(&self, from: i64, to: i64) -> std::result::Result<Vec<ChangeEvent>, ExError> {
        let sql = format!(
            "SELECT {} FROM changes WHERE timestamp BETWEEN ?1 AND ?2 ORDER BY seq",
            CHANGE_COLUMNS
        );
        self.query_events(&sql, &[Value::Integer(from), Value::Integer(to)])
    }
}

impl ReportStore for SqliteStore {
    fn read_window(
        &self,
        from: i64,
        to: i64,
    ) -> std::result::Result<(Snapshot, Vec<ChangeEvent>), ExError> {
        let sql = format!(
            "SELECT {} FROM changes WHERE timestamp BETWEEN ?1 AND ?2 ORDER BY seq",
            CHANGE_COLUMNS
        );

        // A commit from another process must not land between the two reads
        let tx = self.conn.unchecked_transaction().map_err(from_rusqlite)?;
        let events = events_in(&tx, &sql, &[Value::Integer(from), Value::Integer(to)])?;
        let snapshot = snapshot_in(&tx)?;
        tx.finish().map_err(from_rusqlite)?;

        Ok((snapshot, events))
    }
}

impl LibraryStore for SqliteStore {
    fn commit(&mut self, batch: &UpdateBatch) -> std::result::Result<CommitReceipt, ExError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| from_rusqlite(e).with_op("commit"))?;

        let current = read_generation(&tx).map_err(rolled_back)?;
        if current != batch.expected_generation {
            // Dropping the transaction rolls it back
            return Err(ExError::new(ExErrorKind::Concurrency)
                .with_op("commit")
                .with_message(format!(
                    "Library changed during update: expected generation {} but store is at {}",
                    batch.expected_generation, current
                )));
        }

        let first_seq = write_batch(&tx, batch).map_err(rolled_back)?;
        let generation = current + 1;
        tx.execute(
            "UPDATE store_state SET generation = ?1, updated_at = ?2 WHERE id = 1",
            rusqlite::params![generation as i64, chrono::Utc::now().timestamp()],
        )
        .map_err(|e| rolled_back(from_rusqlite(e)))?;

        tx.commit().map_err(|e| rolled_back(from_rusqlite(e)))?;

        tracing::debug!(
            generation,
            appended = batch.events.len(),
            upserts = batch.upserts.len(),
            removals = batch.removals.len(),
            "Committed update batch"
        );

        Ok(CommitReceipt {
            generation,
            appended: batch.events.len(),
            first_seq,
        })
    }
}

fn snapshot_in(conn: &Connection) -> Result<Snapshot> {
    let columns: Vec<&str> = Field::ALL.iter().map(|f| column_name(*f)).collect();
    let sql = format!(
        "SELECT persistent_id, {} FROM tracks ORDER BY persistent_id",
        columns.join(", ")
    );

    let generation = read_generation(conn)?;
    let mut stmt = conn.prepare(&sql).map_err(from_rusqlite)?;
    let tracks = stmt
        .query_map([], track_from_row)
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;

    Ok(Snapshot::new(generation, tracks))
}

fn events_in(conn: &Connection, sql: &str, params: &[Value]) -> Result<Vec<ChangeEvent>> {
    let mut stmt = conn.prepare(sql).map_err(from_rusqlite)?;
    let rows = stmt
        .query_map(params_from_iter(params.iter()), ChangeRow::from_row)
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;
    rows.into_iter().map(ChangeRow::into_event).collect()
}

fn rolled_back(cause: ExError) -> ExError {
    ExError::new(ExErrorKind::InconsistentState)
        .with_op("commit")
        .with_message("update failed part-way and was rolled back")
        .with_source(cause)
}

fn read_generation(conn: &Connection) -> Result<u64> {
    let generation: Option<i64> = conn
        .query_row("SELECT generation FROM store_state WHERE id = 1", [], |row| {
            row.get(0)
        })
        .optional()
        .map_err(from_rusqlite)?;

    match generation {
        Some(g) if g >= 0 => Ok(g as u64),
        Some(g) => Err(corrupt_row("store_state", &format!("negative generation {}", g))),
        None => Err(corrupt_row("store_state", "missing state row")),
    }
}

/// Append events, delete removals, upsert tracks; returns the first new seq
fn write_batch(tx: &Transaction, batch: &UpdateBatch) -> Result<Option<i64>> {
    let mut first_seq = None;
    {
        let mut insert = tx
            .prepare(
                "INSERT INTO changes (timestamp, kind, persistent_id, track_title, field, value_text, value_int, delta)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )
            .map_err(from_rusqlite)?;

        for event in &batch.events {
            let (value_text, value_int) = split_value(event.value.as_ref());
            insert
                .execute(rusqlite::params![
                    event.timestamp,
                    event.kind.as_str(),
                    event.persistent_id,
                    event.track_title,
                    event.field.map(|f| f.name()),
                    value_text,
                    value_int,
                    event.delta,
                ])
                .map_err(from_rusqlite)?;
            if first_seq.is_none() {
                first_seq = Some(tx.last_insert_rowid());
            }
        }
    }

    for id in &batch.removals {
        tx.execute("DELETE FROM tracks WHERE persistent_id = ?1", [id])
            .map_err(from_rusqlite)?;
    }

    let sql = upsert_sql();
    for track in &batch.upserts {
        upsert_track(tx, &sql, track)?;
    }

    Ok(first_seq)
}

fn upsert_sql() -> String {
    let columns: Vec<&str> = Field::ALL.iter().map(|f| column_name(*f)).collect();
    let placeholders: Vec<String> = (1..=columns.len() + 1).map(|i| format!("?{}", i)).collect();
    let updates: Vec<String> = columns
        .iter()
        .map(|c| format!("{c} = excluded.{c}"))
        .collect();

    format!(
        "INSERT INTO tracks (persistent_id, {}) VALUES ({})
         ON CONFLICT(persistent_id) DO UPDATE SET {}",
        columns.join(", "),
        placeholders.join(", "),
        updates.join(", ")
    )
}

fn upsert_track(tx: &Transaction, sql: &str, track: &Track) -> Result<()> {
    let mut values = Vec::with_capacity(Field::ALL.len() + 1);
    values.push(Value::Text(track.persistent_id.clone()));
    for field in Field::ALL {
        values.push(match track.value(field) {
            None => Value::Null,
            Some(FieldValue::Text(s)) => Value::Text(s),
            Some(FieldValue::Integer(v)) | Some(FieldValue::Timestamp(v)) => Value::Integer(v),
        });
    }

    tx.execute(sql, params_from_iter(values.iter()))
        .map_err(from_rusqlite)?;
    Ok(())
}

fn track_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Track> {
    let mut track = Track::new(row.get::<_, String>(0)?);
    for (i, field) in Field::ALL.iter().enumerate() {
        let value = match field.kind() {
            FieldKind::Text => row.get::<_, Option<String>>(i + 1)?.map(FieldValue::Text),
            kind => row
                .get::<_, Option<i64>>(i + 1)?
                .map(|v| FieldValue::from_i64(kind, v)),
        };
        track.set(*field, value);
    }
    Ok(track)
}

fn split_value(value: Option<&FieldValue>) -> (Option<&str>, Option<i64>) {
    match value {
        None => (None, None),
        Some(FieldValue::Text(s)) => (Some(s.as_str()), None),
        Some(other) => (None, other.as_i64()),
    }
}

/// Raw `changes` row before validation
struct ChangeRow {
    seq: i64,
    timestamp: i64,
    kind: String,
    persistent_id: String,
    track_title: String,
    field: Option<String>,
    value_text: Option<String>,
    value_int: Option<i64>,
    delta: Option<i64>,
}

impl ChangeRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            seq: row.get(0)?,
            timestamp: row.get(1)?,
            kind: row.get(2)?,
            persistent_id: row.get(3)?,
            track_title: row.get(4)?,
            field: row.get(5)?,
            value_text: row.get(6)?,
            value_int: row.get(7)?,
            delta: row.get(8)?,
        })
    }

    fn into_event(self) -> Result<ChangeEvent> {
        let kind = ChangeKind::parse(&self.kind)
            .ok_or_else(|| corrupt_row("changes", &format!("unknown kind '{}'", self.kind)))?;
        let field = match self.field.as_deref() {
            None => None,
            Some(name) => Some(
                Field::parse(name)
                    .ok_or_else(|| corrupt_row("changes", &format!("unknown field '{}'", name)))?,
            ),
        };

        let value = match (self.value_text, self.value_int) {
            (Some(text), _) => Some(FieldValue::Text(text)),
            (None, Some(v)) => {
                let kind = field.map(|f| f.kind()).unwrap_or(FieldKind::Integer);
                Some(FieldValue::from_i64(kind, v))
            }
            (None, None) => None,
        };

        Ok(ChangeEvent {
            seq: Some(self.seq),
            timestamp: self.timestamp,
            kind,
            persistent_id: self.persistent_id,
            track_title: self.track_title,
            field,
            value,
            delta: self.delta,
        })
    }
}
