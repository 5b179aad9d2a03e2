//! [`SqliteStore`], the SQLite implementation of [`CalculationStore`].

use std::{path::Path, time::Duration};

use chrono::Utc;
use porciento_core::{
  promotion::{PROMOTION_THRESHOLD, advance},
  record::{CalcKey, CalculationRecord, NewCalculation, Recorded, Transition},
  store::CalculationStore,
};
use rusqlite::{OptionalExtension as _, TransactionBehavior};

use crate::{
  Result,
  encode::{RECORD_COLUMNS, RawRecord, encode_dt},
  schema::SCHEMA,
};

/// How long a writer waits on a lock held by another connection to the file.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

// ─── Store ───────────────────────────────────────────────────────────────────

/// A calculation store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── CalculationStore impl ───────────────────────────────────────────────────

impl CalculationStore for SqliteStore {
  type Error = crate::Error;

  async fn record_request(&self, input: NewCalculation) -> Result<Recorded> {
    let NewCalculation { key, explanation, canonical_url } = input;
    let now_str = encode_dt(Utc::now());

    // Read, decide and write inside one IMMEDIATE transaction so the
    // check-then-create and check-then-increment paths cannot interleave
    // with another writer.
    let (raw, transition): (RawRecord, Transition) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let existing: Option<u32> = tx
          .query_row(
            "SELECT count FROM calculations WHERE x = ?1 AND y = ?2",
            rusqlite::params![key.x, key.y],
            |row| row.get(0),
          )
          .optional()?;

        let transition = match existing {
          None => {
            tx.execute(
              "INSERT INTO calculations (x, y, count, explanation, url, last_calculated)
               VALUES (?1, ?2, 1, ?3, NULL, ?4)",
              rusqlite::params![key.x, key.y, explanation, now_str],
            )?;
            Transition::Created
          }
          Some(count) => {
            let (next, transition) = advance(count);
            let promoted_url =
              (transition == Transition::Promoted).then_some(canonical_url);
            tx.execute(
              "UPDATE calculations
               SET count = ?3, last_calculated = ?4, url = COALESCE(url, ?5)
               WHERE x = ?1 AND y = ?2",
              rusqlite::params![key.x, key.y, next, now_str, promoted_url],
            )?;
            transition
          }
        };

        let raw = tx.query_row(
          &format!("SELECT {RECORD_COLUMNS} FROM calculations WHERE x = ?1 AND y = ?2"),
          rusqlite::params![key.x, key.y],
          RawRecord::from_row,
        )?;

        tx.commit()?;
        Ok((raw, transition))
      })
      .await?;

    let record = raw.into_record()?;
    tracing::debug!(
      x = key.x,
      y = key.y,
      count = record.count,
      ?transition,
      "recorded calculation request"
    );
    Ok(Recorded { record, transition })
  }

  async fn get(&self, key: CalcKey) -> Result<Option<CalculationRecord>> {
    let raw: Option<RawRecord> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {RECORD_COLUMNS} FROM calculations WHERE x = ?1 AND y = ?2"),
            rusqlite::params![key.x, key.y],
            RawRecord::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawRecord::into_record).transpose()
  }

  async fn promoted_urls(&self) -> Result<Vec<String>> {
    let urls = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT DISTINCT url FROM calculations
           WHERE count >= ?1 AND url IS NOT NULL AND trim(url) != ''
           ORDER BY url",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![PROMOTION_THRESHOLD], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(urls)
  }

  async fn refresh_sitemap_urls(&self) -> Result<Vec<String>> {
    let urls = self
      .conn
      .call(|conn| {
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM sitemap_urls", [])?;
        tx.execute(
          "INSERT OR IGNORE INTO sitemap_urls (url)
           SELECT DISTINCT url FROM calculations
           WHERE count >= ?1 AND url IS NOT NULL AND trim(url) != ''",
          rusqlite::params![PROMOTION_THRESHOLD],
        )?;
        let urls = {
          let mut stmt = tx.prepare("SELECT url FROM sitemap_urls ORDER BY url")?;
          stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?
        };
        tx.commit()?;
        Ok(urls)
      })
      .await?;
    Ok(urls)
  }
}
