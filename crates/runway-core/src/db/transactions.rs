//! Transaction operations

use std::str::FromStr;

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{NewTransaction, Transaction, TransactionKind, TransactionSource};

/// Result of inserting a transaction
#[derive(Debug, Clone)]
pub enum TransactionInsertResult {
    /// Transaction was inserted successfully, contains new transaction ID
    Inserted(i64),
    /// Transaction was a duplicate, contains existing transaction ID
    Duplicate(i64),
}

fn row_to_transaction(row: &rusqlite::Row<'_>) -> rusqlite::Result<Transaction> {
    let date_str: String = row.get(2)?;
    let kind_str: String = row.get(5)?;
    let source_str: String = row.get(8)?;
    Ok(Transaction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        date: NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
        })?,
        description: row.get(3)?,
        amount: row.get(4)?,
        kind: TransactionKind::from_str(&kind_str).unwrap_or(TransactionKind::Expense),
        category: row.get(6)?,
        contact: row.get(7)?,
        source: TransactionSource::from_str(&source_str).unwrap_or_default(),
        import_hash: row.get(9)?,
        created_at: parse_datetime(&row.get::<_, String>(10)?),
    })
}

const TX_COLUMNS: &str =
    "id, user_id, date, description, amount, kind, category, contact, source, import_hash, created_at";

impl Database {
    /// Insert a transaction, skipping duplicates by (user, import_hash)
    pub fn insert_transaction(
        &self,
        user_id: i64,
        tx: &NewTransaction,
    ) -> Result<TransactionInsertResult> {
        if tx.amount < 0 {
            return Err(Error::InvalidData(format!(
                "transaction amount must be non-negative, got {}",
                tx.amount
            )));
        }

        let conn = self.conn()?;

        // Check for duplicate
        let existing: Option<i64> = conn
            .query_row(
                "SELECT id FROM transactions WHERE user_id = ? AND import_hash = ?",
                params![user_id, tx.import_hash],
                |row| row.get(0),
            )
            .optional()?;

        if let Some(existing_id) = existing {
            return Ok(TransactionInsertResult::Duplicate(existing_id));
        }

        conn.execute(
            r#"
            INSERT INTO transactions (user_id, date, description, amount, kind, category, contact, source, import_hash)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                tx.date.to_string(),
                tx.description,
                tx.amount,
                tx.kind.as_str(),
                tx.category,
                tx.contact,
                tx.source.as_str(),
                tx.import_hash,
            ],
        )?;

        Ok(TransactionInsertResult::Inserted(conn.last_insert_rowid()))
    }

    /// List a user's transactions on or after `since`, ascending by date
    ///
    /// Ascending order matters for recurrence detection: interval averages
    /// are computed over consecutive dates.
    pub fn list_transactions_since(&self, user_id: i64, since: NaiveDate) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM transactions WHERE user_id = ? AND date >= ? ORDER BY date ASC, id ASC",
            TX_COLUMNS
        ))?;
        let txs = stmt
            .query_map(params![user_id, since.to_string()], row_to_transaction)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(txs)
    }

    /// List a user's expenses on or after `since`, ascending by date
    pub fn list_expenses_since(&self, user_id: i64, since: NaiveDate) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM transactions WHERE user_id = ? AND date >= ? AND kind = 'expense' \
             ORDER BY date ASC, id ASC",
            TX_COLUMNS
        ))?;
        let txs = stmt
            .query_map(params![user_id, since.to_string()], row_to_transaction)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(txs)
    }

    /// List recent transactions for display, newest first
    pub fn list_transactions(&self, user_id: i64, limit: i64, offset: i64) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM transactions WHERE user_id = ? ORDER BY date DESC, id DESC LIMIT ? OFFSET ?",
            TX_COLUMNS
        ))?;
        let txs = stmt
            .query_map(params![user_id, limit, offset], row_to_transaction)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(txs)
    }

    /// Count a user's transactions
    pub fn count_transactions(&self, user_id: i64) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM transactions WHERE user_id = ?",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
