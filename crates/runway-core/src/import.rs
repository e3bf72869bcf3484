//! CSV transaction ingest
//!
//! Accepts exports in the shape `date,type,amount,description,category,contact`
//! with amounts in decimal major units. Rows are hashed for dedup so the
//! same file can be ingested repeatedly without creating duplicates.

use std::io::Read;

use chrono::NaiveDate;
use csv::ReaderBuilder;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::db::{Database, TransactionInsertResult};
use crate::error::{Error, Result};
use crate::models::{NewTransaction, TransactionKind, TransactionSource};
use crate::money::parse_minor;

/// Outcome of one ingest run
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct IngestSummary {
    pub imported: usize,
    pub skipped: usize,
}

/// Compute a dedup hash from the fields that identify a transaction
fn compute_import_hash(date: NaiveDate, kind: TransactionKind, amount: i64, description: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(date.to_string().as_bytes());
    hasher.update(kind.as_str().as_bytes());
    hasher.update(amount.to_be_bytes());
    hasher.update(description.as_bytes());
    hex::encode(hasher.finalize())
}

/// Parse a CSV export into transactions ready for insertion.
///
/// Expected header: `date,type,amount,description,category,contact`.
/// The contact column may be omitted. Empty category/contact cells map
/// to None so recurrence grouping falls through correctly.
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<NewTransaction>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let col = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
    let date_idx = col("date").ok_or_else(|| Error::Ingest("missing 'date' column".to_string()))?;
    let kind_idx = col("type").ok_or_else(|| Error::Ingest("missing 'type' column".to_string()))?;
    let amount_idx =
        col("amount").ok_or_else(|| Error::Ingest("missing 'amount' column".to_string()))?;
    let desc_idx = col("description")
        .ok_or_else(|| Error::Ingest("missing 'description' column".to_string()))?;
    let category_idx = col("category");
    let contact_idx = col("contact");

    let mut transactions = Vec::new();
    for (line, result) in rdr.records().enumerate() {
        let record = result?;
        let field = |idx: usize| record.get(idx).unwrap_or("").trim();

        let date = NaiveDate::parse_from_str(field(date_idx), "%Y-%m-%d").map_err(|e| {
            Error::Ingest(format!("row {}: invalid date '{}': {}", line + 2, field(date_idx), e))
        })?;
        let kind: TransactionKind = field(kind_idx)
            .parse()
            .map_err(|e| Error::Ingest(format!("row {}: {}", line + 2, e)))?;
        let amount = parse_minor(field(amount_idx))
            .map_err(|e| Error::Ingest(format!("row {}: {}", line + 2, e)))?;
        if amount < 0 {
            return Err(Error::Ingest(format!(
                "row {}: amounts must be non-negative, use the type column for direction",
                line + 2
            )));
        }
        let description = field(desc_idx).to_string();

        let optional = |idx: Option<usize>| {
            idx.map(field)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        transactions.push(NewTransaction {
            date,
            description: description.clone(),
            amount,
            kind,
            category: optional(category_idx),
            contact: optional(contact_idx),
            source: TransactionSource::Csv,
            import_hash: compute_import_hash(date, kind, amount, &description),
        });
    }

    debug!(rows = transactions.len(), "Parsed CSV export");
    Ok(transactions)
}

/// Parse a CSV export and insert its rows for a user, skipping duplicates
pub fn ingest_csv<R: Read>(db: &Database, user_id: i64, reader: R) -> Result<IngestSummary> {
    let transactions = parse_csv(reader)?;

    let mut summary = IngestSummary::default();
    for tx in &transactions {
        match db.insert_transaction(user_id, tx)? {
            TransactionInsertResult::Inserted(_) => summary.imported += 1,
            TransactionInsertResult::Duplicate(_) => summary.skipped += 1,
        }
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
date,type,amount,description,category,contact
2026-01-05,expense,1000.00,Office rent,Rent,Landlord Ltd
2026-01-20,income,2500.50,Invoice 42,,Acme Corp
2026-02-05,expense,1000.00,Office rent,Rent,Landlord Ltd
";

    #[test]
    fn test_parse_csv() {
        let txs = parse_csv(SAMPLE.as_bytes()).unwrap();
        assert_eq!(txs.len(), 3);

        assert_eq!(txs[0].amount, 100_000);
        assert_eq!(txs[0].kind, TransactionKind::Expense);
        assert_eq!(txs[0].category.as_deref(), Some("Rent"));

        assert_eq!(txs[1].amount, 250_050);
        assert_eq!(txs[1].kind, TransactionKind::Income);
        assert_eq!(txs[1].category, None);
        assert_eq!(txs[1].contact.as_deref(), Some("Acme Corp"));

        // Same description and amount on different dates hash differently
        assert_ne!(txs[0].import_hash, txs[2].import_hash);
    }

    #[test]
    fn test_parse_rejects_missing_columns() {
        let result = parse_csv("date,amount\n2026-01-05,10.00\n".as_bytes());
        assert!(matches!(result, Err(Error::Ingest(_))));
    }

    #[test]
    fn test_parse_rejects_bad_row() {
        let bad = "date,type,amount,description\n2026-13-40,expense,10.00,Rent\n";
        assert!(parse_csv(bad.as_bytes()).is_err());
    }

    #[test]
    fn test_ingest_is_repeatable() {
        let db = Database::in_memory().unwrap();
        let user = db.create_user("Acme").unwrap();

        let first = ingest_csv(&db, user, SAMPLE.as_bytes()).unwrap();
        assert_eq!(first.imported, 3);
        assert_eq!(first.skipped, 0);

        let second = ingest_csv(&db, user, SAMPLE.as_bytes()).unwrap();
        assert_eq!(second.imported, 0);
        assert_eq!(second.skipped, 3);

        assert_eq!(db.count_transactions(user).unwrap(), 3);
    }
}
