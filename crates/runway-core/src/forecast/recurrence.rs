//! Recurrence detection
//!
//! Groups transactions of one kind by a derived key and reports every
//! group with at least three occurrences as a recurring pattern.

use std::collections::HashMap;

use crate::models::{RecurringItem, Transaction};

/// Minimum group size for a pattern to count as recurring
pub const MIN_OCCURRENCES: usize = 3;

/// How to derive a grouping key when a transaction has neither a
/// category nor a contact.
///
/// The two call sites intentionally differ: the 13-week forecast lumps
/// unkeyed transactions into one "uncategorized" bucket, while the
/// upcoming-payments view keys them by description prefix so unrelated
/// one-off purchases don't merge into a fake pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyStrategy {
    /// Fall back to the literal key "uncategorized"
    Uncategorized,
    /// Fall back to the first 30 characters of the description
    DescriptionPrefix,
}

/// Derive the grouping key for a transaction: category, else contact,
/// else the strategy's fallback.
pub fn grouping_key(tx: &Transaction, strategy: KeyStrategy) -> String {
    if let Some(category) = tx.category.as_deref().filter(|c| !c.is_empty()) {
        return category.to_string();
    }
    if let Some(contact) = tx.contact.as_deref().filter(|c| !c.is_empty()) {
        return contact.to_string();
    }
    match strategy {
        KeyStrategy::Uncategorized => "uncategorized".to_string(),
        KeyStrategy::DescriptionPrefix => tx.description.chars().take(30).collect(),
    }
}

/// Identify recurring patterns among transactions of a single kind.
///
/// Groups with fewer than [`MIN_OCCURRENCES`] members are silently
/// dropped. Output order follows first appearance of each key in the
/// input, so results are stable for a given transaction ordering.
pub fn identify_recurring(transactions: &[Transaction], strategy: KeyStrategy) -> Vec<RecurringItem> {
    let mut order: Vec<String> = Vec::new();
    let mut grouped: HashMap<String, Vec<i64>> = HashMap::new();

    for tx in transactions {
        let key = grouping_key(tx, strategy);
        grouped
            .entry(key.clone())
            .or_insert_with(|| {
                order.push(key);
                Vec::new()
            })
            .push(tx.amount);
    }

    let mut recurring = Vec::new();
    for key in order {
        let amounts = &grouped[&key];
        if amounts.len() < MIN_OCCURRENCES {
            continue;
        }
        let sum: i64 = amounts.iter().sum();
        let avg = (sum as f64 / amounts.len() as f64).round() as i64;
        recurring.push(RecurringItem {
            key,
            avg_amount: avg,
            occurrences: amounts.len() as u32,
            // All inputs share one kind; take it from the first member
            kind: transactions
                .iter()
                .map(|t| t.kind)
                .next()
                .unwrap_or(crate::models::TransactionKind::Expense),
        });
    }

    recurring
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TransactionKind, TransactionSource};
    use chrono::NaiveDate;

    fn tx(amount: i64, category: Option<&str>, contact: Option<&str>, description: &str) -> Transaction {
        Transaction {
            id: 0,
            user_id: 1,
            date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            description: description.to_string(),
            amount,
            kind: TransactionKind::Expense,
            category: category.map(String::from),
            contact: contact.map(String::from),
            source: TransactionSource::Sync,
            import_hash: String::new(),
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_three_identical_rent_payments() {
        let txs = vec![
            tx(100_000, Some("rent"), None, "Office rent"),
            tx(100_000, Some("rent"), None, "Office rent"),
            tx(100_000, Some("rent"), None, "Office rent"),
        ];
        let items = identify_recurring(&txs, KeyStrategy::Uncategorized);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].key, "rent");
        assert_eq!(items[0].avg_amount, 100_000);
        assert_eq!(items[0].occurrences, 3);
    }

    #[test]
    fn test_average_is_rounded_mean() {
        let txs = vec![
            tx(100_000, Some("utilities"), None, "Electric"),
            tx(120_000, Some("utilities"), None, "Electric"),
            tx(110_000, Some("utilities"), None, "Electric"),
        ];
        let items = identify_recurring(&txs, KeyStrategy::Uncategorized);
        assert_eq!(items[0].avg_amount, 110_000);
    }

    #[test]
    fn test_groups_under_threshold_are_dropped() {
        let txs = vec![
            tx(100_000, Some("rent"), None, "Office rent"),
            tx(100_000, Some("rent"), None, "Office rent"),
            tx(50_000, Some("one-off"), None, "Laptop"),
        ];
        let items = identify_recurring(&txs, KeyStrategy::Uncategorized);
        assert_eq!(items.len(), 0);
    }

    #[test]
    fn test_key_falls_back_category_contact_fallback() {
        let with_category = tx(1, Some("rent"), Some("Landlord Ltd"), "Office rent");
        assert_eq!(grouping_key(&with_category, KeyStrategy::Uncategorized), "rent");

        let with_contact = tx(1, None, Some("Landlord Ltd"), "Office rent");
        assert_eq!(grouping_key(&with_contact, KeyStrategy::Uncategorized), "Landlord Ltd");

        let bare = tx(1, None, None, "A very long description that exceeds thirty characters");
        assert_eq!(grouping_key(&bare, KeyStrategy::Uncategorized), "uncategorized");
        assert_eq!(
            grouping_key(&bare, KeyStrategy::DescriptionPrefix),
            "A very long description that e"
        );
    }

    #[test]
    fn test_output_follows_first_seen_order() {
        let txs = vec![
            tx(10, Some("b"), None, ""),
            tx(10, Some("a"), None, ""),
            tx(10, Some("b"), None, ""),
            tx(10, Some("a"), None, ""),
            tx(10, Some("b"), None, ""),
            tx(10, Some("a"), None, ""),
        ];
        let items = identify_recurring(&txs, KeyStrategy::Uncategorized);
        let keys: Vec<&str> = items.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(identify_recurring(&[], KeyStrategy::Uncategorized).is_empty());
    }
}
