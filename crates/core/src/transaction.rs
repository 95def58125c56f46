use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::account::{Account, Category};
use super::money::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Income,
    Expense,
    Transfer,
}

impl TransactionType {
    pub const ALL: [TransactionType; 3] = [
        TransactionType::Income,
        TransactionType::Expense,
        TransactionType::Transfer,
    ];
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionType::Income => write!(f, "income"),
            TransactionType::Expense => write!(f, "expense"),
            TransactionType::Transfer => write!(f, "transfer"),
        }
    }
}

/// A transaction produced by a data-table importer, with account and category
/// names resolved against the caller's reference data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportedTransaction {
    pub transaction_type: TransactionType,
    pub time: DateTime<Utc>,
    /// Offset (minutes east of UTC) the source time was expressed in.
    pub utc_offset_minutes: i32,
    pub amount: Money,
    pub account: Option<Account>,
    pub related_account: Option<Account>,
    pub category: Option<Category>,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_lowercase() {
        assert_eq!(TransactionType::Income.to_string(), "income");
        assert_eq!(TransactionType::Expense.to_string(), "expense");
        assert_eq!(TransactionType::Transfer.to_string(), "transfer");
    }

    #[test]
    fn all_lists_each_type_once() {
        let mut seen = std::collections::HashSet::new();
        for t in TransactionType::ALL {
            assert!(seen.insert(t));
        }
        assert_eq!(seen.len(), 3);
    }
}
