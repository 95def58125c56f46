//! The provider-agnostic intermediate table that provider-specific parsers
//! produce and data-table importers consume.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::transaction::TransactionType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalColumn {
    TransactionType,
    TransactionTime,
    SubCategory,
    AccountName,
    Amount,
    RelatedAccountName,
    Description,
}

impl CanonicalColumn {
    /// Column order of every canonical table.
    pub const ALL: [CanonicalColumn; 7] = [
        CanonicalColumn::TransactionType,
        CanonicalColumn::TransactionTime,
        CanonicalColumn::SubCategory,
        CanonicalColumn::AccountName,
        CanonicalColumn::Amount,
        CanonicalColumn::RelatedAccountName,
        CanonicalColumn::Description,
    ];
}

impl fmt::Display for CanonicalColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CanonicalColumn::TransactionType => "transaction_type",
            CanonicalColumn::TransactionTime => "transaction_time",
            CanonicalColumn::SubCategory => "sub_category",
            CanonicalColumn::AccountName => "account_name",
            CanonicalColumn::Amount => "amount",
            CanonicalColumn::RelatedAccountName => "related_account_name",
            CanonicalColumn::Description => "description",
        };
        write!(f, "{name}")
    }
}

/// One canonical row. Every column is always present; absent values are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalRow {
    pub transaction_type: String,
    pub transaction_time: String,
    pub sub_category: String,
    pub account_name: String,
    pub amount: String,
    pub related_account_name: String,
    pub description: String,
}

impl CanonicalRow {
    pub fn get(&self, column: CanonicalColumn) -> &str {
        match column {
            CanonicalColumn::TransactionType => &self.transaction_type,
            CanonicalColumn::TransactionTime => &self.transaction_time,
            CanonicalColumn::SubCategory => &self.sub_category,
            CanonicalColumn::AccountName => &self.account_name,
            CanonicalColumn::Amount => &self.amount,
            CanonicalColumn::RelatedAccountName => &self.related_account_name,
            CanonicalColumn::Description => &self.description,
        }
    }

    /// Values in [`CanonicalColumn::ALL`] order.
    pub fn values(&self) -> [&str; 7] {
        CanonicalColumn::ALL.map(|c| self.get(c))
    }
}

/// Append-only, insertion-ordered collection of canonical rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalTable {
    rows: Vec<CanonicalRow>,
}

impl CanonicalTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, row: CanonicalRow) {
        self.rows.push(row);
    }

    pub fn columns(&self) -> &'static [CanonicalColumn] {
        &CanonicalColumn::ALL
    }

    pub fn rows(&self) -> &[CanonicalRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_rows(self) -> Vec<CanonicalRow> {
        self.rows
    }
}

/// Text label for each transaction type, as written in the `TransactionType`
/// column. Parsers and importers share one instance so the text can be read
/// back into a [`TransactionType`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionTypeLabels {
    pub income: String,
    pub expense: String,
    pub transfer: String,
}

impl TransactionTypeLabels {
    pub fn new(income: &str, expense: &str, transfer: &str) -> Self {
        Self {
            income: income.to_string(),
            expense: expense.to_string(),
            transfer: transfer.to_string(),
        }
    }

    pub fn label(&self, transaction_type: TransactionType) -> &str {
        match transaction_type {
            TransactionType::Income => &self.income,
            TransactionType::Expense => &self.expense,
            TransactionType::Transfer => &self.transfer,
        }
    }

    /// Exact-match lookup; no case folding or trimming.
    pub fn parse(&self, label: &str) -> Option<TransactionType> {
        TransactionType::ALL
            .into_iter()
            .find(|t| self.label(*t) == label)
    }
}
