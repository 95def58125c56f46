use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use std::collections::HashMap;
use thiserror::Error;

use super::account::{Account, Category};
use super::context::ImportContext;
use super::datatable::{CanonicalRow, CanonicalTable, TransactionTypeLabels};
use super::money::Money;
use super::transaction::{ImportedTransaction, TransactionType};

const TIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataTableError {
    #[error("Invalid timezone offset: {0} minutes")]
    InvalidTimezoneOffset(i32),
    #[error("Row {row}: unknown transaction type '{value}'")]
    InvalidTransactionType { row: usize, value: String },
    #[error("Row {row}: invalid transaction time '{value}'")]
    InvalidTime { row: usize, value: String },
    #[error("Row {row}: invalid amount '{value}'")]
    InvalidAmount { row: usize, value: String },
}

/// Existing entities, keyed by display name, that imported names resolve to.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub accounts: HashMap<String, Account>,
    pub expense_categories: HashMap<String, Category>,
    pub income_categories: HashMap<String, Category>,
    pub transfer_categories: HashMap<String, Category>,
}

impl ReferenceData {
    fn categories(&self, transaction_type: TransactionType) -> &HashMap<String, Category> {
        match transaction_type {
            TransactionType::Expense => &self.expense_categories,
            TransactionType::Income => &self.income_categories,
            TransactionType::Transfer => &self.transfer_categories,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ImportedData {
    pub transactions: Vec<ImportedTransaction>,
    pub new_accounts: Vec<Account>,
    pub new_expense_categories: Vec<Category>,
    pub new_income_categories: Vec<Category>,
    pub new_transfer_categories: Vec<Category>,
}

impl ImportedData {
    fn new_categories_mut(&mut self, transaction_type: TransactionType) -> &mut Vec<Category> {
        match transaction_type {
            TransactionType::Expense => &mut self.new_expense_categories,
            TransactionType::Income => &mut self.new_income_categories,
            TransactionType::Transfer => &mut self.new_transfer_categories,
        }
    }
}

/// Turns a canonical table into typed transactions.
pub trait DataTableImporter {
    fn parse_imported_data(
        &self,
        ctx: &ImportContext,
        table: &CanonicalTable,
        labels: &TransactionTypeLabels,
        references: &ReferenceData,
    ) -> Result<ImportedData, DataTableError>;
}

/// Resolves names against [`ReferenceData`] and reports every unknown
/// account or category name once, in first-seen order.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleDataTableImporter;

impl DataTableImporter for SimpleDataTableImporter {
    fn parse_imported_data(
        &self,
        ctx: &ImportContext,
        table: &CanonicalTable,
        labels: &TransactionTypeLabels,
        references: &ReferenceData,
    ) -> Result<ImportedData, DataTableError> {
        let offset = FixedOffset::east_opt(ctx.timezone_offset_minutes * 60)
            .ok_or(DataTableError::InvalidTimezoneOffset(ctx.timezone_offset_minutes))?;

        let mut data = ImportedData::default();

        for (idx, row) in table.rows().iter().enumerate() {
            let transaction = parse_row(idx + 1, row, offset, labels, references, &mut data)?;
            data.transactions.push(transaction);
        }

        tracing::debug!(
            "Imported {} transactions ({} new accounts)",
            data.transactions.len(),
            data.new_accounts.len()
        );

        Ok(data)
    }
}

fn parse_row(
    row_no: usize,
    row: &CanonicalRow,
    offset: FixedOffset,
    labels: &TransactionTypeLabels,
    references: &ReferenceData,
    data: &mut ImportedData,
) -> Result<ImportedTransaction, DataTableError> {
    let transaction_type =
        labels
            .parse(&row.transaction_type)
            .ok_or_else(|| DataTableError::InvalidTransactionType {
                row: row_no,
                value: row.transaction_type.clone(),
            })?;

    let time = parse_time(&row.transaction_time, offset).ok_or_else(|| {
        DataTableError::InvalidTime {
            row: row_no,
            value: row.transaction_time.clone(),
        }
    })?;

    let amount = Money::parse(&row.amount).ok_or_else(|| DataTableError::InvalidAmount {
        row: row_no,
        value: row.amount.clone(),
    })?;

    let account = resolve_account(&row.account_name, references, &mut data.new_accounts);
    let related_account = if transaction_type == TransactionType::Transfer {
        resolve_account(&row.related_account_name, references, &mut data.new_accounts)
    } else {
        None
    };
    let category = resolve_category(&row.sub_category, transaction_type, references, data);

    Ok(ImportedTransaction {
        transaction_type,
        time,
        utc_offset_minutes: offset.local_minus_utc() / 60,
        amount,
        account,
        related_account,
        category,
        description: row.description.clone(),
    })
}

fn parse_time(text: &str, offset: FixedOffset) -> Option<DateTime<Utc>> {
    let text = text.trim();
    let naive = TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())?;
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

fn resolve_account(
    name: &str,
    references: &ReferenceData,
    new_accounts: &mut Vec<Account>,
) -> Option<Account> {
    if name.is_empty() {
        return None;
    }
    if let Some(existing) = references.accounts.get(name) {
        return Some(existing.clone());
    }
    if let Some(pending) = new_accounts.iter().find(|a| a.name == name) {
        return Some(pending.clone());
    }
    let account = Account::new(name);
    new_accounts.push(account.clone());
    Some(account)
}

fn resolve_category(
    name: &str,
    transaction_type: TransactionType,
    references: &ReferenceData,
    data: &mut ImportedData,
) -> Option<Category> {
    if name.is_empty() {
        return None;
    }
    if let Some(existing) = references.categories(transaction_type).get(name) {
        return Some(existing.clone());
    }
    let pending = data.new_categories_mut(transaction_type);
    if let Some(found) = pending.iter().find(|c| c.name == name) {
        return Some(found.clone());
    }
    let category = Category::new(name, transaction_type);
    pending.push(category.clone());
    Some(category)
}
