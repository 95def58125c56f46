//! Per-row classification of provider records into canonical rows.
//!
//! The provider vocabulary (status labels, product name patterns) is turned
//! into enums at the boundary; the rules below only match on those enums.

use tally_core::{CanonicalRow, TransactionType, TransactionTypeLabels};

use crate::columns::{ColumnRole, ResolvedColumns};
use crate::error::ImportError;

/// Provider transaction status, by effect on the imported row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLabel {
    Success,
    PaymentSuccess,
    RepaymentSuccess,
    Closed,
    RefundSuccess,
    TaxRefundSuccess,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusEffect {
    PassThrough,
    Closed,
    Refund,
}

impl StatusLabel {
    const LABELS: [(&'static str, StatusLabel); 6] = [
        ("交易成功", StatusLabel::Success),
        ("支付成功", StatusLabel::PaymentSuccess),
        ("还款成功", StatusLabel::RepaymentSuccess),
        ("交易关闭", StatusLabel::Closed),
        ("退款成功", StatusLabel::RefundSuccess),
        ("退税成功", StatusLabel::TaxRefundSuccess),
    ];

    pub fn from_label(label: &str) -> Option<Self> {
        Self::LABELS
            .iter()
            .find(|(text, _)| *text == label)
            .map(|(_, status)| *status)
    }

    pub fn effect(self) -> StatusEffect {
        match self {
            StatusLabel::Success | StatusLabel::PaymentSuccess | StatusLabel::RepaymentSuccess => {
                StatusEffect::PassThrough
            }
            StatusLabel::Closed => StatusEffect::Closed,
            StatusLabel::RefundSuccess | StatusLabel::TaxRefundSuccess => StatusEffect::Refund,
        }
    }
}

/// How a transfer's product name says money moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferKind {
    /// Into the own wallet from outside.
    Recharge,
    /// Out of the own wallet to the counterparty.
    CashWithdrawal,
    TransferIn,
    TransferOut,
    Repayment,
}

enum ProductNameMatch {
    Prefix(&'static str),
    Contains(&'static str),
}

impl ProductNameMatch {
    fn matches(&self, product_name: &str) -> bool {
        match self {
            ProductNameMatch::Prefix(p) => product_name.starts_with(*p),
            ProductNameMatch::Contains(p) => product_name.contains(*p),
        }
    }
}

// First match wins.
const PRODUCT_NAME_RULES: [(ProductNameMatch, TransferKind); 5] = [
    (ProductNameMatch::Prefix("充值-"), TransferKind::Recharge),
    (ProductNameMatch::Prefix("提现-"), TransferKind::CashWithdrawal),
    (ProductNameMatch::Contains("转入"), TransferKind::TransferIn),
    (ProductNameMatch::Contains("转出"), TransferKind::TransferOut),
    (ProductNameMatch::Contains("还款"), TransferKind::Repayment),
];

impl TransferKind {
    pub fn from_product_name(product_name: &str) -> Option<Self> {
        PRODUCT_NAME_RULES
            .iter()
            .find(|(rule, _)| rule.matches(product_name))
            .map(|(_, kind)| *kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Keep(CanonicalRow),
    SkipFundDirection(String),
    SkipStatus(String),
}

/// Stateless across rows; one instance serves a whole file.
pub struct RowClassifier<'a> {
    columns: &'a ResolvedColumns,
    labels: &'a TransactionTypeLabels,
    own_wallet_name: &'a str,
}

impl<'a> RowClassifier<'a> {
    pub fn new(
        columns: &'a ResolvedColumns,
        labels: &'a TransactionTypeLabels,
        own_wallet_name: &'a str,
    ) -> Self {
        Self {
            columns,
            labels,
            own_wallet_name,
        }
    }

    /// `row_no` is the 1-based data row index, used for diagnostics.
    pub fn classify(&self, row_no: usize, row: &[String]) -> Result<Classification, ImportError> {
        if row.len() < self.columns.header_len() {
            tracing::error!(
                "Row {row_no} may be missing columns ({} fields, header has {})",
                row.len(),
                self.columns.header_len()
            );
            return Err(ImportError::FewerFieldsInDataRowThanInHeaderRow {
                row: row_no,
                found: row.len(),
                expected: self.columns.header_len(),
            });
        }

        let field = |role| self.columns.field(row, role);

        let fund_direction_text = field(ColumnRole::FundDirection);
        let Some(fund_direction) = self.labels.parse(fund_direction_text) else {
            tracing::warn!(
                "Skipping row {row_no}: unsupported fund direction '{fund_direction_text}'"
            );
            return Ok(Classification::SkipFundDirection(
                fund_direction_text.to_string(),
            ));
        };

        let status_text = field(ColumnRole::Status);
        let status = StatusLabel::from_label(status_text);

        let description = [ColumnRole::Description, ColumnRole::ProductName]
            .into_iter()
            .map(field)
            .find(|text| !text.is_empty())
            .unwrap_or_default();

        let (account_name, related_account_name) = match fund_direction {
            TransactionType::Income => {
                if status == Some(StatusLabel::Success) {
                    (self.own_wallet_name, "")
                } else {
                    ("", "")
                }
            }
            TransactionType::Transfer => {
                let counterparty = field(ColumnRole::CounterpartyName);
                match TransferKind::from_product_name(field(ColumnRole::ProductName)) {
                    Some(TransferKind::Recharge) => ("", self.own_wallet_name),
                    Some(TransferKind::CashWithdrawal) => (self.own_wallet_name, counterparty),
                    Some(
                        TransferKind::TransferIn
                        | TransferKind::TransferOut
                        | TransferKind::Repayment,
                    ) => ("", counterparty),
                    None => ("", ""),
                }
            }
            TransactionType::Expense => ("", ""),
        };

        let mut canonical = CanonicalRow {
            transaction_type: self.labels.label(fund_direction).to_string(),
            transaction_time: field(ColumnRole::Time).to_string(),
            sub_category: String::new(),
            account_name: account_name.to_string(),
            amount: field(ColumnRole::Amount).to_string(),
            related_account_name: related_account_name.to_string(),
            description: description.to_string(),
        };

        match status.map(StatusLabel::effect) {
            Some(StatusEffect::PassThrough | StatusEffect::Closed) => {}
            Some(StatusEffect::Refund) => {
                canonical.transaction_type =
                    self.labels.label(TransactionType::Expense).to_string();
                canonical.amount = format!("-{}", canonical.amount);
            }
            None => return Ok(Classification::SkipStatus(status_text.to_string())),
        }

        Ok(Classification::Keep(canonical))
    }
}
