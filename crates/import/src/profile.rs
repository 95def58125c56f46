use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};
use tally_core::{TransactionType, TransactionTypeLabels};
use thiserror::Error;

use crate::columns::ColumnRole;

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Unknown text encoding: '{0}'")]
    UnknownEncoding(String),
    #[error("Profile field '{0}' must not be empty")]
    EmptyField(&'static str),
    #[error("Fund direction label '{0}' is used for more than one transaction type")]
    DuplicateFundDirectionLabel(String),
}

/// Localized header names for each [`ColumnRole`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub time: String,
    pub amount: String,
    pub status: String,
    pub fund_direction: String,
    pub counterparty_name: String,
    pub product_name: String,
    pub description: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            time: "交易创建时间".to_string(),
            amount: "金额（元）".to_string(),
            status: "交易状态".to_string(),
            fund_direction: "资金状态".to_string(),
            counterparty_name: "交易对方".to_string(),
            product_name: "商品名称".to_string(),
            description: "备注".to_string(),
        }
    }
}

impl ColumnNames {
    pub fn name(&self, role: ColumnRole) -> &str {
        match role {
            ColumnRole::Time => &self.time,
            ColumnRole::Amount => &self.amount,
            ColumnRole::Status => &self.status,
            ColumnRole::FundDirection => &self.fund_direction,
            ColumnRole::CounterpartyName => &self.counterparty_name,
            ColumnRole::ProductName => &self.product_name,
            ColumnRole::Description => &self.description,
        }
    }
}

fn fund_direction_key(transaction_type: TransactionType) -> &'static str {
    match transaction_type {
        TransactionType::Income => "fund_direction_labels.income",
        TransactionType::Expense => "fund_direction_labels.expense",
        TransactionType::Transfer => "fund_direction_labels.transfer",
    }
}

fn default_fund_direction_labels() -> TransactionTypeLabels {
    TransactionTypeLabels::new("已收入", "已支出", "资金转移")
}

/// Everything that ties the importer to one provider export layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportProfile {
    pub name: String,
    /// WHATWG encoding label of the raw file.
    pub encoding: String,
    /// Text the banner record's first field starts with.
    pub banner: String,
    /// Text contained in the record right before the header row.
    pub data_section_marker: String,
    /// A record made only of this character ends the data section.
    pub terminator: char,
    pub columns: ColumnNames,
    pub fund_direction_labels: TransactionTypeLabels,
}

impl Default for ImportProfile {
    fn default() -> Self {
        Self {
            name: "Alipay (Web) Transaction Flow File".to_string(),
            encoding: "gb18030".to_string(),
            banner: "支付宝交易记录明细查询".to_string(),
            data_section_marker: "交易记录明细列表".to_string(),
            terminator: '-',
            columns: ColumnNames::default(),
            fund_direction_labels: default_fund_direction_labels(),
        }
    }
}

impl ImportProfile {
    /// Parses a profile; keys left out keep their defaults.
    pub fn from_toml(toml_content: &str) -> Result<Self, ProfileError> {
        let profile: ImportProfile = toml::from_str(toml_content)?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn validate(&self) -> Result<(), ProfileError> {
        self.text_encoding()?;
        if self.banner.is_empty() {
            return Err(ProfileError::EmptyField("banner"));
        }
        if self.data_section_marker.is_empty() {
            return Err(ProfileError::EmptyField("data_section_marker"));
        }
        for role in ColumnRole::ALL {
            if self.columns.name(role).is_empty() {
                return Err(ProfileError::EmptyField(role.key()));
            }
        }
        self.validate_fund_direction_labels()
    }

    fn validate_fund_direction_labels(&self) -> Result<(), ProfileError> {
        let labels = &self.fund_direction_labels;
        for (i, t) in TransactionType::ALL.into_iter().enumerate() {
            let label = labels.label(t);
            if label.is_empty() {
                return Err(ProfileError::EmptyField(fund_direction_key(t)));
            }
            if TransactionType::ALL[..i].iter().any(|prev| labels.label(*prev) == label) {
                return Err(ProfileError::DuplicateFundDirectionLabel(label.to_string()));
            }
        }
        Ok(())
    }

    pub fn text_encoding(&self) -> Result<&'static Encoding, ProfileError> {
        Encoding::for_label(self.encoding.trim().as_bytes())
            .ok_or_else(|| ProfileError::UnknownEncoding(self.encoding.clone()))
    }
}
