use std::collections::HashMap;

use crate::error::ImportError;
use crate::profile::ColumnNames;

/// Semantic meaning of a provider column, independent of its header text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnRole {
    Time,
    Amount,
    Status,
    FundDirection,
    CounterpartyName,
    ProductName,
    Description,
}

impl ColumnRole {
    pub const ALL: [ColumnRole; 7] = [
        ColumnRole::Time,
        ColumnRole::Amount,
        ColumnRole::Status,
        ColumnRole::FundDirection,
        ColumnRole::CounterpartyName,
        ColumnRole::ProductName,
        ColumnRole::Description,
    ];

    pub fn is_required(self) -> bool {
        matches!(
            self,
            ColumnRole::Time | ColumnRole::Amount | ColumnRole::Status | ColumnRole::FundDirection
        )
    }

    /// Profile key of this role.
    pub fn key(self) -> &'static str {
        match self {
            ColumnRole::Time => "time",
            ColumnRole::Amount => "amount",
            ColumnRole::Status => "status",
            ColumnRole::FundDirection => "fund_direction",
            ColumnRole::CounterpartyName => "counterparty_name",
            ColumnRole::ProductName => "product_name",
            ColumnRole::Description => "description",
        }
    }
}

/// Header text to field index. A repeated name maps to its last position.
#[derive(Debug, Clone, Default)]
pub struct HeaderMap(HashMap<String, usize>);

impl HeaderMap {
    pub fn from_header(header: &[String]) -> Self {
        let mut map = HashMap::with_capacity(header.len());
        for (idx, name) in header.iter().enumerate() {
            map.insert(name.clone(), idx);
        }
        HeaderMap(map)
    }

    pub fn get(&self, name: &str) -> Option<usize> {
        self.0.get(name).copied()
    }
}

/// Field index of every role in one file.
#[derive(Debug, Clone)]
pub struct ResolvedColumns {
    indices: HashMap<ColumnRole, usize>,
    header_len: usize,
}

impl ResolvedColumns {
    pub fn resolve(header: &[String], names: &ColumnNames) -> Result<Self, ImportError> {
        let header_map = HeaderMap::from_header(header);
        let mut indices = HashMap::new();

        for role in ColumnRole::ALL {
            match header_map.get(names.name(role)) {
                Some(idx) => {
                    indices.insert(role, idx);
                }
                None if role.is_required() => {
                    tracing::error!(
                        "Missing required column '{}' in header row",
                        names.name(role)
                    );
                    return Err(ImportError::MissingRequiredFieldInHeaderRow(
                        names.name(role).to_string(),
                    ));
                }
                None => {}
            }
        }

        Ok(Self {
            indices,
            header_len: header.len(),
        })
    }

    pub fn index(&self, role: ColumnRole) -> Option<usize> {
        self.indices.get(&role).copied()
    }

    /// Number of fields in the header row.
    pub fn header_len(&self) -> usize {
        self.header_len
    }

    /// Value of `role` in `row`, or `""` when the column is absent.
    pub fn field<'r>(&self, row: &'r [String], role: ColumnRole) -> &'r str {
        self.index(role)
            .and_then(|idx| row.get(idx))
            .map(String::as_str)
            .unwrap_or_default()
    }
}
