pub mod account;
pub mod context;
pub mod datatable;
pub mod importer;
pub mod money;
pub mod transaction;

pub use account::{Account, AccountId, Category, CategoryId};
pub use context::ImportContext;
pub use datatable::{CanonicalColumn, CanonicalRow, CanonicalTable, TransactionTypeLabels};
pub use importer::{
    DataTableError, DataTableImporter, ImportedData, ReferenceData, SimpleDataTableImporter,
};
pub use money::Money;
pub use transaction::{ImportedTransaction, TransactionType};
