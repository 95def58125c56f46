pub mod alipay;
pub mod classify;
pub mod columns;
pub mod decode;
pub mod error;
pub mod file_type;
pub mod locale;
pub mod profile;
pub mod scanner;

pub use alipay::AlipayCsvImporter;
pub use classify::{Classification, RowClassifier, StatusEffect, StatusLabel, TransferKind};
pub use columns::{ColumnRole, HeaderMap, ResolvedColumns};
pub use error::{CsvSyntaxError, ImportError};
pub use file_type::ImportFileType;
pub use locale::{LanguageText, LocaleTextTable, OwnWalletNameResolver};
pub use profile::{ColumnNames, ImportProfile, ProfileError};
pub use scanner::{RawRow, ScanState, ScannedSections, SectionMarkers, SectionScanner};

pub mod import {
    use crate::*;
    use tally_core::{
        CanonicalTable, ImportContext, ImportedData, ReferenceData, SimpleDataTableImporter,
    };

    pub fn import_alipay_csv(
        ctx: &ImportContext,
        data: &[u8],
        references: &ReferenceData,
    ) -> Result<ImportedData, ImportError> {
        AlipayCsvImporter::for_file_type(ImportFileType::AlipayWebCsv).parse_imported_data(
            ctx,
            data,
            references,
            &SimpleDataTableImporter,
        )
    }

    pub fn parse_alipay_canonical_table(
        ctx: &ImportContext,
        data: &[u8],
    ) -> Result<CanonicalTable, ImportError> {
        AlipayCsvImporter::for_file_type(ImportFileType::AlipayWebCsv).parse_canonical_table(ctx, data)
    }

    pub fn load_profile(toml_content: &str) -> Result<ImportProfile, ProfileError> {
        ImportProfile::from_toml(toml_content)
    }
}
