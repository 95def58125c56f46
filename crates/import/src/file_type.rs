use crate::profile::ImportProfile;

/// Provider export formats this crate can import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFileType {
    AlipayWebCsv,
}

const ALL_FILE_TYPES: &[ImportFileType] = &[ImportFileType::AlipayWebCsv];

impl ImportFileType {
    pub fn all() -> &'static [ImportFileType] {
        ALL_FILE_TYPES
    }

    pub fn from_key(key: &str) -> Option<Self> {
        ALL_FILE_TYPES.iter().find(|t| t.key() == key).copied()
    }

    pub fn key(&self) -> &'static str {
        match self {
            Self::AlipayWebCsv => "alipay_web_csv",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::AlipayWebCsv => "Alipay (Web) Transaction Flow File",
        }
    }

    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::AlipayWebCsv => &[".csv"],
        }
    }

    /// Language the provider writes its labels in.
    pub fn source_language(&self) -> &'static str {
        match self {
            Self::AlipayWebCsv => "zh-Hans",
        }
    }

    pub fn default_profile(&self) -> ImportProfile {
        match self {
            Self::AlipayWebCsv => ImportProfile::default(),
        }
    }
}
