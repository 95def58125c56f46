/// Looks up the display name of the provider's own wallet account.
///
/// Implementations must be pure: the importer may call this any number of
/// times per file.
pub trait OwnWalletNameResolver {
    fn own_wallet_name(&self, language_tag: &str) -> String;
}

impl<F> OwnWalletNameResolver for F
where
    F: Fn(&str) -> String,
{
    fn own_wallet_name(&self, language_tag: &str) -> String {
        self(language_tag)
    }
}

#[derive(Debug, Clone)]
pub struct LanguageText {
    pub tag: String,
    pub aliases: Vec<String>,
    pub own_wallet_name: String,
}

impl LanguageText {
    pub fn new(tag: &str, aliases: &[&str], own_wallet_name: &str) -> Self {
        Self {
            tag: tag.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
            own_wallet_name: own_wallet_name.to_string(),
        }
    }

    fn answers_to(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag) || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(tag))
    }
}

/// Language-keyed text table with fallback to a default language.
#[derive(Debug, Clone)]
pub struct LocaleTextTable {
    default_language: String,
    languages: Vec<LanguageText>,
}

impl Default for LocaleTextTable {
    fn default() -> Self {
        Self::new(
            "en",
            vec![
                LanguageText::new("en", &["en-US", "en-GB"], "Alipay"),
                LanguageText::new("zh-Hans", &["zh-CN", "zh-SG", "zh"], "支付宝"),
                LanguageText::new("zh-Hant", &["zh-TW", "zh-HK", "zh-MO"], "支付寶"),
            ],
        )
    }
}

impl LocaleTextTable {
    pub fn new(default_language: &str, languages: Vec<LanguageText>) -> Self {
        Self {
            default_language: default_language.to_string(),
            languages,
        }
    }

    /// Finds the entry for `tag`: exact tag or alias, then `language-script`,
    /// then bare `language`, then the default language.
    pub fn resolve(&self, tag: &str) -> Option<&LanguageText> {
        let tag = tag.trim();
        if !tag.is_empty() {
            if let Some(found) = self.find(tag) {
                return Some(found);
            }
            let parts: Vec<&str> = tag.split('-').collect();
            if parts.len() > 2 {
                if let Some(found) = self.find(&format!("{}-{}", parts[0], parts[1])) {
                    return Some(found);
                }
            }
            if parts.len() > 1 {
                if let Some(found) = self.find(parts[0]) {
                    return Some(found);
                }
            }
        }
        self.find(&self.default_language)
    }

    fn find(&self, tag: &str) -> Option<&LanguageText> {
        self.languages.iter().find(|l| l.answers_to(tag))
    }
}

impl OwnWalletNameResolver for LocaleTextTable {
    fn own_wallet_name(&self, language_tag: &str) -> String {
        self.resolve(language_tag)
            .map(|l| l.own_wallet_name.clone())
            .unwrap_or_default()
    }
}
