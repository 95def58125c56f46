use tally_core::{
    CanonicalTable, DataTableImporter, ImportContext, ImportedData, ReferenceData,
};

use crate::classify::{Classification, RowClassifier};
use crate::columns::ResolvedColumns;
use crate::decode::decoding_reader;
use crate::error::ImportError;
use crate::file_type::ImportFileType;
use crate::locale::{LocaleTextTable, OwnWalletNameResolver};
use crate::profile::ImportProfile;
use crate::scanner::{self, ScannedSections, SectionMarkers};

/// Importer for the Alipay transaction flow CSV export.
///
/// Single pass over one in-memory file: decode → scan sections → resolve
/// columns → classify rows → hand the canonical table to a
/// [`DataTableImporter`].
pub struct AlipayCsvImporter<W: OwnWalletNameResolver> {
    profile: ImportProfile,
    wallet_names: W,
}

impl AlipayCsvImporter<LocaleTextTable> {
    pub fn for_file_type(file_type: ImportFileType) -> Self {
        Self::new(file_type.default_profile(), LocaleTextTable::default())
    }
}

impl Default for AlipayCsvImporter<LocaleTextTable> {
    fn default() -> Self {
        Self::for_file_type(ImportFileType::AlipayWebCsv)
    }
}

impl<W: OwnWalletNameResolver> AlipayCsvImporter<W> {
    pub fn new(profile: ImportProfile, wallet_names: W) -> Self {
        Self {
            profile,
            wallet_names,
        }
    }

    pub fn profile(&self) -> &ImportProfile {
        &self.profile
    }

    /// Parses `data` into the canonical table without resolving names.
    pub fn parse_canonical_table(
        &self,
        ctx: &ImportContext,
        data: &[u8],
    ) -> Result<CanonicalTable, ImportError> {
        self.profile.validate()?;
        let encoding = self.profile.text_encoding()?;
        let markers = SectionMarkers {
            banner: &self.profile.banner,
            data_section_marker: &self.profile.data_section_marker,
            terminator: self.profile.terminator,
        };

        let sections = scanner::scan(decoding_reader(data, encoding), markers)?;

        if sections.record_count() < 2 {
            tracing::error!(
                "No transaction data in file ({} records in data section)",
                sections.record_count()
            );
            return Err(ImportError::NotFoundTransactionData);
        }
        let ScannedSections { header, rows } = sections;
        let header = header.unwrap_or_default();

        let columns = ResolvedColumns::resolve(&header, &self.profile.columns)?;
        let own_wallet_name = self.wallet_names.own_wallet_name(ctx.display_language());
        let classifier = RowClassifier::new(
            &columns,
            &self.profile.fund_direction_labels,
            &own_wallet_name,
        );

        let mut table = CanonicalTable::new();
        let mut skipped = 0usize;

        for (idx, row) in rows.iter().enumerate() {
            match classifier.classify(idx + 1, row)? {
                Classification::Keep(canonical) => table.add(canonical),
                Classification::SkipFundDirection(_) | Classification::SkipStatus(_) => {
                    skipped += 1
                }
            }
        }

        tracing::debug!(
            "Parsed {} of {} data rows ({} skipped)",
            table.len(),
            rows.len(),
            skipped
        );

        Ok(table)
    }

    /// Parses `data` and resolves it through `importer`. Nothing is returned
    /// unless every step succeeds.
    pub fn parse_imported_data<I: DataTableImporter>(
        &self,
        ctx: &ImportContext,
        data: &[u8],
        references: &ReferenceData,
        importer: &I,
    ) -> Result<ImportedData, ImportError> {
        let table = self.parse_canonical_table(ctx, data)?;
        let imported = importer.parse_imported_data(
            ctx,
            &table,
            &self.profile.fund_direction_labels,
            references,
        )?;
        Ok(imported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CsvSyntaxError;
    use crate::profile::ProfileError;
    use encoding_rs::GB18030;
    use tally_core::{
        Account, AccountId, CanonicalRow, DataTableError, SimpleDataTableImporter,
        TransactionType, TransactionTypeLabels,
    };

    const HEADER: &str = "交易号                  ,商家订单号               ,交易创建时间              ,付款时间                ,最近修改时间              ,交易来源地     ,类型              ,交易对方            ,商品名称                ,金额（元）   ,收/支     ,交易状态    ,服务费（元）   ,成功退款（元）  ,备注                  ,资金状态     ,";

    fn data_line(time: &str, counterparty: &str, product: &str, amount: &str, status: &str, fund: &str) -> String {
        format!(
            "2024011522001 ,M001 ,{time} ,{time} ,{time} ,其他 ,即时到账交易 ,{counterparty} ,{product} ,{amount} ,支出 ,{status} ,0.00 ,0.00 , ,{fund} ,"
        )
    }

    fn export(lines: &[String]) -> Vec<u8> {
        encode(&export_text(lines))
    }

    fn export_text(lines: &[String]) -> String {
        let mut text = String::from(
            "支付宝交易记录明细查询\n\
             账号:[user@example.com]\n\
             起始日期:[2024-01-01 00:00:00]    终止日期:[2024-02-01 00:00:00]\n\
             ---------------------------------交易记录明细列表------------------------------------\n",
        );
        text.push_str(HEADER);
        text.push('\n');
        for line in lines {
            text.push_str(line);
            text.push('\n');
        }
        text.push_str("------------------------------------------------------------------------------------\n");
        text.push_str(&format!("共{}笔记录\n", lines.len()));
        text
    }

    fn encode(text: &str) -> Vec<u8> {
        let (bytes, _, had_errors) = GB18030.encode(text);
        assert!(!had_errors);
        bytes.into_owned()
    }

    fn ctx() -> ImportContext {
        ImportContext::new("zh-Hans", "en", 480)
    }

    fn importer() -> AlipayCsvImporter<LocaleTextTable> {
        AlipayCsvImporter::default()
    }

    fn parse(data: &[u8]) -> Result<CanonicalTable, ImportError> {
        importer().parse_canonical_table(&ctx(), data)
    }

    fn sample_lines() -> Vec<String> {
        vec![
            data_line("2024-01-15 12:30:00", "咖啡店", "拿铁", "25.00", "交易成功", "已支出"),
            data_line("2024-01-16 09:00:00", "商店", "退货", "88.00", "退款成功", "已收入"),
            data_line("2024-01-17 10:00:00", "招商银行", "提现-银行卡", "100.00", "交易成功", "资金转移"),
            data_line("2024-01-18 11:00:00", "某人", "红包", "10.00", "交易成功", "已收入"),
        ]
    }

    // ── end to end ────────────────────────────────────────────────────────────

    #[test]
    fn parses_full_export() {
        let table = parse(&export(&sample_lines())).unwrap();
        assert_eq!(table.len(), 4);

        let rows = table.rows();
        assert_eq!(rows[0].transaction_type, "已支出");
        assert_eq!(rows[0].transaction_time, "2024-01-15 12:30:00");
        assert_eq!(rows[0].description, "拿铁");

        assert_eq!(rows[1].transaction_type, "已支出");
        assert_eq!(rows[1].amount, "-88.00");

        assert_eq!(rows[2].account_name, "支付宝");
        assert_eq!(rows[2].related_account_name, "招商银行");

        assert_eq!(rows[3].account_name, "支付宝");
    }

    #[test]
    fn emitted_types_are_fund_direction_labels() {
        let mut lines = sample_lines();
        lines.push(data_line("2024-01-19 11:00:00", "某人", "其他", "1.00", "交易成功", "无"));
        let table = parse(&export(&lines)).unwrap();
        let labels = ImportProfile::default().fund_direction_labels;
        assert!(table.len() <= lines.len());
        for row in table.rows() {
            assert!(labels.parse(&row.transaction_type).is_some());
        }
    }

    #[test]
    fn parsing_is_deterministic() {
        let data = export(&sample_lines());
        assert_eq!(parse(&data).unwrap(), parse(&data).unwrap());
    }

    #[test]
    fn own_wallet_name_follows_client_locale_when_user_language_unset() {
        let data = export(&sample_lines());
        let table = importer()
            .parse_canonical_table(&ImportContext::new("", "en-US", 0), &data)
            .unwrap();
        assert_eq!(table.rows()[2].account_name, "Alipay");
    }

    #[test]
    fn custom_wallet_resolver() {
        let importer = AlipayCsvImporter::new(ImportProfile::default(), |tag: &str| format!("W[{tag}]"));
        let table = importer
            .parse_canonical_table(&ctx(), &export(&sample_lines()))
            .unwrap();
        assert_eq!(table.rows()[3].account_name, "W[zh-Hans]");
    }

    // ── filtering ─────────────────────────────────────────────────────────────

    #[test]
    fn unsupported_status_row_is_omitted() {
        let mut lines = sample_lines();
        lines.insert(1, data_line("2024-01-15 13:00:00", "商店", "咖啡", "5.00", "交易中", "已支出"));
        let table = parse(&export(&lines)).unwrap();
        assert_eq!(table.len(), 4);
        assert!(table.rows().iter().all(|r| r.amount != "5.00"));
    }

    #[test]
    fn unsupported_fund_direction_row_is_omitted() {
        let mut lines = sample_lines();
        lines.push(data_line("2024-01-19 11:00:00", "某人", "其他", "7.00", "交易成功", "无"));
        let table = parse(&export(&lines)).unwrap();
        assert_eq!(table.len(), 4);
        assert!(table.rows().iter().all(|r| r.amount != "7.00"));
    }

    #[test]
    fn rows_after_terminator_are_ignored() {
        let mut text = String::from("支付宝交易记录明细查询\n交易记录明细列表\n");
        text.push_str(HEADER);
        text.push('\n');
        text.push_str(&data_line("2024-01-15 12:30:00", "咖啡店", "拿铁", "25.00", "交易成功", "已支出"));
        text.push_str("\n-----\n");
        text.push_str(&data_line("2024-01-16 12:30:00", "咖啡店", "拿铁", "26.00", "交易成功", "已支出"));
        text.push('\n');
        let table = parse(&encode(&text)).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].amount, "25.00");
    }

    #[test]
    fn utf8_export_with_bom_is_accepted() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(export_text(&sample_lines()).as_bytes());
        let table = parse(&bytes).unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table.rows()[0].description, "拿铁");
        assert_eq!(table.rows()[2].account_name, "支付宝");
    }

    // ── fatal errors ──────────────────────────────────────────────────────────

    #[test]
    fn bare_quote_in_amount_is_invalid_csv() {
        let mut lines = sample_lines();
        lines.push(data_line("2024-01-20 10:00:00", "商店", "咖啡", "1\"0.00", "交易成功", "已支出"));
        assert!(matches!(
            parse(&export(&lines)),
            Err(ImportError::InvalidCsvFile(CsvSyntaxError::BareQuote { .. }))
        ));
    }

    #[test]
    fn unterminated_quote_is_invalid_csv() {
        let mut lines = sample_lines();
        lines.push(data_line("2024-01-20 10:00:00", "商店", "咖啡", "\"20.00", "交易成功", "已支出"));
        assert!(matches!(
            parse(&export(&lines)),
            Err(ImportError::InvalidCsvFile(CsvSyntaxError::MisplacedQuote { .. }))
        ));
    }

    #[test]
    fn short_row_aborts_whole_import() {
        let mut lines = sample_lines();
        lines.push("2024011522009 ,M009 ,2024-01-20 10:00:00".to_string());
        assert!(matches!(
            parse(&export(&lines)),
            Err(ImportError::FewerFieldsInDataRowThanInHeaderRow { row: 5, .. })
        ));
    }

    #[test]
    fn missing_amount_column_is_fatal() {
        let mut text = String::from("支付宝交易记录明细查询\n交易记录明细列表\n");
        text.push_str("交易创建时间,交易状态,资金状态\n2024-01-15 12:30:00,交易成功,已支出\n");
        assert!(matches!(
            parse(&encode(&text)),
            Err(ImportError::MissingRequiredFieldInHeaderRow(ref name)) if name == "金额（元）"
        ));
    }

    #[test]
    fn missing_banner_is_fatal() {
        let text = format!("交易记录明细列表\n{HEADER}\n");
        assert!(matches!(
            parse(&encode(&text)),
            Err(ImportError::InvalidFileHeader)
        ));
    }

    #[test]
    fn header_without_data_is_not_found() {
        assert!(matches!(
            parse(&export(&[])),
            Err(ImportError::NotFoundTransactionData)
        ));
    }

    #[test]
    fn bad_profile_encoding_is_reported() {
        let profile = ImportProfile {
            encoding: "nope".to_string(),
            ..ImportProfile::default()
        };
        let importer = AlipayCsvImporter::new(profile, LocaleTextTable::default());
        assert!(matches!(
            importer.parse_canonical_table(&ctx(), b""),
            Err(ImportError::Profile(_))
        ));
    }

    #[test]
    fn profile_is_validated_before_parsing() {
        let profile = ImportProfile {
            banner: String::new(),
            ..ImportProfile::default()
        };
        let importer = AlipayCsvImporter::new(profile, LocaleTextTable::default());
        assert!(matches!(
            importer.parse_canonical_table(&ctx(), &export(&sample_lines())),
            Err(ImportError::Profile(ProfileError::EmptyField("banner")))
        ));
    }

    // ── handoff ───────────────────────────────────────────────────────────────

    #[test]
    fn hands_table_to_generic_importer() {
        let mut refs = ReferenceData::default();
        refs.accounts
            .insert("支付宝".into(), Account::existing(AccountId(1), "支付宝"));

        let data = importer()
            .parse_imported_data(&ctx(), &export(&sample_lines()), &refs, &SimpleDataTableImporter)
            .unwrap();

        assert_eq!(data.transactions.len(), 4);
        assert_eq!(data.transactions[1].transaction_type, TransactionType::Expense);
        assert_eq!(data.transactions[1].amount.to_cents(), Some(-8800));
        let withdrawal = &data.transactions[2];
        assert_eq!(withdrawal.transaction_type, TransactionType::Transfer);
        assert_eq!(withdrawal.account.as_ref().unwrap().id, Some(AccountId(1)));
        assert_eq!(data.new_accounts, vec![Account::new("招商银行")]);
    }

    struct Failing;

    impl DataTableImporter for Failing {
        fn parse_imported_data(
            &self,
            _ctx: &ImportContext,
            table: &CanonicalTable,
            _labels: &TransactionTypeLabels,
            _references: &ReferenceData,
        ) -> Result<ImportedData, DataTableError> {
            let row: &CanonicalRow = &table.rows()[0];
            Err(DataTableError::InvalidAmount {
                row: 1,
                value: row.amount.clone(),
            })
        }
    }

    #[test]
    fn downstream_failure_is_surfaced() {
        let result = importer().parse_imported_data(
            &ctx(),
            &export(&sample_lines()),
            &ReferenceData::default(),
            &Failing,
        );
        assert!(matches!(
            result,
            Err(ImportError::Downstream(DataTableError::InvalidAmount { row: 1, .. }))
        ));
    }
}
