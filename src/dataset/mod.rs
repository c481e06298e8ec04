use crate::config::SiteConfig;
use crate::error::Result;
use crate::extract::EsgRecord;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

/// One row of the input fund list. Extra columns in the CSV are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct FundRow {
    pub ticker: String,
    #[serde(deserialize_with = "lenient_bool")]
    pub not_index: bool,
}

/// One row of the augmented output table: the input columns, the page
/// link, and every ESG field as its own column (empty cell = null).
#[derive(Debug, Serialize)]
pub struct OutputRow {
    pub ticker: String,
    pub not_index: bool,
    pub link: String,
    pub sustainability_rating: Option<u8>,
    pub global_category_count: Option<i64>,
    pub sustainable_investment: Option<String>,
    pub hist_sustainability_score: Option<f64>,
    pub current_sus_score: Option<f64>,
    pub hist_avg: Option<f64>,
    pub environmental_rating: Option<f64>,
    pub social_rating: Option<f64>,
    pub governance_rating: Option<f64>,
    pub unallocated_rating: Option<f64>,
    pub carbon_current: Option<f64>,
    pub carbon_low: Option<f64>,
    pub carbon_high: Option<f64>,
    pub carbon_average: Option<f64>,
    pub fossil_current: Option<f64>,
    pub fossil_low: Option<f64>,
    pub fossil_high: Option<f64>,
    pub fossil_avg: Option<f64>,
}

impl OutputRow {
    pub fn new(fund: FundRow, link: String, record: EsgRecord) -> Self {
        Self {
            ticker: fund.ticker,
            not_index: fund.not_index,
            link,
            sustainability_rating: record.sustainability_rating,
            global_category_count: record.global_category_count,
            sustainable_investment: record.sustainable_investment,
            hist_sustainability_score: record.hist_sustainability_score,
            current_sus_score: record.current_sus_score,
            hist_avg: record.hist_avg,
            environmental_rating: record.environmental_rating,
            social_rating: record.social_rating,
            governance_rating: record.governance_rating,
            unallocated_rating: record.unallocated_rating,
            carbon_current: record.carbon_current,
            carbon_low: record.carbon_low,
            carbon_high: record.carbon_high,
            carbon_average: record.carbon_average,
            fossil_current: record.fossil_current,
            fossil_low: record.fossil_low,
            fossil_high: record.fossil_high,
            fossil_avg: record.fossil_avg,
        }
    }
}

// Fund lists come out of pandas/R exports, so the flag arrives as any of
// True/FALSE/1/0/yes/no.
fn lenient_bool<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "t" | "yes" => Ok(true),
        "0" | "false" | "f" | "no" | "" => Ok(false),
        other => Err(D::Error::custom(format!("invalid boolean flag {other:?}"))),
    }
}

pub fn read_funds(path: &Path) -> Result<Vec<FundRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut funds = Vec::new();
    for row in reader.deserialize() {
        funds.push(row?);
    }

    Ok(funds)
}

/// Full snapshot write, used for both checkpoints and the final output.
pub fn write_rows(path: &Path, rows: &[OutputRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Builds the portfolio page URL for a fund. Index funds live under a
/// different exchange path than regular funds.
pub fn portfolio_url(site: &SiteConfig, fund: &FundRow) -> String {
    let template = if fund.not_index {
        &site.fund_url_template
    } else {
        &site.etf_url_template
    };

    template.replace("{ticker}", &fund.ticker.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fund(ticker: &str, not_index: bool) -> FundRow {
        FundRow {
            ticker: ticker.to_string(),
            not_index,
        }
    }

    #[test]
    fn reads_pandas_style_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("funds.csv");
        std::fs::write(
            &path,
            ",ticker,not_index\n0,VTSAX,True\n1,SPY,FALSE\n2,VOO,0\n3,FXAIX,1\n",
        )
        .unwrap();

        let funds = read_funds(&path).unwrap();
        assert_eq!(funds.len(), 4);
        assert_eq!(funds[0].ticker, "VTSAX");
        assert!(funds[0].not_index);
        assert!(!funds[1].not_index);
        assert!(!funds[2].not_index);
        assert!(funds[3].not_index);
    }

    #[test]
    fn bad_flag_is_a_row_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("funds.csv");
        std::fs::write(&path, "ticker,not_index\nVTSAX,maybe\n").unwrap();

        assert!(read_funds(&path).is_err());
    }

    #[test]
    fn url_template_picked_by_index_flag() {
        let site = SiteConfig::default();

        assert_eq!(
            portfolio_url(&site, &fund("VTSAX", true)),
            "https://www.morningstar.com/funds/xnas/vtsax/portfolio"
        );
        assert_eq!(
            portfolio_url(&site, &fund("SPY", false)),
            "https://www.morningstar.com/etfs/arcx/spy/portfolio"
        );
    }

    #[test]
    fn snapshot_write_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let record = EsgRecord {
            sustainability_rating: Some(4),
            global_category_count: Some(143),
            sustainable_investment: Some("no".to_string()),
            environmental_rating: Some(4.5),
            ..EsgRecord::default()
        };
        let rows = vec![
            OutputRow::new(fund("VTSAX", true), "http://x/vtsax".to_string(), record),
            OutputRow::new(
                fund("SPY", false),
                "http://x/spy".to_string(),
                EsgRecord::default(),
            ),
        ];
        write_rows(&path, &rows).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "ticker");
        assert_eq!(&headers[3], "sustainability_rating");

        let records: Vec<csv::StringRecord> =
            reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(&records[0][0], "VTSAX");
        assert_eq!(&records[0][3], "4");
        assert_eq!(&records[0][5], "no");
        // Null fields serialize as empty cells
        assert_eq!(&records[1][3], "");
        assert_eq!(&records[1][5], "");
    }
}
