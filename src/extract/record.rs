use serde::Serialize;

/// ESG fields extracted from one fund page. Every field is optional: a
/// fund the provider has not rated yields the default all-null record.
///
/// `sustainability_rating` is the anchor: when it is absent nothing else
/// is populated. Fields sharing a combined pattern populate together; the
/// exception is `carbon_current`/`fossil_current`, which the page omits
/// for some funds while still listing the category low/high/average.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EsgRecord {
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
