use crate::error::{EsgError, Result};
use crate::fetcher::RawText;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

mod record;

pub use record::EsgRecord;

// All patterns are prefix matches against a single page element, case
// folded because the site is inconsistent about capitalization. The score
// sentences are matched as one combined pattern each so that stray numeric
// text elsewhere on the page cannot be mistaken for a score.
static GLOBE_RATING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^Rating ([0-5]) Out of 5").unwrap());
static SUSTAINABLE_INVESTMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^(no|yes)").unwrap());
static SUSTAINABILITY_SCORE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^Historical score ([0-9]{1,2}\.[0-9]{1,2}) Out of Fifty, Current Score ([0-9]{1,2}\.[0-9]{1,2}) Out of Fifty, Historical Average ([0-9]{1,2}\.[0-9]{1,2}) Out of Fifty",
    )
    .unwrap()
});
static ENVIRONMENTAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^Environmental ([0-9]{1,2}\.[0-9]{1,2})").unwrap());
static SOCIAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^Social ([0-9]{1,2}\.[0-9]{1,2})").unwrap());
static GOVERNANCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^Governance ([0-9]{1,2}\.[0-9]{1,2})").unwrap());
static UNALLOCATED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^Unallocated ([0-9]{1,2}\.[0-9]{1,2})").unwrap());
// The fund's own carbon/fossil score is missing for some funds while the
// category aggregates are still present, hence the optional first capture.
static CARBON_RISK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^Carbon Risk Score, ([0-9]{1,2}\.[0-9]{1,2})? ?Out Of Hundred\. Carbon Risk Score Category Low, ([0-9]{1,2}\.[0-9]{1,2}) Out Of Hundred\. Carbon Risk Score Category High, ([0-9]{1,3}\.[0-9]{1,2}) Out Of Hundred\. Carbon Risk Score Category Average, ([0-9]{1,2}\.[0-9]{1,2}) Out Of Hundred\.",
    )
    .unwrap()
});
static FOSSIL_FUEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^Fossil Fuel Involvement %, ([0-9]{1,2}\.[0-9]{1,2})? ?Out Of Hundred\. Fossil Fuel Involvement % Category Low, ([0-9]{1,2}\.[0-9]{1,2}) Out Of Hundred\. Fossil Fuel Involvement % Category High, ([0-9]{1,3}\.[0-9]{1,2}) Out Of Hundred\. Fossil Fuel Involvement % Category Average, ([0-9]{1,2}\.[0-9]{1,2}) Out Of Hundred\.",
    )
    .unwrap()
});

/// Turns the two raw text lists of a fund page into an [`EsgRecord`].
///
/// `None` input (broken page) and pages without the globe-rating anchor
/// (fund exists but is unrated) both yield the all-null record. A page
/// that carries the anchor but whose located values fail to parse is a
/// per-record error, surfaced to the caller.
pub fn extract(raw: Option<&RawText>) -> Result<EsgRecord> {
    let mut record = EsgRecord::default();

    let Some(raw) = raw else {
        return Ok(record);
    };

    // Gate: without the globe rating the provider has not rated this fund,
    // and none of the other fields are trustworthy.
    let Some(caps) = first_match(&raw.screen_reader, &GLOBE_RATING) else {
        return Ok(record);
    };
    record.sustainability_rating = Some(num_group(&caps, 1)?);

    let (marker_idx, caps) = first_match_indexed(&raw.dp_values, &SUSTAINABLE_INVESTMENT)
        .ok_or_else(|| EsgError::Parse("sustainable-investment marker not found".to_string()))?;
    record.sustainable_investment = Some(caps[1].to_ascii_lowercase());
    record.global_category_count = Some(category_count_before(&raw.dp_values, marker_idx)?);

    if let Some(caps) = first_match(&raw.screen_reader, &SUSTAINABILITY_SCORE) {
        record.hist_sustainability_score = Some(num_group(&caps, 1)?);
        record.current_sus_score = Some(num_group(&caps, 2)?);
        record.hist_avg = Some(num_group(&caps, 3)?);
    }

    if let Some(caps) = first_match(&raw.screen_reader, &ENVIRONMENTAL) {
        record.environmental_rating = Some(num_group(&caps, 1)?);
    }
    if let Some(caps) = first_match(&raw.screen_reader, &SOCIAL) {
        record.social_rating = Some(num_group(&caps, 1)?);
    }
    if let Some(caps) = first_match(&raw.screen_reader, &GOVERNANCE) {
        record.governance_rating = Some(num_group(&caps, 1)?);
    }
    if let Some(caps) = first_match(&raw.screen_reader, &UNALLOCATED) {
        record.unallocated_rating = Some(num_group(&caps, 1)?);
    }

    if let Some(caps) = first_match(&raw.screen_reader, &CARBON_RISK) {
        record.carbon_current = opt_num_group(&caps, 1)?;
        record.carbon_low = Some(num_group(&caps, 2)?);
        record.carbon_high = Some(num_group(&caps, 3)?);
        record.carbon_average = Some(num_group(&caps, 4)?);
    }

    if let Some(caps) = first_match(&raw.screen_reader, &FOSSIL_FUEL) {
        record.fossil_current = opt_num_group(&caps, 1)?;
        record.fossil_low = Some(num_group(&caps, 2)?);
        record.fossil_high = Some(num_group(&caps, 3)?);
        record.fossil_avg = Some(num_group(&caps, 4)?);
    }

    Ok(record)
}

/// The integer sitting directly before the yes/no marker in the data-point
/// list. The page always renders the global category count there; the
/// lookup is positional, so it lives in one place.
pub fn category_count_before(items: &[String], marker_idx: usize) -> Result<i64> {
    let prev = marker_idx
        .checked_sub(1)
        .and_then(|i| items.get(i))
        .ok_or_else(|| {
            EsgError::Parse("no element before the sustainable-investment marker".to_string())
        })?;

    prev.trim()
        .parse()
        .map_err(|e| EsgError::Parse(format!("invalid category count {prev:?}: {e}")))
}

fn first_match<'a>(items: &'a [String], re: &Regex) -> Option<Captures<'a>> {
    items.iter().find_map(|s| re.captures(s))
}

fn first_match_indexed<'a>(items: &'a [String], re: &Regex) -> Option<(usize, Captures<'a>)> {
    items
        .iter()
        .enumerate()
        .find_map(|(i, s)| re.captures(s).map(|caps| (i, caps)))
}

fn num_group<T>(caps: &Captures<'_>, idx: usize) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let m = caps
        .get(idx)
        .ok_or_else(|| EsgError::Parse(format!("missing capture group {idx}")))?;

    m.as_str()
        .parse()
        .map_err(|e| EsgError::Parse(format!("invalid number {:?}: {e}", m.as_str())))
}

fn opt_num_group<T>(caps: &Captures<'_>, idx: usize) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    caps.get(idx)
        .map(|m| {
            m.as_str()
                .parse()
                .map_err(|e| EsgError::Parse(format!("invalid number {:?}: {e}", m.as_str())))
        })
        .transpose()
}
