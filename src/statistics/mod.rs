mod diagnostics;
mod normalizer;
mod parser;
mod taxonomy;

pub use diagnostics::{DiagnosticSink, RejectReason, TracingDiagnostics};
pub use parser::{
    parse_sales, sales_from_path, street_trees_from_path, SalesImportError, TaxonomyImportError,
};
pub use taxonomy::StreetTreeIndex;

use chrono::NaiveDate;
use normalizer::normalize_street;
use serde_json::Value;
use std::sync::Arc;

/// One raw row of the property sales export.
///
/// Fields stay optional and prices stay textual until aggregation time; a
/// record with missing or malformed data is rejected per category request
/// rather than at parse time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaleRecord {
    pub street_name: Option<String>,
    pub price: Option<String>,
    pub address: Option<String>,
    pub date_of_sale: Option<NaiveDate>,
}

#[derive(Debug, thiserror::Error)]
pub enum StatisticsError {
    #[error("street tree survey must be a JSON object keyed by tree category")]
    TaxonomyNotAMapping,
}

/// Average sale price statistics joined against the street tree survey.
///
/// The nested survey is flattened exactly once at construction; the resulting
/// index is immutable for the lifetime of the instance, so a shared instance
/// can serve category queries from several threads without coordination.
pub struct PropertyValueStatistics {
    property_sales: Vec<SaleRecord>,
    street_trees: StreetTreeIndex,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl std::fmt::Debug for PropertyValueStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyValueStatistics")
            .field("property_sales", &self.property_sales)
            .field("street_trees", &self.street_trees)
            .finish_non_exhaustive()
    }
}

impl PropertyValueStatistics {
    pub fn new(
        property_sales: Vec<SaleRecord>,
        street_trees: &Value,
    ) -> Result<Self, StatisticsError> {
        Self::with_diagnostics(property_sales, street_trees, Arc::new(TracingDiagnostics))
    }

    pub fn with_diagnostics(
        property_sales: Vec<SaleRecord>,
        street_trees: &Value,
        diagnostics: Arc<dyn DiagnosticSink>,
    ) -> Result<Self, StatisticsError> {
        let categories = street_trees
            .as_object()
            .ok_or(StatisticsError::TaxonomyNotAMapping)?;

        Ok(Self {
            property_sales,
            street_trees: StreetTreeIndex::from_categories(categories),
            diagnostics,
        })
    }

    pub fn street_trees(&self) -> &StreetTreeIndex {
        &self.street_trees
    }

    /// Average sale price across records on streets carrying `category`
    /// trees, rounded to two fraction digits. Exactly 0.0 when no record
    /// matches.
    ///
    /// Records missing a required field, with a blank street name, an
    /// unparsable price, or a street absent from the survey are skipped with
    /// a diagnostic; they contribute to neither sum nor count.
    pub fn average_price_for_category(&self, category: &str) -> f64 {
        let mut total_price = 0.0;
        let mut property_count = 0u64;

        for record in &self.property_sales {
            let (street_name, price) = match validate_record(record, &self.street_trees) {
                Ok(validated) => validated,
                Err(reason) => {
                    self.diagnostics.record_rejected(record, &reason);
                    continue;
                }
            };

            if self.street_trees.has_category(&street_name, category) {
                total_price += price;
                property_count += 1;
            }
        }

        if property_count == 0 {
            0.0
        } else {
            round_currency(total_price / property_count as f64)
        }
    }

    /// Average price for properties on streets with tall trees.
    pub fn average_price_tall_trees(&self) -> f64 {
        self.average_price_for_category("tall")
    }

    /// Average price for properties on streets with short trees.
    pub fn average_price_short_trees(&self) -> f64 {
        self.average_price_for_category("short")
    }
}

fn validate_record(
    record: &SaleRecord,
    street_trees: &StreetTreeIndex,
) -> Result<(String, f64), RejectReason> {
    let street_name = record
        .street_name
        .as_deref()
        .ok_or(RejectReason::MissingStreetName)?;
    let raw_price = record.price.as_deref().ok_or(RejectReason::MissingPrice)?;

    let street_name = normalize_street(street_name);
    if street_name.is_empty() {
        return Err(RejectReason::BlankStreetName);
    }

    let price = raw_price
        .replace(',', "")
        .trim()
        .parse::<f64>()
        .map_err(|_| RejectReason::UnparsablePrice(raw_price.to_string()))?;

    if !street_trees.contains_street(&street_name) {
        return Err(RejectReason::UnknownStreet(street_name));
    }

    Ok((street_name, price))
}

fn round_currency(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Cursor;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingDiagnostics {
        rejections: Mutex<Vec<RejectReason>>,
    }

    impl RecordingDiagnostics {
        fn reasons(&self) -> Vec<RejectReason> {
            self.rejections.lock().expect("diagnostics mutex").clone()
        }
    }

    impl DiagnosticSink for RecordingDiagnostics {
        fn record_rejected(&self, _record: &SaleRecord, reason: &RejectReason) {
            self.rejections
                .lock()
                .expect("diagnostics mutex")
                .push(reason.clone());
        }
    }

    fn sale(street_name: &str, price: &str) -> SaleRecord {
        SaleRecord {
            street_name: Some(street_name.to_string()),
            price: Some(price.to_string()),
            ..SaleRecord::default()
        }
    }

    fn reference_survey() -> Value {
        json!({
            "short": {
                "park": {
                    "the": { "the park": 2 },
                    "ventry": { "ventry park": 3 },
                },
            },
            "tall": {
                "road": { "cambridge": { "cambridge road": 24 } },
                "park": { "ventry park": 17 },
            },
        })
    }

    fn reference_sales() -> Vec<SaleRecord> {
        vec![
            sale("The Park", "79,500.00"),
            sale("Cambridge Road", "120,000.00"),
            sale("Ventry Park", "150,000.00"),
        ]
    }

    #[test]
    fn computes_reference_averages() {
        let stats = PropertyValueStatistics::new(reference_sales(), &reference_survey())
            .expect("statistics build");

        assert_eq!(stats.average_price_tall_trees(), 135_000.00);
        assert_eq!(stats.average_price_short_trees(), 114_750.00);
    }

    #[test]
    fn category_primitive_accepts_arbitrary_labels() {
        let survey = json!({ "ornamental": { "ventry park": 4 } });
        let stats =
            PropertyValueStatistics::new(vec![sale("ventry park", "80,000")], &survey)
                .expect("statistics build");

        assert_eq!(stats.average_price_for_category("ornamental"), 80_000.00);
    }

    #[test]
    fn category_with_no_matches_yields_zero() {
        let stats = PropertyValueStatistics::new(reference_sales(), &reference_survey())
            .expect("statistics build");

        assert_eq!(stats.average_price_for_category("petrified"), 0.0);
    }

    #[test]
    fn averages_round_to_two_fraction_digits() {
        let survey = json!({ "tall": { "cambridge road": 24 } });
        let sales = vec![
            sale("cambridge road", "50.00"),
            sale("cambridge road", "25.00"),
            sale("cambridge road", "25.00"),
        ];
        let stats = PropertyValueStatistics::new(sales, &survey).expect("statistics build");

        // 100 / 3 = 33.333... -> 33.33
        assert_eq!(stats.average_price_for_category("tall"), 33.33);
    }

    #[test]
    fn rejected_records_contribute_to_neither_sum_nor_count() {
        let diagnostics = Arc::new(RecordingDiagnostics::default());
        let sales = vec![
            sale("cambridge road", "100,000.00"),
            sale("cambridge road", "twelve"),
            sale("", "50,000.00"),
            sale("unknown lane", "50,000.00"),
            SaleRecord {
                price: Some("50,000.00".to_string()),
                ..SaleRecord::default()
            },
            SaleRecord {
                street_name: Some("cambridge road".to_string()),
                ..SaleRecord::default()
            },
        ];
        let stats = PropertyValueStatistics::with_diagnostics(
            sales,
            &reference_survey(),
            diagnostics.clone(),
        )
        .expect("statistics build");

        assert_eq!(stats.average_price_for_category("tall"), 100_000.00);
        assert_eq!(
            diagnostics.reasons(),
            vec![
                RejectReason::UnparsablePrice("twelve".to_string()),
                RejectReason::BlankStreetName,
                RejectReason::UnknownStreet("unknown lane".to_string()),
                RejectReason::MissingStreetName,
                RejectReason::MissingPrice,
            ]
        );
    }

    #[test]
    fn record_on_street_without_requested_category_is_not_a_rejection() {
        let diagnostics = Arc::new(RecordingDiagnostics::default());
        let stats = PropertyValueStatistics::with_diagnostics(
            vec![sale("the park", "79,500.00")],
            &reference_survey(),
            diagnostics.clone(),
        )
        .expect("statistics build");

        assert_eq!(stats.average_price_for_category("tall"), 0.0);
        assert!(diagnostics.reasons().is_empty());
    }

    #[test]
    fn street_matching_is_case_fold_only() {
        let survey = json!({ "tall": { "cambridge road": 24 } });
        let sales = vec![
            sale("CAMBRIDGE ROAD", "100.00"),
            // Interior punctuation differences are preserved, so this street
            // does not match.
            sale("cambridge, road", "900.00"),
        ];
        let diagnostics = Arc::new(RecordingDiagnostics::default());
        let stats = PropertyValueStatistics::with_diagnostics(sales, &survey, diagnostics.clone())
            .expect("statistics build");

        assert_eq!(stats.average_price_for_category("tall"), 100.00);
        assert_eq!(
            diagnostics.reasons(),
            vec![RejectReason::UnknownStreet("cambridge, road".to_string())]
        );
    }

    #[test]
    fn construction_rejects_non_mapping_survey() {
        let error = PropertyValueStatistics::new(Vec::new(), &json!(["tall", "short"]))
            .expect_err("expected construction failure");
        assert!(matches!(error, StatisticsError::TaxonomyNotAMapping));
    }

    #[test]
    fn empty_survey_object_builds_an_empty_index() {
        let stats =
            PropertyValueStatistics::new(reference_sales(), &json!({})).expect("statistics build");
        assert!(stats.street_trees().is_empty());
        assert_eq!(stats.average_price_tall_trees(), 0.0);
    }

    #[test]
    fn parse_sales_surfaces_blank_cells_as_none() {
        let records = parse_sales(Cursor::new(
            "Date of Sale (dd/mm/yyyy),Address,Street Name,Price\n\
             01/01/2015,\"APT 274, THE PARKLANDS\",the park,\"79,500.00\"\n\
             02/03/2016,123 ADELAIDE ROAD,,\n",
        ))
        .expect("csv parses");

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].street_name.as_deref(), Some("the park"));
        assert_eq!(records[0].price.as_deref(), Some("79,500.00"));
        assert_eq!(
            records[0].date_of_sale,
            NaiveDate::from_ymd_opt(2015, 1, 1)
        );
        assert_eq!(records[1].street_name, None);
        assert_eq!(records[1].price, None);
    }

    #[test]
    fn parse_sales_tolerates_missing_columns() {
        let records = parse_sales(Cursor::new("Street Name\nthe park\n")).expect("csv parses");
        assert_eq!(records[0].street_name.as_deref(), Some("the park"));
        assert_eq!(records[0].price, None);
        assert_eq!(records[0].address, None);
    }

    #[test]
    fn sale_dates_parse_day_first() {
        assert_eq!(
            parser::parse_sale_date_for_tests("25/12/2014"),
            NaiveDate::from_ymd_opt(2014, 12, 25)
        );
        assert_eq!(parser::parse_sale_date_for_tests("2014-12-25"), None);
        assert_eq!(parser::parse_sale_date_for_tests("not-a-date"), None);
    }

    #[test]
    fn normalize_lowers_case_and_keeps_punctuation() {
        assert_eq!(
            normalizer::normalize_for_tests("St. Patrick's ROAD"),
            "st. patrick's road"
        );
    }

    #[test]
    fn reject_reasons_render_human_readable_diagnostics() {
        assert_eq!(
            RejectReason::UnknownStreet("ventry park".to_string()).to_string(),
            "street 'ventry park' not found in street tree data"
        );
        assert_eq!(
            RejectReason::UnparsablePrice("n/a".to_string()).to_string(),
            "price 'n/a' is not a valid decimal number"
        );
    }
}
