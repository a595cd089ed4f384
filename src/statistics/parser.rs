use super::SaleRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::io::Read;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum SalesImportError {
    #[error("failed to read property sales export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid property sales CSV data: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum TaxonomyImportError {
    #[error("failed to read street tree survey: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid street tree JSON data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("street tree survey parsed to an empty data set")]
    Empty,
}

pub fn sales_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<SaleRecord>, SalesImportError> {
    let file = std::fs::File::open(path)?;
    Ok(parse_sales(file)?)
}

/// Parses a property sales CSV export into raw sale records.
///
/// Missing columns and blank cells both surface as `None`; validation of the
/// values is deferred to aggregation so that one bad row never aborts the
/// batch.
pub fn parse_sales<R: Read>(reader: R) -> Result<Vec<SaleRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for row in csv_reader.deserialize::<SaleRow>() {
        records.push(row?.into_record());
    }

    Ok(records)
}

pub fn street_trees_from_path<P: AsRef<Path>>(path: P) -> Result<Value, TaxonomyImportError> {
    let file = std::fs::File::open(path)?;
    let survey: Value = serde_json::from_reader(std::io::BufReader::new(file))?;

    if is_empty_survey(&survey) {
        return Err(TaxonomyImportError::Empty);
    }

    Ok(survey)
}

fn is_empty_survey(survey: &Value) -> bool {
    match survey {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(text) => text.is_empty(),
        _ => false,
    }
}

#[derive(Debug, Deserialize)]
struct SaleRow {
    #[serde(
        rename = "Street Name",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    street_name: Option<String>,
    #[serde(rename = "Price", default, deserialize_with = "empty_string_as_none")]
    price: Option<String>,
    #[serde(rename = "Address", default, deserialize_with = "empty_string_as_none")]
    address: Option<String>,
    #[serde(
        rename = "Date of Sale (dd/mm/yyyy)",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    date_of_sale: Option<String>,
}

impl SaleRow {
    fn into_record(self) -> SaleRecord {
        let date_of_sale = self.date_of_sale.as_deref().and_then(parse_sale_date);

        SaleRecord {
            street_name: self.street_name,
            price: self.price,
            address: self.address,
            date_of_sale,
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_sale_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%d/%m/%Y").ok()
}

#[cfg(test)]
pub(crate) fn parse_sale_date_for_tests(value: &str) -> Option<NaiveDate> {
    parse_sale_date(value)
}
