use crate::statistics::{SalesImportError, StatisticsError, TaxonomyImportError};
use crate::telemetry::TelemetryError;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Sales(SalesImportError),
    Taxonomy(TaxonomyImportError),
    Statistics(StatisticsError),
}

impl AppError {
    /// Process exit code for the failure, mirroring the data-load error codes
    /// consumers of the report script already watch for.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Sales(_) => 100,
            AppError::Taxonomy(_) => 101,
            AppError::Telemetry(_) | AppError::Io(_) | AppError::Statistics(_) => 1,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Sales(err) => write!(f, "property sales error: {}", err),
            AppError::Taxonomy(err) => write!(f, "street tree survey error: {}", err),
            AppError::Statistics(err) => write!(f, "statistics error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Sales(err) => Some(err),
            AppError::Taxonomy(err) => Some(err),
            AppError::Statistics(err) => Some(err),
        }
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<SalesImportError> for AppError {
    fn from(value: SalesImportError) -> Self {
        Self::Sales(value)
    }
}

impl From<TaxonomyImportError> for AppError {
    fn from(value: TaxonomyImportError) -> Self {
        Self::Taxonomy(value)
    }
}

impl From<StatisticsError> for AppError {
    fn from(value: StatisticsError) -> Self {
        Self::Statistics(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loader_failures_map_to_dedicated_exit_codes() {
        let sales: AppError = SalesImportError::Io(std::io::Error::other("gone")).into();
        assert_eq!(sales.exit_code(), 100);

        let taxonomy: AppError = TaxonomyImportError::Empty.into();
        assert_eq!(taxonomy.exit_code(), 101);

        let statistics: AppError = StatisticsError::TaxonomyNotAMapping.into();
        assert_eq!(statistics.exit_code(), 1);
    }
}
