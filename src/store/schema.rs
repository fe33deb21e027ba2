//! Observation schema and the fixed metric catalog.
//!
//! One `Observation` is one fact row of the dataset: year, region,
//! metric, optional sector/creditor dimensions, and a value.
//! The metric catalog is closed and fixed at compile time; there are
//! no runtime additions.

use crate::utils::error::RequestError;

/// The five tracked indicators
///
/// **Public** - used throughout the pipeline as the metric dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    /// State budget income (billions of UZS)
    Income,

    /// State budget expenditure (billions of UZS)
    Expense,

    /// Gross Regional Product (billions of UZS)
    Grp,

    /// Gross Regional Product per capita (thousands of UZS)
    GrpPerCapita,

    /// Public debt (millions of USD)
    Debt,
}

impl Metric {
    /// All metrics, in catalog order
    pub const ALL: [Metric; 5] = [
        Metric::Income,
        Metric::Expense,
        Metric::Grp,
        Metric::GrpPerCapita,
        Metric::Debt,
    ];

    /// Short code used on the CLI and in output documents
    pub fn code(&self) -> &'static str {
        match self {
            Metric::Income => "income",
            Metric::Expense => "expense",
            Metric::Grp => "grp",
            Metric::GrpPerCapita => "grp_pc",
            Metric::Debt => "debt",
        }
    }

    /// Exact label string used in the Metric column of the dataset
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Income => "State budget income",
            Metric::Expense => "State budget expenditure",
            Metric::Grp => "Gross Regional Product",
            Metric::GrpPerCapita => "Gross Regional Product per Capita",
            Metric::Debt => "Public Debt",
        }
    }

    /// Resolve a short code (e.g. from a CLI flag)
    ///
    /// # Errors
    /// * `RequestError::UnknownMetric` - code is not in the catalog
    pub fn from_code(code: &str) -> Result<Metric, RequestError> {
        Metric::ALL
            .iter()
            .copied()
            .find(|m| m.code() == code)
            .ok_or_else(|| RequestError::UnknownMetric(code.to_string()))
    }

    /// Resolve a dataset label string, if it names a known metric
    pub fn from_label(label: &str) -> Option<Metric> {
        Metric::ALL.iter().copied().find(|m| m.label() == label)
    }
}

/// One fact row of the loaded dataset
///
/// Invariant: `year` and `metric` are always present (the loader
/// drops rows where they are not). `value` may be absent; sums treat
/// it as 0 and means exclude it entirely.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub year: i32,
    pub region: Option<String>,
    pub metric: Metric,
    pub sector: Option<String>,
    pub creditor: Option<String>,
    pub value: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_label_round_trip() {
        for metric in Metric::ALL {
            assert_eq!(Metric::from_code(metric.code()).unwrap(), metric);
            assert_eq!(Metric::from_label(metric.label()), Some(metric));
        }
    }

    #[test]
    fn test_unknown_code_is_invalid_request() {
        let err = Metric::from_code("gdp").unwrap_err();
        assert!(matches!(err, RequestError::UnknownMetric(code) if code == "gdp"));
    }

    #[test]
    fn test_unknown_label_is_none() {
        assert_eq!(Metric::from_label("Consumer Price Index"), None);
    }
}
