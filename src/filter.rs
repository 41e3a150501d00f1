// Filter stage: the date cutoff and traffic selection every view applies
// before aggregating.
use crate::types::DeliveryRecord;
use crate::util::MISSING;
use chrono::NaiveDate;
use std::collections::BTreeSet;
use tracing::debug;

/// Explicit filter inputs for one render.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterParams {
    /// Keep orders placed on or before this date.
    pub until: NaiveDate,
    /// Accepted traffic densities. Rows with missing traffic match only when
    /// the set holds the `NaN` sentinel.
    pub traffic: BTreeSet<String>,
}

impl FilterParams {
    /// Defaults that keep everything with a known traffic density: cutoff at
    /// the latest order date and every observed category selected.
    ///
    /// Returns `None` for an empty dataset.
    pub fn defaults_for(data: &[DeliveryRecord]) -> Option<Self> {
        let (_, last) = date_bounds(data)?;
        Some(FilterParams {
            until: last,
            traffic: traffic_options(data),
        })
    }

    /// Explicit choices override the defaults; an empty `traffic` list means
    /// "all categories".
    pub fn resolve(
        data: &[DeliveryRecord],
        until: Option<NaiveDate>,
        traffic: &[String],
    ) -> Self {
        let defaults = Self::defaults_for(data);
        let until = until
            .or_else(|| defaults.as_ref().map(|d| d.until))
            .unwrap_or(NaiveDate::MAX);
        let traffic = if traffic.is_empty() {
            defaults.map(|d| d.traffic).unwrap_or_default()
        } else {
            traffic.iter().map(|t| t.trim().to_string()).collect()
        };
        FilterParams { until, traffic }
    }

    pub fn accepts(&self, record: &DeliveryRecord) -> bool {
        let traffic = record.traffic.as_deref().unwrap_or(MISSING);
        record.order_date <= self.until && self.traffic.contains(traffic)
    }
}

/// Earliest and latest order date.
pub fn date_bounds(data: &[DeliveryRecord]) -> Option<(NaiveDate, NaiveDate)> {
    let first = data.iter().map(|r| r.order_date).min()?;
    let last = data.iter().map(|r| r.order_date).max()?;
    Some((first, last))
}

/// Distinct traffic densities present in the data, sentinel excluded.
pub fn traffic_options(data: &[DeliveryRecord]) -> BTreeSet<String> {
    data.iter().filter_map(|r| r.traffic.clone()).collect()
}

/// Rows accepted by `params`, in their original order. The input is left
/// untouched.
pub fn apply(data: &[DeliveryRecord], params: &FilterParams) -> Vec<DeliveryRecord> {
    let kept: Vec<DeliveryRecord> = data.iter().filter(|r| params.accepts(r)).cloned().collect();
    debug!(
        input = data.len(),
        kept = kept.len(),
        until = %params.until,
        traffic = ?params.traffic,
        "filter applied"
    );
    kept
}
