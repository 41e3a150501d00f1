// Record cleaning: one raw CSV row in, one typed `DeliveryRecord` out.
//
// Every view consumes the output of `clean`, so this is the only place that
// knows about sentinels, padded text and the free-text time column.
use crate::error::{ReportError, ReportResult};
use crate::types::{DeliveryRecord, RawRow};
use crate::util::{
    haversine_km, optional_text, parse_date_dmy, parse_f64, parse_minutes, parse_optional,
    week_of_year_sunday, MISSING,
};
use tracing::debug;

/// Weather values arrive as `conditions Sunny`, `conditions NaN`, ...
const WEATHER_PREFIX: &str = "conditions ";

/// Clean a whole dataset. Row count is preserved; the first malformed value
/// aborts the load.
pub fn clean(rows: &[RawRow]) -> ReportResult<Vec<DeliveryRecord>> {
    let records = rows
        .iter()
        .enumerate()
        // Line 1 is the header.
        .map(|(idx, raw)| clean_row(raw, idx + 2))
        .collect::<ReportResult<Vec<_>>>()?;
    debug!(rows = records.len(), "cleaned dataset");
    Ok(records)
}

pub fn clean_row(raw: &RawRow, line: usize) -> ReportResult<DeliveryRecord> {
    let courier_age = parse_optional::<u32>(&raw.courier_age)
        .map_err(|e| ReportError::parse(line, "Delivery_person_Age", &raw.courier_age, e))?;

    let courier_rating = parse_optional::<f64>(&raw.courier_rating)
        .and_then(|v| match v {
            Some(r) if !r.is_finite() => Err("rating must be finite".to_string()),
            other => Ok(other),
        })
        .map_err(|e| ReportError::parse(line, "Delivery_person_Ratings", &raw.courier_rating, e))?;

    let order_date = parse_date_dmy(&raw.order_date)
        .map_err(|e| ReportError::parse(line, "Order_Date", &raw.order_date, e))?;

    let multiple_deliveries = parse_optional::<u32>(&raw.multiple_deliveries).map_err(|e| {
        ReportError::parse(line, "multiple_deliveries", &raw.multiple_deliveries, e)
    })?;

    let vehicle_condition = parse_optional::<u32>(&raw.vehicle_condition)
        .map_err(|e| ReportError::parse(line, "Vehicle_condition", &raw.vehicle_condition, e))?;

    let time_taken_min = parse_minutes(&raw.time_taken)
        .map_err(|e| ReportError::parse(line, "Time_taken(min)", &raw.time_taken, e))?;

    let coordinate = |column: &'static str, value: &str| -> ReportResult<f64> {
        let v = parse_f64(value).map_err(|e| ReportError::parse(line, column, value, e))?;
        if !v.is_finite() {
            return Err(ReportError::parse(line, column, value, "coordinate must be finite"));
        }
        // Sign is dropped, range is not checked.
        Ok(v.abs())
    };
    let restaurant_latitude = coordinate("Restaurant_latitude", &raw.restaurant_latitude)?;
    let restaurant_longitude = coordinate("Restaurant_longitude", &raw.restaurant_longitude)?;
    let delivery_latitude = coordinate("Delivery_location_latitude", &raw.delivery_latitude)?;
    let delivery_longitude = coordinate("Delivery_location_longitude", &raw.delivery_longitude)?;

    let distance_km = haversine_km(
        (delivery_latitude, delivery_longitude),
        (restaurant_latitude, restaurant_longitude),
    );

    Ok(DeliveryRecord {
        id: raw.id.trim().to_string(),
        courier_id: raw.courier_id.trim().to_string(),
        courier_age,
        courier_rating,
        order_date,
        traffic: optional_text(&raw.traffic),
        vehicle_condition,
        multiple_deliveries,
        weather: clean_weather(&raw.weather),
        order_type: optional_text(&raw.order_type),
        vehicle_type: optional_text(&raw.vehicle_type),
        festival: optional_text(&raw.festival),
        city: optional_text(&raw.city),
        restaurant_latitude,
        restaurant_longitude,
        delivery_latitude,
        delivery_longitude,
        time_taken_min,
        distance_km,
        week_of_year: week_of_year_sunday(order_date),
    })
}

fn clean_weather(s: &str) -> Option<String> {
    let s = s.trim();
    let s = s.strip_prefix(WEATHER_PREFIX).unwrap_or(s);
    if s.trim() == MISSING {
        return None;
    }
    optional_text(s)
}
