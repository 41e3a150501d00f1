use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// One CSV row exactly as it appears in the delivery dataset. Every field is
/// text; `cleaner::clean_row` turns it into a `DeliveryRecord`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRow {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Delivery_person_ID")]
    pub courier_id: String,
    #[serde(rename = "Delivery_person_Age")]
    pub courier_age: String,
    #[serde(rename = "Delivery_person_Ratings")]
    pub courier_rating: String,
    #[serde(rename = "Restaurant_latitude")]
    pub restaurant_latitude: String,
    #[serde(rename = "Restaurant_longitude")]
    pub restaurant_longitude: String,
    #[serde(rename = "Delivery_location_latitude")]
    pub delivery_latitude: String,
    #[serde(rename = "Delivery_location_longitude")]
    pub delivery_longitude: String,
    #[serde(rename = "Order_Date")]
    pub order_date: String,
    #[serde(rename = "Weatherconditions")]
    pub weather: String,
    #[serde(rename = "Road_traffic_density")]
    pub traffic: String,
    #[serde(rename = "Vehicle_condition")]
    pub vehicle_condition: String,
    #[serde(rename = "Type_of_order")]
    pub order_type: String,
    #[serde(rename = "Type_of_vehicle")]
    pub vehicle_type: String,
    #[serde(rename = "multiple_deliveries")]
    pub multiple_deliveries: String,
    #[serde(rename = "Festival")]
    pub festival: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "Time_taken(min)")]
    pub time_taken: String,
}

/// Column names the loader insists on before reading any row.
pub const REQUIRED_COLUMNS: [&str; 18] = [
    "ID",
    "Delivery_person_ID",
    "Delivery_person_Age",
    "Delivery_person_Ratings",
    "Restaurant_latitude",
    "Restaurant_longitude",
    "Delivery_location_latitude",
    "Delivery_location_longitude",
    "Order_Date",
    "Weatherconditions",
    "Road_traffic_density",
    "Vehicle_condition",
    "Type_of_order",
    "Type_of_vehicle",
    "multiple_deliveries",
    "Festival",
    "City",
    "Time_taken(min)",
];

/// A cleaned delivery. Fields that held the `NaN` sentinel in the source
/// are `None` here.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryRecord {
    pub id: String,
    pub courier_id: String,
    pub courier_age: Option<u32>,
    pub courier_rating: Option<f64>,
    pub order_date: NaiveDate,
    pub traffic: Option<String>,
    pub vehicle_condition: Option<u32>,
    pub multiple_deliveries: Option<u32>,
    pub weather: Option<String>,
    pub order_type: Option<String>,
    pub vehicle_type: Option<String>,
    pub festival: Option<String>,
    pub city: Option<String>,
    pub restaurant_latitude: f64,
    pub restaurant_longitude: f64,
    pub delivery_latitude: f64,
    pub delivery_longitude: f64,
    pub time_taken_min: u32,
    pub distance_km: f64,
    pub week_of_year: u32,
}

// ---------------------------------------------------------------------------
// Company view
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct DateCountRow {
    #[serde(rename = "OrderDate")]
    #[tabled(rename = "OrderDate")]
    pub order_date: NaiveDate,
    #[serde(rename = "Orders")]
    #[tabled(rename = "Orders")]
    pub orders: usize,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct TrafficShareRow {
    #[serde(rename = "Traffic")]
    #[tabled(rename = "Traffic")]
    pub traffic: String,
    #[serde(rename = "Orders")]
    #[tabled(rename = "Orders")]
    pub orders: usize,
    #[serde(rename = "Share")]
    #[tabled(rename = "Share", display_with = "crate::util::display_f64")]
    pub share: f64,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
#[tabled(rename_all = "PascalCase")]
pub struct CityTrafficCountRow {
    pub city: String,
    pub traffic: String,
    pub orders: usize,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
#[tabled(rename_all = "PascalCase")]
pub struct WeekCountRow {
    pub week: u32,
    pub orders: usize,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
#[tabled(rename_all = "PascalCase")]
pub struct WeekCourierRow {
    pub week: u32,
    pub orders: usize,
    pub couriers: usize,
    #[tabled(display_with = "crate::util::display_opt_f64")]
    pub orders_per_courier: Option<f64>,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
#[tabled(rename_all = "PascalCase")]
pub struct CityTrafficCenterRow {
    pub city: String,
    pub traffic: String,
    #[tabled(display_with = "crate::util::display_f64")]
    pub latitude: f64,
    #[tabled(display_with = "crate::util::display_f64")]
    pub longitude: f64,
}

// ---------------------------------------------------------------------------
// Couriers view
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct CourierMetrics {
    pub oldest_age: Option<u32>,
    pub youngest_age: Option<u32>,
    pub best_vehicle_condition: Option<u32>,
    pub worst_vehicle_condition: Option<u32>,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
#[tabled(rename_all = "PascalCase")]
pub struct CourierRatingRow {
    pub courier: String,
    #[tabled(display_with = "crate::util::display_f64")]
    pub avg_rating: f64,
}

/// Mean and sample standard deviation of the courier rating for one
/// category (a traffic density or a weather condition).
#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
#[tabled(rename_all = "PascalCase")]
pub struct RatingStatsRow {
    pub category: String,
    #[tabled(display_with = "crate::util::display_f64")]
    pub mean_rating: f64,
    #[tabled(display_with = "crate::util::display_opt_f64")]
    pub std_rating: Option<f64>,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
#[tabled(rename_all = "PascalCase")]
pub struct CourierTimeRow {
    pub city: String,
    pub courier: String,
    #[tabled(display_with = "crate::util::display_f64")]
    pub avg_time: f64,
}

// ---------------------------------------------------------------------------
// Restaurants view
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
#[tabled(rename_all = "PascalCase")]
pub struct CityStatsRow {
    pub city: String,
    #[tabled(display_with = "crate::util::display_f64")]
    pub avg_time: f64,
    #[tabled(display_with = "crate::util::display_opt_f64")]
    pub std_time: Option<f64>,
    #[tabled(display_with = "crate::util::display_f64")]
    pub avg_distance: f64,
    #[tabled(display_with = "crate::util::display_opt_f64")]
    pub std_distance: Option<f64>,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
#[tabled(rename_all = "PascalCase")]
pub struct CityTrafficStatsRow {
    pub city: String,
    pub traffic: String,
    #[tabled(display_with = "crate::util::display_f64")]
    pub avg_time: f64,
    #[tabled(display_with = "crate::util::display_opt_f64")]
    pub std_time: Option<f64>,
    #[tabled(display_with = "crate::util::display_f64")]
    pub avg_distance: f64,
    #[tabled(display_with = "crate::util::display_opt_f64")]
    pub std_distance: Option<f64>,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
#[tabled(rename_all = "PascalCase")]
pub struct CityOrderStatsRow {
    pub city: String,
    pub order_type: String,
    #[tabled(display_with = "crate::util::display_f64")]
    pub avg_time: f64,
    #[tabled(display_with = "crate::util::display_opt_f64")]
    pub std_time: Option<f64>,
    #[tabled(display_with = "crate::util::display_f64")]
    pub avg_distance: f64,
    #[tabled(display_with = "crate::util::display_opt_f64")]
    pub std_distance: Option<f64>,
}

/// Hierarchical (city, traffic) chart: slices sized by average time and
/// coloured by standard deviation around `color_midpoint`.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct SunburstChart {
    pub rows: Vec<CityTrafficStatsRow>,
    pub color_midpoint: Option<f64>,
}

#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct RestaurantMetrics {
    pub couriers: usize,
    pub avg_distance: Option<f64>,
    pub festival_avg_time: Option<f64>,
    pub festival_std_time: Option<f64>,
    pub regular_avg_time: Option<f64>,
    pub regular_std_time: Option<f64>,
    pub festival_avg_distance: Option<f64>,
    pub festival_std_distance: Option<f64>,
    pub regular_avg_distance: Option<f64>,
    pub regular_std_distance: Option<f64>,
}
