// Company view: order volumes by day, traffic, city and week, plus the
// geographic centre of each (city, traffic) pair.
use crate::types::{
    CityTrafficCenterRow, CityTrafficCountRow, DateCountRow, DeliveryRecord, TrafficShareRow,
    WeekCountRow, WeekCourierRow,
};
use crate::util::median;
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashSet};
use tracing::warn;

/// Orders per calendar date, ascending by date.
pub fn orders_by_date(data: &[DeliveryRecord]) -> Vec<DateCountRow> {
    let mut map: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for r in data {
        *map.entry(r.order_date).or_default() += 1;
    }
    map.into_iter()
        .map(|(order_date, orders)| DateCountRow { order_date, orders })
        .collect()
}

/// Orders per traffic density with each density's share of the total.
pub fn orders_by_traffic(data: &[DeliveryRecord]) -> Vec<TrafficShareRow> {
    let mut map: BTreeMap<&str, usize> = BTreeMap::new();
    for r in data {
        if let Some(t) = r.traffic.as_deref() {
            *map.entry(t).or_default() += 1;
        }
    }
    let total: usize = map.values().sum();
    map.into_iter()
        .map(|(traffic, orders)| TrafficShareRow {
            traffic: traffic.to_string(),
            orders,
            share: orders as f64 / total as f64,
        })
        .collect()
}

pub fn orders_by_traffic_city(data: &[DeliveryRecord]) -> Vec<CityTrafficCountRow> {
    let mut map: BTreeMap<(&str, &str), usize> = BTreeMap::new();
    for r in data {
        if let (Some(city), Some(traffic)) = (r.city.as_deref(), r.traffic.as_deref()) {
            *map.entry((city, traffic)).or_default() += 1;
        }
    }
    map.into_iter()
        .map(|((city, traffic), orders)| CityTrafficCountRow {
            city: city.to_string(),
            traffic: traffic.to_string(),
            orders,
        })
        .collect()
}

pub fn orders_by_week(data: &[DeliveryRecord]) -> Vec<WeekCountRow> {
    let mut map: BTreeMap<u32, usize> = BTreeMap::new();
    for r in data {
        *map.entry(r.week_of_year).or_default() += 1;
    }
    map.into_iter()
        .map(|(week, orders)| WeekCountRow { week, orders })
        .collect()
}

/// Average orders handled per active courier in each week.
///
/// A week whose orders carry no courier id reports `None` instead of
/// dividing by zero.
pub fn orders_per_courier_by_week(data: &[DeliveryRecord]) -> Vec<WeekCourierRow> {
    #[derive(Default)]
    struct Acc<'a> {
        orders: usize,
        couriers: HashSet<&'a str>,
    }
    let mut map: BTreeMap<u32, Acc> = BTreeMap::new();
    for r in data {
        let e = map.entry(r.week_of_year).or_default();
        e.orders += 1;
        if !r.courier_id.is_empty() {
            e.couriers.insert(r.courier_id.as_str());
        }
    }
    map.into_iter()
        .map(|(week, acc)| {
            let couriers = acc.couriers.len();
            let orders_per_courier = if couriers == 0 {
                warn!(week, orders = acc.orders, "week has orders but no couriers");
                None
            } else {
                Some(acc.orders as f64 / couriers as f64)
            };
            WeekCourierRow {
                week,
                orders: acc.orders,
                couriers,
                orders_per_courier,
            }
        })
        .collect()
}

/// Median delivery location of each (city, traffic) pair, one map marker
/// per row.
pub fn geographic_centers(data: &[DeliveryRecord]) -> Vec<CityTrafficCenterRow> {
    let mut map: BTreeMap<(&str, &str), (Vec<f64>, Vec<f64>)> = BTreeMap::new();
    for r in data {
        if let (Some(city), Some(traffic)) = (r.city.as_deref(), r.traffic.as_deref()) {
            let e = map.entry((city, traffic)).or_default();
            e.0.push(r.delivery_latitude);
            e.1.push(r.delivery_longitude);
        }
    }
    map.into_iter()
        .filter_map(|((city, traffic), (lats, lons))| {
            Some(CityTrafficCenterRow {
                city: city.to_string(),
                traffic: traffic.to_string(),
                latitude: median(lats)?,
                longitude: median(lons)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::tests::record;

    fn at(
        date: (i32, u32, u32),
        traffic: Option<&str>,
        city: Option<&str>,
        courier: &str,
    ) -> DeliveryRecord {
        let mut r = record(date, traffic);
        r.city = city.map(str::to_string);
        r.courier_id = courier.to_string();
        r
    }

    #[test]
    fn orders_by_date_counts_ascending() {
        let data = vec![
            at((2022, 3, 12), Some("Low"), Some("Urban"), "A"),
            at((2022, 3, 10), Some("Low"), Some("Urban"), "A"),
            at((2022, 3, 12), Some("Jam"), Some("Urban"), "B"),
        ];
        let rows = orders_by_date(&data);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].order_date, NaiveDate::from_ymd_opt(2022, 3, 10).unwrap());
        assert_eq!(rows[0].orders, 1);
        assert_eq!(rows[1].orders, 2);
    }

    #[test]
    fn traffic_counts_and_shares() {
        let data = vec![
            at((2022, 3, 10), Some("Low"), Some("Urban"), "A"),
            at((2022, 3, 10), Some("Low"), Some("Urban"), "B"),
            at((2022, 3, 10), Some("Jam"), Some("Urban"), "C"),
            at((2022, 3, 10), None, Some("Urban"), "D"),
        ];
        let rows = orders_by_traffic(&data);
        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].traffic.as_str(), rows[0].orders), ("Jam", 1));
        assert_eq!((rows[1].traffic.as_str(), rows[1].orders), ("Low", 2));
        let total_share: f64 = rows.iter().map(|r| r.share).sum();
        assert!((total_share - 1.0).abs() < 1e-12);
        assert!(orders_by_traffic(&[]).is_empty());
    }

    #[test]
    fn city_traffic_excludes_sentinels() {
        let data = vec![
            at((2022, 3, 10), Some("Low"), Some("Urban"), "A"),
            at((2022, 3, 10), Some("Low"), None, "B"),
            at((2022, 3, 10), None, Some("Urban"), "C"),
            at((2022, 3, 10), Some("Low"), Some("Urban"), "D"),
        ];
        let rows = orders_by_traffic_city(&data);
        assert_eq!(
            rows,
            vec![CityTrafficCountRow {
                city: "Urban".to_string(),
                traffic: "Low".to_string(),
                orders: 2,
            }]
        );
    }

    #[test]
    fn weekly_orders_per_courier() {
        // 2022-03-13 (Sun) and 2022-03-19 (Sat) share week 11; 2022-03-20 is week 12.
        let data = vec![
            at((2022, 3, 13), Some("Low"), Some("Urban"), "A"),
            at((2022, 3, 19), Some("Low"), Some("Urban"), "A"),
            at((2022, 3, 19), Some("Low"), Some("Urban"), "B"),
            at((2022, 3, 20), Some("Low"), Some("Urban"), "C"),
        ];
        let weeks = orders_by_week(&data);
        assert_eq!(
            weeks,
            vec![
                WeekCountRow { week: 11, orders: 3 },
                WeekCountRow { week: 12, orders: 1 },
            ]
        );
        let per_courier = orders_per_courier_by_week(&data);
        assert_eq!(per_courier[0].couriers, 2);
        assert_eq!(per_courier[0].orders_per_courier, Some(1.5));
        assert_eq!(per_courier[1].orders_per_courier, Some(1.0));
    }

    #[test]
    fn week_without_couriers_is_undefined() {
        let data = vec![at((2022, 3, 13), Some("Low"), Some("Urban"), "")];
        let rows = orders_per_courier_by_week(&data);
        assert_eq!(rows[0].orders, 1);
        assert_eq!(rows[0].couriers, 0);
        assert_eq!(rows[0].orders_per_courier, None);
    }

    #[test]
    fn centers_are_medians_per_pair() {
        let mut data = Vec::new();
        for (lat, lon) in [(10.0, 70.0), (12.0, 74.0), (11.0, 71.0)] {
            let mut r = at((2022, 3, 10), Some("Jam"), Some("Urban"), "A");
            r.delivery_latitude = lat;
            r.delivery_longitude = lon;
            data.push(r);
        }
        let rows = geographic_centers(&data);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].latitude, 11.0);
        assert_eq!(rows[0].longitude, 71.0);
    }
}
