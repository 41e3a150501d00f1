// Couriers view: age and vehicle extremes, rating summaries and the
// fastest/slowest couriers of each city.
use crate::types::{
    CourierMetrics, CourierRatingRow, CourierTimeRow, DeliveryRecord, RatingStatsRow,
};
use crate::util::{average, sample_std};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// How many couriers each city contributes to a ranking.
pub const RANKING_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ranking {
    /// Lowest average delivery time first.
    Fastest,
    /// Highest average delivery time first.
    Slowest,
}

pub fn courier_metrics(data: &[DeliveryRecord]) -> CourierMetrics {
    let ages = data.iter().filter_map(|r| r.courier_age);
    let conditions = data.iter().filter_map(|r| r.vehicle_condition);
    CourierMetrics {
        oldest_age: ages.clone().max(),
        youngest_age: ages.min(),
        best_vehicle_condition: conditions.clone().max(),
        worst_vehicle_condition: conditions.min(),
    }
}

/// Mean rating per courier, best rated first.
/// Mean rating per courier, best first. A courier with no recorded rating
/// has no row.
pub fn avg_rating_per_courier(data: &[DeliveryRecord]) -> Vec<CourierRatingRow> {
    let mut map: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for r in data {
        if let Some(rating) = r.courier_rating {
            map.entry(r.courier_id.as_str()).or_default().push(rating);
        }
    }
    let mut rows: Vec<CourierRatingRow> = map
        .into_iter()
        .filter_map(|(courier, ratings)| {
            Some(CourierRatingRow {
                courier: courier.to_string(),
                avg_rating: average(&ratings)?,
            })
        })
        .collect();
    rows.sort_by(|a, b| b.avg_rating.partial_cmp(&a.avg_rating).unwrap_or(Ordering::Equal));
    rows
}

pub fn ratings_per_traffic(data: &[DeliveryRecord]) -> Vec<RatingStatsRow> {
    rating_stats_by(data, |r| r.traffic.as_deref())
}

pub fn ratings_per_weather(data: &[DeliveryRecord]) -> Vec<RatingStatsRow> {
    rating_stats_by(data, |r| r.weather.as_deref())
}

fn rating_stats_by<F>(data: &[DeliveryRecord], key: F) -> Vec<RatingStatsRow>
where
    F: Fn(&DeliveryRecord) -> Option<&str>,
{
    let mut map: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for r in data {
        if let (Some(category), Some(rating)) = (key(r), r.courier_rating) {
            map.entry(category).or_default().push(rating);
        }
    }
    map.into_iter()
        .filter_map(|(category, ratings)| {
            Some(RatingStatsRow {
                category: category.to_string(),
                mean_rating: average(&ratings)?,
                std_rating: sample_std(&ratings),
            })
        })
        .collect()
}

/// Top `RANKING_SIZE` couriers of every city by mean delivery time.
///
/// Rows come out grouped by city: ascending city names for `Fastest`,
/// descending for `Slowest`. Couriers with equal means keep courier id
/// order.
pub fn top_couriers(data: &[DeliveryRecord], ranking: Ranking) -> Vec<CourierTimeRow> {
    let mut map: BTreeMap<(&str, &str), Vec<f64>> = BTreeMap::new();
    for r in data {
        if let Some(city) = r.city.as_deref() {
            map.entry((city, r.courier_id.as_str()))
                .or_default()
                .push(f64::from(r.time_taken_min));
        }
    }
    let mut means: Vec<CourierTimeRow> = map
        .into_iter()
        .filter_map(|((city, courier), times)| {
            Some(CourierTimeRow {
                city: city.to_string(),
                courier: courier.to_string(),
                avg_time: average(&times)?,
            })
        })
        .collect();

    // `sort_by` is stable, so ties stay in courier id order.
    means.sort_by(|a, b| {
        let ord = a
            .city
            .cmp(&b.city)
            .then_with(|| a.avg_time.partial_cmp(&b.avg_time).unwrap_or(Ordering::Equal));
        match ranking {
            Ranking::Fastest => ord,
            Ranking::Slowest => ord.reverse(),
        }
    });

    let mut taken: BTreeMap<String, usize> = BTreeMap::new();
    means
        .into_iter()
        .filter(|row| {
            let n = taken.entry(row.city.clone()).or_default();
            *n += 1;
            *n <= RANKING_SIZE
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::tests::record;

    fn delivery(city: Option<&str>, courier: &str, minutes: u32) -> DeliveryRecord {
        let mut r = record((2022, 3, 10), Some("Low"));
        r.city = city.map(str::to_string);
        r.courier_id = courier.to_string();
        r.time_taken_min = minutes;
        r
    }

    fn rated(traffic: Option<&str>, weather: Option<&str>, rating: Option<f64>) -> DeliveryRecord {
        let mut r = record((2022, 3, 10), traffic);
        r.weather = weather.map(str::to_string);
        r.courier_rating = rating;
        r
    }

    #[test]
    fn fastest_courier_per_city() {
        let data = vec![delivery(Some("A"), "X", 20), delivery(Some("A"), "Y", 10)];
        let rows = top_couriers(&data, Ranking::Fastest);
        assert_eq!(rows[0].city, "A");
        assert_eq!(rows[0].courier, "Y");
        assert_eq!(rows[0].avg_time, 10.0);
        let rows = top_couriers(&data, Ranking::Slowest);
        assert_eq!(rows[0].courier, "X");
    }

    #[test]
    fn rankings_cap_each_city_and_order_cities() {
        let mut data = Vec::new();
        for i in 0..12u32 {
            data.push(delivery(Some("Metropolitian"), &format!("M{i:02}"), 10 + i));
            data.push(delivery(Some("Urban"), &format!("U{i:02}"), 30 + i));
        }
        data.push(delivery(None, "Z", 1));

        let fastest = top_couriers(&data, Ranking::Fastest);
        assert_eq!(fastest.len(), 2 * RANKING_SIZE);
        assert!(fastest[..RANKING_SIZE].iter().all(|r| r.city == "Metropolitian"));
        assert_eq!(fastest[0].courier, "M00");
        assert_eq!(fastest[RANKING_SIZE - 1].courier, "M09");
        assert_eq!(fastest[RANKING_SIZE].courier, "U00");
        assert!(fastest.iter().all(|r| r.courier != "Z"));

        let slowest = top_couriers(&data, Ranking::Slowest);
        assert_eq!(slowest.len(), 2 * RANKING_SIZE);
        assert_eq!(slowest[0].city, "Urban");
        assert_eq!(slowest[0].courier, "U11");
        assert_eq!(slowest[RANKING_SIZE].courier, "M11");
        assert_eq!(slowest[RANKING_SIZE].avg_time, 21.0);
    }

    #[test]
    fn ties_keep_courier_order() {
        let data = vec![
            delivery(Some("A"), "C", 15),
            delivery(Some("A"), "B", 15),
            delivery(Some("A"), "A", 15),
        ];
        let couriers = |ranking| {
            top_couriers(&data, ranking)
                .into_iter()
                .map(|r| r.courier)
                .collect::<Vec<_>>()
        };
        assert_eq!(couriers(Ranking::Fastest), vec!["A", "B", "C"]);
        assert_eq!(couriers(Ranking::Slowest), vec!["A", "B", "C"]);
    }

    #[test]
    fn courier_means_average_their_orders() {
        let data = vec![
            delivery(Some("A"), "X", 10),
            delivery(Some("A"), "X", 30),
            delivery(Some("B"), "X", 40),
        ];
        let rows = top_couriers(&data, Ranking::Fastest);
        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].city.as_str(), rows[0].avg_time), ("A", 20.0));
        assert_eq!((rows[1].city.as_str(), rows[1].avg_time), ("B", 40.0));
    }

    #[test]
    fn ratings_per_traffic_mean_and_std() {
        let data = vec![
            rated(Some("Low"), None, Some(4.0)),
            rated(Some("Low"), None, Some(5.0)),
            rated(None, None, Some(1.0)),
            rated(Some("Jam"), None, Some(3.0)),
        ];
        let rows = ratings_per_traffic(&data);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].category, "Jam");
        assert_eq!(rows[0].std_rating, None);
        assert_eq!(rows[1].category, "Low");
        assert_eq!(rows[1].mean_rating, 4.5);
        let std = rows[1].std_rating.unwrap();
        assert!((std - 0.5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn ratings_per_weather_skip_missing() {
        let data = vec![
            rated(Some("Low"), Some("Sunny"), Some(4.0)),
            rated(Some("Low"), None, Some(2.0)),
            rated(Some("Low"), Some("Fog"), None),
        ];
        let rows = ratings_per_weather(&data);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].category, "Sunny");
        assert_eq!(rows[0].mean_rating, 4.0);
        assert!(ratings_per_weather(&[]).is_empty());
    }

    #[test]
    fn rating_per_courier_best_first() {
        let mut a = rated(Some("Low"), None, Some(4.0));
        a.courier_id = "A".to_string();
        let mut b = rated(Some("Low"), None, Some(5.0));
        b.courier_id = "B".to_string();
        let mut b2 = b.clone();
        b2.courier_rating = Some(4.6);
        let rows = avg_rating_per_courier(&[a, b, b2]);
        assert_eq!(rows[0].courier, "B");
        assert!((rows[0].avg_rating - 4.8).abs() < 1e-12);
        assert_eq!(rows[1].courier, "A");
    }

    #[test]
    fn unrated_courier_has_no_rating_row() {
        let mut rated_once = rated(Some("Low"), None, Some(4.0));
        rated_once.courier_id = "A".to_string();
        let mut partly = rated(Some("Low"), None, None);
        partly.courier_id = "A".to_string();
        let mut never = rated(Some("Low"), None, None);
        never.courier_id = "Z".to_string();
        let rows = avg_rating_per_courier(&[rated_once, partly, never]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].courier, "A");
        assert_eq!(rows[0].avg_rating, 4.0);
    }

    #[test]
    fn metrics_ignore_missing_values() {
        let mut young = record((2022, 3, 10), Some("Low"));
        young.courier_age = Some(20);
        young.vehicle_condition = Some(0);
        let mut old = young.clone();
        old.courier_age = Some(39);
        old.vehicle_condition = Some(2);
        let mut unknown = young.clone();
        unknown.courier_age = None;
        unknown.vehicle_condition = None;
        let m = courier_metrics(&[young, old, unknown]);
        assert_eq!(m.oldest_age, Some(39));
        assert_eq!(m.youngest_age, Some(20));
        assert_eq!(m.best_vehicle_condition, Some(2));
        assert_eq!(m.worst_vehicle_condition, Some(0));
        assert_eq!(courier_metrics(&[]), CourierMetrics::default());
    }
}
