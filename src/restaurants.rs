// Restaurants view: delivery time and distance statistics by city,
// traffic, order type and festival flag.
use crate::types::{
    CityOrderStatsRow, CityStatsRow, CityTrafficStatsRow, DeliveryRecord, RestaurantMetrics,
    SunburstChart,
};
use crate::util::{average, round_to, sample_std};
use std::collections::{BTreeMap, HashSet};

/// Which festival aggregate `festival_stat` reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FestivalStat {
    AvgTime,
    StdTime,
    AvgDistance,
    StdDistance,
}

/// Time and distance samples of one group.
#[derive(Default)]
struct Samples {
    times: Vec<f64>,
    distances: Vec<f64>,
}

impl Samples {
    fn push(&mut self, r: &DeliveryRecord) {
        self.times.push(f64::from(r.time_taken_min));
        self.distances.push(r.distance_km);
    }

    fn summary(&self) -> Option<Summary> {
        Some(Summary {
            avg_time: average(&self.times)?,
            std_time: sample_std(&self.times),
            avg_distance: average(&self.distances)?,
            std_distance: sample_std(&self.distances),
        })
    }
}

struct Summary {
    avg_time: f64,
    std_time: Option<f64>,
    avg_distance: f64,
    std_distance: Option<f64>,
}

impl Summary {
    fn get(&self, stat: FestivalStat) -> Option<f64> {
        match stat {
            FestivalStat::AvgTime => Some(self.avg_time),
            FestivalStat::StdTime => self.std_time,
            FestivalStat::AvgDistance => Some(self.avg_distance),
            FestivalStat::StdDistance => self.std_distance,
        }
    }
}

pub fn restaurant_metrics(data: &[DeliveryRecord]) -> RestaurantMetrics {
    let couriers: HashSet<&str> = data
        .iter()
        .map(|r| r.courier_id.as_str())
        .filter(|c| !c.is_empty())
        .collect();
    let distances: Vec<f64> = data.iter().map(|r| r.distance_km).collect();
    RestaurantMetrics {
        couriers: couriers.len(),
        avg_distance: average(&distances).map(|d| round_to(d, 3)),
        festival_avg_time: festival_stat(data, "Yes", FestivalStat::AvgTime),
        festival_std_time: festival_stat(data, "Yes", FestivalStat::StdTime),
        regular_avg_time: festival_stat(data, "No", FestivalStat::AvgTime),
        regular_std_time: festival_stat(data, "No", FestivalStat::StdTime),
        festival_avg_distance: festival_stat(data, "Yes", FestivalStat::AvgDistance),
        festival_std_distance: festival_stat(data, "Yes", FestivalStat::StdDistance),
        regular_avg_distance: festival_stat(data, "No", FestivalStat::AvgDistance),
        regular_std_distance: festival_stat(data, "No", FestivalStat::StdDistance),
    }
}

/// One aggregate of the deliveries whose festival flag equals `festival`,
/// rounded to 3 decimals. `None` when no delivery matches or the statistic
/// is undefined for the group.
pub fn festival_stat(data: &[DeliveryRecord], festival: &str, stat: FestivalStat) -> Option<f64> {
    let mut samples = Samples::default();
    for r in data.iter().filter(|r| r.festival.as_deref() == Some(festival)) {
        samples.push(r);
    }
    samples.summary()?.get(stat).map(|v| round_to(v, 3))
}

/// Time and distance statistics per city (bar chart with error bars and
/// the distance pie).
pub fn stats_by_city(data: &[DeliveryRecord]) -> Vec<CityStatsRow> {
    let mut map: BTreeMap<&str, Samples> = BTreeMap::new();
    for r in data {
        if let Some(city) = r.city.as_deref() {
            map.entry(city).or_default().push(r);
        }
    }
    map.into_iter()
        .filter_map(|(city, samples)| {
            let s = samples.summary()?;
            Some(CityStatsRow {
                city: city.to_string(),
                avg_time: s.avg_time,
                std_time: s.std_time,
                avg_distance: s.avg_distance,
                std_distance: s.std_distance,
            })
        })
        .collect()
}

pub fn stats_by_city_traffic(data: &[DeliveryRecord]) -> Vec<CityTrafficStatsRow> {
    let mut map: BTreeMap<(&str, &str), Samples> = BTreeMap::new();
    for r in data {
        if let (Some(city), Some(traffic)) = (r.city.as_deref(), r.traffic.as_deref()) {
            map.entry((city, traffic)).or_default().push(r);
        }
    }
    map.into_iter()
        .filter_map(|((city, traffic), samples)| {
            let s = samples.summary()?;
            Some(CityTrafficStatsRow {
                city: city.to_string(),
                traffic: traffic.to_string(),
                avg_time: s.avg_time,
                std_time: s.std_time,
                avg_distance: s.avg_distance,
                std_distance: s.std_distance,
            })
        })
        .collect()
}

pub fn stats_by_city_order_type(data: &[DeliveryRecord]) -> Vec<CityOrderStatsRow> {
    let mut map: BTreeMap<(&str, &str), Samples> = BTreeMap::new();
    for r in data {
        if let (Some(city), Some(order_type)) = (r.city.as_deref(), r.order_type.as_deref()) {
            map.entry((city, order_type)).or_default().push(r);
        }
    }
    map.into_iter()
        .filter_map(|((city, order_type), samples)| {
            let s = samples.summary()?;
            Some(CityOrderStatsRow {
                city: city.to_string(),
                order_type: order_type.to_string(),
                avg_time: s.avg_time,
                std_time: s.std_time,
                avg_distance: s.avg_distance,
                std_distance: s.std_distance,
            })
        })
        .collect()
}

/// City then traffic hierarchy weighted by average time. The colour scale
/// is centred on the mean of the groups' time standard deviations.
pub fn time_sunburst(data: &[DeliveryRecord]) -> SunburstChart {
    let rows = stats_by_city_traffic(data);
    let stds: Vec<f64> = rows.iter().filter_map(|r| r.std_time).collect();
    SunburstChart {
        color_midpoint: average(&stds),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::tests::record;

    fn delivery(
        city: Option<&str>,
        traffic: Option<&str>,
        festival: &str,
        minutes: u32,
        km: f64,
    ) -> DeliveryRecord {
        let mut r = record((2022, 3, 10), traffic);
        r.city = city.map(str::to_string);
        r.festival = Some(festival.to_string());
        r.time_taken_min = minutes;
        r.distance_km = km;
        r
    }

    #[test]
    fn festival_lookups_round_to_three_places() {
        let data = vec![
            delivery(Some("Urban"), Some("Low"), "Yes", 40, 10.0),
            delivery(Some("Urban"), Some("Low"), "Yes", 45, 12.0),
            delivery(Some("Urban"), Some("Low"), "Yes", 44, 11.0),
            delivery(Some("Urban"), Some("Low"), "No", 20, 3.0),
        ];
        assert_eq!(festival_stat(&data, "Yes", FestivalStat::AvgTime), Some(43.0));
        // std of [40, 45, 44] = sqrt(7) = 2.6457...
        assert_eq!(festival_stat(&data, "Yes", FestivalStat::StdTime), Some(2.646));
        assert_eq!(festival_stat(&data, "Yes", FestivalStat::AvgDistance), Some(11.0));
        assert_eq!(festival_stat(&data, "Yes", FestivalStat::StdDistance), Some(1.0));
        assert_eq!(festival_stat(&data, "No", FestivalStat::AvgTime), Some(20.0));
        assert_eq!(festival_stat(&data, "No", FestivalStat::StdTime), None);
        assert_eq!(festival_stat(&[], "Yes", FestivalStat::AvgTime), None);
    }

    #[test]
    fn metrics_summarise_the_view() {
        let mut data = vec![
            delivery(Some("Urban"), Some("Low"), "Yes", 40, 1.0),
            delivery(Some("Urban"), Some("Low"), "No", 20, 2.0),
            delivery(Some("Urban"), Some("Low"), "No", 30, 2.5),
        ];
        data[1].courier_id = "OTHER".to_string();
        let m = restaurant_metrics(&data);
        assert_eq!(m.couriers, 2);
        assert_eq!(m.avg_distance, Some(1.833));
        assert_eq!(m.festival_avg_time, Some(40.0));
        assert_eq!(m.festival_std_time, None);
        assert_eq!(m.regular_avg_time, Some(25.0));
        assert_eq!(m.regular_std_time, Some(7.071));
        assert_eq!(m.festival_avg_distance, Some(1.0));
        assert_eq!(m.regular_avg_distance, Some(2.25));
        assert_eq!(m.regular_std_distance, Some(0.354));
        assert_eq!(restaurant_metrics(&[]), RestaurantMetrics::default());
    }

    #[test]
    fn city_stats_skip_missing_city() {
        let data = vec![
            delivery(Some("Urban"), Some("Low"), "No", 20, 2.0),
            delivery(Some("Urban"), Some("Jam"), "No", 30, 4.0),
            delivery(None, Some("Low"), "No", 99, 99.0),
        ];
        let rows = stats_by_city(&data);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].avg_time, 25.0);
        assert_eq!(rows[0].avg_distance, 3.0);
        assert!((rows[0].std_time.unwrap() - 50f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn city_traffic_and_order_type_groups() {
        let mut data = vec![
            delivery(Some("Urban"), Some("Low"), "No", 20, 2.0),
            delivery(Some("Urban"), Some("Low"), "No", 22, 2.0),
            delivery(Some("Urban"), Some("Jam"), "No", 40, 4.0),
            delivery(Some("Urban"), None, "No", 50, 4.0),
            delivery(Some("Semi-Urban"), Some("Jam"), "No", 50, 5.0),
        ];
        data[2].order_type = Some("Meal".to_string());

        let by_traffic = stats_by_city_traffic(&data);
        let keys: Vec<(&str, &str)> = by_traffic
            .iter()
            .map(|r| (r.city.as_str(), r.traffic.as_str()))
            .collect();
        assert_eq!(keys, vec![("Semi-Urban", "Jam"), ("Urban", "Jam"), ("Urban", "Low")]);
        assert_eq!(by_traffic[2].avg_time, 21.0);

        let by_order = stats_by_city_order_type(&data);
        let keys: Vec<(&str, &str, f64)> = by_order
            .iter()
            .map(|r| (r.city.as_str(), r.order_type.as_str(), r.avg_time))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("Semi-Urban", "Snack", 50.0),
                ("Urban", "Meal", 40.0),
                ("Urban", "Snack", 30.666666666666668),
            ]
        );
    }

    #[test]
    fn sunburst_midpoint_is_mean_std() {
        let data = vec![
            delivery(Some("Urban"), Some("Low"), "No", 20, 2.0),
            delivery(Some("Urban"), Some("Low"), "No", 22, 2.0),
            delivery(Some("Urban"), Some("Jam"), "No", 40, 4.0),
            delivery(Some("Urban"), Some("Jam"), "No", 46, 4.0),
            delivery(Some("Metropolitian"), Some("Jam"), "No", 50, 5.0),
        ];
        let chart = time_sunburst(&data);
        assert_eq!(chart.rows.len(), 3);
        let expected = (2f64.sqrt() + 18f64.sqrt()) / 2.0;
        assert!((chart.color_midpoint.unwrap() - expected).abs() < 1e-12);
        assert_eq!(time_sunburst(&[]).color_midpoint, None);
    }
}
