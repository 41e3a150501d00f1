// Terminal rendering of the three dashboard views.
//
// Each render takes the already-filtered dataset, prints the view's metrics
// and tables, and optionally exports every table as CSV plus the scalar
// metrics as JSON.
use crate::company;
use crate::couriers::{self, Ranking};
use crate::error::ReportResult;
use crate::output::{preview_table, write_csv, write_json};
use crate::restaurants;
use crate::types::DeliveryRecord;
use crate::util::{display_opt_f64, format_int, format_opt};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Company,
    Couriers,
    Restaurants,
}

impl View {
    pub const ALL: [View; 3] = [View::Company, View::Couriers, View::Restaurants];

    pub fn title(self) -> &'static str {
        match self {
            View::Company => "Marketplace - Company View",
            View::Couriers => "Marketplace - Couriers View",
            View::Restaurants => "Marketplace - Restaurants View",
        }
    }

    fn slug(self) -> &'static str {
        match self {
            View::Company => "company",
            View::Couriers => "couriers",
            View::Restaurants => "restaurants",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Rows shown per table preview.
    pub rows: usize,
    /// Where tables are exported; nothing is written when `None`.
    pub export_dir: Option<PathBuf>,
}

/// Collects the exports of one view under `<export_dir>/<view>_<name>`.
struct Exporter<'a> {
    dir: Option<&'a Path>,
    view: View,
    written: Vec<PathBuf>,
}

impl<'a> Exporter<'a> {
    fn new(dir: Option<&'a Path>, view: View) -> Self {
        Exporter {
            dir,
            view,
            written: Vec::new(),
        }
    }

    fn csv<T: Serialize>(&mut self, name: &str, rows: &[T]) -> ReportResult<()> {
        if let Some(dir) = self.dir {
            let path = dir.join(format!("{}_{}.csv", self.view.slug(), name));
            write_csv(&path, rows)?;
            self.written.push(path);
        }
        Ok(())
    }

    fn json<T: Serialize>(&mut self, name: &str, value: &T) -> ReportResult<()> {
        if let Some(dir) = self.dir {
            let path = dir.join(format!("{}_{}.json", self.view.slug(), name));
            write_json(&path, value)?;
            self.written.push(path);
        }
        Ok(())
    }
}

/// Render one view over `data` and return the paths of any exported files.
pub fn render(
    view: View,
    data: &[DeliveryRecord],
    opts: &RenderOptions,
) -> ReportResult<Vec<PathBuf>> {
    if let Some(dir) = &opts.export_dir {
        std::fs::create_dir_all(dir)?;
    }
    let mut exporter = Exporter::new(opts.export_dir.as_deref(), view);

    println!("# {}", view.title());
    println!("({} orders after filtering)\n", format_int(data.len()));

    match view {
        View::Company => render_company(data, opts.rows, &mut exporter)?,
        View::Couriers => render_couriers(data, opts.rows, &mut exporter)?,
        View::Restaurants => render_restaurants(data, opts.rows, &mut exporter)?,
    }

    if !exporter.written.is_empty() {
        info!(view = view.slug(), files = exporter.written.len(), "tables exported");
    }
    Ok(exporter.written)
}

fn render_company(data: &[DeliveryRecord], rows: usize, ex: &mut Exporter) -> ReportResult<()> {
    println!("## Management\n");
    let by_date = company::orders_by_date(data);
    preview_table("Daily orders", &by_date, rows);
    ex.csv("orders_by_date", &by_date)?;

    let by_traffic = company::orders_by_traffic(data);
    preview_table("Orders by traffic density", &by_traffic, rows);
    ex.csv("orders_by_traffic", &by_traffic)?;

    let by_city_traffic = company::orders_by_traffic_city(data);
    preview_table("Orders by traffic density and city", &by_city_traffic, rows);
    ex.csv("orders_by_traffic_city", &by_city_traffic)?;

    println!("## Tactical\n");
    let by_week = company::orders_by_week(data);
    preview_table("Orders per week", &by_week, rows);
    ex.csv("orders_by_week", &by_week)?;

    let per_courier = company::orders_per_courier_by_week(data);
    preview_table("Weekly orders per courier", &per_courier, rows);
    ex.csv("orders_per_courier_by_week", &per_courier)?;

    println!("## Geographic\n");
    let centers = company::geographic_centers(data);
    preview_table("Central delivery location per city and traffic", &centers, rows);
    ex.csv("geographic_centers", &centers)?;
    Ok(())
}

fn render_couriers(data: &[DeliveryRecord], rows: usize, ex: &mut Exporter) -> ReportResult<()> {
    let metrics = couriers::courier_metrics(data);
    println!("## Overall metrics\n");
    println!("Oldest courier:          {}", format_opt(metrics.oldest_age));
    println!("Youngest courier:        {}", format_opt(metrics.youngest_age));
    println!("Best vehicle condition:  {}", format_opt(metrics.best_vehicle_condition));
    println!("Worst vehicle condition: {}\n", format_opt(metrics.worst_vehicle_condition));
    ex.json("metrics", &metrics)?;

    println!("## Ratings\n");
    let per_courier = couriers::avg_rating_per_courier(data);
    preview_table("Average rating per courier", &per_courier, rows);
    ex.csv("avg_rating_per_courier", &per_courier)?;

    let by_traffic = couriers::ratings_per_traffic(data);
    preview_table("Average rating by traffic density", &by_traffic, rows);
    ex.csv("ratings_per_traffic", &by_traffic)?;

    let by_weather = couriers::ratings_per_weather(data);
    preview_table("Average rating by weather", &by_weather, rows);
    ex.csv("ratings_per_weather", &by_weather)?;

    println!("## Delivery speed\n");
    // Rankings hold up to ten couriers per city, so show them whole.
    let fastest = couriers::top_couriers(data, Ranking::Fastest);
    preview_table("Fastest couriers", &fastest, fastest.len());
    ex.csv("fastest_couriers", &fastest)?;

    let slowest = couriers::top_couriers(data, Ranking::Slowest);
    preview_table("Slowest couriers", &slowest, slowest.len());
    ex.csv("slowest_couriers", &slowest)?;
    Ok(())
}

fn render_restaurants(data: &[DeliveryRecord], rows: usize, ex: &mut Exporter) -> ReportResult<()> {
    let metrics = restaurants::restaurant_metrics(data);
    println!("## Overall metrics\n");
    println!("Couriers:                          {}", format_int(metrics.couriers));
    let lines = [
        ("Average distance (km):", metrics.avg_distance),
        ("Average time during festival:", metrics.festival_avg_time),
        ("Std dev time during festival:", metrics.festival_std_time),
        ("Average time outside festival:", metrics.regular_avg_time),
        ("Std dev time outside festival:", metrics.regular_std_time),
        ("Average distance during festival:", metrics.festival_avg_distance),
        ("Std dev distance during festival:", metrics.festival_std_distance),
        ("Average distance outside festival:", metrics.regular_avg_distance),
        ("Std dev distance outside festival:", metrics.regular_std_distance),
    ];
    for (label, value) in &lines {
        println!("{label:<35}{}", display_opt_f64(value));
    }
    println!();
    ex.json("metrics", &metrics)?;

    let by_city = restaurants::stats_by_city(data);
    preview_table("Delivery time and distance by city", &by_city, rows);
    ex.csv("stats_by_city", &by_city)?;

    let sunburst = restaurants::time_sunburst(data);
    preview_table("Average time by city and traffic", &sunburst.rows, rows);
    println!(
        "Colour midpoint (mean std time): {}\n",
        display_opt_f64(&sunburst.color_midpoint)
    );
    ex.csv("stats_by_city_traffic", &sunburst.rows)?;
    ex.json("time_sunburst", &sunburst)?;

    let by_order = restaurants::stats_by_city_order_type(data);
    preview_table("Delivery time and distance by city and order type", &by_order, rows);
    ex.csv("stats_by_city_order_type", &by_order)?;
    Ok(())
}
