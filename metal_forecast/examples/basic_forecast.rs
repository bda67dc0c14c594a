use chrono::{Days, NaiveDate};
use metal_forecast::summary::{describe, histogram, DEFAULT_BINS};
use metal_forecast::{
    correlate, moving_average, ArimaModel, DateRange, ForecastEngine, Observation, PriceSeries,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Metal Forecast: Basic Forecasting Example");
    println!("=========================================\n");

    // Create sample data
    let start = NaiveDate::from_ymd_opt(2023, 1, 1).ok_or("bad start date")?;
    let gold = create_sample_series("Gold", start, 1820.0, 1.8, 240)?;
    let silver = create_sample_series("Silver", start, 23.5, 0.02, 240)?;
    println!(
        "Sample data created: {} days of Gold, {} days of Silver\n",
        gold.len(),
        silver.len()
    );

    // Keep April through August
    let range = DateRange::new(
        NaiveDate::from_ymd_opt(2023, 4, 1).ok_or("bad range start")?,
        NaiveDate::from_ymd_opt(2023, 8, 28).ok_or("bad range end")?,
    )?;
    let gold = gold.filter(&range);
    let silver = silver.filter(&range);

    if let Some(stats) = describe(&gold) {
        println!(
            "Gold: {} points, mean {:.2}, range {:.2}..{:.2}",
            stats.count, stats.mean, stats.min, stats.max
        );
    }
    let hist = histogram(&gold, DEFAULT_BINS)?;
    println!("Histogram: {} bins, {} values\n", hist.counts.len(), hist.total());

    // Smooth
    let smoothed = moving_average(&gold, 5)?;
    let latest = smoothed.values().into_iter().flatten().last();
    println!("Latest 5-day moving average: {:?}\n", latest);

    // Correlate
    let matrix = correlate(&[&gold, &silver])?;
    println!(
        "Gold/Silver correlation over {} shared days: {:?}\n",
        matrix.overlap,
        matrix.get("Gold", "Silver")
    );

    // Forecast one year of the dashboard's years-to-days mapping
    let engine = ForecastEngine::<ArimaModel>::default().with_confidence_level(0.95)?;
    let result = engine.forecast(&gold, 15)?;
    println!("{} forecast:", result.model);
    for point in &result.points {
        println!(
            "  {}  {:>9.2}  [{:.2}, {:.2}]",
            point.date,
            point.value,
            point.lower.unwrap_or(f64::NAN),
            point.upper.unwrap_or(f64::NAN)
        );
    }

    Ok(())
}

// Helper function to create a drifting daily series with a weekly swing
fn create_sample_series(
    instrument: &str,
    start: NaiveDate,
    base: f64,
    drift: f64,
    days: u64,
) -> Result<PriceSeries, Box<dyn std::error::Error>> {
    let observations = (0..days)
        .map(|i| {
            let swing = ((i % 7) as f64 - 3.0) * drift * 0.8;
            Observation::new(start + Days::new(i), base + drift * i as f64 + swing)
        })
        .collect();
    Ok(PriceSeries::new(instrument, "Close", observations)?)
}
