//! demos/plot_minimums.rs
//!
//! Fetches two winters of daily minimum temperatures for Urbana, Illinois and plots
//! them with their weekly and monthly averages.
//!
//! To run this demo:
//! cargo run --example plot_minimums --features demos

use std::error::Error;

use mintemp::{DateRange, LatLon, Location, MinTemp, PipelineOutput, Unit};
use plotlars::{Legend, Line, Plot, Rgb, Text, TimeSeriesPlot};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    println!("Fetching daily minimums from the Open-Meteo archive...");

    let client = MinTemp::new().await?;
    let output = client
        .pipeline()
        .location(Location::new("Urbana, Illinois", LatLon(40.1106, -88.2073)))
        .date_range(DateRange::parse("2022-01-01", "2024-01-01")?)
        .unit(Unit::Fahrenheit)
        .call()
        .await?;

    println!(
        "{} of {} days fell below {}{}",
        output.days_below_plot_threshold(),
        output.series.len(),
        output.plot_threshold,
        output.key.unit.symbol()
    );

    plot_minimums(&output)?;
    println!("Plot shown in browser.");
    Ok(())
}

fn plot_minimums(output: &PipelineOutput) -> Result<(), Box<dyn Error>> {
    let data = output.to_frame()?;
    let title = format!(
        "Daily minimum temperature, {}",
        output.key.location.name
    );

    TimeSeriesPlot::builder()
        .data(&data)
        .x("date")
        .y("temperature_2m_min")
        .additional_series(vec!["weekly_avg", "monthly_avg"])
        .colors(vec![Rgb(69, 157, 230), Rgb(235, 117, 0), Rgb(40, 40, 40)])
        .lines(vec![Line::Solid, Line::Solid, Line::Dash])
        .plot_title(Text::from(title.as_str()).font("Arial").size(18))
        .legend(&Legend::new().x(0.05).y(0.9))
        .x_title("date")
        .y_title(Text::from(output.key.unit.symbol()).color(Rgb(0, 0, 0)))
        .build()
        .plot();
    Ok(())
}
