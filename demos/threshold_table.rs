//! demos/threshold_table.rs
//!
//! Prints how many days of 2023 fell below each threshold for a city picked
//! from a prepared location CSV.
//!
//! To run this demo:
//! cargo run --example threshold_table -- cities.csv "Urbana, Illinois"

use std::error::Error;

use mintemp::{DateRange, LocationTable, MinTemp, ThresholdRange, Unit};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let csv = args.next().ok_or("usage: threshold_table <cities.csv> <city, state>")?;
    let name = args.next().unwrap_or_else(|| "Urbana, Illinois".to_string());

    let locations = LocationTable::load(csv).await?;
    let location = locations.require(&name)?.clone();
    println!("{} ({})", location.name, location.coordinates);

    let client = MinTemp::new().await?;
    let output = client
        .pipeline()
        .location(location)
        .date_range(DateRange::parse("2023-01-01", "2023-12-31")?)
        .unit(Unit::Celsius)
        .table_range(ThresholdRange::new(-25, 0)?)
        .overlays(vec![])
        .call()
        .await?;

    println!("{}", output.table.to_frame()?);
    Ok(())
}
