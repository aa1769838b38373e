pub mod date_range;
pub mod location;
pub mod series;
pub mod threshold_range;
pub mod threshold_table;
pub mod unit;
