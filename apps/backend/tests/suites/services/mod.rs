mod deep_reports;
mod forecasts;
mod fixtures;
