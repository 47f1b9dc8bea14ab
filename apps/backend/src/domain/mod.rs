//! Pure business rules: forecast scoring, city selection and plans.

pub mod cities;
pub mod forecast_engine;
pub mod plans;
