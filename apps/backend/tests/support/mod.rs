#![allow(dead_code)]

pub mod app_builder;
pub mod factory;
pub mod test_state;
