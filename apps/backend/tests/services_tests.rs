// Service-layer tests
//
// Drive services directly against an in-memory database, without HTTP.
//
//   cargo test --test services_tests

mod common;
mod support;

#[path = "suites/services/mod.rs"]
mod services;
