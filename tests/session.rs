//! Session tests: query modes, oracle replies, mutations, the async driver,
//! configuration loading.

mod common;

#[path = "session/scenarios.rs"]
mod scenarios;

#[path = "session/driver.rs"]
mod driver;

#[path = "session/config.rs"]
mod config;
