// Investment Performance Calculator API Client and Run Harnesses
//
// This crate owns everything that talks HTTP: the bearer-authenticated API
// client, the fake-entity payload generators, the load-test harness that
// feeds the core driver, and the workload seeder that builds the
// portfolio -> item -> transaction chain.

pub mod client;
pub mod drive;
pub mod payloads;
pub mod seed;
pub mod spec;

pub use client::{ApiClient, ClientError};
pub use drive::{run_load_test, LoadTestConfig};
pub use seed::{run_seed, SeedConfig, SeedReport};
pub use spec::{Method, RequestSpec};
