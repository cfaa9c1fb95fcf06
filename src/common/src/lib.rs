pub mod config;
pub mod error;
pub mod types;

pub const DEFAULT_CATALOG_URL: &str =
    "https://br-fe-assignment.github.io/customer-events/events.json";
