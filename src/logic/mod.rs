pub mod aggregation;
pub mod data_sync;
pub mod engine;
pub mod grouping;
pub mod snapshot;
pub mod soil_moisture;
pub mod stats;
pub mod uv;

pub use data_sync::DataSyncService;
pub use engine::WeatherEngine;
