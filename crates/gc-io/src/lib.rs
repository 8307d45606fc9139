//! `gc-io` — everything that touches the filesystem.
//!
//! | Module      | Contents                                                     |
//! |-------------|--------------------------------------------------------------|
//! | [`dataset`] | `load_points`: CSV or JSON `(lat, lon, weight)` datasets    |
//! | [`network`] | `load_network_csv`: nodes + edges CSV into a `RoadNetwork`  |
//! | [`cache`]   | `ResultCache`: durable per-dataset result cache (JSON)      |
//! | [`export`]  | `write_records_csv`: aggregate records as CSV               |
//! | [`error`]   | `DataError`, `DataResult<T>`                                 |

pub mod cache;
pub mod dataset;
pub mod error;
pub mod export;
pub mod network;


pub use cache::ResultCache;
pub use dataset::{load_points, read_points_csv, read_points_json};
pub use error::{DataError, DataResult};
pub use export::write_records_csv;
pub use network::{load_network_csv, read_network_csv};
