//! `gc-spatial` — grid partitioning, the road-graph seam, and the two
//! per-run memoization layers used by the market-share engine.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`grid`]    | `BoundingBox`, `GridCell`, `SpatialGrid`                    |
//! | [`graph`]   | `RoadGraph` trait, length-weighted Dijkstra                 |
//! | [`network`] | `RoadNetwork` (CSR + R-tree), `RoadNetworkBuilder`          |
//! | [`locator`] | `NodeLocator`: nearest vertex, cached per grid cell        |
//! | [`oracle`]  | `DistanceOracle`, `Distance`: cached per vertex pair       |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                          |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod error;
pub mod graph;
pub mod grid;
pub mod locator;
pub mod network;
pub mod oracle;


pub use error::{SpatialError, SpatialResult};
pub use graph::RoadGraph;
pub use grid::{BoundingBox, GridCell, SpatialGrid};
pub use locator::NodeLocator;
pub use network::{RoadNetwork, RoadNetworkBuilder};
pub use oracle::{Distance, DistanceOracle};
