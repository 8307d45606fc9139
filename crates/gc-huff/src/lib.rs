//! `gc-huff` — the spatial market-share engine.
//!
//! # Pipeline
//!
//! ```text
//! demand points ─┐                      ┌─ per competitor ───────────────────┐
//!                ├─ SpatialGrid ─ group ┤  NodeLocator → DistanceOracle       │
//! competitors ───┘                      │  → AttractionModel (Huff)           │
//!                                       └─ ProbabilityVector ─────────────────┘
//!                                                  │
//!                                       ResultAggregator → AggregateRecord[]
//! ```
//!
//! Every computation builds its own grid and its own node / distance caches,
//! so several computations can share one read-only [`RoadGraph`] from
//! different threads without locking.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use gc_huff::{MarketShareEngine, ModelConfig};
//!
//! let engine = MarketShareEngine::new(&network, ModelConfig::default())?;
//! let share = engine.compute(&customers, &competitors)?;
//! for r in &share.records {
//!     println!("{:.5} {:.5} {:.4}", r.lat, r.lon, r.probability);
//! }
//! ```
//!
//! [`RoadGraph`]: gc_spatial::RoadGraph

pub mod aggregate;
pub mod attraction;
pub mod config;
pub mod demand;
pub mod engine;
pub mod error;


pub use aggregate::ResultAggregator;
pub use attraction::{Attraction, AttractionModel, ProbabilityVector};
pub use config::{AggregationMode, ModelConfig};
pub use demand::{CompetitorSite, DemandGroup, group_demand, place_competitors};
pub use engine::{MarketShare, MarketShareEngine, RunStats};
pub use error::{ModelError, ModelResult};
