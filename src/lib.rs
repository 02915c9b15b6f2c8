pub mod config;
pub mod consts;
pub mod engine;
pub mod error;
pub mod grading;
pub mod loader;
pub mod narrator;
pub mod projection;
pub mod quality;
pub mod scorer;
pub mod tables;
pub mod valuation;

pub use engine::{Assessment, Engine, EngineBuilder, SiteRequest};
pub use error::{PhiError, PhiResult};
pub use quality::{Confidence, DataQuality};
pub use scorer::{CompositeScore, Metric, MetricSample, MetricScore, Scorer};
pub use tables::{ReferenceTables, WeightProfile};
// cmd and reports belong to the binary crate (main.rs).
