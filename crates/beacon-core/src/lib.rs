pub mod config;
pub mod errors;
pub mod experiment;
pub mod history;
pub mod model;
pub mod quality;
pub mod recommendations;
pub mod report;
pub mod source;
pub mod thresholds;
pub mod trends;
pub mod vitals;

pub use errors::ConfigError;
pub use model::{MetricName, MetricSample, PageVitals, Rating, Severity};
pub use source::MetricsSource;
pub use thresholds::{classify, Threshold, ThresholdTable};
