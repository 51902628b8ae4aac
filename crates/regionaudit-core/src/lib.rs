pub mod app_config;
pub mod artifacts;
pub mod config;
pub mod error;
pub mod regions;
pub mod status;
pub mod types;

pub use app_config::{AppConfig, CrawlSettings};
pub use artifacts::RunPaths;
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use regions::{market_from_url, set_query_param, RegionPlan, RegionTable};
pub use status::{normalize_feed_value, CanonicalStatus, TranslationRuleSet};
pub use types::{
    CompareMode, ComparisonRow, Extraction, RegionArtifacts, RegionTask, RunContext,
    StructuredOffer, VisualSignal,
};
