//! Store configuration
//!
//! Two layers:
//! - `StoreSettings`: plain, serde-loadable values (e.g. from a host's JSON config)
//! - `StoreConfig`: the capabilities a store is built with (merge strategy,
//!   id generator, logger), constructed directly or from settings

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::observability::{Logger, Severity};
use crate::store::{
    DeepMerge, HexSegmentIds, IdGenerator, MergeStrategy, SequentialIds, ShallowMerge, StoreError,
    StoreResult,
};

/// Which built-in merge strategy `update` uses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeKind {
    #[default]
    Deep,
    Shallow,
}

/// Which built-in id generator `create` uses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdKind {
    #[default]
    Random,
    Sequential,
}

/// Serializable store settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Minimum severity logged (default: warn). `null` disables logging.
    #[serde(default = "default_log_level")]
    pub log_level: Option<Severity>,

    /// Merge strategy (default: deep)
    #[serde(default)]
    pub merge: MergeKind,

    /// Id generator (default: random)
    #[serde(default)]
    pub ids: IdKind,
}

fn default_log_level() -> Option<Severity> {
    Some(Severity::Warn)
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            merge: MergeKind::default(),
            ids: IdKind::default(),
        }
    }
}

impl StoreSettings {
    /// Parse settings from a JSON document; missing keys take defaults
    pub fn from_json(json: &str) -> StoreResult<Self> {
        serde_json::from_str(json).map_err(|e| StoreError::Config(e.to_string()))
    }
}

/// Capabilities a store is constructed with
///
/// The default logs WARN and above as JSON lines on the console, so a
/// rejected item prints a `TYPE_REJECTED` line to stdout. Embedders that
/// want a quiet store call `with_log_level(None)`.
#[derive(Clone)]
pub struct StoreConfig {
    pub(crate) merge: Arc<dyn MergeStrategy>,
    pub(crate) ids: Arc<dyn IdGenerator>,
    pub(crate) logger: Logger,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            merge: Arc::new(DeepMerge),
            ids: Arc::new(HexSegmentIds),
            logger: Logger::default(),
        }
    }
}

impl StoreConfig {
    /// Build a config from serializable settings
    pub fn from_settings(settings: &StoreSettings) -> Self {
        let merge: Arc<dyn MergeStrategy> = match settings.merge {
            MergeKind::Deep => Arc::new(DeepMerge),
            MergeKind::Shallow => Arc::new(ShallowMerge),
        };
        let ids: Arc<dyn IdGenerator> = match settings.ids {
            IdKind::Random => Arc::new(HexSegmentIds),
            IdKind::Sequential => Arc::new(SequentialIds::new()),
        };

        Self {
            merge,
            ids,
            logger: Logger::console(settings.log_level),
        }
    }

    /// Use `merge` to combine records during `update`
    pub fn with_merge<M: MergeStrategy + 'static>(mut self, merge: M) -> Self {
        self.merge = Arc::new(merge);
        self
    }

    /// Use `ids` for records created without an id
    pub fn with_id_generator<G: IdGenerator + 'static>(mut self, ids: G) -> Self {
        self.ids = Arc::new(ids);
        self
    }

    /// Use `logger` for store events
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    /// Log to the console at `level` and above; `None` silences the store
    pub fn with_log_level(self, level: Option<Severity>) -> Self {
        self.with_logger(Logger::console(level))
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("merge", &"dyn MergeStrategy")
            .field("ids", &"dyn IdGenerator")
            .field("logger", &self.logger)
            .finish()
    }
}
