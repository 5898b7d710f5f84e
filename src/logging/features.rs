//! Feature-specific logging macros and utilities
//!
//! Every component logs under its own target so that `RUST_LOG` (or the
//! per-feature levels in [`LogConfig`](super::config::LogConfig)) can raise or
//! lower verbosity for one area without touching the others.

/// Feature categories for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFeature {
    Schema,
    Validation,
    Constraints,
    Persistence,
}

impl LogFeature {
    /// All features, in the order they appear in configuration files.
    pub const ALL: [LogFeature; 4] = [
        LogFeature::Schema,
        LogFeature::Validation,
        LogFeature::Constraints,
        LogFeature::Persistence,
    ];

    /// Get the target string for this feature
    pub fn target(&self) -> &'static str {
        match self {
            LogFeature::Schema => "wikibase_schema::schema",
            LogFeature::Validation => "wikibase_schema::validation",
            LogFeature::Constraints => "wikibase_schema::constraints",
            LogFeature::Persistence => "wikibase_schema::persistence",
        }
    }

    /// Key used for this feature in the `features` table of the log config.
    pub fn config_key(&self) -> &'static str {
        match self {
            LogFeature::Schema => "schema",
            LogFeature::Validation => "validation",
            LogFeature::Constraints => "constraints",
            LogFeature::Persistence => "persistence",
        }
    }

    pub fn from_config_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.config_key() == key)
    }
}

// Schema model and builder
#[macro_export]
macro_rules! log_schema_debug {
    ($($arg:tt)*) => {
        log::debug!(target: "wikibase_schema::schema", $($arg)*)
    };
}

#[macro_export]
macro_rules! log_schema_info {
    ($($arg:tt)*) => {
        log::info!(target: "wikibase_schema::schema", $($arg)*)
    };
}

#[macro_export]
macro_rules! log_schema_warn {
    ($($arg:tt)*) => {
        log::warn!(target: "wikibase_schema::schema", $($arg)*)
    };
}

// Drag-and-drop compatibility checks
#[macro_export]
macro_rules! log_validation_debug {
    ($($arg:tt)*) => {
        log::debug!(target: "wikibase_schema::validation", $($arg)*)
    };
}

#[macro_export]
macro_rules! log_validation_info {
    ($($arg:tt)*) => {
        log::info!(target: "wikibase_schema::validation", $($arg)*)
    };
}

// Constraint fetching and evaluation
#[macro_export]
macro_rules! log_constraints_debug {
    ($($arg:tt)*) => {
        log::debug!(target: "wikibase_schema::constraints", $($arg)*)
    };
}

#[macro_export]
macro_rules! log_constraints_info {
    ($($arg:tt)*) => {
        log::info!(target: "wikibase_schema::constraints", $($arg)*)
    };
}

#[macro_export]
macro_rules! log_constraints_warn {
    ($($arg:tt)*) => {
        log::warn!(target: "wikibase_schema::constraints", $($arg)*)
    };
}

#[macro_export]
macro_rules! log_constraints_error {
    ($($arg:tt)*) => {
        log::error!(target: "wikibase_schema::constraints", $($arg)*)
    };
}

// Persistence gateway
#[macro_export]
macro_rules! log_persistence_info {
    ($($arg:tt)*) => {
        log::info!(target: "wikibase_schema::persistence", $($arg)*)
    };
}

#[macro_export]
macro_rules! log_persistence_error {
    ($($arg:tt)*) => {
        log::error!(target: "wikibase_schema::persistence", $($arg)*)
    };
}

/// Times an operation and logs its duration under the feature's target.
pub struct PerformanceTimer {
    start: std::time::Instant,
    feature: LogFeature,
    operation: String,
}

impl PerformanceTimer {
    pub fn new(feature: LogFeature, operation: impl Into<String>) -> Self {
        let operation = operation.into();
        log::debug!(target: feature.target(), "Starting timed operation: {}", operation);
        Self {
            start: std::time::Instant::now(),
            feature,
            operation,
        }
    }

    pub fn finish(self) {
        let duration = self.start.elapsed();
        log::debug!(
            target: self.feature.target(),
            "Operation '{}' completed in {:?}",
            self.operation,
            duration
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_keys_round_trip() {
        for feature in LogFeature::ALL {
            assert_eq!(LogFeature::from_config_key(feature.config_key()), Some(feature));
            assert!(feature.target().starts_with("wikibase_schema::"));
        }
        assert_eq!(LogFeature::from_config_key("transform"), None);
    }
}
