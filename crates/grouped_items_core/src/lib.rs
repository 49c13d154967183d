//! Core domain logic for grouped display items.
//! This crate is the single source of truth for grouping invariants.

pub mod config;
pub mod engine;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{CollectionConfig, ConfigError};
pub use engine::grouping::{clone_selection, GroupingEngine};
pub use engine::sequence::MoveStep;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::entity::{DisplayEntity, EntityId, EntitySnapshot};
pub use model::level::{level_of, EntityKind, Level};
pub use model::selection::Selection;
pub use model::store::{EntityStore, StoreError, StoreResult};
pub use repo::xml_repo::{
    from_xml_str, to_xml_string, DisplayRepository, RepoError, RepoResult, XmlFileRepository,
};
pub use service::display_collection::{
    AmbiguityContext, CollectionError, CollectionResult, DisplayCollection,
};
pub use service::events::{ChangeNotifier, CollectionChange, SubscriptionId};
pub use service::naming::{NameGenerator, SequentialNameGenerator};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
