//! Filekin Core
//!
//! Pattern-based file type classification and cross-type file links.
//!
//! A workspace declares *file types*, each a set of regexes with a key
//! capture. Files of different types that extract the same *identity key*
//! are related: `src/classes/Entity.ts`, `test/classes/Entity.test.ts` and
//! `docs/classes/Entity.md` all share the key `classes/entity`.
//!
//! ## Architecture
//!
//! - **PatternMatcher**: one file type, its compiled patterns and its key index
//! - **RelationshipManager**: classification cache, link queries and
//!   incremental add/remove batches with affected-path reporting
//! - **Transformations**: regex substitution and case-format pipelines that
//!   derive new paths from existing ones
//!
//! ## Usage
//!
//! ```rust
//! use filekin_core::{FileTypeDefinition, LinkConfig, PathChanges, RelationshipManager};
//!
//! let config = LinkConfig::new(
//!     vec![
//!         FileTypeDefinition::new("Source", "S", [r".*/src/(?P<key>.+)\.ts$"]),
//!         FileTypeDefinition::new("Test", "T", [r".*/test/(?P<key>.+)\.test\.ts$"]),
//!     ],
//!     vec!["/node_modules/".to_string()],
//! );
//!
//! let mut manager = RelationshipManager::new();
//! manager.apply_configuration(&config)?;
//! manager.apply_path_changes(&PathChanges::added([
//!     "/repo/src/Entity.ts",
//!     "/repo/test/Entity.test.ts",
//! ]));
//!
//! let linked = manager.get_linked_files("/repo/src/Entity.ts");
//! assert_eq!(linked[0].full_path, "/repo/test/Entity.test.ts");
//! # Ok::<(), filekin_core::ConfigError>(())
//! ```

mod case;
mod config;
mod error;
mod graph;
mod manager;
mod matcher;
mod metrics;
mod path;
mod transform;

// Re-export public API
pub use case::CaseFormat;
pub use config::{
    CreationPattern, FileTypeDefinition, GroupCase, GroupRef, LinkConfig, PatternSpec,
    TransformationStep, CONFIG_FILENAME,
};
pub use error::{ConfigError, ConfigResult, TransformError, TransformResult};
pub use graph::LinkNode;
pub use manager::{
    ChangeHandler, ChangeNotification, CreationOpportunity, DecorationSummary,
    FileCreationRecord, PathChanges, PathMetadata, RelationshipManager, TOOLTIP_SEPARATOR,
};
pub use matcher::{
    CompiledCreationPattern, PathIndex, PatternMatcher, RelatedFileRecord, DEFAULT_KEY_GROUP,
};
pub use metrics::{LinkMetrics, MetricsSnapshot};
pub use path::{to_forward_slashes, IdentityKey, NormalizedPath};
pub use transform::{apply_transformation_steps, apply_transformations, CompiledTransformation};
