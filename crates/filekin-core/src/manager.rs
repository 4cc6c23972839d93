//! Relationship manager: classification, link resolution and incremental updates.
//!
//! The manager owns one [`PatternMatcher`] per configured file type plus the
//! ignore rules. It is either *unconfigured* (every query is empty) or
//! *configured*; [`RelationshipManager::apply_configuration`] is the only way
//! in and [`RelationshipManager::reset`] the only way out.
//!
//! Classification results are cached per normalized path. Membership and link
//! permissions depend only on configuration, so the cache survives ordinary
//! add/remove batches and is dropped wholesale when configuration changes.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::LinkConfig;
use crate::error::ConfigResult;
use crate::matcher::{PatternMatcher, RelatedFileRecord};
use crate::metrics::LinkMetrics;
use crate::path::{to_forward_slashes, IdentityKey, NormalizedPath};

/// Separator between type names in decoration tooltips.
pub const TOOLTIP_SEPARATOR: &str = " + ";

/// Cached classification of a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMetadata {
    /// Name of the owning file type.
    pub file_type: String,
    /// Key under the owning type's normalization.
    pub identity_key: IdentityKey,
    /// Lower-cased key before stripping, re-normalized per target type.
    pub raw_key: String,
    /// Types this path may link to, in declared order.
    pub allowed_target_types: Vec<String>,
    type_index: usize,
    target_indices: Vec<usize>,
    source_indices: Vec<usize>,
}

/// Compact decoration for a path with links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecorationSummary {
    /// One icon per linked type, concatenated.
    pub marker_text: String,
    /// Linked type names joined by [`TOOLTIP_SEPARATOR`].
    pub tooltip: String,
}

/// A file that could be created from an existing path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileCreationRecord {
    /// Type the created file would belong to.
    pub type_name: String,
    /// Name of the creation pattern.
    pub name: String,
    pub icon: String,
    /// Derived target path.
    pub full_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_content_snippet: Option<String>,
}

/// All creation records derivable from one known path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreationOpportunity {
    pub source_path: String,
    pub creations: Vec<FileCreationRecord>,
}

/// Incremental path delta.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathChanges {
    #[serde(default)]
    pub add_paths: Vec<String>,
    /// Files or folders. Folders expand to their known descendants.
    #[serde(default)]
    pub remove_paths: Vec<String>,
}

impl PathChanges {
    /// A delta adding `paths`.
    pub fn added<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            add_paths: paths.into_iter().map(Into::into).collect(),
            remove_paths: Vec::new(),
        }
    }

    /// A delta removing `paths`.
    pub fn removed<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            add_paths: Vec::new(),
            remove_paths: paths.into_iter().map(Into::into).collect(),
        }
    }
}

/// Notification sent to the registered change handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeNotification {
    /// These paths' relationships may have changed.
    Paths(Vec<String>),
    /// Configuration changed; everything must be re-rendered.
    FullRefresh,
}

/// Callback receiving change notifications.
pub type ChangeHandler = Box<dyn FnMut(&ChangeNotification) + Send>;

/// Owns the file types, the known-path registry and the classification cache.
pub struct RelationshipManager {
    config: Option<LinkConfig>,
    matchers: Vec<PatternMatcher>,
    ignore: Vec<Regex>,
    known_paths: BTreeMap<NormalizedPath, String>,
    cache: RefCell<HashMap<NormalizedPath, Option<Arc<PathMetadata>>>>,
    metrics: Arc<LinkMetrics>,
    change_handler: Option<ChangeHandler>,
}

impl Default for RelationshipManager {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RelationshipManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelationshipManager")
            .field("configured", &self.is_configured())
            .field("file_types", &self.file_type_names())
            .field("known_paths", &self.known_paths.len())
            .field("cached", &self.cache.borrow().len())
            .field("has_change_handler", &self.change_handler.is_some())
            .finish()
    }
}

impl RelationshipManager {
    /// Create an unconfigured manager with its own metrics context.
    pub fn new() -> Self {
        Self::with_metrics(Arc::new(LinkMetrics::new()))
    }

    /// Create an unconfigured manager reporting into `metrics`.
    pub fn with_metrics(metrics: Arc<LinkMetrics>) -> Self {
        Self {
            config: None,
            matchers: Vec::new(),
            ignore: Vec::new(),
            known_paths: BTreeMap::new(),
            cache: RefCell::new(HashMap::new()),
            metrics,
            change_handler: None,
        }
    }

    /// The injected metrics context.
    pub fn metrics(&self) -> &Arc<LinkMetrics> {
        &self.metrics
    }

    /// Register the handler receiving change notifications.
    pub fn set_change_handler<F>(&mut self, handler: F)
    where
        F: FnMut(&ChangeNotification) + Send + 'static,
    {
        self.change_handler = Some(Box::new(handler));
    }

    /// Remove the change handler.
    pub fn clear_change_handler(&mut self) {
        self.change_handler = None;
    }

    /// Whether a configuration is loaded.
    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    /// The active configuration.
    pub fn config(&self) -> Option<&LinkConfig> {
        self.config.as_ref()
    }

    /// Configured type names in declared order.
    pub fn file_type_names(&self) -> Vec<&str> {
        self.matchers.iter().map(|m| m.name()).collect()
    }

    /// Matcher for the named type.
    pub fn matcher(&self, name: &str) -> Option<&PatternMatcher> {
        self.matchers.iter().find(|m| m.name() == name)
    }

    /// Known relevant paths, ordered by normalized path.
    pub fn known_paths(&self) -> impl Iterator<Item = &str> {
        self.known_paths.values().map(String::as_str)
    }

    /// Number of known relevant paths.
    pub fn known_path_count(&self) -> usize {
        self.known_paths.len()
    }

    /// Whether `path` is in the known-path registry.
    pub fn is_known(&self, path: &str) -> bool {
        self.known_paths.contains_key(&NormalizedPath::new(path))
    }

    /// Replace the configuration.
    ///
    /// Returns `Ok(false)` without touching anything when `config` equals the
    /// active one. The new configuration is compiled before any state is
    /// replaced, so a compile error leaves the manager as it was. Known paths
    /// still relevant under the new configuration are re-indexed.
    pub fn apply_configuration(&mut self, config: &LinkConfig) -> ConfigResult<bool> {
        if self.config.as_ref() == Some(config) {
            debug!("Link configuration unchanged, skipping rebuild");
            return Ok(false);
        }

        let started = Instant::now();
        config.check_names()?;
        let ignore = config.compile_ignore_patterns()?;
        let matchers = config
            .file_types
            .iter()
            .cloned()
            .map(PatternMatcher::new)
            .collect::<ConfigResult<Vec<_>>>()?;
        config.warn_unknown_permissions();

        for matcher in &mut self.matchers {
            matcher.dispose();
        }
        self.matchers = matchers;
        self.ignore = ignore;
        self.config = Some(config.clone());
        self.cache.get_mut().clear();

        let previous = std::mem::take(&mut self.known_paths);
        let mut reindexed = 0;
        for path in previous.into_values() {
            if self.is_relevant(&path) {
                self.register_path(&path);
                reindexed += 1;
            }
        }

        self.metrics.record_rebuild(started.elapsed());
        info!(
            file_types = self.matchers.len(),
            ignore_patterns = self.ignore.len(),
            reindexed,
            "Applied link configuration"
        );

        self.notify(&ChangeNotification::FullRefresh);
        Ok(true)
    }

    /// Drop all file types, known paths and cached metadata.
    pub fn reset(&mut self) {
        for matcher in &mut self.matchers {
            matcher.dispose();
        }
        self.matchers.clear();
        self.ignore.clear();
        self.config = None;
        self.known_paths.clear();
        self.cache.get_mut().clear();
        debug!("Relationship manager reset");
    }

    /// Whether `path` matches an ignore pattern.
    pub fn is_ignored(&self, path: &str) -> bool {
        let path = to_forward_slashes(path);
        self.ignore.iter().any(|r| r.is_match(&path))
    }

    /// Not ignored and matched by some file type.
    pub fn is_relevant(&self, path: &str) -> bool {
        !self.is_ignored(path) && self.matchers.iter().any(|m| m.matches(path))
    }

    /// Classify `path`, resolving and caching its metadata.
    pub fn classify(&self, path: &str) -> Option<Arc<PathMetadata>> {
        if !self.is_configured() {
            return None;
        }

        let normalized = NormalizedPath::new(path);
        if let Some(cached) = self.cache.borrow().get(&normalized) {
            self.metrics.record_cache_hit();
            return cached.clone();
        }

        self.metrics.record_cache_miss();
        let resolved = self.resolve_metadata(path).map(Arc::new);
        self.cache
            .borrow_mut()
            .insert(normalized, resolved.clone());
        resolved
    }

    fn resolve_metadata(&self, path: &str) -> Option<PathMetadata> {
        if self.is_ignored(path) {
            return None;
        }

        // First type in declared order wins.
        let type_index = self.matchers.iter().position(|m| m.matches(path))?;
        let own = &self.matchers[type_index];
        let raw_key = own.extract_raw_key(path)?;
        let identity_key = own.normalize_key(&raw_key)?;

        let mut target_indices = Vec::new();
        let mut source_indices = Vec::new();
        for (index, other) in self.matchers.iter().enumerate() {
            if index == type_index {
                continue;
            }
            if own.allows_links_to(other.name()) && other.allows_links_from(own.name()) {
                target_indices.push(index);
            }
            if other.allows_links_to(own.name()) && own.allows_links_from(other.name()) {
                source_indices.push(index);
            }
        }

        Some(PathMetadata {
            file_type: own.name().to_string(),
            identity_key,
            raw_key,
            allowed_target_types: target_indices
                .iter()
                .map(|&i| self.matchers[i].name().to_string())
                .collect(),
            type_index,
            target_indices,
            source_indices,
        })
    }

    /// Files `path` links to: allowed target types in declared order, each
    /// in insertion order. Never contains `path` or its own type.
    pub fn get_linked_files(&self, path: &str) -> Vec<RelatedFileRecord> {
        let Some(metadata) = self.classify(path) else {
            return Vec::new();
        };
        self.files_of_types(path, &metadata, &metadata.target_indices)
    }

    /// Known files whose type may link to `path`'s type under the same key.
    fn files_linking_to(&self, path: &str) -> Vec<RelatedFileRecord> {
        let Some(metadata) = self.classify(path) else {
            return Vec::new();
        };
        self.files_of_types(path, &metadata, &metadata.source_indices)
    }

    fn files_of_types(
        &self,
        path: &str,
        metadata: &PathMetadata,
        type_indices: &[usize],
    ) -> Vec<RelatedFileRecord> {
        let own_path = NormalizedPath::new(path);
        type_indices
            .iter()
            .map(|&index| &self.matchers[index])
            .filter_map(|matcher| {
                matcher
                    .normalize_key(&metadata.raw_key)
                    .map(|key| matcher.get_files_matching(&key))
            })
            .flatten()
            .filter(|record| NormalizedPath::new(&record.full_path) != own_path)
            .collect()
    }

    /// Marker and tooltip for `path`, or `None` if it has no links.
    pub fn get_decoration_summary(&self, path: &str) -> Option<DecorationSummary> {
        let linked = self.get_linked_files(path);
        if linked.is_empty() {
            return None;
        }

        let mut seen = HashSet::new();
        let mut markers = String::new();
        let mut names = Vec::new();
        for record in &linked {
            if seen.insert(record.type_name.as_str()) {
                markers.push_str(&record.icon);
                names.push(record.type_name.as_str());
            }
        }

        Some(DecorationSummary {
            marker_text: markers,
            tooltip: names.join(TOOLTIP_SEPARATOR),
        })
    }

    /// Candidate files derivable from `path` through creation patterns of the
    /// types it may link to. Existing and duplicate targets are dropped.
    pub fn get_all_file_creations_from(&self, path: &str) -> Vec<FileCreationRecord> {
        let Some(metadata) = self.classify(path) else {
            return Vec::new();
        };

        let source = NormalizedPath::new(path);
        let mut seen: HashSet<NormalizedPath> = HashSet::new();
        let mut records = Vec::new();

        for &index in &metadata.target_indices {
            let target = &self.matchers[index];
            for pattern in target
                .creation_patterns()
                .iter()
                .filter(|p| p.admits_source(&metadata.file_type))
            {
                let full_path = pattern.derive(path);
                let normalized = NormalizedPath::new(&full_path);
                if normalized == source
                    || self.known_paths.contains_key(&normalized)
                    || !seen.insert(normalized)
                {
                    continue;
                }

                records.push(FileCreationRecord {
                    type_name: target.name().to_string(),
                    name: pattern.name().to_string(),
                    icon: target.icon().to_string(),
                    full_path,
                    initial_content_snippet: pattern.snippet().map(str::to_string),
                });
            }
        }

        records
    }

    /// Known paths that have at least one link.
    pub fn get_all_paths_with_outgoing_links(&self) -> Vec<String> {
        self.known_paths
            .values()
            .filter(|path| !self.get_linked_files(path).is_empty())
            .cloned()
            .collect()
    }

    /// Known paths with at least one creation record.
    pub fn get_all_creation_opportunities(&self) -> Vec<CreationOpportunity> {
        self.known_paths
            .values()
            .filter_map(|path| {
                let creations = self.get_all_file_creations_from(path);
                (!creations.is_empty()).then(|| CreationOpportunity {
                    source_path: path.clone(),
                    creations,
                })
            })
            .collect()
    }

    /// Apply an add/remove delta.
    ///
    /// Folder removals expand to previously known descendants. Irrelevant
    /// paths are dropped; if nothing relevant remains this is a no-op.
    /// Returns (and sends to the change handler) the added paths plus every
    /// known path whose links may have changed, deduplicated.
    pub fn apply_path_changes(&mut self, changes: &PathChanges) -> Vec<String> {
        if !self.is_configured() {
            return Vec::new();
        }

        let removals = self.resolve_removals(&changes.remove_paths);
        let removed_set: HashSet<NormalizedPath> =
            removals.iter().map(|p| NormalizedPath::new(p)).collect();

        let mut additions: Vec<String> = Vec::new();
        let mut addition_set: HashSet<NormalizedPath> = HashSet::new();
        for path in &changes.add_paths {
            let normalized = NormalizedPath::new(path);
            let already_known =
                self.known_paths.contains_key(&normalized) && !removed_set.contains(&normalized);
            if already_known || !self.is_relevant(path) {
                continue;
            }
            if addition_set.insert(normalized) {
                additions.push(path.clone());
            }
        }

        if removals.is_empty() && additions.is_empty() {
            return Vec::new();
        }

        // Removal side is computed against the relationships before the change.
        let mut indirect: Vec<RelatedFileRecord> = removals
            .iter()
            .flat_map(|path| self.files_linking_to(path))
            .collect();

        for matcher in &mut self.matchers {
            matcher.remove_paths(&removals);
        }
        for path in &removals {
            self.known_paths.remove(&NormalizedPath::new(path));
        }

        for path in &additions {
            self.register_path(path);
        }

        indirect.extend(additions.iter().flat_map(|path| self.files_linking_to(path)));

        let mut emitted: HashSet<NormalizedPath> = HashSet::new();
        let mut affected = Vec::new();
        let candidates = additions
            .iter()
            .cloned()
            .chain(indirect.into_iter().map(|record| record.full_path));
        for path in candidates {
            let normalized = NormalizedPath::new(&path);
            let still_present =
                !removed_set.contains(&normalized) || addition_set.contains(&normalized);
            if still_present && emitted.insert(normalized) {
                affected.push(path);
            }
        }

        self.metrics.record_indexed(additions.len());
        self.metrics.record_removed(removals.len());
        self.metrics.record_change_batch(affected.len());
        debug!(
            added = additions.len(),
            removed = removals.len(),
            affected = affected.len(),
            "Applied path changes"
        );

        if !affected.is_empty() {
            self.notify(&ChangeNotification::Paths(affected.clone()));
        }
        affected
    }

    /// Expand removal entries to known file paths. An entry that is not a
    /// known file is treated as a folder.
    fn resolve_removals(&self, entries: &[String]) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut resolved = Vec::new();

        for entry in entries {
            let normalized = NormalizedPath::new(entry);
            if let Some(known) = self.known_paths.get(&normalized) {
                if seen.insert(normalized) {
                    resolved.push(known.clone());
                }
                continue;
            }

            for (path, original) in &self.known_paths {
                if path.is_inside(&normalized) && seen.insert(path.clone()) {
                    resolved.push(original.clone());
                }
            }
        }

        resolved
    }

    /// Record a relevant path and index it under its owning type.
    fn register_path(&mut self, path: &str) {
        if let Some(metadata) = self.classify(path) {
            self.matchers[metadata.type_index].add_paths([path]);
        }
        self.known_paths
            .insert(NormalizedPath::new(path), path.to_string());
    }

    fn notify(&mut self, notification: &ChangeNotification) {
        if let Some(handler) = self.change_handler.as_mut() {
            handler(notification);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CreationPattern, FileTypeDefinition, TransformationStep};
    use std::sync::Mutex;

    fn scenario_config() -> LinkConfig {
        LinkConfig::new(
            vec![
                FileTypeDefinition::new("Source", "S", [r".*/src/(?P<key>.+)\.ts$"]),
                FileTypeDefinition::new("Test", "T", [r".*/test/(?P<key>.+)\.test\.ts$"]),
                FileTypeDefinition::new("Documentation", "D", [r".*/docs/(?P<key>.+)\.md$"])
                    .only_link_to(["Source"]),
            ],
            vec!["/node_modules/".to_string()],
        )
    }

    fn configured() -> RelationshipManager {
        let mut manager = RelationshipManager::new();
        manager.apply_configuration(&scenario_config()).unwrap();
        manager
    }

    fn paths(records: &[RelatedFileRecord]) -> Vec<&str> {
        records.iter().map(|r| r.full_path.as_str()).collect()
    }

    #[test]
    fn test_unconfigured_queries_are_empty() {
        let mut manager = RelationshipManager::new();
        assert!(!manager.is_configured());
        assert!(manager.classify("/root/src/a.ts").is_none());
        assert!(manager.get_linked_files("/root/src/a.ts").is_empty());
        assert!(manager
            .apply_path_changes(&PathChanges::added(["/root/src/a.ts"]))
            .is_empty());
        assert_eq!(manager.known_path_count(), 0);
    }

    #[test]
    fn test_classify_resolves_permissions() {
        let manager = configured();
        let source = manager.classify("/root/src/classes/Entity.ts").unwrap();
        assert_eq!(source.file_type, "Source");
        assert_eq!(source.identity_key.as_str(), "classes/entity");
        assert_eq!(source.allowed_target_types, vec!["Test", "Documentation"]);

        let docs = manager.classify("/root/docs/classes/Entity.md").unwrap();
        assert_eq!(docs.allowed_target_types, vec!["Source"]);

        assert!(manager.classify("/root/readme.txt").is_none());
    }

    #[test]
    fn test_first_declared_type_wins() {
        let config = LinkConfig::new(
            vec![
                FileTypeDefinition::new("Specific", "1", [r"/src/(\w+)\.test\.ts$"]),
                FileTypeDefinition::new("General", "2", [r"/src/(.+)\.ts$"]),
            ],
            vec![],
        );
        let mut manager = RelationshipManager::new();
        manager.apply_configuration(&config).unwrap();
        assert_eq!(manager.classify("/src/a.test.ts").unwrap().file_type, "Specific");
        assert_eq!(manager.classify("/src/a.ts").unwrap().file_type, "General");
    }

    #[test]
    fn test_only_link_from_restricts_incoming() {
        let config = LinkConfig::new(
            vec![
                FileTypeDefinition::new("Source", "S", [r"/src/(\w+)\.ts$"]),
                FileTypeDefinition::new("Test", "T", [r"/test/(\w+)\.ts$"]).only_link_from(Vec::<String>::new()),
            ],
            vec![],
        );
        let mut manager = RelationshipManager::new();
        manager.apply_configuration(&config).unwrap();
        manager.apply_path_changes(&PathChanges::added(["/src/a.ts", "/test/a.ts"]));

        assert!(manager.get_linked_files("/src/a.ts").is_empty());
        assert_eq!(paths(&manager.get_linked_files("/test/a.ts")), vec!["/src/a.ts"]);
    }

    #[test]
    fn test_cache_survives_path_changes() {
        let mut manager = configured();
        manager.classify("/root/src/a.ts");
        manager.apply_path_changes(&PathChanges::added(["/root/test/a.test.ts"]));
        let before = manager.metrics().snapshot();
        manager.classify("/root/src/a.ts");
        let after = manager.metrics().snapshot();
        assert_eq!(after.classify_cache_hits, before.classify_cache_hits + 1);
        assert_eq!(after.classify_cache_misses, before.classify_cache_misses);
    }

    #[test]
    fn test_identical_configuration_is_noop() {
        let mut manager = configured();
        assert!(!manager.apply_configuration(&scenario_config()).unwrap());
        assert_eq!(manager.metrics().snapshot().configuration_rebuilds, 1);
    }

    #[test]
    fn test_failed_configuration_keeps_previous_state() {
        let mut manager = configured();
        manager.apply_path_changes(&PathChanges::added(["/root/src/a.ts"]));

        let mut broken = scenario_config();
        broken.ignore_patterns.push("(".to_string());
        assert!(manager.apply_configuration(&broken).is_err());

        assert_eq!(manager.config(), Some(&scenario_config()));
        assert!(manager.is_known("/root/src/a.ts"));
    }

    #[test]
    fn test_decoration_summary() {
        let mut manager = configured();
        manager.apply_path_changes(&PathChanges::added([
            "/root/src/a.ts",
            "/root/test/a.test.ts",
            "/root/docs/a.md",
        ]));

        let summary = manager.get_decoration_summary("/root/src/a.ts").unwrap();
        assert_eq!(summary.marker_text, "TD");
        assert_eq!(summary.tooltip, "Test + Documentation");
        assert!(manager.get_decoration_summary("/root/src/lonely.ts").is_none());
    }

    #[test]
    fn test_change_handler_receives_notifications() {
        let received: Arc<Mutex<Vec<ChangeNotification>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&received);

        let mut manager = RelationshipManager::new();
        manager.set_change_handler(move |n| sink.lock().unwrap().push(n.clone()));
        manager.apply_configuration(&scenario_config()).unwrap();
        manager.apply_path_changes(&PathChanges::added(["/root/src/a.ts"]));
        manager.apply_path_changes(&PathChanges::added(["/root/unrelated.txt"]));

        let received = received.lock().unwrap();
        assert_eq!(
            *received,
            vec![
                ChangeNotification::FullRefresh,
                ChangeNotification::Paths(vec!["/root/src/a.ts".to_string()]),
            ]
        );
    }

    #[test]
    fn test_file_creations() {
        let config = LinkConfig::new(
            vec![
                FileTypeDefinition::new("Source", "S", [r"/src/(.+)\.ts$"]),
                FileTypeDefinition::new("Test", "T", [r"/test/(.+)\.test\.ts$"])
                    .with_creation_pattern(
                        CreationPattern::new(
                            "Unit test",
                            vec![TransformationStep::replace(r"/src/(.+)\.ts$", "/test/${1}.test.ts")],
                        )
                        .only_from(["Source"])
                        .with_snippet("describe('', () => {});"),
                    ),
            ],
            vec![],
        );
        let mut manager = RelationshipManager::new();
        manager.apply_configuration(&config).unwrap();
        manager.apply_path_changes(&PathChanges::added(["/r/src/a.ts", "/r/src/b.ts", "/r/test/b.test.ts"]));

        let creations = manager.get_all_file_creations_from("/r/src/a.ts");
        assert_eq!(creations.len(), 1);
        assert_eq!(creations[0].type_name, "Test");
        assert_eq!(creations[0].full_path, "/r/test/a.test.ts");
        assert_eq!(
            creations[0].initial_content_snippet.as_deref(),
            Some("describe('', () => {});")
        );

        // Target already exists.
        assert!(manager.get_all_file_creations_from("/r/src/b.ts").is_empty());

        let opportunities = manager.get_all_creation_opportunities();
        assert_eq!(opportunities.len(), 1);
        assert_eq!(opportunities[0].source_path, "/r/src/a.ts");
    }

    #[test]
    fn test_reset_returns_to_unconfigured() {
        let mut manager = configured();
        manager.apply_path_changes(&PathChanges::added(["/root/src/a.ts"]));
        manager.reset();
        assert!(!manager.is_configured());
        assert_eq!(manager.known_path_count(), 0);
        assert!(manager.classify("/root/src/a.ts").is_none());
        assert!(manager.file_type_names().is_empty());
    }
}
