//! Per-file-type pattern matching, key extraction and path indexing.

use std::collections::HashMap;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::config::{CreationPattern, FileTypeDefinition, PatternSpec};
use crate::error::{ConfigError, ConfigResult};
use crate::path::{to_forward_slashes, IdentityKey, NormalizedPath};
use crate::transform::{apply_transformations, CompiledTransformation};

/// Name of the capture group used as key when a pattern names none.
pub const DEFAULT_KEY_GROUP: &str = "key";

/// A file linked to the queried path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedFileRecord {
    pub type_name: String,
    pub icon: String,
    pub full_path: String,
}

/// Mapping from identity key to the paths indexed under it, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathIndex {
    by_key: HashMap<IdentityKey, Vec<String>>,
    keys_by_path: HashMap<NormalizedPath, Vec<IdentityKey>>,
}

impl PathIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Index `path` under `keys`. Returns `false` if the path is already
    /// indexed or there are no keys.
    pub fn insert(&mut self, path: &str, keys: Vec<IdentityKey>) -> bool {
        let normalized = NormalizedPath::new(path);
        if keys.is_empty() || self.keys_by_path.contains_key(&normalized) {
            return false;
        }

        for key in &keys {
            self.by_key
                .entry(key.clone())
                .or_default()
                .push(path.to_string());
        }
        self.keys_by_path.insert(normalized, keys);
        true
    }

    /// Remove `path` from every key it was indexed under. Unknown paths are
    /// a no-op returning `false`.
    pub fn remove(&mut self, path: &str) -> bool {
        let normalized = NormalizedPath::new(path);
        let Some(keys) = self.keys_by_path.remove(&normalized) else {
            return false;
        };

        for key in keys {
            if let Some(paths) = self.by_key.get_mut(&key) {
                paths.retain(|p| NormalizedPath::new(p) != normalized);
                if paths.is_empty() {
                    self.by_key.remove(&key);
                }
            }
        }
        true
    }

    /// Paths indexed under `key`, in insertion order.
    pub fn get(&self, key: &IdentityKey) -> &[String] {
        self.by_key.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Keys `path` is indexed under.
    pub fn keys_of(&self, path: &str) -> &[IdentityKey] {
        self.keys_by_path
            .get(&NormalizedPath::new(path))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether `path` is indexed.
    pub fn contains(&self, path: &str) -> bool {
        self.keys_by_path.contains_key(&NormalizedPath::new(path))
    }

    /// Number of indexed paths.
    pub fn len(&self) -> usize {
        self.keys_by_path.len()
    }

    /// Whether nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.keys_by_path.is_empty()
    }

    /// Number of distinct keys.
    pub fn key_count(&self) -> usize {
        self.by_key.len()
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.by_key.clear();
        self.keys_by_path.clear();
    }
}

#[derive(Debug, Clone)]
struct CompiledPattern {
    regex: Regex,
    key_group: usize,
}

impl CompiledPattern {
    fn compile(file_type: &str, spec: &PatternSpec) -> ConfigResult<Self> {
        let regex = RegexBuilder::new(spec.regex())
            .case_insensitive(true)
            .build()
            .map_err(|e| {
                ConfigError::invalid_regex(format!("file type {}", file_type), spec.regex(), e)
            })?;

        let key_group = match spec.key_group() {
            Some(group) => group
                .index_in(&regex)
                .ok_or_else(|| ConfigError::MissingKeyGroup {
                    file_type: file_type.to_string(),
                    pattern: spec.regex().to_string(),
                    group: group.to_string(),
                })?,
            None => regex
                .capture_names()
                .position(|n| n == Some(DEFAULT_KEY_GROUP))
                .unwrap_or(if regex.captures_len() > 1 { 1 } else { 0 }),
        };

        Ok(Self { regex, key_group })
    }

    fn raw_key<'p>(&self, path: &'p str) -> Option<&'p str> {
        let caps = self.regex.captures(path)?;
        caps.get(self.key_group).map(|m| m.as_str())
    }
}

/// A creation pattern with its steps compiled.
#[derive(Debug, Clone)]
pub struct CompiledCreationPattern {
    name: String,
    only_from: Option<Vec<String>>,
    steps: Vec<CompiledTransformation>,
    snippet: Option<String>,
}

impl CompiledCreationPattern {
    fn compile(file_type: &str, pattern: &CreationPattern) -> ConfigResult<Self> {
        let steps = pattern
            .transformations
            .iter()
            .map(CompiledTransformation::compile)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| ConfigError::CreationPattern {
                file_type: file_type.to_string(),
                pattern: pattern.name.clone(),
                source,
            })?;

        Ok(Self {
            name: pattern.name.clone(),
            only_from: pattern.only_from.clone(),
            steps,
            snippet: pattern.initial_content_snippet.clone(),
        })
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Seed content for created files.
    pub fn snippet(&self) -> Option<&str> {
        self.snippet.as_deref()
    }

    /// Whether this pipeline applies to paths of `source_type`.
    pub fn admits_source(&self, source_type: &str) -> bool {
        self.only_from
            .as_ref()
            .map_or(true, |names| names.iter().any(|n| n == source_type))
    }

    /// Derive a target path from `source`.
    pub fn derive(&self, source: &str) -> String {
        apply_transformations(source, &self.steps)
    }
}

/// Matcher and index for one file type.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    definition: FileTypeDefinition,
    patterns: Vec<CompiledPattern>,
    creation_patterns: Vec<CompiledCreationPattern>,
    index: PathIndex,
}

impl PatternMatcher {
    /// Compile a file type definition.
    pub fn new(definition: FileTypeDefinition) -> ConfigResult<Self> {
        let patterns = definition
            .patterns
            .iter()
            .map(|spec| CompiledPattern::compile(&definition.name, spec))
            .collect::<ConfigResult<Vec<_>>>()?;
        let creation_patterns = definition
            .creation_patterns
            .iter()
            .map(|p| CompiledCreationPattern::compile(&definition.name, p))
            .collect::<ConfigResult<Vec<_>>>()?;

        Ok(Self {
            definition,
            patterns,
            creation_patterns,
            index: PathIndex::new(),
        })
    }

    /// Type name.
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// Display icon.
    pub fn icon(&self) -> &str {
        &self.definition.icon
    }

    /// The definition this matcher was built from.
    pub fn definition(&self) -> &FileTypeDefinition {
        &self.definition
    }

    /// Compiled creation patterns, in declared order.
    pub fn creation_patterns(&self) -> &[CompiledCreationPattern] {
        &self.creation_patterns
    }

    /// The path index.
    pub fn index(&self) -> &PathIndex {
        &self.index
    }

    /// Whether any pattern matches `path`. Ignore rules are not consulted.
    pub fn matches(&self, path: &str) -> bool {
        let path = to_forward_slashes(path);
        self.patterns.iter().any(|p| p.regex.is_match(&path))
    }

    /// Lower-cased key region of the first matching pattern, before stripping.
    pub fn extract_raw_key(&self, path: &str) -> Option<String> {
        let path = to_forward_slashes(path);
        let pattern = self.patterns.iter().find(|p| p.regex.is_match(&path))?;
        pattern.raw_key(&path).map(str::to_lowercase)
    }

    /// Identity key of `path` under the first matching pattern.
    pub fn extract_key(&self, path: &str) -> Option<IdentityKey> {
        self.extract_raw_key(path)
            .and_then(|raw| self.normalize_key(&raw))
    }

    /// Apply this type's key normalization to a raw key.
    pub fn normalize_key(&self, raw: &str) -> Option<IdentityKey> {
        IdentityKey::normalize(raw, self.definition.ignore_non_alpha_numeric_characters)
    }

    /// Keys of `path` under every matching pattern, deduplicated.
    pub fn keys_for(&self, path: &str) -> Vec<IdentityKey> {
        let path = to_forward_slashes(path);
        let mut keys: Vec<IdentityKey> = Vec::new();
        for key in self
            .patterns
            .iter()
            .filter_map(|p| p.raw_key(&path))
            .filter_map(|raw| self.normalize_key(raw))
        {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }

    /// Index the given paths under every key they produce. Returns how many
    /// were newly indexed.
    pub fn add_paths<I, S>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut added = 0;
        for path in paths {
            let path = path.as_ref();
            let keys = self.keys_for(path);
            if self.index.insert(path, keys) {
                added += 1;
            }
        }
        added
    }

    /// Remove the given paths. Unknown paths are ignored.
    pub fn remove_paths<I, S>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        paths
            .into_iter()
            .filter(|path| self.index.remove(path.as_ref()))
            .count()
    }

    /// Files indexed under `key`, in insertion order. Empty when none.
    pub fn get_files_matching(&self, key: &IdentityKey) -> Vec<RelatedFileRecord> {
        self.index
            .get(key)
            .iter()
            .map(|full_path| RelatedFileRecord {
                type_name: self.definition.name.clone(),
                icon: self.definition.icon.clone(),
                full_path: full_path.clone(),
            })
            .collect()
    }

    /// Whether this type may link to `other`.
    pub fn allows_links_to(&self, other: &str) -> bool {
        allows(&self.definition.only_link_to, other)
    }

    /// Whether this type accepts links from `other`.
    pub fn allows_links_from(&self, other: &str) -> bool {
        allows(&self.definition.only_link_from, other)
    }

    /// Clear the index. Idempotent.
    pub fn reset(&mut self) {
        self.index.clear();
    }

    /// Release indexed state. Alias of [`PatternMatcher::reset`].
    pub fn dispose(&mut self) {
        self.reset();
    }
}

fn allows(list: &Option<Vec<String>>, other: &str) -> bool {
    match list {
        None => true,
        Some(names) => names.iter().any(|n| n == other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GroupRef;

    fn source_type() -> PatternMatcher {
        PatternMatcher::new(FileTypeDefinition::new(
            "Source",
            "S",
            [r".*/src/(?P<key>.+)\.ts$"],
        ))
        .unwrap()
    }

    #[test]
    fn test_matches_and_extracts_key() {
        let m = source_type();
        assert!(m.matches("/root/src/classes/Entity.ts"));
        assert!(!m.matches("/root/docs/classes/Entity.md"));
        assert_eq!(
            m.extract_key("/root/src/classes/Entity.ts").unwrap().as_str(),
            "classes/entity"
        );
        assert_eq!(m.extract_key("/root/lib/x.ts"), None);
    }

    #[test]
    fn test_windows_separators_match() {
        let m = source_type();
        assert!(m.matches(r"C:\root\src\classes\Entity.ts"));
        assert_eq!(
            m.extract_key(r"C:\root\src\classes\Entity.ts").unwrap().as_str(),
            "classes/entity"
        );
    }

    #[test]
    fn test_key_rule_defaults() {
        let positional =
            PatternMatcher::new(FileTypeDefinition::new("A", "a", [r"/a/(\w+)\.x$"])).unwrap();
        assert_eq!(positional.extract_key("/a/Foo.x").unwrap().as_str(), "foo");

        let whole = PatternMatcher::new(FileTypeDefinition::new("B", "b", [r"\w+\.y$"])).unwrap();
        assert_eq!(whole.extract_key("/b/Foo.y").unwrap().as_str(), "foo.y");
    }

    #[test]
    fn test_explicit_key_group() {
        let mut definition = FileTypeDefinition::new("Docs", "D", Vec::<String>::new());
        definition.patterns.push(PatternSpec::Detailed {
            regex: r"/docs/(\w+)/(?P<topic>\w+)\.md$".to_string(),
            key_group: Some(GroupRef::from("topic")),
        });
        let m = PatternMatcher::new(definition).unwrap();
        assert_eq!(m.extract_key("/docs/guide/Intro.md").unwrap().as_str(), "intro");
    }

    #[test]
    fn test_missing_key_group_rejected() {
        let mut definition = FileTypeDefinition::new("Docs", "D", Vec::<String>::new());
        definition.patterns.push(PatternSpec::Detailed {
            regex: r"/docs/(\w+)\.md$".to_string(),
            key_group: Some(GroupRef::Index(4)),
        });
        assert!(matches!(
            PatternMatcher::new(definition),
            Err(ConfigError::MissingKeyGroup { .. })
        ));
    }

    #[test]
    fn test_strip_non_alphanumeric() {
        let m = PatternMatcher::new(
            FileTypeDefinition::new("S", "s", [r"/src/(.+)\.ts$"]).ignoring_non_alphanumeric(),
        )
        .unwrap();
        assert_eq!(m.extract_key("/src/my-dir/My_Entity.ts").unwrap().as_str(), "mydirmyentity");
        assert_eq!(m.normalize_key("a/b-c").unwrap().as_str(), "abc");
    }

    #[test]
    fn test_multiple_patterns_index_every_key() {
        let mut m = PatternMatcher::new(FileTypeDefinition::new(
            "Style",
            "C",
            [r"/styles/(\w+)\.\w+$", r"/styles/(\w+\.\w+)$"],
        ))
        .unwrap();
        m.add_paths(["/styles/button.scss"]);

        let by_topic = IdentityKey::normalize("button", false).unwrap();
        let by_file = IdentityKey::normalize("button.scss", false).unwrap();
        assert_eq!(m.get_files_matching(&by_topic).len(), 1);
        assert_eq!(m.get_files_matching(&by_file).len(), 1);
        assert_eq!(m.index().keys_of("/styles/button.scss"), &[by_topic.clone(), by_file]);
        // Classification still uses the first matching pattern.
        assert_eq!(m.extract_key("/styles/button.scss"), Some(by_topic));
    }

    #[test]
    fn test_duplicate_keys_across_patterns_collapse() {
        let mut m = PatternMatcher::new(FileTypeDefinition::new(
            "Source",
            "S",
            [r"/src/(\w+)\.ts$", r"/(\w+)\.ts$"],
        ))
        .unwrap();

        assert_eq!(m.keys_for("/src/entity.ts").len(), 1);
        m.add_paths(["/src/entity.ts"]);
        assert_eq!(m.index().key_count(), 1);
    }

    #[test]
    fn test_add_remove_restores_index() {
        let mut m = source_type();
        m.add_paths(["/root/src/a.ts"]);
        let before = m.index().clone();

        let batch = ["/root/src/b.ts", "/root/src/nested/c.ts", "/root/src/A2.ts"];
        assert_eq!(m.add_paths(batch), 3);
        assert_eq!(m.remove_paths(batch), 3);
        assert_eq!(m.index(), &before);
    }

    #[test]
    fn test_removing_unknown_is_noop() {
        let mut m = source_type();
        m.add_paths(["/root/src/a.ts"]);
        assert_eq!(m.remove_paths(["/root/src/zzz.ts", "/elsewhere"]), 0);
        assert_eq!(m.index().len(), 1);
    }

    #[test]
    fn test_files_matching_preserves_insertion_order() {
        let mut m = PatternMatcher::new(FileTypeDefinition::new("T", "t", [r"/(\w+)\.\w+$"])).unwrap();
        m.add_paths(["/z/entity.ts", "/a/entity.js", "/m/entity.py"]);
        let key = IdentityKey::normalize("entity", false).unwrap();

        let first = m.get_files_matching(&key);
        let paths: Vec<_> = first.iter().map(|r| r.full_path.as_str()).collect();
        assert_eq!(paths, vec!["/z/entity.ts", "/a/entity.js", "/m/entity.py"]);
        assert_eq!(m.get_files_matching(&key), first);

        let missing = IdentityKey::normalize("other", false).unwrap();
        assert!(m.get_files_matching(&missing).is_empty());
    }

    #[test]
    fn test_adding_twice_does_not_duplicate() {
        let mut m = source_type();
        assert_eq!(m.add_paths(["/root/src/a.ts"]), 1);
        assert_eq!(m.add_paths(["/root/SRC/A.ts"]), 0);
        assert_eq!(m.index().len(), 1);
    }

    #[test]
    fn test_link_permissions() {
        let open = PatternMatcher::new(FileTypeDefinition::new("A", "a", ["a"])).unwrap();
        assert!(open.allows_links_to("B"));
        assert!(open.allows_links_from("B"));

        let closed = PatternMatcher::new(
            FileTypeDefinition::new("A", "a", ["a"])
                .only_link_to(Vec::<String>::new())
                .only_link_from(Vec::<String>::new()),
        )
        .unwrap();
        assert!(!closed.allows_links_to("B"));
        assert!(!closed.allows_links_from("B"));

        let listed = PatternMatcher::new(
            FileTypeDefinition::new("A", "a", ["a"]).only_link_to(["B"]).only_link_from(["C"]),
        )
        .unwrap();
        assert!(listed.allows_links_to("B"));
        assert!(!listed.allows_links_to("C"));
        assert!(listed.allows_links_from("C"));
        assert!(!listed.allows_links_from("B"));
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut m = source_type();
        m.add_paths(["/root/src/a.ts"]);
        m.reset();
        m.dispose();
        assert!(m.index().is_empty());
        assert_eq!(m.index().key_count(), 0);
    }

    #[test]
    fn test_creation_pattern_source_filter() {
        let definition = FileTypeDefinition::new("Test", "T", [r"/test/(.+)\.test\.ts$"])
            .with_creation_pattern(
                CreationPattern::new(
                    "From source",
                    vec![crate::config::TransformationStep::replace(
                        r"/src/(.+)\.ts$",
                        "/test/${1}.test.ts",
                    )],
                )
                .only_from(["Source"]),
            );
        let m = PatternMatcher::new(definition).unwrap();
        let pattern = &m.creation_patterns()[0];
        assert!(pattern.admits_source("Source"));
        assert!(!pattern.admits_source("Docs"));
        assert_eq!(pattern.derive("/root/src/a/b.ts"), "/root/test/a/b.test.ts");
    }
}
