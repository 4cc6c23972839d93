//! Configuration schema for file types, link permissions and creation patterns.
//!
//! The schema mirrors the settings document an editor host hands over, so keys
//! are camelCase on the wire:
//!
//! ```json
//! {
//!   "fileTypes": [
//!     {
//!       "name": "Source",
//!       "icon": "S",
//!       "patterns": [".*/src/(?P<key>.+)\\.ts$"],
//!       "onlyLinkTo": ["Test"],
//!       "creationPatterns": []
//!     }
//!   ],
//!   "ignorePatterns": ["/node_modules/"]
//! }
//! ```

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::case::CaseFormat;
use crate::error::{ConfigError, ConfigResult};
use crate::transform::CompiledTransformation;

/// Name of the configuration file looked up at a workspace root.
pub const CONFIG_FILENAME: &str = "filekin.json";

/// Root configuration: ordered file types plus ignore patterns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkConfig {
    /// File types in declared order. Order decides classification ties.
    #[serde(default)]
    pub file_types: Vec<FileTypeDefinition>,

    /// Regexes (case-insensitive) excluding paths from every query.
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
}

/// A named classification rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileTypeDefinition {
    /// Unique, stable identifier.
    pub name: String,

    /// Short display token used in decorations.
    #[serde(default)]
    pub icon: String,

    /// Patterns tried in order; the first match decides the key.
    #[serde(default)]
    pub patterns: Vec<PatternSpec>,

    /// Types this type may link to. `None` = all, empty = none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub only_link_to: Option<Vec<String>>,

    /// Types this type accepts links from. `None` = all, empty = none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub only_link_from: Option<Vec<String>>,

    /// Strip everything but alphanumerics from extracted keys.
    #[serde(default)]
    pub ignore_non_alpha_numeric_characters: bool,

    /// Pipelines deriving a path of this type from a path of another type.
    #[serde(default)]
    pub creation_patterns: Vec<CreationPattern>,
}

impl FileTypeDefinition {
    /// Create a definition with the given name, icon and regex patterns.
    pub fn new<I, S>(name: impl Into<String>, icon: impl Into<String>, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            icon: icon.into(),
            patterns: patterns
                .into_iter()
                .map(|p| PatternSpec::Regex(p.into()))
                .collect(),
            only_link_to: None,
            only_link_from: None,
            ignore_non_alpha_numeric_characters: false,
            creation_patterns: Vec::new(),
        }
    }

    /// Restrict outgoing links to the given types.
    pub fn only_link_to<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.only_link_to = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Restrict incoming links to the given types.
    pub fn only_link_from<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.only_link_from = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Enable non-alphanumeric stripping of keys.
    pub fn ignoring_non_alphanumeric(mut self) -> Self {
        self.ignore_non_alpha_numeric_characters = true;
        self
    }

    /// Append a creation pattern.
    pub fn with_creation_pattern(mut self, pattern: CreationPattern) -> Self {
        self.creation_patterns.push(pattern);
        self
    }
}

/// A path pattern with its key-extraction rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatternSpec {
    /// Bare regex; key taken from group `key`, else group 1, else the whole match.
    Regex(String),
    /// Regex with an explicit key group.
    Detailed {
        regex: String,
        #[serde(default, rename = "keyGroup", skip_serializing_if = "Option::is_none")]
        key_group: Option<GroupRef>,
    },
}

impl PatternSpec {
    /// The regex source.
    pub fn regex(&self) -> &str {
        match self {
            PatternSpec::Regex(regex) | PatternSpec::Detailed { regex, .. } => regex,
        }
    }

    /// The explicitly designated key group, if any.
    pub fn key_group(&self) -> Option<&GroupRef> {
        match self {
            PatternSpec::Regex(_) => None,
            PatternSpec::Detailed { key_group, .. } => key_group.as_ref(),
        }
    }
}

/// Reference to a regex capture group by position or by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupRef {
    Index(usize),
    Name(String),
}

impl GroupRef {
    /// Resolve to a positional index within `regex`.
    pub fn index_in(&self, regex: &Regex) -> Option<usize> {
        match self {
            GroupRef::Index(i) => (*i < regex.captures_len()).then_some(*i),
            GroupRef::Name(name) => regex
                .capture_names()
                .position(|n| n == Some(name.as_str())),
        }
    }
}

impl fmt::Display for GroupRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupRef::Index(i) => write!(f, "{}", i),
            GroupRef::Name(name) => write!(f, "{}", name),
        }
    }
}

impl From<usize> for GroupRef {
    fn from(value: usize) -> Self {
        GroupRef::Index(value)
    }
}

impl From<&str> for GroupRef {
    fn from(value: &str) -> Self {
        GroupRef::Name(value.to_string())
    }
}

/// A named pipeline deriving a new file path from an existing one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreationPattern {
    /// Display name of the pipeline.
    pub name: String,

    /// Source types this pipeline applies to. `None` = any linkable type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub only_from: Option<Vec<String>>,

    /// Steps applied in order to the source path.
    #[serde(default)]
    pub transformations: Vec<TransformationStep>,

    /// Seed content for the created file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_content_snippet: Option<String>,
}

impl CreationPattern {
    /// Create a pipeline from its steps.
    pub fn new(name: impl Into<String>, transformations: Vec<TransformationStep>) -> Self {
        Self {
            name: name.into(),
            only_from: None,
            transformations,
            initial_content_snippet: None,
        }
    }

    /// Restrict the pipeline to the given source types.
    pub fn only_from<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.only_from = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Set the seed content.
    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.initial_content_snippet = Some(snippet.into());
        self
    }
}

/// One step of a path transformation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformationStep {
    /// Guard: the step is skipped unless this matches the current path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_regex: Option<String>,

    /// Regex whose first match is replaced or re-cased.
    pub search_regex: String,

    /// Replacement with `$1`, `${1}` or `${name}` back-references.
    /// When absent, only `group_cases` are applied in place.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement_text: Option<String>,

    /// Capture groups to re-case.
    ///
    /// Without replacement text, groups are re-cased in place. If two of
    /// them overlap in a match, only the one starting later (or the longer
    /// one, for equal starts) is re-cased and the other is left as matched.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub group_cases: Vec<GroupCase>,
}

impl TransformationStep {
    /// Plain substitution step.
    pub fn replace(search_regex: impl Into<String>, replacement_text: impl Into<String>) -> Self {
        Self {
            test_regex: None,
            search_regex: search_regex.into(),
            replacement_text: Some(replacement_text.into()),
            group_cases: Vec::new(),
        }
    }

    /// In-place re-casing step with no replacement text.
    pub fn recase(search_regex: impl Into<String>) -> Self {
        Self {
            test_regex: None,
            search_regex: search_regex.into(),
            replacement_text: None,
            group_cases: Vec::new(),
        }
    }

    /// Guard the step with a test regex.
    pub fn when(mut self, test_regex: impl Into<String>) -> Self {
        self.test_regex = Some(test_regex.into());
        self
    }

    /// Re-case a capture group.
    pub fn with_group_case(mut self, group: impl Into<GroupRef>, case: CaseFormat) -> Self {
        self.group_cases.push(GroupCase {
            group: group.into(),
            case,
        });
        self
    }

    /// Compile this step, validating its regexes and groups.
    pub fn compile(&self) -> crate::error::TransformResult<CompiledTransformation> {
        CompiledTransformation::compile(self)
    }
}

/// A capture group and the case format applied to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupCase {
    pub group: GroupRef,
    pub case: CaseFormat,
}

impl LinkConfig {
    /// Create a configuration from file types and ignore patterns.
    pub fn new(file_types: Vec<FileTypeDefinition>, ignore_patterns: Vec<String>) -> Self {
        Self {
            file_types,
            ignore_patterns,
        }
    }

    /// Parse a configuration from JSON.
    pub fn from_json_str(contents: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Load a configuration file from disk.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&contents)?;
        debug!(
            path = %path.display(),
            file_types = config.file_types.len(),
            "Loaded link config"
        );
        Ok(config)
    }

    /// Validate the configuration by compiling every regex.
    ///
    /// Link permissions naming unknown types are reported as warnings only.
    pub fn validate(&self) -> ConfigResult<()> {
        self.check_names()?;
        self.compile_ignore_patterns()?;
        for definition in &self.file_types {
            crate::matcher::PatternMatcher::new(definition.clone())?;
        }
        self.warn_unknown_permissions();
        Ok(())
    }

    pub(crate) fn check_names(&self) -> ConfigResult<()> {
        let mut seen = HashSet::new();
        for (index, definition) in self.file_types.iter().enumerate() {
            if definition.name.trim().is_empty() {
                return Err(ConfigError::EmptyFileTypeName { index });
            }
            if !seen.insert(definition.name.as_str()) {
                return Err(ConfigError::DuplicateFileType {
                    name: definition.name.clone(),
                });
            }
        }
        Ok(())
    }

    pub(crate) fn compile_ignore_patterns(&self) -> ConfigResult<Vec<Regex>> {
        self.ignore_patterns
            .iter()
            .map(|pattern| {
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| ConfigError::invalid_regex("ignorePatterns", pattern, e))
            })
            .collect()
    }

    pub(crate) fn warn_unknown_permissions(&self) {
        let names: HashSet<&str> = self.file_types.iter().map(|t| t.name.as_str()).collect();
        for definition in &self.file_types {
            let lists = [
                ("onlyLinkTo", &definition.only_link_to),
                ("onlyLinkFrom", &definition.only_link_from),
            ];
            for (field, list) in lists {
                for unknown in list.iter().flatten().filter(|n| !names.contains(n.as_str())) {
                    warn!(
                        file_type = %definition.name,
                        field,
                        unknown = %unknown,
                        "Link permission names an unknown file type"
                    );
                }
            }
        }
    }
}
