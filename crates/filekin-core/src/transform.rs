//! Regex-driven path rewriting.
//!
//! A transformation is an ordered list of steps folded over a path. Each step
//! is guarded by an optional test regex and either
//!
//! - substitutes the first match of its search regex,
//! - substitutes and re-cases selected back-references, or
//! - re-cases selected capture groups in place when it has no replacement.
//!
//! Output is never validated as a well-formed path.

use regex::{Captures, Regex};
use tracing::debug;

use crate::case::CaseFormat;
use crate::config::TransformationStep;
use crate::error::{TransformError, TransformResult};

const MARK_START: char = '\u{E000}';
const MARK_SEP: char = '\u{E001}';
const MARK_END: char = '\u{E002}';

/// A transformation step with its regexes compiled and groups resolved.
#[derive(Debug, Clone)]
pub struct CompiledTransformation {
    test: Option<Regex>,
    search: Regex,
    replacement: Option<String>,
    group_cases: Vec<(usize, CaseFormat)>,
}

impl CompiledTransformation {
    /// Compile a configured step.
    pub fn compile(step: &TransformationStep) -> TransformResult<Self> {
        let test = step
            .test_regex
            .as_deref()
            .map(|pattern| compile_regex("test", pattern))
            .transpose()?;
        let search = compile_regex("search", &step.search_regex)?;

        let mut group_cases: Vec<(usize, CaseFormat)> = Vec::with_capacity(step.group_cases.len());
        for group_case in &step.group_cases {
            let index = group_case
                .group
                .index_in(&search)
                .ok_or_else(|| TransformError::MissingGroup {
                    pattern: step.search_regex.clone(),
                    group: group_case.group.to_string(),
                })?;
            if !group_cases.iter().any(|(i, _)| *i == index) {
                group_cases.push((index, group_case.case));
            }
        }

        let replacement = match &step.replacement_text {
            Some(text) if !group_cases.is_empty() => {
                Some(mark_replacement(text, &search, &group_cases))
            }
            other => other.clone(),
        };

        Ok(Self {
            test,
            search,
            replacement,
            group_cases,
        })
    }

    /// Whether the guard admits `path`.
    pub fn applies_to(&self, path: &str) -> bool {
        self.test.as_ref().map_or(true, |test| test.is_match(path))
    }

    /// Apply this step to `path`. A step whose guard fails returns the input.
    pub fn apply(&self, path: &str) -> String {
        if !self.applies_to(path) {
            debug!(path, "Transformation guard did not match, skipping step");
            return path.to_string();
        }

        match (&self.replacement, self.group_cases.is_empty()) {
            (Some(replacement), true) => self
                .search
                .replacen(path, 1, replacement.as_str())
                .into_owned(),
            (Some(marked), false) => {
                let replaced = self.search.replacen(path, 1, marked.as_str());
                resolve_markers(&replaced)
            }
            (None, false) => match self.search.captures(path) {
                Some(caps) => splice_group_cases(path, &caps, &self.group_cases),
                None => path.to_string(),
            },
            (None, true) => path.to_string(),
        }
    }
}

/// Fold compiled steps over `source`, each consuming the previous output.
pub fn apply_transformations(source: &str, steps: &[CompiledTransformation]) -> String {
    steps
        .iter()
        .fold(source.to_string(), |path, step| step.apply(&path))
}

/// Compile and apply configured steps in one call.
pub fn apply_transformation_steps(
    source: &str,
    steps: &[TransformationStep],
) -> TransformResult<String> {
    let compiled = steps
        .iter()
        .map(CompiledTransformation::compile)
        .collect::<TransformResult<Vec<_>>>()?;
    Ok(apply_transformations(source, &compiled))
}

fn compile_regex(role: &'static str, pattern: &str) -> TransformResult<Regex> {
    Regex::new(pattern).map_err(|source| TransformError::InvalidRegex {
        role,
        pattern: pattern.to_string(),
        source,
    })
}

fn case_for(group_cases: &[(usize, CaseFormat)], index: usize) -> Option<CaseFormat> {
    group_cases
        .iter()
        .find(|(i, _)| *i == index)
        .map(|(_, case)| *case)
}

fn format_code(case: CaseFormat) -> usize {
    CaseFormat::ALL
        .iter()
        .position(|c| *c == case)
        .unwrap_or_default()
}

/// Rewrite back-references to re-cased groups as `START code SEP ${ref} END`.
///
/// Follows the replacement syntax of `regex`: `$$` is a literal dollar,
/// `${name}` is braced, and `$name` takes the longest run of `[_0-9A-Za-z]`.
fn mark_replacement(text: &str, search: &Regex, group_cases: &[(usize, CaseFormat)]) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    let mut rest = text;

    while let Some(dollar) = rest.find('$') {
        out.push_str(&rest[..dollar]);
        let after = &rest[dollar + 1..];

        if let Some(stripped) = after.strip_prefix('$') {
            out.push_str("$$");
            rest = stripped;
            continue;
        }

        let (name, consumed) = if let Some(braced) = after.strip_prefix('{') {
            match braced.find('}') {
                Some(close) => (&braced[..close], close + 2),
                None => ("", 0),
            }
        } else {
            let len = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            (&after[..len], len)
        };

        if name.is_empty() {
            out.push('$');
            rest = after;
            continue;
        }

        let index = match name.parse::<usize>() {
            Ok(i) => Some(i),
            Err(_) => search.capture_names().position(|n| n == Some(name)),
        };

        match index.and_then(|i| case_for(group_cases, i)) {
            Some(case) => {
                out.push(MARK_START);
                out.push_str(&format_code(case).to_string());
                out.push(MARK_SEP);
                out.push_str(&format!("${{{}}}", name));
                out.push(MARK_END);
            }
            None => {
                out.push('$');
                out.push_str(&after[..consumed]);
            }
        }
        rest = &after[consumed..];
    }

    out.push_str(rest);
    out
}

/// Replace each marked span with its case-formatted value, dropping markers.
fn resolve_markers(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(MARK_START) {
        out.push_str(&rest[..start]);
        let after = &rest[start + MARK_START.len_utf8()..];

        match parse_marked_span(after) {
            Some((case, value, consumed)) => {
                out.push_str(&case.apply(value));
                rest = &after[consumed..];
            }
            None => {
                out.push(MARK_START);
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

fn parse_marked_span(text: &str) -> Option<(CaseFormat, &str, usize)> {
    let sep = text.find(MARK_SEP)?;
    let code: usize = text[..sep].parse().ok()?;
    let case = *CaseFormat::ALL.get(code)?;

    let value_start = sep + MARK_SEP.len_utf8();
    let value_len = text[value_start..].find(MARK_END)?;
    let value = &text[value_start..value_start + value_len];

    Some((case, value, value_start + value_len + MARK_END.len_utf8()))
}

/// Re-case groups in place, splicing from the last span to the first so
/// earlier offsets stay valid.
fn splice_group_cases(path: &str, caps: &Captures<'_>, group_cases: &[(usize, CaseFormat)]) -> String {
    let mut spans: Vec<(usize, usize, CaseFormat)> = group_cases
        .iter()
        .filter_map(|(index, case)| caps.get(*index).map(|m| (m.start(), m.end(), *case)))
        .collect();
    spans.sort_by(|a, b| b.0.cmp(&a.0).then(b.1.cmp(&a.1)));

    let mut result = path.to_string();
    let mut boundary = usize::MAX;
    for (start, end, case) in spans {
        if end > boundary {
            debug!(start, end, "Skipping capture group overlapping a re-cased group");
            continue;
        }
        let formatted = case.apply(&path[start..end]);
        result.replace_range(start..end, &formatted);
        boundary = start;
    }

    result
}
