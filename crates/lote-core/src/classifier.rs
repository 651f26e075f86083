//! Bucket Classifier
//!
//! Decides, from a file's path and base name alone, whether it is collected
//! and which bucket it belongs to.

use std::path::Path;

use crate::config::BundleConfig;

/// Outcome of classifying a single file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict<'a> {
    /// Assigned to the named bucket
    Bucket(&'a str),
    /// Rejected by the extension allow-list or the ignored-name list
    Filtered,
    /// Passed the filters but matched no rule and no fallback
    Unclassified,
}

/// Normalize a path to a `/`-separated string.
///
/// Rule keys are written with `/` only, so every path goes through here
/// once before matching.
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Extension including the leading dot, or an empty string.
///
/// Dotfiles such as `.env` have no extension.
pub fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default()
}

pub struct Classifier<'a> {
    config: &'a BundleConfig,
}

impl<'a> Classifier<'a> {
    pub fn new(config: &'a BundleConfig) -> Self {
        Self { config }
    }

    /// Extension and ignored-name filters. Applied before any rule.
    pub fn is_collectable(&self, file_name: &str) -> bool {
        let ext = extension_of(file_name);
        if !self.config.allowed_extensions.iter().any(|e| *e == ext) {
            return false;
        }
        !self.config.ignored_files.iter().any(|f| f == file_name)
    }

    /// Bucket for an already-filtered file, first match wins.
    ///
    /// `path` must be normalized (see [`normalize_path`]).
    pub fn bucket_for(&self, path: &str, file_name: &str) -> Option<&'a str> {
        if let Some(rule) = self.config.rules.iter().find(|r| r.matches(path)) {
            return Some(rule.name.as_str());
        }

        let outside_source_root = !path.contains(self.config.source_root_marker.as_str());
        if outside_source_root && self.config.root_config_files.iter().any(|f| f == file_name) {
            return Some(self.config.config_bucket.as_str());
        }

        None
    }

    /// Full pipeline: filters, then rules, then the root-config fallback
    pub fn classify(&self, path: &str, file_name: &str) -> Verdict<'a> {
        if !self.is_collectable(file_name) {
            return Verdict::Filtered;
        }
        match self.bucket_for(path, file_name) {
            Some(bucket) => Verdict::Bucket(bucket),
            None => Verdict::Unclassified,
        }
    }
}
