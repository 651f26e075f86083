use crate::rules::{
    builtin_rules, RuleDef, ALLOWED_EXTENSIONS, CONFIG_BUCKET, DEFAULT_BATCH_SIZE,
    IGNORED_DIRS, IGNORED_FILES, ROOT_CONFIG_FILES, SOURCE_ROOT_MARKER,
};

/// Everything the collector and writer need to know about a run.
///
/// Threaded explicitly through every component; there is no global state.
#[derive(Debug, Clone)]
pub struct BundleConfig {
    /// Classification rules, evaluated in order
    pub rules: Vec<RuleDef>,
    /// Allowed extensions, with leading dot
    pub allowed_extensions: Vec<String>,
    /// Exact file names to skip
    pub ignored_files: Vec<String>,
    /// Directory names whose subtrees are pruned
    pub ignored_dirs: Vec<String>,
    /// Fallback names for root-level configuration files
    pub root_config_files: Vec<String>,
    /// Paths containing this substring never take the fallback
    pub source_root_marker: String,
    /// Bucket receiving fallback matches
    pub config_bucket: String,
    /// Maximum members per artifact (always >= 1)
    pub batch_size: usize,
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl BundleConfig {
    /// Compiled-in defaults
    pub fn with_defaults() -> Self {
        Self {
            rules: builtin_rules(),
            allowed_extensions: to_strings(ALLOWED_EXTENSIONS),
            ignored_files: to_strings(IGNORED_FILES),
            ignored_dirs: to_strings(IGNORED_DIRS),
            root_config_files: to_strings(ROOT_CONFIG_FILES),
            source_root_marker: SOURCE_ROOT_MARKER.to_string(),
            config_bucket: CONFIG_BUCKET.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Set the batch size. Zero is clamped to one.
    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Replace the rule table
    pub fn rules(mut self, rules: Vec<RuleDef>) -> Self {
        self.rules = rules;
        self
    }

    pub fn is_ignored_dir(&self, name: &str) -> bool {
        self.ignored_dirs.iter().any(|d| d == name)
    }

    /// Bucket names in evaluation order, config bucket included even when
    /// no rule declares it
    pub fn bucket_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.iter().map(|r| r.name.as_str()).collect();
        if !names.contains(&self.config_bucket.as_str()) {
            names.push(self.config_bucket.as_str());
        }
        names
    }
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}
