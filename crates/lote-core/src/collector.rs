use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;

use crate::classifier::{normalize_path, Classifier, Verdict};
use crate::config::BundleConfig;
use crate::error::{LoteError, Result};

/// A collected file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketEntry {
    /// Path relative to the root, `/`-separated. Sort key and display name.
    pub relative: String,
    /// On-disk location used when reading contents
    #[serde(skip)]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct Bucket {
    pub name: String,
    pub entries: Vec<BucketEntry>,
}

impl Bucket {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Byte-lexicographic order over the relative path
    pub fn sort(&mut self) {
        self.entries.sort_by(|a, b| a.relative.cmp(&b.relative));
    }
}

/// Counters gathered while walking the tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    pub files_seen: usize,
    pub filtered: usize,
    pub unclassified: usize,
}

/// Result of a scan: every bucket in evaluation order, members sorted
#[derive(Debug, Clone, Serialize)]
pub struct Collection {
    pub buckets: Vec<Bucket>,
    pub stats: ScanStats,
}

impl Collection {
    pub fn non_empty(&self) -> impl Iterator<Item = &Bucket> {
        self.buckets.iter().filter(|b| !b.is_empty())
    }
}

/// Fail fast when the root cannot be listed at all
fn check_root(root: &Path) -> Result<()> {
    let metadata = fs::metadata(root).map_err(|e| match e.kind() {
        ErrorKind::NotFound => LoteError::RootNotFound {
            path: root.to_path_buf(),
        },
        _ => LoteError::RootUnreadable {
            path: root.to_path_buf(),
            message: e.to_string(),
        },
    })?;

    if !metadata.is_dir() {
        return Err(LoteError::RootUnreadable {
            path: root.to_path_buf(),
            message: "not a directory".to_string(),
        });
    }

    fs::read_dir(root).map_err(|e| LoteError::RootUnreadable {
        path: root.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok(())
}

/// Walk `root` once and sort every surviving file into its bucket.
///
/// Ignored directories are pruned, so nothing below them is visited.
/// File contents are not read. Unreadable entries below the root are
/// skipped; only an unusable root is an error.
pub fn collect(root: &Path, config: &BundleConfig) -> Result<Collection> {
    check_root(root)?;

    let classifier = Classifier::new(config);
    let mut buckets: Vec<Bucket> = config.bucket_names().into_iter().map(Bucket::new).collect();
    let mut stats = ScanStats::default();

    let walker = WalkDir::new(root).into_iter().filter_entry(|e| {
        !(e.depth() > 0
            && e.file_type().is_dir()
            && config.is_ignored_dir(&e.file_name().to_string_lossy()))
    });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(LoteError::RootUnreadable {
                    path: root.to_path_buf(),
                    message: e.to_string(),
                });
            }
            Err(_) => continue,
        };

        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let relative = match path.strip_prefix(root) {
            Ok(r) => normalize_path(r),
            Err(_) => continue,
        };
        let file_name = entry.file_name().to_string_lossy();
        stats.files_seen += 1;

        match classifier.classify(&relative, &file_name) {
            Verdict::Bucket(name) => {
                if let Some(bucket) = buckets.iter_mut().find(|b| b.name == name) {
                    bucket.entries.push(BucketEntry {
                        relative,
                        path: path.to_path_buf(),
                    });
                }
            }
            Verdict::Filtered => stats.filtered += 1,
            Verdict::Unclassified => stats.unclassified += 1,
        }
    }

    for bucket in &mut buckets {
        bucket.sort();
    }

    Ok(Collection { buckets, stats })
}
