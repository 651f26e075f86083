pub mod batch;
pub mod bundler;
pub mod classifier;
pub mod collector;
pub mod config;
pub mod error;
pub mod rules;
pub mod writer;

pub use batch::{artifact_name, plan_batches, suffix_for, Batch};
pub use bundler::{
    ArtifactCallback, BundlePlan, BundleReport, Bundler, PlannedArtifact, PlannedBucket,
};
pub use classifier::{normalize_path, Classifier, Verdict};
pub use collector::{collect, Bucket, BucketEntry, Collection, ScanStats};
pub use config::BundleConfig;
pub use error::{LoteError, Result};
pub use rules::{
    builtin_rules, BucketRule, RuleDef, ALLOWED_EXTENSIONS, BUILTIN_RULES, CONFIG_BUCKET,
    DEFAULT_BATCH_SIZE, IGNORED_DIRS, IGNORED_FILES, ROOT_CONFIG_FILES, SOURCE_ROOT_MARKER,
};
pub use writer::{render_batch, write_batch, ArtifactOutcome, MemberFailure};
