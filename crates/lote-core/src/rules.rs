//! Builtin Bucket Rules
//!
//! Compiled-in classification table and filter lists.
//! Rules are evaluated in declaration order; the first rule whose key
//! appears in a file's path wins.

use serde::Serialize;

/// Upper bound on files per output artifact
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Bucket that receives root-level configuration files via the fallback
pub const CONFIG_BUCKET: &str = "4_CONFIGURACOES";

/// Paths containing this marker never take the root-config fallback
pub const SOURCE_ROOT_MARKER: &str = "src";

/// Builtin rules, in evaluation order. Keys use `/` only; paths are
/// normalized before matching.
pub const BUILTIN_RULES: &[BucketRule] = &[
    BucketRule {
        name: "1_TELAS_E_ROTAS",
        keys: &["src/app"],
    },
    BucketRule {
        name: "2_COMPONENTES_VISUAIS",
        keys: &["src/components"],
    },
    BucketRule {
        name: "3_REGRAS_BANCO_DADOS",
        keys: &["src/lib", "src/actions"],
    },
    BucketRule {
        name: CONFIG_BUCKET,
        keys: &["package.json", "tsconfig.json", "next.config"],
    },
];

/// Extensions (with leading dot) eligible for collection
pub const ALLOWED_EXTENSIONS: &[&str] = &[".ts", ".tsx", ".sql", ".css", ".json", ".md"];

/// Exact file names never collected (lockfiles, generated declarations)
pub const IGNORED_FILES: &[&str] = &["package-lock.json", "next-env.d.ts", "yarn.lock"];

/// Directory names pruned during traversal
pub const IGNORED_DIRS: &[&str] = &["node_modules", ".next", ".git", ".vscode", "dist", "build"];

/// Well-known configuration files routed to [`CONFIG_BUCKET`] when they
/// live outside the source root
pub const ROOT_CONFIG_FILES: &[&str] = &[
    "package.json",
    "next.config.ts",
    "next.config.js",
    "tailwind.config.js",
    "tsconfig.json",
    "middleware.ts",
];

/// Static rule definition
#[derive(Debug, Clone)]
pub struct BucketRule {
    /// Bucket name, also the artifact name prefix
    pub name: &'static str,
    /// Path substrings; any one of them qualifies a file
    pub keys: &'static [&'static str],
}

/// Runtime rule definition
///
/// Built from [`BUILTIN_RULES`] or supplied directly (tests, embedders).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleDef {
    pub name: String,
    pub keys: Vec<String>,
}

impl RuleDef {
    pub fn new<I, S>(name: impl Into<String>, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// True if any key occurs in the (normalized) path
    pub fn matches(&self, path: &str) -> bool {
        self.keys.iter().any(|k| path.contains(k.as_str()))
    }
}

impl From<&BucketRule> for RuleDef {
    fn from(builtin: &BucketRule) -> Self {
        Self {
            name: builtin.name.to_string(),
            keys: builtin.keys.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Builtin rules converted to their runtime form, order preserved
pub fn builtin_rules() -> Vec<RuleDef> {
    BUILTIN_RULES.iter().map(RuleDef::from).collect()
}
