use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::batch::{plan_batches, Batch};
use crate::collector::{collect, Collection, ScanStats};
use crate::config::BundleConfig;
use crate::error::{LoteError, Result};
use crate::writer::{write_batch, ArtifactOutcome, MemberFailure};

/// Callback type for per-artifact progress reporting
pub type ArtifactCallback<'a> = Option<&'a dyn Fn(&ArtifactOutcome)>;

#[derive(Debug, Default, Serialize)]
pub struct BundleReport {
    pub stats: ScanStats,
    pub artifacts: Vec<ArtifactOutcome>,
}

impl BundleReport {
    pub fn written(&self) -> usize {
        self.artifacts.iter().filter(|a| a.is_written()).count()
    }

    pub fn failed(&self) -> usize {
        self.artifacts.len() - self.written()
    }

    /// Members that were replaced by an inline error marker
    pub fn member_failures(&self) -> Vec<&MemberFailure> {
        self.artifacts.iter().flat_map(|a| a.failures()).collect()
    }
}

/// Planned artifact, for dry runs
#[derive(Debug, Clone, Serialize)]
pub struct PlannedArtifact {
    pub name: String,
    pub members: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlannedBucket {
    pub name: String,
    pub files: usize,
    pub artifacts: Vec<PlannedArtifact>,
}

/// Everything a run would write, without touching the output directory
#[derive(Debug, Clone, Serialize)]
pub struct BundlePlan {
    pub batch_size: usize,
    pub buckets: Vec<PlannedBucket>,
    pub stats: ScanStats,
}

impl BundlePlan {
    pub fn artifact_count(&self) -> usize {
        self.buckets.iter().map(|b| b.artifacts.len()).sum()
    }
}

pub struct Bundler {
    config: BundleConfig,
}

impl Bundler {
    pub fn new(config: BundleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BundleConfig {
        &self.config
    }

    /// Scan `root` into buckets
    pub fn collect(&self, root: &Path) -> Result<Collection> {
        collect(root, &self.config)
    }

    /// Batches of every non-empty bucket, buckets in rule order
    pub fn batches<'c>(&self, collection: &'c Collection) -> Vec<Batch<'c>> {
        collection
            .non_empty()
            .flat_map(|bucket| plan_batches(bucket, self.config.batch_size))
            .collect()
    }

    pub fn plan(&self, collection: &Collection) -> BundlePlan {
        let buckets = collection
            .non_empty()
            .map(|bucket| PlannedBucket {
                name: bucket.name.clone(),
                files: bucket.len(),
                artifacts: plan_batches(bucket, self.config.batch_size)
                    .into_iter()
                    .map(|batch| PlannedArtifact {
                        name: batch.artifact_name,
                        members: batch.members.iter().map(|m| m.relative.clone()).collect(),
                    })
                    .collect(),
            })
            .collect();

        BundlePlan {
            batch_size: self.config.batch_size,
            buckets,
            stats: collection.stats.clone(),
        }
    }

    /// Write every batch of `collection` into `out_dir`.
    ///
    /// A failed artifact is recorded and reported through `on_artifact`;
    /// the remaining artifacts are still written.
    pub fn write(
        &self,
        collection: &Collection,
        out_dir: &Path,
        on_artifact: ArtifactCallback<'_>,
    ) -> Result<BundleReport> {
        if !out_dir.exists() {
            fs::create_dir_all(out_dir).map_err(|e| LoteError::OutputDir {
                path: out_dir.to_path_buf(),
                source: e,
            })?;
        }

        let mut report = BundleReport {
            stats: collection.stats.clone(),
            artifacts: Vec::new(),
        };

        for batch in self.batches(collection) {
            let outcome = write_batch(out_dir, &batch);
            if let Some(f) = on_artifact {
                f(&outcome);
            }
            report.artifacts.push(outcome);
        }

        Ok(report)
    }

    /// Collect then write in one call
    pub fn run(
        &self,
        root: &Path,
        out_dir: &Path,
        on_artifact: ArtifactCallback<'_>,
    ) -> Result<BundleReport> {
        let collection = self.collect(root)?;
        self.write(&collection, out_dir, on_artifact)
    }
}

impl Default for Bundler {
    fn default() -> Self {
        Self::new(BundleConfig::with_defaults())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, format!("// {}", relative)).unwrap();
    }

    fn project() -> TempDir {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "src/app/page.tsx");
        touch(temp.path(), "src/components/Button.tsx");
        touch(temp.path(), "package.json");
        touch(temp.path(), "node_modules/x/y.ts");
        temp
    }

    fn artifact_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .filter(|n| n.contains("_PARTE_"))
            .collect();
        names.sort();
        names
    }

    #[test]
    fn run_writes_one_artifact_per_non_empty_bucket() {
        let temp = project();
        let out = TempDir::new().unwrap();

        let report = Bundler::default().run(temp.path(), out.path(), None).unwrap();

        assert_eq!(report.written(), 3);
        assert_eq!(report.failed(), 0);
        assert_eq!(
            artifact_names(out.path()),
            vec![
                "1_TELAS_E_ROTAS_PARTE_A.txt",
                "2_COMPONENTES_VISUAIS_PARTE_A.txt",
                "4_CONFIGURACOES_PARTE_A.txt",
            ]
        );
        let config = fs::read_to_string(out.path().join("4_CONFIGURACOES_PARTE_A.txt")).unwrap();
        assert!(config.contains("ARQUIVO: package.json\n"));
        assert!(config.contains("// package.json\n"));
    }

    #[test]
    fn run_splits_large_bucket_into_lettered_parts() {
        let temp = TempDir::new().unwrap();
        for i in 0..23 {
            touch(temp.path(), &format!("src/lib/m{:02}.ts", i));
        }
        let out = TempDir::new().unwrap();

        let report = Bundler::default().run(temp.path(), out.path(), None).unwrap();

        assert_eq!(report.written(), 3);
        let counts: Vec<_> = report
            .artifacts
            .iter()
            .map(|a| match a {
                ArtifactOutcome::Written {
                    artifact, members, ..
                } => (artifact.clone(), *members),
                ArtifactOutcome::Failed { artifact, .. } => (artifact.clone(), 0),
            })
            .collect();
        assert_eq!(
            counts,
            vec![
                ("3_REGRAS_BANCO_DADOS_PARTE_A.txt".to_string(), 10),
                ("3_REGRAS_BANCO_DADOS_PARTE_B.txt".to_string(), 10),
                ("3_REGRAS_BANCO_DADOS_PARTE_C.txt".to_string(), 3),
            ]
        );
        let last = fs::read_to_string(out.path().join("3_REGRAS_BANCO_DADOS_PARTE_C.txt")).unwrap();
        assert!(last.contains("=== CONTÉM 3 ARQUIVOS ==="));
        assert!(last.contains("ARQUIVO: src/lib/m20.ts"));
        assert!(last.contains("ARQUIVO: src/lib/m22.ts"));
    }

    #[test]
    fn write_survives_member_deleted_after_collection() {
        let temp = project();
        touch(temp.path(), "src/app/layout.tsx");
        let out = TempDir::new().unwrap();
        let bundler = Bundler::default();

        let collection = bundler.collect(temp.path()).unwrap();
        fs::remove_file(temp.path().join("src/app/layout.tsx")).unwrap();
        let report = bundler.write(&collection, out.path(), None).unwrap();

        assert_eq!(report.failed(), 0);
        let failures = report.member_failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].relative, "src/app/layout.tsx");

        let text = fs::read_to_string(out.path().join("1_TELAS_E_ROTAS_PARTE_A.txt")).unwrap();
        assert!(text.contains("[ERRO AO LER src/app/layout.tsx: "));
        assert!(text.contains("ARQUIVO: src/app/page.tsx"));
    }

    #[test]
    fn write_reports_each_artifact_through_callback() {
        let temp = project();
        let out = TempDir::new().unwrap();
        let seen = RefCell::new(Vec::new());
        let on_artifact = |outcome: &ArtifactOutcome| {
            seen.borrow_mut().push(outcome.artifact().to_string());
        };

        Bundler::default()
            .run(temp.path(), out.path(), Some(&on_artifact))
            .unwrap();

        assert_eq!(
            seen.into_inner(),
            vec![
                "1_TELAS_E_ROTAS_PARTE_A.txt",
                "2_COMPONENTES_VISUAIS_PARTE_A.txt",
                "4_CONFIGURACOES_PARTE_A.txt",
            ]
        );
    }

    #[test]
    fn failed_artifact_does_not_stop_remaining_batches() {
        let temp = TempDir::new().unwrap();
        for i in 0..12 {
            touch(temp.path(), &format!("src/app/r{:02}.tsx", i));
        }
        touch(temp.path(), "package.json");
        let out = TempDir::new().unwrap();
        // A directory squatting on the first artifact name makes it uncreatable
        fs::create_dir(out.path().join("1_TELAS_E_ROTAS_PARTE_A.txt")).unwrap();

        let report = Bundler::default().run(temp.path(), out.path(), None).unwrap();

        assert_eq!(report.failed(), 1);
        assert_eq!(report.written(), 2);
        let outcomes: Vec<_> = report
            .artifacts
            .iter()
            .map(|a| (a.artifact(), a.is_written()))
            .collect();
        assert_eq!(
            outcomes,
            vec![
                ("1_TELAS_E_ROTAS_PARTE_A.txt", false),
                ("1_TELAS_E_ROTAS_PARTE_B.txt", true),
                ("4_CONFIGURACOES_PARTE_A.txt", true),
            ]
        );
        let part_b = fs::read_to_string(out.path().join("1_TELAS_E_ROTAS_PARTE_B.txt")).unwrap();
        assert!(part_b.contains("=== CONTÉM 2 ARQUIVOS ==="));
        assert!(out.path().join("4_CONFIGURACOES_PARTE_A.txt").is_file());
    }

    #[test]
    fn write_creates_missing_out_dir() {
        let temp = project();
        let out = TempDir::new().unwrap();
        let nested = out.path().join("bundles").join("today");

        let report = Bundler::default().run(temp.path(), &nested, None).unwrap();

        assert_eq!(report.written(), 3);
        assert!(nested.join("1_TELAS_E_ROTAS_PARTE_A.txt").exists());
    }

    #[test]
    fn write_fails_when_out_dir_cannot_be_created() {
        let temp = project();
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let err = Bundler::default()
            .run(temp.path(), &blocker.join("out"), None)
            .unwrap_err();

        assert!(matches!(err, LoteError::OutputDir { .. }));
    }

    #[test]
    fn run_missing_root_is_fatal() {
        let out = TempDir::new().unwrap();
        let err = Bundler::default()
            .run(&PathBuf::from("/definitely/not/here"), out.path(), None)
            .unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(artifact_names(out.path()).is_empty());
    }

    #[test]
    fn plan_lists_artifacts_without_writing() {
        let temp = TempDir::new().unwrap();
        for i in 0..11 {
            touch(temp.path(), &format!("src/components/C{:02}.tsx", i));
        }
        let bundler = Bundler::default();
        let collection = bundler.collect(temp.path()).unwrap();

        let plan = bundler.plan(&collection);

        assert_eq!(plan.batch_size, 10);
        assert_eq!(plan.artifact_count(), 2);
        assert_eq!(plan.buckets.len(), 1);
        assert_eq!(plan.buckets[0].files, 11);
        assert_eq!(
            plan.buckets[0].artifacts[1].name,
            "2_COMPONENTES_VISUAIS_PARTE_B.txt"
        );
        assert_eq!(
            plan.buckets[0].artifacts[1].members,
            vec!["src/components/C10.tsx"]
        );
        assert!(artifact_names(temp.path()).is_empty());
    }

    #[test]
    fn plan_serializes_to_json() {
        let temp = project();
        let bundler = Bundler::default();
        let collection = bundler.collect(temp.path()).unwrap();

        let json = serde_json::to_value(bundler.plan(&collection)).unwrap();

        assert_eq!(json["batch_size"], 10);
        assert_eq!(json["buckets"][0]["name"], "1_TELAS_E_ROTAS");
        assert_eq!(
            json["buckets"][0]["artifacts"][0]["members"][0],
            "src/app/page.tsx"
        );
    }

    #[test]
    fn custom_batch_size_changes_boundaries() {
        let temp = TempDir::new().unwrap();
        for i in 0..5 {
            touch(temp.path(), &format!("src/app/p{}.tsx", i));
        }
        let bundler = Bundler::new(BundleConfig::with_defaults().batch_size(2));
        let collection = bundler.collect(temp.path()).unwrap();

        let sizes: Vec<_> = bundler
            .batches(&collection)
            .iter()
            .map(|b| (b.suffix.clone(), b.members.len()))
            .collect();

        assert_eq!(
            sizes,
            vec![
                ("A".to_string(), 2),
                ("B".to_string(), 2),
                ("C".to_string(), 1)
            ]
        );
    }
}
