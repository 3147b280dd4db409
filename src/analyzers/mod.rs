//! Per-aspect analyzers.
//!
//! Every analyzer reads the shared [`FileIndex`] and mutates one [`TechProfile`] in
//! place. Analyzers only ever add to the profile (framework exclusions aside), so
//! running the whole list twice over an unchanged tree yields the same profile.

pub mod build_tools;
pub mod cicd;
pub mod cloud;
pub mod database;
pub mod devops;
pub mod entry_point;
pub mod framework;
pub mod hints;
pub mod language;
pub mod structure;
pub mod test_runner;

use crate::catalog::PatternCatalog;
use crate::profile::TechProfile;
use crate::scan::{read_head, FileIndex, IndexedFile, ScanLimits};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, warn};

pub use build_tools::BuildToolsAnalyzer;
pub use cicd::CicdAnalyzer;
pub use cloud::CloudAnalyzer;
pub use database::DatabaseAnalyzer;
pub use devops::DevOpsAnalyzer;
pub use entry_point::EntryPointAnalyzer;
pub use framework::FrameworkAnalyzer;
pub use hints::HintsAnalyzer;
pub use language::LanguageAnalyzer;
pub use structure::{detect_structure, RepoStructure};
pub use test_runner::TestRunnerAnalyzer;

pub trait Analyzer: Send + Sync {
    fn name(&self) -> &'static str;

    fn analyze(&self, index: &FileIndex, profile: &mut TechProfile) -> Result<()>;
}

/// The fixed analyzer sequence. Language detection runs first because the gated
/// content passes rely on its extension mapping; entry points run last so their
/// language feedback lands after everything else.
pub fn default_analyzers(catalog: Arc<PatternCatalog>, limits: ScanLimits) -> Vec<Box<dyn Analyzer>> {
    vec![
        Box::new(LanguageAnalyzer::new(catalog.clone(), limits)),
        Box::new(FrameworkAnalyzer::new(catalog.clone(), limits)),
        Box::new(DevOpsAnalyzer::new()),
        Box::new(TestRunnerAnalyzer::new(catalog.clone(), limits)),
        Box::new(DatabaseAnalyzer::new(catalog.clone(), limits)),
        Box::new(CloudAnalyzer::new(catalog.clone(), limits)),
        Box::new(BuildToolsAnalyzer),
        Box::new(CicdAnalyzer),
        Box::new(HintsAnalyzer),
        Box::new(EntryPointAnalyzer::new(catalog, limits)),
    ]
}

/// Runs every analyzer in order. A failing analyzer leaves a hint and the run goes on.
pub fn run_analyzers(analyzers: &[Box<dyn Analyzer>], index: &FileIndex, profile: &mut TechProfile) {
    for analyzer in analyzers {
        debug!(analyzer = analyzer.name(), "Running analyzer");
        if let Err(e) = analyzer.analyze(index, profile) {
            warn!(analyzer = analyzer.name(), error = %e, "Analyzer failed");
            profile.add_hint(format!("{} analysis failed: {}", analyzer.name(), e));
        }
    }
}

/// Reads a bounded content sample for pattern scans.
pub(crate) fn read_sample(file: &IndexedFile, max_bytes: u64) -> String {
    read_head(&file.abs_path, usize::MAX, max_bytes as usize)
}
