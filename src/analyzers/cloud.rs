use super::{read_sample, Analyzer};
use crate::catalog::cloud::{CLOUD_EXTRA_EXTENSIONS, CLOUD_MARKERS};
use crate::catalog::{matching, PatternCatalog};
use crate::profile::TechProfile;
use crate::scan::{FileIndex, ScanLimits};
use crate::stack::Language;
use anyhow::Result;
use std::sync::Arc;
use tracing::debug;

pub struct CloudAnalyzer {
    catalog: Arc<PatternCatalog>,
    limits: ScanLimits,
}

impl CloudAnalyzer {
    pub fn new(catalog: Arc<PatternCatalog>, limits: ScanLimits) -> Self {
        Self { catalog, limits }
    }
}

impl Analyzer for CloudAnalyzer {
    fn name(&self) -> &'static str {
        "cloud"
    }

    fn analyze(&self, index: &FileIndex, profile: &mut TechProfile) -> Result<()> {
        let all: Vec<_> = index.files().iter().collect();
        for (platform, matchers) in CLOUD_MARKERS {
            if !matching(&all, matchers).is_empty() && profile.cloud_platforms.insert(platform.to_string()) {
                debug!(platform, "Cloud platform marker found");
            }
        }

        let extensions = Language::source_extensions()
            .into_iter()
            .map(str::to_string)
            .chain(CLOUD_EXTRA_EXTENSIONS.iter().map(|e| e.to_string()));
        let opts = self.limits.content_with_extensions(extensions);

        for file in index.candidates(&opts) {
            let content = read_sample(file, self.limits.content_max_bytes);
            if content.is_empty() {
                continue;
            }
            for rule in &self.catalog.cloud {
                if rule.patterns.iter().any(|p| p.is_match(&content))
                    && profile.cloud_platforms.insert(rule.name.to_string())
                {
                    debug!(platform = rule.name, file = %file.rel_path, "Cloud SDK usage detected");
                }
            }
        }
        Ok(())
    }
}
