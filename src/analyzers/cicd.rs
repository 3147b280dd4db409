use super::Analyzer;
use crate::catalog::matching;
use crate::catalog::tooling::{CICD_PROVIDERS, CICD_YAML_ONLY};
use crate::profile::TechProfile;
use crate::scan::FileIndex;
use anyhow::Result;
use tracing::debug;

pub struct CicdAnalyzer;

impl Analyzer for CicdAnalyzer {
    fn name(&self) -> &'static str {
        "cicd"
    }

    fn analyze(&self, index: &FileIndex, profile: &mut TechProfile) -> Result<()> {
        let all: Vec<_> = index.files().iter().collect();
        for (provider, matchers) in CICD_PROVIDERS {
            let yaml_only = CICD_YAML_ONLY.contains(provider);
            let files: Vec<String> = matching(&all, matchers)
                .into_iter()
                .filter(|f| !yaml_only || matches!(f.extension().as_deref(), Some(".yml") | Some(".yaml")))
                .map(|f| f.rel_path.clone())
                .collect();
            if files.is_empty() {
                continue;
            }
            debug!(provider, files = files.len(), "CI/CD provider detected");
            profile.cicd.insert(provider.to_string());
            profile.set_files(&format!("cicd_{provider}"), files);
        }
        Ok(())
    }
}
