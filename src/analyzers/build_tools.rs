use super::Analyzer;
use crate::catalog::matching;
use crate::catalog::tooling::BUILD_TOOLS;
use crate::profile::TechProfile;
use crate::scan::FileIndex;
use anyhow::Result;
use tracing::debug;

pub struct BuildToolsAnalyzer;

impl Analyzer for BuildToolsAnalyzer {
    fn name(&self) -> &'static str {
        "build_tools"
    }

    fn analyze(&self, index: &FileIndex, profile: &mut TechProfile) -> Result<()> {
        let all: Vec<_> = index.files().iter().collect();
        for (tool, matchers) in BUILD_TOOLS {
            if !matching(&all, matchers).is_empty() && profile.build_tools.insert(tool.to_string()) {
                debug!(tool, "Build tool detected");
            }
        }
        Ok(())
    }
}
