use super::structure::detect_structure;
use super::{read_sample, Analyzer};
use crate::catalog::test_runners::TEST_RUNNER_MARKERS;
use crate::catalog::{matching, PatternCatalog};
use crate::profile::{TechProfile, Zone};
use crate::scan::{FileIndex, ScanLimits};
use anyhow::Result;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

pub struct TestRunnerAnalyzer {
    catalog: Arc<PatternCatalog>,
    limits: ScanLimits,
}

impl TestRunnerAnalyzer {
    pub fn new(catalog: Arc<PatternCatalog>, limits: ScanLimits) -> Self {
        Self { catalog, limits }
    }

    /// `(runner, triggering file)` pairs in discovery order.
    fn collect_hits(&self, index: &FileIndex) -> Vec<(&'static str, String)> {
        let mut hits = Vec::new();

        let all: Vec<_> = index.files().iter().collect();
        for (runner, matchers) in TEST_RUNNER_MARKERS {
            for file in matching(&all, matchers) {
                hits.push((*runner, file.rel_path.clone()));
            }
        }

        for file in index.candidates(&self.limits.source_content()) {
            let language = file.language();
            let content = read_sample(file, self.limits.content_max_bytes);
            if content.is_empty() {
                continue;
            }
            for rule in &self.catalog.test_runners {
                if rule.language.is_some() && rule.language != language {
                    continue;
                }
                if rule.patterns.iter().any(|p| p.is_match(&content)) {
                    hits.push((rule.name, file.rel_path.clone()));
                }
            }
        }
        hits
    }
}

impl Analyzer for TestRunnerAnalyzer {
    fn name(&self) -> &'static str {
        "test_runner"
    }

    fn analyze(&self, index: &FileIndex, profile: &mut TechProfile) -> Result<()> {
        let hits = self.collect_hits(index);
        for (runner, file) in &hits {
            if profile.test_runner.insert(runner.to_string()) {
                debug!(runner, file = %file, "Test runner detected");
            }
        }

        let structure = detect_structure(index.root());
        if structure.is_monorepo() {
            let mut by_zone: BTreeMap<Zone, Vec<String>> = BTreeMap::new();
            for (runner, file) in &hits {
                let runners = by_zone.entry(structure.zone_of(file)).or_default();
                if !runners.iter().any(|r| r == runner) {
                    runners.push(runner.to_string());
                }
            }
            profile.test_runners_by_zone = by_zone;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use pretty_assertions::assert_eq;

    fn analyzer() -> TestRunnerAnalyzer {
        TestRunnerAnalyzer::new(catalog(), ScanLimits::default())
    }

    #[test]
    fn test_markers_and_patterns() {
        let dir = repo(&[
            ("pytest.ini", "[pytest]\n"),
            ("tests/test_api.py", "import unittest\n"),
            ("jest.config.js", "module.exports = {}\n"),
        ]);
        let profile = run(&analyzer(), dir.path());
        assert_eq!(
            profile.test_runner.as_slice(),
            &["pytest".to_string(), "jest".to_string(), "unittest".to_string()]
        );
        assert!(profile.test_runners_by_zone.is_empty());
    }

    #[test]
    fn test_patterns_are_language_gated() {
        let dir = repo(&[("main.go", "// import pytest\npackage main\n")]);
        let profile = run(&analyzer(), dir.path());
        assert!(profile.test_runner.is_empty());
    }

    #[test]
    fn test_go_tests_detected() {
        let dir = repo(&[(
            "pkg/calc_test.go",
            "package calc\n\nimport \"testing\"\n\nfunc TestAdd(t *testing.T) {}\n",
        )]);
        let profile = run(&analyzer(), dir.path());
        assert_eq!(profile.test_runner.as_slice(), &["go-testing".to_string()]);
    }

    #[test]
    fn test_runners_attributed_per_zone() {
        let dir = repo(&[
            ("frontend/vitest.config.ts", "export default {}\n"),
            ("backend/conftest.py", "import pytest\n"),
        ]);
        let profile = run(&analyzer(), dir.path());

        assert_eq!(
            profile.test_runners_by_zone.get(&Zone::Frontend),
            Some(&vec!["vitest".to_string()])
        );
        assert_eq!(
            profile.test_runners_by_zone.get(&Zone::Backend),
            Some(&vec!["pytest".to_string()])
        );
    }

    #[test]
    fn test_backend_only_layout_is_zoned() {
        let dir = repo(&[
            ("jest.config.js", "module.exports = {}\n"),
            ("api/conftest.py", "import pytest\n"),
        ]);
        let profile = run(&analyzer(), dir.path());

        assert_eq!(
            profile.test_runners_by_zone.get(&Zone::Root),
            Some(&vec!["jest".to_string()])
        );
        assert_eq!(
            profile.test_runners_by_zone.get(&Zone::Backend),
            Some(&vec!["pytest".to_string()])
        );
    }
}
