use super::{read_sample, Analyzer};
use crate::catalog::frameworks::FRAMEWORK_MARKERS;
use crate::catalog::{framework, ExclusionRule, PatternCatalog};
use crate::profile::TechProfile;
use crate::scan::{FileIndex, ScanLimits};
use crate::stack::FrameworkId;
use anyhow::Result;
use std::sync::Arc;
use tracing::debug;

/// Adds `id` to the profile after applying the exclusion table.
///
/// A superseded framework is refused while its winner is present and evicted when
/// the winner arrives. Exclusive pairs resolve the same way toward the preferred
/// member, so the outcome never depends on which file was read first.
pub(crate) fn admit_framework(catalog: &PatternCatalog, profile: &mut TechProfile, id: FrameworkId) -> bool {
    if profile.has_framework(&id) {
        return false;
    }
    for rule in &catalog.exclusions {
        let (winner, loser) = match rule {
            ExclusionRule::Supersedes { winner, loser } => (winner, loser),
            ExclusionRule::Exclusive { preferred, other } => (preferred, other),
        };
        if &id == loser && profile.has_framework(winner) {
            debug!(framework = %id, winner = %winner, "Framework excluded");
            return false;
        }
        if &id == winner && profile.remove_framework(loser) {
            debug!(framework = %loser, winner = %id, "Dropped excluded framework");
        }
    }
    profile.add_framework(id)
}

pub struct FrameworkAnalyzer {
    catalog: Arc<PatternCatalog>,
    limits: ScanLimits,
}

impl FrameworkAnalyzer {
    pub fn new(catalog: Arc<PatternCatalog>, limits: ScanLimits) -> Self {
        Self { catalog, limits }
    }

    fn detect_markers(&self, index: &FileIndex, profile: &mut TechProfile) {
        for (slug, names) in FRAMEWORK_MARKERS {
            if !names.iter().any(|name| index.has_named(name)) {
                continue;
            }
            let id = framework(slug);
            // A bare marker file is too weak once a rival framework is in place.
            if let Some(strict) = self.catalog.strict_rule(&id) {
                if strict.applies(|rival| profile.has_framework(rival)) {
                    debug!(framework = %id, "Marker ignored, strict evidence required");
                    continue;
                }
            }
            debug!(framework = %id, "Framework marker found");
            admit_framework(&self.catalog, profile, id);
        }
    }

    fn detect_content(&self, index: &FileIndex, profile: &mut TechProfile) {
        for file in index.candidates(&self.limits.source_content()) {
            let Some(language) = file.language() else {
                continue;
            };
            let content = read_sample(file, self.limits.content_max_bytes);
            if content.is_empty() {
                continue;
            }

            for rule in self.catalog.frameworks.iter().filter(|r| r.language == language) {
                let strict = self
                    .catalog
                    .strict_rule(&rule.id)
                    .filter(|s| s.applies(|rival| profile.has_framework(rival)));
                let patterns = match strict {
                    Some(s) => &s.patterns,
                    None => &rule.patterns,
                };
                if patterns.iter().any(|p| p.is_match(&content)) {
                    if admit_framework(&self.catalog, profile, rule.id.clone()) {
                        debug!(framework = %rule.id, file = %file.rel_path, "Framework detected");
                    }
                }
            }
        }
    }
}

impl Analyzer for FrameworkAnalyzer {
    fn name(&self) -> &'static str {
        "framework"
    }

    fn analyze(&self, index: &FileIndex, profile: &mut TechProfile) -> Result<()> {
        self.detect_markers(index, profile);
        self.detect_content(index, profile);

        let catalog = &self.catalog;
        profile.classify_frameworks(|id| catalog.category_of(id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use pretty_assertions::assert_eq;

    fn analyzer() -> FrameworkAnalyzer {
        FrameworkAnalyzer::new(catalog(), ScanLimits::default())
    }

    fn slugs(profile: &TechProfile) -> Vec<String> {
        profile.frameworks.iter().map(|f| f.slug().to_string()).collect()
    }

    #[test]
    fn test_patterns_are_language_gated() {
        let dir = repo(&[
            ("app.go", "package main\n// from django import views\n"),
            ("notes.py", "# github.com/gin-gonic/gin\n"),
        ]);
        let profile = run(&analyzer(), dir.path());
        assert!(profile.frameworks.is_empty());
    }

    #[test]
    fn test_spring_boot_supersedes_spring() {
        let dir = repo(&[(
            "src/main/java/App.java",
            "import org.springframework.web.bind.annotation.RestController;\n@SpringBootApplication\npublic class App {}\n",
        )]);
        let profile = run(&analyzer(), dir.path());
        assert_eq!(slugs(&profile), vec!["spring-boot"]);
    }

    #[test]
    fn test_exclusive_java_frameworks_keep_one() {
        let dir = repo(&[
            ("a/Boot.java", "@SpringBootApplication\nclass Boot {}\n"),
            ("b/Quark.java", "import io.quarkus.runtime.Quarkus;\n"),
        ]);
        let profile = run(&analyzer(), dir.path());
        assert_eq!(slugs(&profile), vec!["quarkus"]);
    }

    #[test]
    fn test_exclusive_winner_ignores_file_order() {
        let dir = repo(&[
            ("a/Quark.java", "import io.quarkus.runtime.Quarkus;\n"),
            ("b/Boot.java", "@SpringBootApplication\nclass Boot {}\n"),
        ]);
        let profile = run(&analyzer(), dir.path());
        assert_eq!(slugs(&profile), vec!["quarkus"]);
    }

    #[test]
    fn test_admitting_present_framework_keeps_order() {
        let catalog = catalog();
        let mut profile = TechProfile::new();
        assert!(admit_framework(&catalog, &mut profile, FrameworkId::Quarkus));
        assert!(admit_framework(&catalog, &mut profile, FrameworkId::React));
        assert!(!admit_framework(&catalog, &mut profile, FrameworkId::SpringBoot));
        assert!(!admit_framework(&catalog, &mut profile, FrameworkId::Quarkus));
        assert_eq!(slugs(&profile), vec!["quarkus", "react"]);
    }

    #[test]
    fn test_flask_marker_ignored_once_django_present() {
        let dir = repo(&[
            ("manage.py", "import os\n"),
            ("app.py", "print('hello')\n"),
        ]);
        let profile = run(&analyzer(), dir.path());
        assert_eq!(slugs(&profile), vec!["django"]);
    }

    #[test]
    fn test_flask_confirmed_by_strict_import() {
        let dir = repo(&[
            ("manage.py", "import os\n"),
            ("web/server.py", "from flask import Flask\napp = Flask(__name__)\n"),
        ]);
        let profile = run(&analyzer(), dir.path());
        assert_eq!(slugs(&profile), vec!["django", "flask"]);
    }

    #[test]
    fn test_vue_requires_strict_evidence() {
        let dir = repo(&[("src/setup.ts", "const app = createApp(App)\n")]);
        assert!(run(&analyzer(), dir.path()).frameworks.is_empty());

        let dir = repo(&[("src/main.ts", "import { createApp } from 'vue'\n")]);
        assert_eq!(slugs(&run(&analyzer(), dir.path())), vec!["vue"]);
    }

    #[test]
    fn test_frameworks_are_classified() {
        let dir = repo(&[
            ("web/index.tsx", "import React from 'react'\n"),
            ("api/main.go", "import \"github.com/gin-gonic/gin\"\n"),
        ]);
        let profile = run(&analyzer(), dir.path());
        assert_eq!(profile.frontend_frameworks.as_slice(), &[FrameworkId::React]);
        assert_eq!(profile.backend_frameworks.as_slice(), &[FrameworkId::Gin]);
        assert!(profile.mobile_frameworks.is_empty());
    }
}
