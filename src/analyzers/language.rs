use super::framework::admit_framework;
use super::Analyzer;
use crate::catalog::framework;
use crate::catalog::languages::{
    NODE_DEFAULT_MANAGER, NODE_DEPENDENCY_FRAMEWORKS, NODE_LOCKFILES, PACKAGE_MANAGER_FILES,
    ROOT_PACKAGE_MANAGERS,
};
use crate::catalog::PatternCatalog;
use crate::profile::TechProfile;
use crate::scan::{FileIndex, ScanLimits, ScanOptions};
use crate::stack::Language;
use anyhow::Result;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// True when a `pyproject.toml` declares a `[tool.poetry]` table.
pub fn declares_poetry(path: &Path) -> bool {
    let Ok(content) = fs::read_to_string(path) else {
        return false;
    };
    match toml::from_str::<toml::Value>(&content) {
        Ok(doc) => doc
            .get("tool")
            .and_then(|t| t.get("poetry"))
            .map(|p| p.is_table())
            .unwrap_or(false),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Unparseable pyproject.toml");
            false
        }
    }
}

pub struct LanguageAnalyzer {
    catalog: Arc<PatternCatalog>,
    limits: ScanLimits,
}

impl LanguageAnalyzer {
    pub fn new(catalog: Arc<PatternCatalog>, limits: ScanLimits) -> Self {
        Self { catalog, limits }
    }

    fn tag_languages(&self, index: &FileIndex, profile: &mut TechProfile) {
        let opts = ScanOptions::new(self.limits.language_max_bytes)
            .with_extensions(Language::source_extensions());

        let mut per_language: BTreeMap<Language, Vec<String>> = BTreeMap::new();
        for file in index.candidates(&opts) {
            if let Some(language) = file.language() {
                if profile.add_language(language) {
                    debug!(language = %language, file = %file.rel_path, "Language detected");
                }
                per_language
                    .entry(language)
                    .or_default()
                    .push(file.rel_path.clone());
            }
        }

        for (language, files) in per_language {
            profile.set_files(&format!("{}_files", language), files);
        }
    }

    /// Root markers in priority order. The first one present decides.
    fn resolve_root_manager(&self, index: &FileIndex, profile: &mut TechProfile) -> bool {
        for (file, manager, key) in ROOT_PACKAGE_MANAGERS {
            let Some(path) = index.root_file(file) else {
                continue;
            };
            if *file == "pyproject.toml" && !declares_poetry(&path) {
                debug!("pyproject.toml without [tool.poetry], skipping");
                continue;
            }
            debug!(package_manager = manager, file, "Root package manager");
            profile.package_manager = Some(manager.to_string());
            profile.record_file(key, *file);
            return true;
        }
        false
    }

    fn resolve_node_manager(&self, index: &FileIndex, profile: &mut TechProfile) -> bool {
        let Some(path) = index.root_file("package.json") else {
            return false;
        };

        let manager = NODE_LOCKFILES
            .iter()
            .find(|(lockfile, _)| index.root_file(lockfile).is_some())
            .map(|(_, manager)| *manager)
            .unwrap_or(NODE_DEFAULT_MANAGER);
        debug!(package_manager = manager, "Node package manager");
        profile.package_manager = Some(manager.to_string());
        profile.record_file("package_json", "package.json");

        let manifest = fs::read_to_string(&path)
            .ok()
            .and_then(|c| serde_json::from_str::<serde_json::Value>(&c).ok());
        if let Some(manifest) = manifest {
            for section in ["dependencies", "devDependencies"] {
                let Some(deps) = manifest.get(section).and_then(|d| d.as_object()) else {
                    continue;
                };
                for (dependency, slug) in NODE_DEPENDENCY_FRAMEWORKS {
                    if deps.contains_key(*dependency) {
                        admit_framework(&self.catalog, profile, framework(slug));
                    }
                }
            }
        }
        true
    }

    /// Records every manifest in the tree. A hit only fills an empty slot, so a root
    /// priority marker is never displaced.
    fn scan_manifests(&self, index: &FileIndex, profile: &mut TechProfile) {
        for file in index.files() {
            let Some((name, manager, key)) = PACKAGE_MANAGER_FILES
                .iter()
                .find(|(name, _, _)| *name == file.name())
            else {
                continue;
            };
            if *name == "pyproject.toml" && !declares_poetry(&file.abs_path) {
                continue;
            }
            profile.record_file(key, file.rel_path.clone());
            if profile.package_manager.is_none() {
                debug!(package_manager = manager, file = %file.rel_path, "Package manager from manifest");
                profile.package_manager = Some(manager.to_string());
            }
        }
    }
}

impl Analyzer for LanguageAnalyzer {
    fn name(&self) -> &'static str {
        "language"
    }

    fn analyze(&self, index: &FileIndex, profile: &mut TechProfile) -> Result<()> {
        self.tag_languages(index, profile);

        let resolved = self.resolve_root_manager(index, profile)
            || self.resolve_node_manager(index, profile);
        if !resolved && profile.package_manager.is_none() && index.root_file("setup.py").is_some() {
            profile.package_manager = Some("setuptools".to_string());
        }
        self.scan_manifests(index, profile);

        debug!(
            languages = ?profile.languages.as_slice(),
            package_manager = ?profile.package_manager,
            "Language analysis complete"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::stack::FrameworkId;
    use pretty_assertions::assert_eq;

    fn analyzer() -> LanguageAnalyzer {
        LanguageAnalyzer::new(catalog(), ScanLimits::default())
    }

    const POETRY: &str = "[tool.poetry]\nname = \"tools\"\nversion = \"0.1.0\"\n";

    #[test]
    fn test_go_module_beats_poetry() {
        let dir = repo(&[
            ("go.mod", "module example.com/x\n"),
            ("pyproject.toml", POETRY),
            ("main.go", "package main\n"),
            ("scripts/gen.py", "print(1)\n"),
        ]);
        let profile = run(&analyzer(), dir.path());
        assert_eq!(profile.package_manager.as_deref(), Some("go mod"));
        assert_eq!(profile.files("go_mod"), &["go.mod".to_string()]);
        assert_eq!(profile.files("pyproject_toml"), &["pyproject.toml".to_string()]);
    }

    #[test]
    fn test_pyproject_without_poetry_is_skipped() {
        let dir = repo(&[
            ("pyproject.toml", "[project]\nname = \"x\"\n"),
            ("requirements.txt", "flask\n"),
            ("app.py", "print(1)\n"),
        ]);
        let profile = run(&analyzer(), dir.path());
        assert_eq!(profile.package_manager.as_deref(), Some("pip"));
        assert!(profile.files("pyproject_toml").is_empty());
    }

    #[test]
    fn test_poetry_section_selects_poetry() {
        let dir = repo(&[("pyproject.toml", POETRY), ("requirements.txt", "flask\n")]);
        let profile = run(&analyzer(), dir.path());
        assert_eq!(profile.package_manager.as_deref(), Some("poetry"));
    }

    #[test]
    fn test_subdirectory_manifest_never_displaces_root() {
        let dir = repo(&[
            ("go.mod", "module x\n"),
            ("tools/requirements.txt", "black\n"),
        ]);
        let profile = run(&analyzer(), dir.path());
        assert_eq!(profile.package_manager.as_deref(), Some("go mod"));
        assert_eq!(profile.files("requirements_txt"), &["tools/requirements.txt".to_string()]);
    }

    #[test]
    fn test_node_lockfile_and_dependencies() {
        let dir = repo(&[
            (
                "package.json",
                r#"{"dependencies": {"react": "^18.0.0", "express": "^4.0.0"}}"#,
            ),
            ("yarn.lock", "# yarn\n"),
            ("package-lock.json", "{}"),
            ("src/index.tsx", "export {}\n"),
        ]);
        let profile = run(&analyzer(), dir.path());
        assert_eq!(profile.package_manager.as_deref(), Some("yarn"));
        assert!(profile.has_framework(&FrameworkId::React));
        assert!(profile.has_framework(&FrameworkId::Express));
        assert_eq!(profile.languages.as_slice(), &[Language::TypeScript]);
    }

    #[test]
    fn test_setup_py_fallback() {
        let dir = repo(&[("setup.py", "from setuptools import setup\n")]);
        let profile = run(&analyzer(), dir.path());
        assert_eq!(profile.package_manager.as_deref(), Some("setuptools"));
    }

    #[test]
    fn test_dialects_fold_into_one_language() {
        let dir = repo(&[
            ("src/App.kt", "fun main() {}\n"),
            ("src/Main.java", "class Main {}\n"),
            ("web/a.js", "1\n"),
            ("README.rst", "docs\n"),
        ]);
        let profile = run(&analyzer(), dir.path());
        assert_eq!(
            profile.languages.as_slice(),
            &[Language::Java, Language::TypeScript]
        );
        assert_eq!(
            profile.files("java_files"),
            &["src/App.kt".to_string(), "src/Main.java".to_string()]
        );
    }
}
