//! End-to-end detection tests
//!
//! Each test lays out a synthetic repository in a temp directory and runs the full
//! analyzer sequence through `Detector::analyze_path`.

use stackpipe::analyzers::{default_analyzers, run_analyzers};
use stackpipe::detector::failure_hint;
use stackpipe::scan::FileIndex;
use stackpipe::{Detector, DetectorConfig, EntryPointKind, FrameworkId, Language, PatternCatalog, TechProfile};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn write(root: &Path, path: &str, content: &str) {
    let full = root.join(path);
    if let Some(parent) = full.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(full, content).unwrap();
}

fn repo(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (path, content) in files {
        write(dir.path(), path, content);
    }
    dir
}

fn analyze(dir: &TempDir) -> TechProfile {
    Detector::new(DetectorConfig::default())
        .unwrap()
        .analyze_path(dir.path())
}

#[test]
fn test_go_service_with_dockerfile() {
    let dir = repo(&[
        ("go.mod", "module example.com/shop\n\ngo 1.21\n"),
        ("main.go", "package main\n\nfunc main() {\n}\n"),
        ("Dockerfile", "FROM golang:1.21\nCOPY . .\nRUN go build -o /shop\n"),
    ]);
    let profile = analyze(&dir);

    assert_eq!(profile.languages.as_slice(), &[Language::Go]);
    assert_eq!(profile.package_manager.as_deref(), Some("go mod"));
    assert!(profile.docker);
    assert!(!profile.kubernetes);
    assert_eq!(profile.dockerfile_paths(), vec!["Dockerfile".to_string()]);
    assert!(profile.entry_points.iter().any(|e| e.file_path == "main.go"));
    assert_eq!(failure_hint(&profile), None);
}

#[test]
fn test_java_version_is_maximum_across_modules() {
    let dir = repo(&[
        (
            "pom.xml",
            "<project><modules><module>api</module><module>worker</module></modules></project>\n",
        ),
        (
            "api/pom.xml",
            "<project><properties><maven.compiler.release>21</maven.compiler.release></properties></project>\n",
        ),
        (
            "worker/pom.xml",
            "<project><properties><maven.compiler.release>17</maven.compiler.release></properties></project>\n",
        ),
    ]);
    let profile = analyze(&dir);

    assert_eq!(profile.java_version, Some(21));
    assert_eq!(profile.package_manager.as_deref(), Some("maven"));
}

#[test]
fn test_go_module_beats_poetry() {
    let dir = repo(&[
        ("go.mod", "module example.com/tool\n"),
        (
            "pyproject.toml",
            "[tool.poetry]\nname = \"tool-scripts\"\nversion = \"0.1.0\"\n",
        ),
        ("scripts/release.py", "print('release')\n"),
    ]);
    let profile = analyze(&dir);

    assert_eq!(profile.package_manager.as_deref(), Some("go mod"));
}

#[test]
fn test_exclusive_java_frameworks() {
    let dir = repo(&[
        ("boot/src/Boot.java", "@SpringBootApplication\nclass Boot {}\n"),
        ("quark/src/Quark.java", "import io.quarkus.runtime.Quarkus;\n"),
    ]);
    let profile = analyze(&dir);

    let java_web: Vec<&FrameworkId> = profile
        .frameworks
        .iter()
        .filter(|f| matches!(f, FrameworkId::SpringBoot | FrameworkId::Quarkus))
        .collect();
    assert_eq!(java_web.len(), 1);
}

#[test]
fn test_python_driver_is_not_matched_in_go_files() {
    let dir = repo(&[
        ("go.mod", "module example.com/db\n"),
        ("store.go", "package store\n\n// import psycopg2\n"),
    ]);
    let profile = analyze(&dir);

    assert!(!profile.databases.contains(&"postgresql".to_string()));
}

#[test]
fn test_ignored_directories_are_skipped() {
    let dir = repo(&[
        ("go.mod", "module example.com/app\n"),
        ("node_modules/left-pad/index.js", "module.exports = {}\n"),
        (".venv/lib/site.py", "import os\n"),
        (".github/workflows/ci.yml", "on: push\n"),
    ]);
    let profile = analyze(&dir);

    assert!(!profile.has_language(Language::TypeScript));
    assert!(!profile.has_language(Language::Python));
    assert!(!profile.cicd.is_empty());
}

#[test]
fn test_analysis_is_idempotent() {
    let dir = repo(&[
        ("go.mod", "module example.com/app\n"),
        ("main.go", "package main\n\nfunc main() {}\n"),
        ("Dockerfile", "FROM golang:1.21\nCMD [\"go\", \"run\", \"main.go\"]\n"),
        ("docker-compose.yml", "services:\n  app:\n    build: .\n"),
        ("k8s/deployment.yaml", "apiVersion: apps/v1\nkind: Deployment\n"),
        ("web/package.json", "{\"dependencies\": {\"react\": \"18\"}}"),
        ("web/src/index.tsx", "import React from 'react'\n"),
    ]);
    let index = FileIndex::build(dir.path(), 1024 * 1024);
    let catalog = Arc::new(PatternCatalog::builtin().unwrap());
    let analyzers = default_analyzers(catalog, Default::default());

    let mut once = TechProfile::new();
    run_analyzers(&analyzers, &index, &mut once);
    let mut twice = once.clone();
    run_analyzers(&analyzers, &index, &mut twice);

    assert_eq!(once, twice);
}

#[test]
fn test_exclusive_frameworks_are_stable_across_runs() {
    let dir = repo(&[
        ("a/Boot.java", "@SpringBootApplication\nclass Boot {}\n"),
        ("b/Quark.java", "import io.quarkus.runtime.Quarkus;\n"),
        ("c/package.json", "{\"dependencies\": {\"react\": \"18\"}}"),
        ("c/ui.tsx", "import React from 'react'\n"),
    ]);
    let index = FileIndex::build(dir.path(), 1024 * 1024);
    let catalog = Arc::new(PatternCatalog::builtin().unwrap());
    let analyzers = default_analyzers(catalog, Default::default());

    let mut once = TechProfile::new();
    run_analyzers(&analyzers, &index, &mut once);
    let mut twice = once.clone();
    run_analyzers(&analyzers, &index, &mut twice);

    assert_eq!(once.frameworks.as_slice(), &[FrameworkId::Quarkus, FrameworkId::React]);
    assert_eq!(once, twice);
}

#[test]
fn test_flags_and_sets_never_shrink() {
    let rich = repo(&[
        ("go.mod", "module example.com/app\n"),
        ("main.go", "package main\n\nfunc main() {}\n"),
        ("Dockerfile", "FROM golang:1.21\n"),
        ("main.tf", "provider \"aws\" {}\n"),
        ("charts/app/Chart.yaml", "name: app\n"),
    ]);
    let empty = repo(&[("README.md", "# nothing here\n")]);

    let catalog = Arc::new(PatternCatalog::builtin().unwrap());
    let analyzers = default_analyzers(catalog, Default::default());

    let mut profile = TechProfile::new();
    run_analyzers(&analyzers, &FileIndex::build(rich.path(), 1024 * 1024), &mut profile);
    let before = profile.clone();
    run_analyzers(&analyzers, &FileIndex::build(empty.path(), 1024 * 1024), &mut profile);

    assert!(profile.docker && profile.kubernetes && profile.terraform);
    for language in before.languages.iter() {
        assert!(profile.languages.contains(language));
    }
    for tool in before.build_tools.iter() {
        assert!(profile.build_tools.contains(tool));
    }
    assert_eq!(profile.package_manager, before.package_manager);
}

#[test]
fn test_dockerfile_cmd_feeds_language() {
    let dir = repo(&[
        ("requirements.txt", "flask==3.0\n"),
        ("Dockerfile", "FROM python:3.11-slim\nCMD [\"python\", \"server.py\"]\n"),
    ]);
    let profile = analyze(&dir);

    let docker_entry = profile
        .entry_points
        .iter()
        .find(|e| e.kind == EntryPointKind::Docker)
        .unwrap();
    assert_eq!(docker_entry.file_path, "server.py");
    assert_eq!(docker_entry.language, Some(Language::Python));
    assert!(profile.has_language(Language::Python));
}

#[test]
fn test_missing_directory_is_a_hint() {
    let detector = Detector::new(DetectorConfig::default()).unwrap();
    let profile = detector.analyze_path(Path::new("/nonexistent/stackpipe-e2e"));

    assert!(failure_hint(&profile).is_some());
    assert!(profile.languages.is_empty());
}
