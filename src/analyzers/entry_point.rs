//! Entry point discovery.
//!
//! Four independent sources are combined: conventional file names, content patterns,
//! build/config manifests and container build instructions. Entries are deduplicated
//! by `(file_path, type)`, so the first source to claim a slot keeps it.

use super::Analyzer;
use crate::catalog::languages::{NODE_ENTRY_SCRIPTS, STANDARD_ENTRY_FILES};
use crate::catalog::tooling::{is_compose_file_name, is_dockerfile_name};
use crate::catalog::PatternCatalog;
use crate::profile::{EntryPoint, EntryPointKind, TechProfile};
use crate::scan::{read_head, FileIndex, IndexedFile, ScanLimits};
use crate::stack::Language;
use anyhow::Result;
use std::fs;
use std::sync::Arc;
use tracing::debug;

const SAMPLE_LINES: usize = 50;
const SAMPLE_BYTES: usize = 4096;
const MANIFEST_MAX_BYTES: usize = 256 * 1024;

/// Joins a manifest-relative target onto the manifest's directory.
fn join_relative(base_dir: &str, target: &str) -> String {
    let target = target
        .trim()
        .trim_matches(|c| c == '"' || c == '\'' || c == ',');
    if target.starts_with('/') {
        return target.to_string();
    }
    let mut target = target;
    while let Some(rest) = target.strip_prefix("./") {
        target = rest;
    }
    if base_dir.is_empty() {
        target.to_string()
    } else {
        format!("{}/{}", base_dir, target)
    }
}

fn matches_standard(file: &IndexedFile, entry: &str) -> bool {
    if let Some((dir, rest)) = entry.split_once("/**/") {
        let suffix = rest.trim_start_matches('*');
        let in_dir = file.rel_path.starts_with(&format!("{dir}/"))
            || file.rel_path.contains(&format!("/{dir}/"));
        return in_dir && file.rel_path.ends_with(suffix);
    }
    if entry.contains('/') {
        return file.rel_path == entry || file.rel_path.ends_with(&format!("/{entry}"));
    }
    file.name() == entry
}

fn read_manifest(file: &IndexedFile) -> Option<String> {
    let content = read_head(&file.abs_path, usize::MAX, MANIFEST_MAX_BYTES);
    (!content.is_empty()).then_some(content)
}

pub struct EntryPointAnalyzer {
    catalog: Arc<PatternCatalog>,
    limits: ScanLimits,
}

impl EntryPointAnalyzer {
    pub fn new(catalog: Arc<PatternCatalog>, limits: ScanLimits) -> Self {
        Self { catalog, limits }
    }

    fn from_content(&self, index: &FileIndex, profile: &mut TechProfile) {
        for file in index.candidates(&self.limits.source_content()) {
            let Some(language) = file.language() else {
                continue;
            };
            let sample = read_head(&file.abs_path, SAMPLE_LINES, SAMPLE_BYTES);
            if sample.is_empty() {
                continue;
            }

            let hit = self
                .catalog
                .entry_patterns
                .iter()
                .filter(|rule| rule.language == language)
                .find(|rule| rule.pattern.is_match(&sample));

            if let Some(rule) = hit {
                let kind = if rule.tag == "main" {
                    EntryPointKind::Main
                } else {
                    EntryPointKind::App
                };
                let mut entry = EntryPoint::new(kind, file.rel_path.clone(), rule.confidence)
                    .with_language(Some(language))
                    .with_description(format!("Matched pattern: {}", rule.pattern.as_str()));
                if rule.tag != "main" {
                    entry = entry.with_framework(rule.tag);
                }
                profile.add_entry_point(entry);
            }
        }
    }

    fn from_standard_files(&self, index: &FileIndex, profile: &mut TechProfile) {
        for (language, names) in STANDARD_ENTRY_FILES {
            for file in index.files() {
                if names.iter().any(|entry| matches_standard(file, entry)) {
                    profile.add_entry_point(
                        EntryPoint::new(EntryPointKind::Main, file.rel_path.clone(), 0.7)
                            .with_language(Some(*language))
                            .with_description("Standard entry file"),
                    );
                }
            }
        }
    }

    fn from_package_json(&self, index: &FileIndex, profile: &mut TechProfile) {
        for file in index.named("package.json") {
            let Some(manifest) = read_manifest(file)
                .and_then(|c| serde_json::from_str::<serde_json::Value>(&c).ok())
            else {
                continue;
            };

            if let Some(main) = manifest.get("main").and_then(|m| m.as_str()) {
                profile.add_entry_point(
                    EntryPoint::new(EntryPointKind::Main, join_relative(file.dir(), main), 0.9)
                        .with_framework("node")
                        .with_language(Some(Language::TypeScript))
                        .with_description("package.json main"),
                );
            }

            let Some(scripts) = manifest.get("scripts").and_then(|s| s.as_object()) else {
                continue;
            };
            for name in NODE_ENTRY_SCRIPTS {
                let Some(command) = scripts.get(*name).and_then(|c| c.as_str()) else {
                    continue;
                };
                let Some(caps) = self.catalog.commands.node_script_invocation.regex().captures(command) else {
                    continue;
                };
                profile.add_entry_point(
                    EntryPoint::new(EntryPointKind::Script, join_relative(file.dir(), &caps[1]), 0.8)
                        .with_language(Some(Language::TypeScript))
                        .with_description(format!("Script: {name}")),
                );
            }
        }
    }

    fn from_pyproject(&self, index: &FileIndex, profile: &mut TechProfile) {
        for file in index.named("pyproject.toml") {
            let Some(doc) = read_manifest(file).and_then(|c| toml::from_str::<toml::Value>(&c).ok()) else {
                continue;
            };
            let scripts = doc
                .get("tool")
                .and_then(|t| t.get("poetry"))
                .and_then(|p| p.get("scripts"))
                .and_then(|s| s.as_table());
            let Some((name, target)) = scripts.and_then(|s| s.iter().next()) else {
                continue;
            };
            let Some(module) = target.as_str().and_then(|t| t.split(':').next()) else {
                continue;
            };
            let path = format!("{}.py", module.trim().replace('.', "/"));
            profile.add_entry_point(
                EntryPoint::new(EntryPointKind::Main, join_relative(file.dir(), &path), 0.8)
                    .with_framework("poetry")
                    .with_language(Some(Language::Python))
                    .with_description(format!("Poetry script: {name}")),
            );
        }
    }

    fn from_java_builds(&self, index: &FileIndex, profile: &mut TechProfile) {
        for file in index.named("pom.xml") {
            let Some(content) = read_manifest(file) else {
                continue;
            };
            let Some(caps) = self.catalog.commands.pom_main_class.regex().captures(&content) else {
                continue;
            };
            let class = &caps[1];
            let path = format!("src/main/java/{}.java", class.replace('.', "/"));
            profile.add_entry_point(
                EntryPoint::new(EntryPointKind::Main, join_relative(file.dir(), &path), 0.9)
                    .with_framework("spring")
                    .with_language(Some(Language::Java))
                    .with_description(format!("Maven main class: {class}")),
            );
        }

        let gradle_files = index
            .named("build.gradle")
            .into_iter()
            .chain(index.named("build.gradle.kts"));
        for file in gradle_files {
            let Some(content) = read_manifest(file) else {
                continue;
            };
            if !content.contains("org.springframework.boot") {
                continue;
            }
            let source_root = join_relative(file.dir(), "src/main/java/");
            let path = index
                .files()
                .iter()
                .find(|f| f.name() == "Application.java" && f.rel_path.starts_with(&source_root))
                .map(|f| f.rel_path.clone())
                .unwrap_or_else(|| join_relative(file.dir(), "src/main/java/**/Application.java"));
            profile.add_entry_point(
                EntryPoint::new(EntryPointKind::Main, path, 0.7)
                    .with_framework("spring-boot")
                    .with_language(Some(Language::Java))
                    .with_description("Spring Boot application"),
            );
        }
    }

    fn from_frontend_configs(&self, index: &FileIndex, profile: &mut TechProfile) {
        let nextjs = index
            .named("next.config.js")
            .into_iter()
            .chain(index.named("next.config.mjs"));
        for file in nextjs {
            profile.add_entry_point(
                EntryPoint::new(
                    EntryPointKind::Custom("nextjs".to_string()),
                    join_relative(file.dir(), "pages/index.ts"),
                    0.8,
                )
                .with_framework("nextjs")
                .with_language(Some(Language::TypeScript))
                .with_description("Next.js pages entry"),
            );
        }

        for file in index.named("angular.json") {
            let Some(doc) = read_manifest(file).and_then(|c| serde_json::from_str::<serde_json::Value>(&c).ok()) else {
                continue;
            };
            let Some(projects) = doc.get("projects").and_then(|p| p.as_object()) else {
                continue;
            };
            for (project, config) in projects {
                let main = config
                    .pointer("/architect/build/options/main")
                    .and_then(|m| m.as_str());
                if let Some(main) = main {
                    profile.add_entry_point(
                        EntryPoint::new(
                            EntryPointKind::Custom("angular".to_string()),
                            join_relative(file.dir(), main),
                            0.9,
                        )
                        .with_framework("angular")
                        .with_language(Some(Language::TypeScript))
                        .with_description(format!("Angular project: {project}")),
                    );
                }
            }
        }

        for file in index.named("vue.config.js") {
            profile.add_entry_point(
                EntryPoint::new(
                    EntryPointKind::Custom("vue".to_string()),
                    join_relative(file.dir(), "src/main.ts"),
                    0.8,
                )
                .with_framework("vue")
                .with_language(Some(Language::TypeScript))
                .with_description("Vue CLI entry"),
            );
        }
    }

    fn from_compose(&self, index: &FileIndex, profile: &mut TechProfile) {
        for file in index.files().iter().filter(|f| is_compose_file_name(f.name())) {
            let Some(doc) = read_manifest(file).and_then(|c| serde_yaml::from_str::<serde_yaml::Value>(&c).ok()) else {
                continue;
            };
            let Some(services) = doc.get("services").and_then(|s| s.as_mapping()) else {
                continue;
            };
            for (name, service) in services {
                if service.get("build").is_none() {
                    continue;
                }
                let name = name.as_str().unwrap_or("service");
                profile.add_entry_point(
                    EntryPoint::new(EntryPointKind::DockerCompose, file.rel_path.clone(), 0.7)
                        .with_description(format!("Docker Compose service: {name}")),
                );
            }
        }
    }

    fn from_dockerfiles(&self, index: &FileIndex, profile: &mut TechProfile) {
        let commands = &self.catalog.commands;
        for file in index.files().iter().filter(|f| is_dockerfile_name(f.name())) {
            let Some(content) = read_manifest(file) else {
                continue;
            };
            // The last CMD is the effective one; ENTRYPOINT only when no CMD exists.
            let instruction = commands
                .dockerfile_cmd
                .regex()
                .captures_iter(&content)
                .last()
                .or_else(|| commands.dockerfile_entrypoint.regex().captures_iter(&content).last());
            let Some(instruction) = instruction else {
                continue;
            };
            let command = exec_form_to_shell(instruction[1].trim());

            let Some(caps) = commands.interpreter_invocation.regex().captures(&command) else {
                debug!(file = %file.rel_path, command = %command, "Container command runs no known interpreter");
                continue;
            };
            profile.add_entry_point(
                EntryPoint::new(EntryPointKind::Docker, join_relative(file.dir(), &caps[1]), 0.9)
                    .with_language(Language::from_command(&command))
                    .with_description(format!("Docker command: {command}")),
            );
        }
    }
}

/// `["python", "app.py"]` becomes `python app.py`. Shell form passes through.
fn exec_form_to_shell(argument: &str) -> String {
    if argument.starts_with('[') {
        if let Ok(parts) = serde_json::from_str::<Vec<String>>(argument) {
            return parts.join(" ");
        }
    }
    argument.to_string()
}

impl Analyzer for EntryPointAnalyzer {
    fn name(&self) -> &'static str {
        "entry_point"
    }

    fn analyze(&self, index: &FileIndex, profile: &mut TechProfile) -> Result<()> {
        self.from_content(index, profile);
        self.from_standard_files(index, profile);
        self.from_package_json(index, profile);
        self.from_pyproject(index, profile);
        self.from_java_builds(index, profile);
        self.from_frontend_configs(index, profile);
        self.from_compose(index, profile);
        self.from_dockerfiles(index, profile);

        profile.select_main_entry_point();
        debug!(
            entry_points = profile.entry_points.len(),
            main = ?profile.main_entry_point.as_ref().map(|e| e.file_path.as_str()),
            "Entry point analysis complete"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use pretty_assertions::assert_eq;

    fn analyzer() -> EntryPointAnalyzer {
        EntryPointAnalyzer::new(catalog(), ScanLimits::default())
    }

    fn find<'a>(profile: &'a TechProfile, kind: &EntryPointKind, path: &str) -> Option<&'a EntryPoint> {
        profile
            .entry_points
            .iter()
            .find(|e| &e.kind == kind && e.file_path == path)
    }

    #[test]
    fn test_go_main_prefers_main_kind() {
        let dir = repo(&[("main.go", "package main\n\nfunc main() {}\n")]);
        let profile = run(&analyzer(), dir.path());

        let app = find(&profile, &EntryPointKind::App, "main.go").unwrap();
        assert_eq!(app.confidence, 1.0);
        assert_eq!(app.framework.as_deref(), Some("go"));

        let main = profile.main_entry_point.as_ref().unwrap();
        assert_eq!(main.kind, EntryPointKind::Main);
        assert_eq!(main.file_path, "main.go");
        assert_eq!(profile.languages.as_slice(), &[Language::Go]);
    }

    #[test]
    fn test_python_main_guard_yields_main_kind() {
        let dir = repo(&[("tools/run_job.py", "if __name__ == '__main__':\n    run()\n")]);
        let profile = run(&analyzer(), dir.path());
        let entry = find(&profile, &EntryPointKind::Main, "tools/run_job.py").unwrap();
        assert_eq!(entry.confidence, 0.9);
        assert_eq!(entry.framework, None);
    }

    #[test]
    fn test_package_json_main_and_scripts() {
        let dir = repo(&[(
            "web/package.json",
            r#"{"main": "./dist/index.js", "scripts": {"start": "node server.js", "build": "tsc"}}"#,
        )]);
        let profile = run(&analyzer(), dir.path());

        let main = find(&profile, &EntryPointKind::Main, "web/dist/index.js").unwrap();
        assert_eq!(main.framework.as_deref(), Some("node"));
        let script = find(&profile, &EntryPointKind::Script, "web/server.js").unwrap();
        assert_eq!(script.description.as_deref(), Some("Script: start"));
    }

    #[test]
    fn test_poetry_script_maps_to_module_file() {
        let dir = repo(&[(
            "pyproject.toml",
            "[tool.poetry]\nname = \"svc\"\n\n[tool.poetry.scripts]\nserve = \"svc.cli:main\"\n",
        )]);
        let profile = run(&analyzer(), dir.path());
        let entry = find(&profile, &EntryPointKind::Main, "svc/cli.py").unwrap();
        assert_eq!(entry.framework.as_deref(), Some("poetry"));
        assert_eq!(entry.language, Some(Language::Python));
    }

    #[test]
    fn test_pom_main_class() {
        let dir = repo(&[(
            "api/pom.xml",
            "<project><build><plugins><plugin><configuration><mainClass>com.acme.App</mainClass></configuration></plugin></plugins></build></project>",
        )]);
        let profile = run(&analyzer(), dir.path());
        let entry = find(&profile, &EntryPointKind::Main, "api/src/main/java/com/acme/App.java").unwrap();
        assert_eq!(entry.confidence, 0.9);
        assert_eq!(entry.framework.as_deref(), Some("spring"));
    }

    #[test]
    fn test_dockerfile_exec_form_command() {
        let dir = repo(&[(
            "backend/Dockerfile",
            "FROM python:3.11\nCMD [\"python\", \"-u\", \"app/main.py\"]\n",
        )]);
        let profile = run(&analyzer(), dir.path());
        let entry = find(&profile, &EntryPointKind::Docker, "backend/app/main.py").unwrap();
        assert_eq!(entry.language, Some(Language::Python));
        assert_eq!(entry.description.as_deref(), Some("Docker command: python -u app/main.py"));
    }

    #[test]
    fn test_entrypoint_used_without_cmd() {
        let dir = repo(&[("Dockerfile", "FROM node:18\nENTRYPOINT node dist/server.js\n")]);
        let profile = run(&analyzer(), dir.path());
        assert!(find(&profile, &EntryPointKind::Docker, "dist/server.js").is_some());
    }

    #[test]
    fn test_compose_services_with_build() {
        let dir = repo(&[(
            "docker-compose.yml",
            "services:\n  db:\n    image: postgres:15\n  api:\n    build: ./api\n",
        )]);
        let profile = run(&analyzer(), dir.path());
        let entry = find(&profile, &EntryPointKind::DockerCompose, "docker-compose.yml").unwrap();
        assert_eq!(entry.description.as_deref(), Some("Docker Compose service: api"));
        assert_eq!(profile.entry_points.len(), 1);
    }

    #[test]
    fn test_frontend_configs_use_custom_kinds() {
        let dir = repo(&[
            ("next.config.js", "module.exports = {}\n"),
            (
                "admin/angular.json",
                r#"{"projects": {"admin": {"architect": {"build": {"options": {"main": "src/main.ts"}}}}}}"#,
            ),
        ]);
        let profile = run(&analyzer(), dir.path());
        assert!(find(&profile, &EntryPointKind::Custom("nextjs".into()), "pages/index.ts").is_some());
        assert!(find(&profile, &EntryPointKind::Custom("angular".into()), "admin/src/main.ts").is_some());
    }

    #[test]
    fn test_join_relative() {
        assert_eq!(join_relative("", "./dist/a.js"), "dist/a.js");
        assert_eq!(join_relative("web", "server.js"), "web/server.js");
        assert_eq!(join_relative("web", "/app/server.js"), "/app/server.js");
    }
}
