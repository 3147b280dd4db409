//! The technology profile built up by the analyzers.
//!
//! A [`TechProfile`] is owned by one detection run. Analyzers only ever add to it: list
//! fields are [`OrderedSet`]s (insertion order kept, duplicates dropped) and the
//! `docker`/`kubernetes`/`terraform` flags only move from `false` to `true`. The single
//! sanctioned retraction is [`TechProfile::remove_framework`], used by the framework
//! exclusion table.

use crate::stack::{FrameworkCategory, FrameworkId, Language};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::Path;

/// Insertion-ordered set backed by a `Vec`. Serializes as a plain list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderedSet<T>(Vec<T>);

impl<T> Default for OrderedSet<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T: PartialEq> OrderedSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `value` unless already present. Returns true when it was added.
    pub fn insert(&mut self, value: T) -> bool {
        if self.0.contains(&value) {
            return false;
        }
        self.0.push(value);
        true
    }

    pub fn remove(&mut self, value: &T) -> bool {
        let before = self.0.len();
        self.0.retain(|v| v != value);
        before != self.0.len()
    }

    pub fn contains(&self, value: &T) -> bool {
        self.0.contains(value)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&T> {
        self.0.first()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.0
    }
}

impl<T: PartialEq> FromIterator<T> for OrderedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = OrderedSet::new();
        for item in iter {
            set.insert(item);
        }
        set
    }
}

impl<'a, T> IntoIterator for &'a OrderedSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

crate::define_id_enum! {
    /// What kind of evidence produced an entry point. Framework-specific kinds
    /// (`nextjs`, `angular`, `vue`, ...) land in `Custom`.
    EntryPointKind {
        Main => "main" : "Main",
        App => "app" : "App",
        Script => "script" : "Script",
        Docker => "docker" : "Docker",
        DockerCompose => "docker-compose" : "Docker Compose",
    }
}

/// Kinds considered for `main_entry_point`, most preferred first.
pub const PREFERRED_ENTRY_KINDS: &[EntryPointKind] = &[
    EntryPointKind::Main,
    EntryPointKind::App,
    EntryPointKind::Docker,
    EntryPointKind::Script,
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryPoint {
    #[serde(rename = "type")]
    pub kind: EntryPointKind,
    pub file_path: String,
    #[serde(default)]
    pub framework: Option<String>,
    #[serde(default)]
    pub language: Option<Language>,
    pub confidence: f32,
    #[serde(default)]
    pub description: Option<String>,
}

impl EntryPoint {
    pub fn new(kind: EntryPointKind, file_path: impl Into<String>, confidence: f32) -> Self {
        Self {
            kind,
            file_path: file_path.into(),
            framework: None,
            language: None,
            confidence: confidence.clamp(0.0, 1.0),
            description: None,
        }
    }

    pub fn with_framework(mut self, framework: impl Into<String>) -> Self {
        self.framework = Some(framework.into());
        self
    }

    pub fn with_language(mut self, language: Option<Language>) -> Self {
        self.language = language;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn same_slot(&self, other: &EntryPoint) -> bool {
        self.file_path == other.file_path && self.kind == other.kind
    }
}

/// Monorepo structural zone of a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    Root,
    Frontend,
    Backend,
    Other,
}

impl Zone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Zone::Root => "root",
            Zone::Frontend => "frontend",
            Zone::Backend => "backend",
            Zone::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TechProfile {
    pub languages: OrderedSet<Language>,
    pub frameworks: OrderedSet<FrameworkId>,
    pub frontend_frameworks: OrderedSet<FrameworkId>,
    pub backend_frameworks: OrderedSet<FrameworkId>,
    pub mobile_frameworks: OrderedSet<FrameworkId>,
    pub package_manager: Option<String>,
    pub test_runner: OrderedSet<String>,
    pub docker: bool,
    pub kubernetes: bool,
    pub terraform: bool,
    pub databases: OrderedSet<String>,
    pub cloud_platforms: OrderedSet<String>,
    pub build_tools: OrderedSet<String>,
    pub cicd: OrderedSet<String>,
    pub entry_points: Vec<EntryPoint>,
    pub main_entry_point: Option<EntryPoint>,
    pub hints: OrderedSet<String>,
    pub files_detected: BTreeMap<String, Vec<String>>,
    /// Test runners attributed per monorepo zone. Auxiliary to `test_runner`.
    pub test_runners_by_zone: BTreeMap<Zone, Vec<String>>,
    /// Highest build-language version declared across Java build descriptors.
    pub java_version: Option<u32>,
}

impl TechProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_language(&mut self, language: Language) -> bool {
        self.languages.insert(language)
    }

    /// Records a language by name, dropping anything outside the supported set.
    pub fn add_language_name(&mut self, name: &str) -> bool {
        match Language::normalize(name) {
            Some(language) => self.add_language(language),
            None => false,
        }
    }

    pub fn has_language(&self, language: Language) -> bool {
        self.languages.contains(&language)
    }

    pub fn add_framework(&mut self, framework: FrameworkId) -> bool {
        self.frameworks.insert(framework)
    }

    pub fn remove_framework(&mut self, framework: &FrameworkId) -> bool {
        self.frameworks.remove(framework)
    }

    pub fn has_framework(&self, framework: &FrameworkId) -> bool {
        self.frameworks.contains(framework)
    }

    /// Rebuilds the category lists from `frameworks`.
    pub fn classify_frameworks<F>(&mut self, category_of: F)
    where
        F: Fn(&FrameworkId) -> Option<FrameworkCategory>,
    {
        let mut frontend = OrderedSet::new();
        let mut backend = OrderedSet::new();
        let mut mobile = OrderedSet::new();
        for framework in self.frameworks.iter() {
            match category_of(framework) {
                Some(FrameworkCategory::Frontend) => frontend.insert(framework.clone()),
                Some(FrameworkCategory::Backend) => backend.insert(framework.clone()),
                Some(FrameworkCategory::Mobile) => mobile.insert(framework.clone()),
                None => false,
            };
        }
        self.frontend_frameworks = frontend;
        self.backend_frameworks = backend;
        self.mobile_frameworks = mobile;
    }

    pub fn mark_docker(&mut self) {
        self.docker = true;
    }

    pub fn mark_kubernetes(&mut self) {
        self.kubernetes = true;
    }

    pub fn mark_terraform(&mut self) {
        self.terraform = true;
    }

    pub fn add_hint(&mut self, hint: impl Into<String>) -> bool {
        self.hints.insert(hint.into())
    }

    /// Adds `path` under `key` unless it is already listed there.
    pub fn record_file(&mut self, key: &str, path: impl Into<String>) {
        let path = path.into();
        let entry = self.files_detected.entry(key.to_string()).or_default();
        if !entry.contains(&path) {
            entry.push(path);
        }
    }

    /// Replaces the paths under `key`. Used for derived selections that are recomputed
    /// from scratch on every run.
    pub fn set_files(&mut self, key: &str, paths: Vec<String>) {
        self.files_detected.insert(key.to_string(), paths);
    }

    pub fn files(&self, key: &str) -> &[String] {
        self.files_detected
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Adds an entry point unless one with the same `(file_path, type)` exists. The
    /// entry's language also feeds the language set.
    pub fn add_entry_point(&mut self, entry: EntryPoint) -> bool {
        if self.entry_points.iter().any(|e| e.same_slot(&entry)) {
            return false;
        }
        if let Some(language) = entry.language {
            self.add_language(language);
        }
        self.entry_points.push(entry);
        true
    }

    /// Picks `main_entry_point`: highest-confidence entry of the most preferred kind,
    /// else the highest-confidence entry overall.
    pub fn select_main_entry_point(&mut self) {
        let mut sorted: Vec<&EntryPoint> = self.entry_points.iter().collect();
        sorted.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
        });

        let preferred = PREFERRED_ENTRY_KINDS
            .iter()
            .find_map(|kind| sorted.iter().find(|e| &e.kind == kind));

        self.main_entry_point = preferred.or(sorted.first()).map(|e| (*e).clone());
    }

    pub fn has_compose(&self) -> bool {
        !self.files("docker-compose").is_empty()
            || self
                .entry_points
                .iter()
                .any(|e| e.kind == EntryPointKind::DockerCompose)
    }

    /// All container build files, selected ones first, without duplicates.
    pub fn dockerfile_paths(&self) -> Vec<String> {
        let mut paths: OrderedSet<String> = OrderedSet::new();
        for path in self.files("docker").iter().chain(self.files("docker_all")) {
            paths.insert(path.clone());
        }
        paths.0
    }

    pub fn primary_dockerfile(&self) -> Option<String> {
        self.dockerfile_paths().into_iter().next()
    }

    /// Build context of the primary container build file (`.` for the repository root).
    pub fn docker_context(&self) -> String {
        self.primary_dockerfile()
            .and_then(|p| {
                Path::new(&p)
                    .parent()
                    .map(|d| d.to_string_lossy().replace('\\', "/"))
            })
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| ".".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(kind: EntryPointKind, path: &str, confidence: f32) -> EntryPoint {
        EntryPoint::new(kind, path, confidence)
    }

    #[test]
    fn test_ordered_set_drops_duplicates() {
        let mut set = OrderedSet::new();
        assert!(set.insert("go".to_string()));
        assert!(set.insert("python".to_string()));
        assert!(!set.insert("go".to_string()));
        assert_eq!(set.as_slice(), &["go".to_string(), "python".to_string()]);
    }

    #[test]
    fn test_entry_points_deduplicated_by_path_and_type() {
        let mut profile = TechProfile::new();
        assert!(profile.add_entry_point(entry(EntryPointKind::Main, "main.go", 0.7)));
        assert!(!profile.add_entry_point(entry(EntryPointKind::Main, "main.go", 0.9)));
        assert!(profile.add_entry_point(entry(EntryPointKind::App, "main.go", 1.0)));
        assert_eq!(profile.entry_points.len(), 2);
        assert_eq!(profile.entry_points[0].confidence, 0.7);
    }

    #[test]
    fn test_entry_point_language_feeds_language_set() {
        let mut profile = TechProfile::new();
        profile.add_entry_point(
            entry(EntryPointKind::Docker, "server.js", 0.9)
                .with_language(Some(Language::TypeScript)),
        );
        assert!(profile.has_language(Language::TypeScript));
    }

    #[test]
    fn test_main_entry_prefers_known_kind_over_confidence() {
        let mut profile = TechProfile::new();
        profile.add_entry_point(entry(EntryPointKind::Script, "a.js", 0.6));
        profile.add_entry_point(entry(EntryPointKind::App, "b.py", 0.9));
        profile.add_entry_point(entry(
            EntryPointKind::Custom("nextjs".to_string()),
            "pages/index.ts",
            0.95,
        ));
        profile.select_main_entry_point();

        let main = profile.main_entry_point.expect("main entry point");
        assert_eq!(main.kind, EntryPointKind::App);
        assert_eq!(main.file_path, "b.py");
    }

    #[test]
    fn test_main_entry_falls_back_to_highest_confidence() {
        let mut profile = TechProfile::new();
        profile.add_entry_point(entry(
            EntryPointKind::Custom("vue".to_string()),
            "src/main.ts",
            0.8,
        ));
        profile.add_entry_point(entry(
            EntryPointKind::Custom("angular".to_string()),
            "src/main.ts",
            0.9,
        ));
        profile.select_main_entry_point();
        assert_eq!(
            profile.main_entry_point.map(|e| e.confidence),
            Some(0.9)
        );
    }

    #[test]
    fn test_main_entry_empty_profile() {
        let mut profile = TechProfile::new();
        profile.select_main_entry_point();
        assert!(profile.main_entry_point.is_none());
    }

    #[test]
    fn test_docker_context_from_primary_dockerfile() {
        let mut profile = TechProfile::new();
        assert_eq!(profile.docker_context(), ".");

        profile.set_files("docker", vec!["backend/Dockerfile".to_string()]);
        profile.set_files(
            "docker_all",
            vec![
                "backend/Dockerfile".to_string(),
                "frontend/Dockerfile".to_string(),
            ],
        );
        assert_eq!(profile.docker_context(), "backend");
        assert_eq!(profile.dockerfile_paths().len(), 2);
    }

    #[test]
    fn test_profile_round_trips_through_json() {
        let mut profile = TechProfile::new();
        profile.add_language(Language::Go);
        profile.add_framework(FrameworkId::Gin);
        profile.package_manager = Some("go mod".to_string());
        profile.mark_docker();
        profile.record_file("go_mod", "go.mod");
        profile
            .test_runners_by_zone
            .insert(Zone::Backend, vec!["go-testing".to_string()]);

        let json = serde_json::to_string(&profile).unwrap();
        assert!(json.contains("\"languages\":[\"go\"]"));
        let back: TechProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, profile);
    }
}
