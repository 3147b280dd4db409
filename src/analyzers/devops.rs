//! Containerization and infrastructure detection.

use super::structure::{detect_structure, RepoStructure};
use super::Analyzer;
use crate::catalog::matching;
use crate::catalog::tooling::{
    is_compose_file_name, is_dockerfile_name, DOCKERFILE_NAME, DOCKERFILE_SUFFIX, INFRA_TOOLS,
};
use crate::profile::{OrderedSet, TechProfile, Zone};
use crate::scan::{find_all, is_ignored_path, FileIndex};
use anyhow::Result;
use std::collections::BTreeMap;
use tracing::debug;

/// Picks the build file downstream tooling should use when only one is allowed.
///
/// Root `Dockerfile`, then any `Dockerfile`, then `Dockerfile.*` variants, then
/// `*.dockerfile` files, then whatever came first.
pub fn select_main_dockerfile(paths: &[String]) -> Option<String> {
    let name_of = |p: &String| p.rsplit('/').next().unwrap_or(p).to_string();

    if let Some(root) = paths.iter().find(|p| p.as_str() == DOCKERFILE_NAME) {
        return Some(root.clone());
    }

    let mut plain: Vec<&String> = paths.iter().filter(|p| name_of(p) == DOCKERFILE_NAME).collect();
    plain.sort();
    if let Some(first) = plain.first() {
        return Some((*first).clone());
    }

    let mut variants: Vec<&String> = paths
        .iter()
        .filter(|p| name_of(p).starts_with(&format!("{DOCKERFILE_NAME}.")))
        .collect();
    variants.sort();
    if let Some(first) = variants.first() {
        return Some((*first).clone());
    }

    let mut alternates: Vec<&String> = paths
        .iter()
        .filter(|p| name_of(p).ends_with(DOCKERFILE_SUFFIX))
        .collect();
    alternates.sort();
    if let Some(first) = alternates.first() {
        return Some((*first).clone());
    }

    paths.first().cloned()
}

#[derive(Debug, Default)]
pub struct DevOpsAnalyzer;

impl DevOpsAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Index hits plus an unrestricted search for oversized build files.
    fn collect_dockerfiles(&self, index: &FileIndex) -> Vec<String> {
        let mut found: OrderedSet<String> = index
            .files()
            .iter()
            .filter(|f| is_dockerfile_name(f.name()))
            .map(|f| f.rel_path.clone())
            .collect();

        for path in find_all(index.root(), is_dockerfile_name) {
            let rel = index.rel(&path);
            if !is_ignored_path(&rel) && found.insert(rel.clone()) {
                debug!(file = %rel, "Dockerfile found outside the candidate set");
            }
        }
        found.iter().cloned().collect()
    }

    fn record_dockerfiles(&self, structure: &RepoStructure, dockerfiles: Vec<String>, profile: &mut TechProfile) {
        if structure.is_monorepo() && dockerfiles.len() > 1 {
            let mut zones: BTreeMap<Zone, Vec<String>> = BTreeMap::new();
            for path in &dockerfiles {
                zones.entry(structure.zone_of(path)).or_default().push(path.clone());
            }

            let selected = zones
                .get(&Zone::Root)
                .or_else(|| zones.get(&Zone::Backend))
                .cloned()
                .unwrap_or_else(|| dockerfiles.clone());
            profile.set_files("docker", selected);

            if zones.len() > 1 {
                for (zone, paths) in zones {
                    profile.set_files(&format!("docker_{}", zone.as_str()), paths);
                }
                profile.set_files("docker_all", dockerfiles);
            }
            return;
        }

        if let Some(main) = select_main_dockerfile(&dockerfiles) {
            profile.set_files("docker", vec![main]);
        }
        if dockerfiles.len() > 1 {
            profile.set_files("docker_all", dockerfiles);
        }
    }
}

impl Analyzer for DevOpsAnalyzer {
    fn name(&self) -> &'static str {
        "devops"
    }

    fn analyze(&self, index: &FileIndex, profile: &mut TechProfile) -> Result<()> {
        let dockerfiles = self.collect_dockerfiles(index);
        if !dockerfiles.is_empty() {
            profile.mark_docker();
            let structure = detect_structure(index.root());
            debug!(count = dockerfiles.len(), monorepo = structure.is_monorepo(), "Dockerfiles detected");
            self.record_dockerfiles(&structure, dockerfiles, profile);
        }

        let compose: Vec<String> = index
            .files()
            .iter()
            .filter(|f| is_compose_file_name(f.name()))
            .map(|f| f.rel_path.clone())
            .collect();
        if !compose.is_empty() {
            profile.mark_docker();
            profile.set_files("docker-compose", compose);
        }

        let all: Vec<_> = index.files().iter().collect();
        for (tool, matchers) in INFRA_TOOLS {
            let hits = matching(&all, matchers);
            if hits.is_empty() {
                continue;
            }
            debug!(tool, files = hits.len(), "Infrastructure tool detected");
            profile.set_files(tool, hits.iter().map(|f| f.rel_path.clone()).collect());
            match *tool {
                "kubernetes" | "helm" => profile.mark_kubernetes(),
                "terraform" => profile.mark_terraform(),
                _ => {}
            }
        }
        Ok(())
    }
}
