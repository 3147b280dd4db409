//! Monorepo zone heuristic shared by the devops and test analyzers.

use crate::catalog::tooling::{APPS_DIRS, BACKEND_DIRS, FRONTEND_DIRS, PACKAGES_DIRS};
use crate::profile::Zone;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Zone directories found at the top of a repository, as relative paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoStructure {
    pub frontend_dirs: Vec<String>,
    pub backend_dirs: Vec<String>,
    pub apps_dirs: Vec<String>,
    pub packages_dirs: Vec<String>,
}

impl RepoStructure {
    /// Any conventional zone directory makes the tree a monorepo.
    pub fn is_monorepo(&self) -> bool {
        [&self.frontend_dirs, &self.backend_dirs, &self.apps_dirs, &self.packages_dirs]
            .iter()
            .any(|dirs| !dirs.is_empty())
    }

    /// Zone for a repository-relative path. Root-level files are always `Root`;
    /// deeper files go by zone directory first and file-name hint second.
    pub fn zone_of(&self, rel_path: &str) -> Zone {
        if !rel_path.contains('/') {
            return Zone::Root;
        }
        let under = |dirs: &[String]| {
            dirs.iter().any(|d| {
                rel_path
                    .strip_prefix(d.as_str())
                    .map(|rest| rest.starts_with('/'))
                    .unwrap_or(false)
            })
        };
        if under(&self.frontend_dirs) {
            return Zone::Frontend;
        }
        if under(&self.backend_dirs) {
            return Zone::Backend;
        }

        let name = rel_path.rsplit('/').next().unwrap_or(rel_path).to_ascii_lowercase();
        let has_token = |hints: &[&str]| {
            name.split(|c: char| !c.is_ascii_alphanumeric())
                .any(|token| hints.contains(&token))
        };
        if has_token(&["frontend", "web", "client", "ui"]) {
            return Zone::Frontend;
        }
        if has_token(&["backend", "server", "api"]) {
            return Zone::Backend;
        }
        Zone::Other
    }
}

fn subdirectories(dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .filter_map(|e| e.file_name().to_str().map(str::to_string))
        .collect();
    names.sort();
    names
}

fn is_one_of(name: &str, table: &[&str]) -> bool {
    let lowered = name.to_ascii_lowercase();
    table.contains(&lowered.as_str())
}

/// Inspects top-level directory names, descending one level into `apps/`-style dirs.
pub fn detect_structure(root: &Path) -> RepoStructure {
    let mut structure = RepoStructure::default();

    for name in subdirectories(root) {
        if is_one_of(&name, FRONTEND_DIRS) {
            structure.frontend_dirs.push(name);
        } else if is_one_of(&name, BACKEND_DIRS) {
            structure.backend_dirs.push(name);
        } else if is_one_of(&name, APPS_DIRS) {
            structure.apps_dirs.push(name.clone());
            for child in subdirectories(&root.join(&name)) {
                if is_one_of(&child, FRONTEND_DIRS) {
                    structure.frontend_dirs.push(format!("{name}/{child}"));
                } else if is_one_of(&child, BACKEND_DIRS) {
                    structure.backend_dirs.push(format!("{name}/{child}"));
                }
            }
        } else if is_one_of(&name, PACKAGES_DIRS) {
            structure.packages_dirs.push(name);
        }
    }

    debug!(
        frontend = ?structure.frontend_dirs,
        backend = ?structure.backend_dirs,
        apps = ?structure.apps_dirs,
        packages = ?structure.packages_dirs,
        "Detected repository structure"
    );
    structure
}
