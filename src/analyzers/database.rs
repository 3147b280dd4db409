use super::{read_sample, Analyzer};
use crate::catalog::databases::{DATABASE_CONFIG_EXTENSIONS, DATABASE_MARKERS};
use crate::catalog::{matching, PatternCatalog};
use crate::profile::TechProfile;
use crate::scan::{FileIndex, ScanLimits};
use crate::stack::Language;
use anyhow::Result;
use std::sync::Arc;
use tracing::debug;

pub struct DatabaseAnalyzer {
    catalog: Arc<PatternCatalog>,
    limits: ScanLimits,
}

impl DatabaseAnalyzer {
    pub fn new(catalog: Arc<PatternCatalog>, limits: ScanLimits) -> Self {
        Self { catalog, limits }
    }
}

impl Analyzer for DatabaseAnalyzer {
    fn name(&self) -> &'static str {
        "database"
    }

    fn analyze(&self, index: &FileIndex, profile: &mut TechProfile) -> Result<()> {
        let all: Vec<_> = index.files().iter().collect();
        for (database, matchers) in DATABASE_MARKERS {
            if let Some(file) = matching(&all, matchers).first() {
                if profile.databases.insert(database.to_string()) {
                    debug!(database, file = %file.rel_path, "Database config file found");
                }
            }
        }

        // Source files get their language's patterns plus the URL ones; config files
        // only the URL ones.
        let extensions = Language::source_extensions()
            .into_iter()
            .map(str::to_string)
            .chain(DATABASE_CONFIG_EXTENSIONS.iter().map(|e| e.to_string()));
        let opts = self.limits.content_with_extensions(extensions);

        for file in index.candidates(&opts) {
            let language: Option<Language> = file.language();
            let content = read_sample(file, self.limits.content_max_bytes);
            if content.is_empty() {
                continue;
            }
            for rule in &self.catalog.databases {
                let hit = rule
                    .patterns
                    .iter()
                    .filter(|p| p.language.is_none() || p.language == language)
                    .any(|p| p.pattern.is_match(&content));
                if hit && profile.databases.insert(rule.name.to_string()) {
                    debug!(database = rule.name, file = %file.rel_path, "Database usage detected");
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use pretty_assertions::assert_eq;

    fn analyzer() -> DatabaseAnalyzer {
        DatabaseAnalyzer::new(catalog(), ScanLimits::default())
    }

    #[test]
    fn test_driver_imports_are_language_gated() {
        let dir = repo(&[
            ("main.go", "package main\n// import psycopg2\n"),
            ("app/db.py", "import psycopg2\n"),
        ]);
        let profile = run(&analyzer(), dir.path());
        assert_eq!(profile.databases.as_slice(), &["postgresql".to_string()]);
    }

    #[test]
    fn test_go_driver_not_matched_in_python() {
        let dir = repo(&[("script.py", "# github.com/go-sql-driver/mysql\n")]);
        assert!(run(&analyzer(), dir.path()).databases.is_empty());
    }

    #[test]
    fn test_connection_urls_match_any_file() {
        let dir = repo(&[
            ("config/app.yaml", "cache: redis://cache:6379/0\n"),
            ("src/Repo.java", "String url = \"mongodb+srv://cluster\";\n"),
        ]);
        let profile = run(&analyzer(), dir.path());
        assert_eq!(
            profile.databases.as_slice(),
            &["redis".to_string(), "mongodb".to_string()]
        );
    }

    #[test]
    fn test_marker_files() {
        let dir = repo(&[("deploy/redis.conf", "port 6379\n"), ("data/local.sqlite3", "")]);
        let profile = run(&analyzer(), dir.path());
        assert_eq!(
            profile.databases.as_slice(),
            &["redis".to_string(), "sqlite".to_string()]
        );
    }
}
