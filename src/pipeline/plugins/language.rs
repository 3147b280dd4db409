use super::Plugin;
use crate::pipeline::settings::UserSettings;
use crate::pipeline::stage::Stage;
use crate::profile::TechProfile;
use crate::stack::{FrameworkId, Language};
use std::collections::BTreeSet;

const LANGUAGE_STAGES: &[Stage] = &[
    Stage::Lint,
    Stage::TypeCheck,
    Stage::Security,
    Stage::Build,
    Stage::Migration,
];

const PYTHON_MIGRATION_FRAMEWORKS: &[FrameworkId] = &[FrameworkId::Django];

const JAVA_MIGRATION_FRAMEWORKS: &[FrameworkId] = &[
    FrameworkId::Spring,
    FrameworkId::SpringBoot,
    FrameworkId::Quarkus,
    FrameworkId::Micronaut,
    FrameworkId::Vertx,
];

const TYPESCRIPT_MIGRATION_FRAMEWORKS: &[FrameworkId] =
    &[FrameworkId::Express, FrameworkId::Nest, FrameworkId::NextJs];

/// What has to be detected before a migration stage makes sense.
#[derive(Debug, Clone, Copy)]
pub enum MigrationGate {
    /// Any detected database.
    Database,
    /// One of these frameworks.
    Frameworks(&'static [FrameworkId]),
    /// Either of the above.
    DatabaseOrFrameworks(&'static [FrameworkId]),
}

impl MigrationGate {
    fn is_open(&self, profile: &TechProfile) -> bool {
        let has_framework = |ids: &[FrameworkId]| {
            ids.iter().any(|id| {
                profile.frameworks.contains(id) || profile.backend_frameworks.contains(id)
            })
        };
        match self {
            MigrationGate::Database => !profile.databases.is_empty(),
            MigrationGate::Frameworks(ids) => has_framework(ids),
            MigrationGate::DatabaseOrFrameworks(ids) => !profile.databases.is_empty() || has_framework(ids),
        }
    }
}

/// Lint, type check, security, build and migration for one language.
#[derive(Debug, Clone)]
pub struct LanguagePlugin {
    name: &'static str,
    language: Language,
    migration: MigrationGate,
    /// Whether a container build makes the language build redundant.
    docker_replaces_build: bool,
}

impl LanguagePlugin {
    pub fn python() -> Self {
        Self {
            name: "python",
            language: Language::Python,
            migration: MigrationGate::DatabaseOrFrameworks(PYTHON_MIGRATION_FRAMEWORKS),
            docker_replaces_build: true,
        }
    }

    pub fn java() -> Self {
        Self {
            name: "java",
            language: Language::Java,
            migration: MigrationGate::Frameworks(JAVA_MIGRATION_FRAMEWORKS),
            docker_replaces_build: true,
        }
    }

    /// Go projects often build binaries before the image, so `build` stays.
    pub fn go() -> Self {
        Self {
            name: "go",
            language: Language::Go,
            migration: MigrationGate::Database,
            docker_replaces_build: false,
        }
    }

    pub fn typescript() -> Self {
        Self {
            name: "typescript",
            language: Language::TypeScript,
            migration: MigrationGate::Frameworks(TYPESCRIPT_MIGRATION_FRAMEWORKS),
            docker_replaces_build: true,
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }
}

impl Plugin for LanguagePlugin {
    fn name(&self) -> &'static str {
        self.name
    }

    fn is_applicable(&self, profile: &TechProfile) -> bool {
        profile.has_language(self.language)
    }

    fn proposed_stages(&self, profile: &TechProfile, _settings: &UserSettings) -> BTreeSet<Stage> {
        let mut stages: BTreeSet<Stage> = LANGUAGE_STAGES.iter().copied().collect();
        if !self.migration.is_open(profile) {
            stages.remove(&Stage::Migration);
        }
        if self.docker_replaces_build && profile.docker {
            stages.remove(&Stage::Build);
        }
        stages
    }
}
