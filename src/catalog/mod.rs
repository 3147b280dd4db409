//! Static detection tables.
//!
//! The submodules hold plain data: file names, path matchers and regex sources. The
//! regex-bearing tables are compiled once by [`PatternCatalog::builtin`] and shared by
//! every analyzer through an `Arc`. Nothing here inspects a repository.

pub mod cloud;
pub mod databases;
pub mod frameworks;
pub mod languages;
pub mod test_runners;
pub mod tooling;

use crate::scan::IndexedFile;
use crate::stack::{FrameworkCategory, FrameworkId, Language};
use regex::{Regex, RegexBuilder};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// A compiled content pattern that remembers its source text.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: &'static str,
    regex: Regex,
}

impl Pattern {
    pub fn compile(source: &'static str, case_insensitive: bool) -> Result<Self, CatalogError> {
        let regex = RegexBuilder::new(source)
            .case_insensitive(case_insensitive)
            .build()
            .map_err(|e| CatalogError::InvalidPattern {
                pattern: source.to_string(),
                source: e,
            })?;
        Ok(Self { source, regex })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn as_str(&self) -> &'static str {
        self.source
    }
}

fn compile_all(sources: &[&'static str], case_insensitive: bool) -> Result<Vec<Pattern>, CatalogError> {
    sources
        .iter()
        .map(|s| Pattern::compile(*s, case_insensitive))
        .collect()
}

/// Resolves a table slug into a framework identifier.
pub fn framework(slug: &str) -> FrameworkId {
    FrameworkId::from_name(slug).unwrap_or_else(|| FrameworkId::Custom(slug.to_string()))
}

/// Path predicate used by the file-name tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileMatcher {
    /// Exact file name at any depth.
    Name(&'static str),
    /// File name prefix at any depth (`Dockerfile` matches `Dockerfile.prod`).
    Prefix(&'static str),
    /// File name suffix at any depth (`.tf`).
    Suffix(&'static str),
    /// Exact repository-relative path.
    Path(&'static str),
    /// Any file below a repository-relative directory.
    Under(&'static str),
    /// Any file with this directory name somewhere in its path.
    Segment(&'static str),
}

impl FileMatcher {
    pub fn matches(&self, file: &IndexedFile) -> bool {
        match self {
            FileMatcher::Name(name) => file.name() == *name,
            FileMatcher::Prefix(prefix) => file.name().starts_with(prefix),
            FileMatcher::Suffix(suffix) => file.name().ends_with(suffix),
            FileMatcher::Path(path) => file.rel_path == *path,
            FileMatcher::Under(dir) => file
                .rel_path
                .strip_prefix(dir)
                .map(|rest| rest.starts_with('/'))
                .unwrap_or(false),
            FileMatcher::Segment(segment) => file.dir().split('/').any(|s| s == *segment),
        }
    }
}

/// Returns every file in `files` matched by at least one matcher.
pub fn matching<'a>(files: &[&'a IndexedFile], matchers: &[FileMatcher]) -> Vec<&'a IndexedFile> {
    files
        .iter()
        .copied()
        .filter(|f| matchers.iter().any(|m| m.matches(f)))
        .collect()
}

#[derive(Debug, Clone)]
pub struct EntryPatternRule {
    pub language: Language,
    pub pattern: Pattern,
    /// Framework tag, or `main` for a plain program entry.
    pub tag: &'static str,
    pub confidence: f32,
}

#[derive(Debug, Clone)]
pub struct FrameworkRule {
    pub id: FrameworkId,
    pub language: Language,
    pub category: FrameworkCategory,
    pub patterns: Vec<Pattern>,
}

/// Stricter evidence demanded for a framework, either always or when a competitor
/// is already present.
#[derive(Debug, Clone)]
pub struct StrictRule {
    pub id: FrameworkId,
    pub when_present: Option<FrameworkId>,
    pub patterns: Vec<Pattern>,
}

impl StrictRule {
    pub fn applies(&self, present: impl Fn(&FrameworkId) -> bool) -> bool {
        match &self.when_present {
            Some(rival) => present(rival),
            None => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExclusionRule {
    /// `winner` subsumes `loser`: the loser is dropped and never re-added.
    Supersedes { winner: FrameworkId, loser: FrameworkId },
    /// The two cannot coexist. `preferred` wins regardless of detection order.
    Exclusive { preferred: FrameworkId, other: FrameworkId },
}

#[derive(Debug, Clone)]
pub struct TestRunnerRule {
    pub name: &'static str,
    /// `None` means the runner is valid for any language.
    pub language: Option<Language>,
    pub patterns: Vec<Pattern>,
}

#[derive(Debug, Clone)]
pub struct DatabasePattern {
    /// `None` marks a connection-URL pattern valid for any language.
    pub language: Option<Language>,
    pub pattern: Pattern,
}

#[derive(Debug, Clone)]
pub struct DatabaseRule {
    pub name: &'static str,
    pub patterns: Vec<DatabasePattern>,
}

#[derive(Debug, Clone)]
pub struct CloudRule {
    pub name: &'static str,
    pub patterns: Vec<Pattern>,
}

/// Regexes used while parsing container build files and manifests.
#[derive(Debug, Clone)]
pub struct CommandPatterns {
    pub dockerfile_cmd: Pattern,
    pub dockerfile_entrypoint: Pattern,
    pub interpreter_invocation: Pattern,
    pub node_script_invocation: Pattern,
    pub pom_main_class: Pattern,
}

/// Compiled form of every regex table.
#[derive(Debug, Clone)]
pub struct PatternCatalog {
    pub entry_patterns: Vec<EntryPatternRule>,
    pub frameworks: Vec<FrameworkRule>,
    pub strict_rules: Vec<StrictRule>,
    pub exclusions: Vec<ExclusionRule>,
    pub test_runners: Vec<TestRunnerRule>,
    pub databases: Vec<DatabaseRule>,
    pub cloud: Vec<CloudRule>,
    pub commands: CommandPatterns,
}

impl PatternCatalog {
    pub fn builtin() -> Result<Self, CatalogError> {
        let mut entry_patterns = Vec::new();
        for (language, rules) in languages::ENTRY_POINT_PATTERNS {
            for (source, tag, confidence) in rules.iter() {
                entry_patterns.push(EntryPatternRule {
                    language: *language,
                    pattern: Pattern::compile(*source, false)?,
                    tag: *tag,
                    confidence: *confidence,
                });
            }
        }

        let frameworks = frameworks::FRAMEWORKS
            .iter()
            .map(|spec| {
                Ok(FrameworkRule {
                    id: framework(spec.slug),
                    language: spec.language,
                    category: spec.category,
                    patterns: compile_all(spec.patterns, true)?,
                })
            })
            .collect::<Result<Vec<_>, CatalogError>>()?;

        let strict_rules = frameworks::STRICT_RULES
            .iter()
            .map(|spec| {
                Ok(StrictRule {
                    id: framework(spec.slug),
                    when_present: spec.when_present.map(framework),
                    patterns: compile_all(spec.patterns, true)?,
                })
            })
            .collect::<Result<Vec<_>, CatalogError>>()?;

        let exclusions = frameworks::SUPERSEDES
            .iter()
            .map(|(winner, loser)| ExclusionRule::Supersedes {
                winner: framework(winner),
                loser: framework(loser),
            })
            .chain(
                frameworks::MUTUALLY_EXCLUSIVE
                    .iter()
                    .map(|(preferred, other)| ExclusionRule::Exclusive {
                        preferred: framework(preferred),
                        other: framework(other),
                    }),
            )
            .collect();

        let test_runners = test_runners::TEST_RUNNER_PATTERNS
            .iter()
            .map(|spec| {
                Ok(TestRunnerRule {
                    name: spec.name,
                    language: spec.language,
                    patterns: compile_all(spec.patterns, true)?,
                })
            })
            .collect::<Result<Vec<_>, CatalogError>>()?;

        let databases = databases::DATABASE_PATTERNS
            .iter()
            .map(|spec| {
                let patterns = spec
                    .patterns
                    .iter()
                    .map(|(language, source)| {
                        Ok(DatabasePattern {
                            language: *language,
                            pattern: Pattern::compile(*source, true)?,
                        })
                    })
                    .collect::<Result<Vec<_>, CatalogError>>()?;
                Ok(DatabaseRule {
                    name: spec.name,
                    patterns,
                })
            })
            .collect::<Result<Vec<_>, CatalogError>>()?;

        let cloud = cloud::CLOUD_PATTERNS
            .iter()
            .map(|(name, sources)| {
                Ok(CloudRule {
                    name: *name,
                    patterns: compile_all(sources, true)?,
                })
            })
            .collect::<Result<Vec<_>, CatalogError>>()?;

        let commands = CommandPatterns {
            dockerfile_cmd: Pattern::compile(languages::DOCKERFILE_CMD, false)?,
            dockerfile_entrypoint: Pattern::compile(languages::DOCKERFILE_ENTRYPOINT, false)?,
            interpreter_invocation: Pattern::compile(languages::INTERPRETER_INVOCATION, false)?,
            node_script_invocation: Pattern::compile(languages::NODE_SCRIPT_INVOCATION, false)?,
            pom_main_class: Pattern::compile(languages::POM_MAIN_CLASS, false)?,
        };

        Ok(Self {
            entry_patterns,
            frameworks,
            strict_rules,
            exclusions,
            test_runners,
            databases,
            cloud,
            commands,
        })
    }

    /// Static category of a framework, `None` for unknown frameworks.
    pub fn category_of(&self, id: &FrameworkId) -> Option<FrameworkCategory> {
        self.frameworks
            .iter()
            .find(|rule| &rule.id == id)
            .map(|rule| rule.category)
    }

    pub fn strict_rule(&self, id: &FrameworkId) -> Option<&StrictRule> {
        self.strict_rules.iter().find(|rule| &rule.id == id)
    }
}
