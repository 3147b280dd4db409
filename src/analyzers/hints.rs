use super::Analyzer;
use crate::catalog::matching;
use crate::catalog::tooling::{HINT_MAX_FILES, HINT_RULES};
use crate::profile::TechProfile;
use crate::scan::FileIndex;
use anyhow::Result;
use tracing::debug;

/// `"<label> found: a, b, c"`, with a count of the files left out.
fn describe(label: &str, files: &[String]) -> String {
    let shown = files
        .iter()
        .take(HINT_MAX_FILES)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if files.len() > HINT_MAX_FILES {
        format!("{} found: {} (+{} more)", label, shown, files.len() - HINT_MAX_FILES)
    } else {
        format!("{} found: {}", label, shown)
    }
}

pub struct HintsAnalyzer;

impl Analyzer for HintsAnalyzer {
    fn name(&self) -> &'static str {
        "hints"
    }

    fn analyze(&self, index: &FileIndex, profile: &mut TechProfile) -> Result<()> {
        let all: Vec<_> = index.files().iter().collect();
        for (label, matchers) in HINT_RULES {
            let files: Vec<String> = matching(&all, matchers)
                .into_iter()
                .map(|f| f.rel_path.clone())
                .collect();
            if files.is_empty() {
                continue;
            }
            if profile.add_hint(describe(label, &files)) {
                debug!(hint = label, files = files.len(), "Hint recorded");
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

    #[test]
    fn test_hints_name_triggering_files() {
        let dir = repo(&[
            ("nginx.conf", "events {}\n"),
            ("db/migrations/001.sql", "create table t();\n"),
            (".editorconfig", "root = true\n"),
        ]);
        let profile = run(&HintsAnalyzer, dir.path());
        assert_eq!(
            profile.hints.as_slice(),
            &[
                "Web server configuration found: nginx.conf".to_string(),
                "Database configuration found: db/migrations/001.sql".to_string(),
                "Formatters found: .editorconfig".to_string(),
            ]
        );
    }

    #[test]
    fn test_describe_truncates() {
        let files: Vec<String> = (1..=5).map(|i| format!("docs/{i}.md")).collect();
        assert_eq!(
            describe("Documentation", &files),
            "Documentation found: docs/1.md, docs/2.md, docs/3.md (+2 more)"
        );
    }
}
