//! Markdown rendering of a [`TechProfile`].

use crate::profile::{EntryPoint, TechProfile};
use std::fmt::Write;

fn list_section<I, T>(out: &mut String, title: &str, items: I)
where
    I: IntoIterator<Item = T>,
    T: std::fmt::Display,
{
    let items: Vec<String> = items.into_iter().map(|i| i.to_string()).collect();
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "## {}\n", title);
    for item in items {
        let _ = writeln!(out, "- {}", item);
    }
    out.push('\n');
}

fn describe_entry(entry: &EntryPoint) -> String {
    let mut line = format!("`{}` ({}, confidence {:.2})", entry.file_path, entry.kind, entry.confidence);
    if let Some(framework) = &entry.framework {
        let _ = write!(line, ", framework {}", framework);
    }
    if let Some(language) = &entry.language {
        let _ = write!(line, ", language {}", language);
    }
    if let Some(description) = &entry.description {
        let _ = write!(line, ": {}", description);
    }
    line
}

pub fn to_markdown(profile: &TechProfile) -> String {
    let mut out = String::from("# Technology Stack\n\n");

    list_section(&mut out, "Languages", profile.languages.iter());

    if !profile.frameworks.is_empty() {
        out.push_str("## Frameworks\n\n");
        for framework in profile.frameworks.iter() {
            let _ = writeln!(out, "- {}", framework.name());
        }
        let split = [
            ("Frontend", &profile.frontend_frameworks),
            ("Backend", &profile.backend_frameworks),
            ("Mobile", &profile.mobile_frameworks),
        ];
        for (label, set) in split {
            if !set.is_empty() {
                let names: Vec<String> = set.iter().map(|f| f.name()).collect();
                let _ = writeln!(out, "\n{}: {}", label, names.join(", "));
            }
        }
        out.push('\n');
    }

    if let Some(pm) = &profile.package_manager {
        let _ = writeln!(out, "## Package Manager\n\n{}\n", pm);
    }

    list_section(&mut out, "Test Runners", profile.test_runner.iter());

    if profile.docker || profile.kubernetes || profile.terraform {
        out.push_str("## Containerization & Infrastructure\n\n");
        for (label, enabled) in [
            ("Docker", profile.docker),
            ("Kubernetes", profile.kubernetes),
            ("Terraform", profile.terraform),
        ] {
            if enabled {
                let _ = writeln!(out, "- {}", label);
            }
        }
        let dockerfiles = profile.dockerfile_paths();
        if !dockerfiles.is_empty() {
            out.push_str("\nDockerfiles:\n\n");
            for path in dockerfiles {
                let _ = writeln!(out, "- `{}`", path);
            }
        }
        out.push('\n');
    }

    list_section(&mut out, "Databases", profile.databases.iter());
    list_section(&mut out, "Cloud Platforms", profile.cloud_platforms.iter());
    list_section(&mut out, "Build Tools", profile.build_tools.iter());
    list_section(&mut out, "CI/CD", profile.cicd.iter());

    if let Some(main) = &profile.main_entry_point {
        let _ = writeln!(out, "## Main Entry Point\n\n{}\n", describe_entry(main));
    }
    list_section(&mut out, "Entry Points", profile.entry_points.iter().map(describe_entry));

    if let Some(version) = profile.java_version {
        let _ = writeln!(out, "## Java Version\n\n{}\n", version);
    }

    list_section(&mut out, "Hints", profile.hints.iter());

    let trimmed = out.trim_end().len();
    out.truncate(trimmed);
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::EntryPointKind;
    use crate::stack::{FrameworkId, Language};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_profile_has_only_title() {
        assert_eq!(to_markdown(&TechProfile::new()), "# Technology Stack\n");
    }

    #[test]
    fn test_sections() {
        let mut profile = TechProfile::new();
        profile.add_language(Language::Python);
        profile.add_framework(FrameworkId::Django);
        profile.backend_frameworks.insert(FrameworkId::Django);
        profile.package_manager = Some("poetry".to_string());
        profile.mark_docker();
        profile.set_files("docker", vec!["Dockerfile".to_string()]);
        profile.databases.insert("postgresql".to_string());
        profile.java_version = Some(21);
        let main = EntryPoint::new(EntryPointKind::App, "manage.py", 0.9).with_framework("django");
        profile.add_entry_point(main.clone());
        profile.main_entry_point = Some(main);

        let md = to_markdown(&profile);
        assert!(md.contains("## Languages\n\n- python\n"));
        assert!(md.contains("- Django\n\nBackend: Django\n"));
        assert!(md.contains("## Package Manager\n\npoetry\n"));
        assert!(md.contains("- Docker\n"));
        assert!(md.contains("- `Dockerfile`"));
        assert!(md.contains("## Main Entry Point\n\n`manage.py` (app, confidence 0.90), framework django\n"));
        assert!(md.contains("## Java Version\n\n21\n"));
        assert!(!md.contains("## Hints"));
        assert!(!md.contains("## Cloud Platforms"));
    }
}
