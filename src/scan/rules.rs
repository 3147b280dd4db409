//! Static ignore rules for the repository walk.

/// Directory or file names that are never descended into or reported.
pub const IGNORED_SEGMENTS: &[&str] = &[
    // version control
    ".git",
    ".svn",
    ".hg",
    ".bzr",
    // python
    "__pycache__",
    ".pytest_cache",
    ".mypy_cache",
    ".ruff_cache",
    "venv",
    ".venv",
    "env",
    ".env",
    "virtualenv",
    "dist",
    "build",
    ".build",
    ".tox",
    ".coverage",
    "htmlcov",
    // node
    "node_modules",
    ".node_modules",
    ".npm",
    ".yarn",
    ".next",
    ".nuxt",
    ".cache",
    ".parcel-cache",
    // editors
    ".idea",
    ".vscode",
    ".vs",
    ".settings",
    // build output
    "target",
    "bin",
    "obj",
    "out",
    ".gradle",
    // vendored dependencies
    "vendor",
    "bower_components",
    "packages",
    // os noise
    ".DS_Store",
    "Thumbs.db",
    ".tmp",
];

/// Suffixes that mark a segment as a cache or packaging artifact.
pub const IGNORED_SUFFIXES: &[&str] = &[".egg-info", "_cache", ".cache"];

/// Hidden names that carry stack evidence and stay visible at any depth.
pub const HIDDEN_ALLOWLIST: &[&str] = &[
    ".github",
    ".gitlab",
    ".circleci",
    ".teamcity",
    ".aws",
    ".azure",
    ".gcp",
    ".dockerignore",
    ".gitignore",
    ".env.example",
    ".gitlab-ci.yml",
    ".travis.yml",
    ".babelrc",
    ".parcelrc",
    ".swcrc",
    ".rspec",
    ".editorconfig",
    ".pylintrc",
    ".prettierignore",
    ".rubocop.yml",
    ".htaccess",
    ".terraform.lock.hcl",
];

/// Hidden config families (`.eslintrc.json`, `.mocharc.yaml`, ...) kept by prefix.
pub const HIDDEN_PREFIX_ALLOWLIST: &[&str] = &[".eslintrc", ".prettierrc", ".mocharc"];

/// Returns true when a single path segment excludes everything below it.
pub fn is_ignored_segment(name: &str) -> bool {
    if IGNORED_SEGMENTS.contains(&name) {
        return true;
    }
    if IGNORED_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)) {
        return true;
    }
    if name.starts_with('.') && name.len() > 1 {
        return !is_allowed_hidden(name);
    }
    false
}

fn is_allowed_hidden(name: &str) -> bool {
    HIDDEN_ALLOWLIST.contains(&name)
        || HIDDEN_PREFIX_ALLOWLIST
            .iter()
            .any(|prefix| name.starts_with(prefix))
}

/// Checks every segment of a repository-relative path.
pub fn is_ignored_path(rel_path: &str) -> bool {
    rel_path
        .split(['/', '\\'])
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .any(is_ignored_segment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    #[parameterized(
        node_modules = { "node_modules/react/index.js", true },
        nested_venv = { "services/api/.venv/lib/site.py", true },
        egg_info = { "pkg.egg-info/PKG-INFO", true },
        cache_suffix = { "tool_cache/x.py", true },
        hidden_dir = { ".terraform/modules/m.tf", true },
        github_workflow = { ".github/workflows/ci.yml", false },
        gitlab_ci = { ".gitlab-ci.yml", false },
        eslint_variant = { "web/.eslintrc.json", false },
        mocharc = { ".mocharc.yaml", false },
        env_example = { ".env.example", false },
        plain_source = { "src/main.go", false },
        tmp_is_kept = { "tmp/notes.txt", false },
    )]
    fn test_is_ignored_path(path: &str, expected: bool) {
        assert_eq!(is_ignored_path(path), expected);
    }

    #[test]
    fn test_dot_segment_is_not_hidden() {
        assert!(!is_ignored_path("./main.go"));
    }
}
