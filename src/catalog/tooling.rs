//! File-name tables for build tools, CI providers, infrastructure and hints.

use crate::catalog::FileMatcher;

use FileMatcher::{Name, Path, Prefix, Segment, Suffix, Under};

pub const BUILD_TOOLS: &[(&str, &[FileMatcher])] = &[
    ("webpack", &[Name("webpack.config.js"), Name("webpack.config.ts")]),
    ("vite", &[Name("vite.config.js"), Name("vite.config.ts")]),
    ("rollup", &[Name("rollup.config.js")]),
    ("parcel", &[Name(".parcelrc"), Name("parcel.json")]),
    ("gulp", &[Name("gulpfile.js"), Name("gulpfile.ts")]),
    ("grunt", &[Name("Gruntfile.js")]),
    (
        "babel",
        &[Name(".babelrc"), Name("babel.config.js"), Name("babel.config.json")],
    ),
    ("esbuild", &[Name("esbuild.js"), Name("esbuild.config.js")]),
    ("swc", &[Name(".swcrc"), Name("swc.config.js")]),
    ("make", &[Name("Makefile")]),
    ("cmake", &[Name("CMakeLists.txt")]),
    ("gradle", &[Name("build.gradle"), Name("build.gradle.kts")]),
    ("maven", &[Name("pom.xml")]),
    ("ant", &[Name("build.xml")]),
];

/// CI providers. Workflow directories only count their YAML files, see
/// [`CICD_YAML_ONLY`].
pub const CICD_PROVIDERS: &[(&str, &[FileMatcher])] = &[
    ("github-actions", &[Under(".github/workflows")]),
    ("gitlab-ci", &[Name(".gitlab-ci.yml")]),
    ("jenkins", &[Name("Jenkinsfile")]),
    ("bitbucket-pipelines", &[Name("bitbucket-pipelines.yml")]),
    ("azure-pipelines", &[Name("azure-pipelines.yml")]),
    ("circleci", &[Path(".circleci/config.yml")]),
    ("travis-ci", &[Name(".travis.yml")]),
    ("teamcity", &[Under(".teamcity")]),
    ("bamboo", &[Under("bamboo-specs")]),
];

pub const CICD_YAML_ONLY: &[&str] = &["github-actions"];

/// Infrastructure tools recorded under `files_detected[<tool>]`.
pub const INFRA_TOOLS: &[(&str, &[FileMatcher])] = &[
    (
        "kubernetes",
        &[
            Segment("k8s"),
            Segment("manifests"),
            Segment("kubernetes"),
            Suffix(".k8s.yaml"),
            Suffix(".k8s.yml"),
        ],
    ),
    ("helm", &[Name("Chart.yaml")]),
    (
        "terraform",
        &[
            Suffix(".tf"),
            Suffix(".tfvars"),
            Name(".terraform.lock.hcl"),
            Name("terraform.tfstate"),
        ],
    ),
    (
        "ansible",
        &[Name("ansible.cfg"), Name("inventory"), Name("playbook.yml")],
    ),
    ("pulumi", &[Name("Pulumi.yaml")]),
    ("vagrant", &[Name("Vagrantfile")]),
];

/// Container build files: default name prefix and alternate extension.
pub const DOCKERFILE_NAME: &str = "Dockerfile";
pub const DOCKERFILE_SUFFIX: &str = ".dockerfile";

pub fn is_dockerfile_name(name: &str) -> bool {
    name.starts_with(DOCKERFILE_NAME) || name.ends_with(DOCKERFILE_SUFFIX)
}

pub fn is_compose_file_name(name: &str) -> bool {
    name.starts_with("docker-compose") && (name.ends_with(".yml") || name.ends_with(".yaml"))
}

/// Conventional monorepo directory names per structural zone.
pub const FRONTEND_DIRS: &[&str] = &["frontend", "web", "client", "ui", "app"];
pub const BACKEND_DIRS: &[&str] = &["backend", "server", "api", "services"];
pub const APPS_DIRS: &[&str] = &["apps", "applications"];
pub const PACKAGES_DIRS: &[&str] = &["packages", "libs", "libraries"];

/// Hint label plus the file matchers that trigger it.
pub const HINT_RULES: &[(&str, &[FileMatcher])] = &[
    (
        "Web server configuration",
        &[
            Name("nginx.conf"),
            Name("apache.conf"),
            Name(".htaccess"),
            Name("httpd.conf"),
        ],
    ),
    (
        "Database configuration",
        &[Suffix(".sql"), Segment("migrations"), Segment("seeders")],
    ),
    (
        "Documentation",
        &[
            Name("README.md"),
            Segment("docs"),
            Suffix(".md"),
            Name("CHANGELOG.md"),
            Name("CONTRIBUTING.md"),
        ],
    ),
    (
        "Linters",
        &[
            Prefix(".eslintrc"),
            Name(".pylintrc"),
            Name("phpcs.xml"),
            Name(".rubocop.yml"),
            Prefix(".prettierrc"),
        ],
    ),
    (
        "Formatters",
        &[
            Name(".editorconfig"),
            Prefix(".prettierrc"),
            Name(".prettierignore"),
        ],
    ),
    (
        "Monitoring",
        &[
            Name("prometheus.yml"),
            Name("grafana.ini"),
            Name("newrelic.ini"),
        ],
    ),
    (
        "Containerization",
        &[Name(".dockerignore"), Name("compose.yaml")],
    ),
    (
        "Orchestration",
        &[Name("kustomization.yaml"), Name("values.yaml")],
    ),
];

/// Files quoted per hint.
pub const HINT_MAX_FILES: usize = 3;

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    #[parameterized(
        plain = { "Dockerfile", true },
        variant = { "Dockerfile.prod", true },
        alt_extension = { "api.dockerfile", true },
        compose = { "docker-compose.yml", false },
        lowercase = { "dockerfile", false },
    )]
    fn test_is_dockerfile_name(name: &str, expected: bool) {
        assert_eq!(is_dockerfile_name(name), expected);
    }

    #[parameterized(
        yml = { "docker-compose.yml", true },
        override_yaml = { "docker-compose.override.yaml", true },
        json = { "docker-compose.json", false },
        compose_spec = { "compose.yaml", false },
    )]
    fn test_is_compose_file_name(name: &str, expected: bool) {
        assert_eq!(is_compose_file_name(name), expected);
    }
}
