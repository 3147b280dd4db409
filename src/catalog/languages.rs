//! Entry points and package managers.

use crate::stack::Language;

/// Conventional entry file names per language. Entries containing `/` match a
/// repository-relative path suffix. `dir/**/*.ext` matches any such file below `dir`.
pub const STANDARD_ENTRY_FILES: &[(Language, &[&str])] = &[
    (
        Language::Python,
        &["main.py", "app.py", "application.py", "run.py", "wsgi.py", "asgi.py", "manage.py"],
    ),
    (
        Language::TypeScript,
        &[
            "index.ts",
            "app.ts",
            "server.ts",
            "main.ts",
            "src/index.ts",
            "src/app.ts",
            "index.js",
            "app.js",
            "server.js",
            "main.js",
            "src/index.js",
            "src/app.js",
        ],
    ),
    (
        Language::Java,
        &["Main.java", "Application.java", "Main.kt", "Application.kt"],
    ),
    (Language::Go, &["main.go", "cmd/**/*.go"]),
];

/// Content patterns that mark a file as an entry point: `(regex, tag, confidence)`.
/// Matching is case-sensitive and the first matching pattern per file wins.
pub const ENTRY_POINT_PATTERNS: &[(Language, &[(&str, &str, f32)])] = &[
    (
        Language::Python,
        &[
            (r#"if __name__ == ['"]__main__['"]"#, "main", 0.9),
            (r"app\.run\(", "flask", 0.8),
            (r"application\.run\(", "flask", 0.8),
            (r"uvicorn\.run\(", "fastapi", 0.9),
            (r"manage\.py", "django", 1.0),
            (r"from django\.", "django", 0.7),
            (r"Flask\(", "flask", 0.6),
            (r"FastAPI\(\)", "fastapi", 0.8),
        ],
    ),
    (
        Language::TypeScript,
        &[
            (r"app\.listen\(", "express", 0.9),
            (r"express\(\)", "express", 0.7),
            (r"module\.exports\s*=", "node", 0.8),
            (r"export default", "es6", 0.7),
            (r#"require\(['"]express['"]\)"#, "express", 0.6),
            (r"import.*express", "express", 0.6),
            (r"ReactDOM\.(render|createRoot)\(", "react", 0.9),
            (r"Vue\.createApp\(", "vue", 0.95),
            (r"\bcreateApp\(", "vue", 0.9),
            (r"bootstrapApplication\(", "angular", 0.9),
            (r"@nestjs", "nestjs", 0.8),
            (r#"from ['"]next['"]"#, "nextjs", 0.8),
        ],
    ),
    (
        Language::Java,
        &[
            (r"public static void main\(String\[\] args\)", "java", 1.0),
            (r"fun main\(", "kotlin", 1.0),
            (r"@SpringBootApplication", "spring-boot", 0.9),
            (r"SpringApplication\.run\(", "spring-boot", 0.9),
            (r"@RestController", "spring", 0.7),
            (r"io\.quarkus", "quarkus", 0.8),
            (r"io\.micronaut", "micronaut", 0.8),
            (r"io\.vertx", "vertx", 0.8),
        ],
    ),
    (
        Language::Go,
        &[
            (r"func main\(\)", "go", 1.0),
            (r"package main", "go", 0.8),
            (r"gin\.", "gin", 0.7),
            (r"echo\.", "echo", 0.7),
            (r"fiber\.", "fiber", 0.7),
            (r"beego\.", "beego", 0.7),
        ],
    ),
];

/// Root markers checked in priority order: `(file, manager, files_detected key)`.
/// `pyproject.toml` only counts when it declares a `[tool.poetry]` table.
pub const ROOT_PACKAGE_MANAGERS: &[(&str, &str, &str)] = &[
    ("go.mod", "go mod", "go_mod"),
    ("build.gradle", "gradle", "build_gradle"),
    ("build.gradle.kts", "gradle", "build_gradle_kts"),
    ("pom.xml", "maven", "pom_xml"),
    ("build.xml", "ant", "build_xml"),
    ("Gemfile", "bundler", "gemfile"),
    ("composer.json", "composer", "composer_json"),
    ("pyproject.toml", "poetry", "pyproject_toml"),
    ("requirements.txt", "pip", "requirements_txt"),
];

/// Every manifest recognized anywhere in the tree.
pub const PACKAGE_MANAGER_FILES: &[(&str, &str, &str)] = &[
    ("requirements.txt", "pip", "requirements_txt"),
    ("setup.py", "setuptools", "setup_py"),
    ("pyproject.toml", "poetry", "pyproject_toml"),
    ("package.json", "npm", "package_json"),
    ("yarn.lock", "yarn", "yarn_lock"),
    ("pnpm-lock.yaml", "pnpm", "pnpm_lock"),
    ("pom.xml", "maven", "pom_xml"),
    ("build.gradle", "gradle", "build_gradle"),
    ("build.gradle.kts", "gradle", "build_gradle_kts"),
    ("build.xml", "ant", "build_xml"),
    ("go.mod", "go mod", "go_mod"),
    ("Cargo.toml", "cargo", "cargo_toml"),
    ("Gemfile", "bundler", "gemfile"),
    ("composer.json", "composer", "composer_json"),
    ("mix.exs", "mix", "mix_exs"),
    ("pubspec.yaml", "pub", "pubspec_yaml"),
    ("Podfile", "cocoapods", "podfile"),
    ("Cartfile", "carthage", "cartfile"),
    ("Package.swift", "swift package manager", "package_swift"),
];

/// Lockfiles next to a Node manifest, most specific first.
pub const NODE_LOCKFILES: &[(&str, &str)] = &[
    ("yarn.lock", "yarn"),
    ("pnpm-lock.yaml", "pnpm"),
    ("package-lock.json", "npm"),
];

pub const NODE_DEFAULT_MANAGER: &str = "npm";

/// Node dependency names that imply a framework slug.
pub const NODE_DEPENDENCY_FRAMEWORKS: &[(&str, &str)] = &[
    ("react", "react"),
    ("vue", "vue"),
    ("@angular/core", "angular"),
    ("next", "nextjs"),
    ("express", "express"),
    ("@nestjs/core", "nest"),
];

/// Node scripts considered as entry points.
pub const NODE_ENTRY_SCRIPTS: &[&str] = &["start", "dev", "serve"];

pub const DOCKERFILE_CMD: &str = r#"(?m)^\s*CMD\s+(.+)$"#;
pub const DOCKERFILE_ENTRYPOINT: &str = r#"(?m)^\s*ENTRYPOINT\s+(.+)$"#;
/// Interpreter followed by the script it runs.
pub const INTERPRETER_INVOCATION: &str = r"(?:^|[\s/])(?:node|ts-node|tsx|python[0-9.]*|java|go)\s+(?:run\s+)?(?:-\S+\s+)*([^\s-]\S*)";
pub const NODE_SCRIPT_INVOCATION: &str = r"(?:^|[\s/])(?:node|ts-node|tsx)\s+([^\s-]\S*)";
pub const POM_MAIN_CLASS: &str = r"<mainClass>\s*([^<\s]+)\s*</mainClass>";

/// Tags in Maven descriptors that declare the target Java release, checked in order.
pub const JAVA_VERSION_TAGS: &[&str] = &[
    "maven.compiler.release",
    "maven.compiler.source",
    "maven.compiler.target",
    "java.version",
    "javaVersion",
];
