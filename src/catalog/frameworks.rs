//! Framework detection tables.

use crate::stack::{FrameworkCategory, Language};

pub struct FrameworkSpec {
    pub slug: &'static str,
    /// Files of this language are the only ones the patterns are evaluated against.
    pub language: Language,
    pub category: FrameworkCategory,
    pub patterns: &'static [&'static str],
}

pub struct StrictSpec {
    pub slug: &'static str,
    /// Competitor whose presence triggers the strict check. `None` means always strict.
    pub when_present: Option<&'static str>,
    pub patterns: &'static [&'static str],
}

use FrameworkCategory::{Backend, Frontend};
use Language::{Go, Java, Python, TypeScript};

/// Content patterns, evaluated case-insensitively in this order.
pub const FRAMEWORKS: &[FrameworkSpec] = &[
    FrameworkSpec {
        slug: "django",
        language: Python,
        category: Backend,
        patterns: &[r"from django", r"import django", r"django\.", r"DJANGO_SETTINGS"],
    },
    FrameworkSpec {
        slug: "flask",
        language: Python,
        category: Backend,
        patterns: &[
            r"from flask import",
            r"from flask\.",
            r"import flask",
            r"\bFlask\(",
            r"@app\.route",
        ],
    },
    FrameworkSpec {
        slug: "fastapi",
        language: Python,
        category: Backend,
        patterns: &[r"from fastapi", r"import fastapi", r"fastapi\.", r"FastAPI\(\)"],
    },
    FrameworkSpec {
        slug: "spring",
        language: Java,
        category: Backend,
        patterns: &[
            r"org\.springframework\.(web|mvc|context|beans)",
            r"@SpringMvcTest",
            r"@SpringTest",
            r"@Controller",
            r"@Service",
        ],
    },
    FrameworkSpec {
        slug: "spring-boot",
        language: Java,
        category: Backend,
        patterns: &[
            r"@SpringBootApplication",
            r"SpringBootApplication",
            r"org\.springframework\.boot",
        ],
    },
    FrameworkSpec {
        slug: "quarkus",
        language: Java,
        category: Backend,
        patterns: &[r"io\.quarkus", r"@QuarkusTest", r"@QuarkusApplication", r"quarkus\."],
    },
    FrameworkSpec {
        slug: "micronaut",
        language: Java,
        category: Backend,
        patterns: &[r"io\.micronaut", r"@MicronautTest"],
    },
    FrameworkSpec {
        slug: "vertx",
        language: Java,
        category: Backend,
        patterns: &[r"io\.vertx", r"\bVertx\b"],
    },
    FrameworkSpec {
        slug: "express",
        language: TypeScript,
        category: Backend,
        patterns: &[
            r#"require\(['"]express['"]\)"#,
            r"import express",
            r"const express",
            r#"from ['"]express['"]"#,
        ],
    },
    FrameworkSpec {
        slug: "nest",
        language: TypeScript,
        category: Backend,
        patterns: &[r"@nestjs/", r#"import.*from ['"]@nestjs/"#],
    },
    FrameworkSpec {
        slug: "react",
        language: TypeScript,
        category: Frontend,
        patterns: &[
            r#"require\(['"]react['"]\)"#,
            r"import React",
            r#"from ['"]react['"]"#,
        ],
    },
    FrameworkSpec {
        slug: "vue",
        language: TypeScript,
        category: Frontend,
        patterns: &[
            r#"require\(['"]vue['"]\)"#,
            r"import Vue",
            r#"from ['"]vue['"]"#,
            r"createApp",
        ],
    },
    FrameworkSpec {
        slug: "angular",
        language: TypeScript,
        category: Frontend,
        patterns: &[r"@angular/", r#"import.*from ['"]@angular/"#],
    },
    FrameworkSpec {
        slug: "nextjs",
        language: TypeScript,
        category: Frontend,
        patterns: &[r#"from ['"]next/"#, r#"import.*from ['"]next['"]"#, r"getServerSideProps"],
    },
    FrameworkSpec {
        slug: "gin",
        language: Go,
        category: Backend,
        patterns: &[r"github\.com/gin-gonic/gin", r"\bgin\."],
    },
    FrameworkSpec {
        slug: "echo",
        language: Go,
        category: Backend,
        patterns: &[r"github\.com/labstack/echo", r"\becho\.New\("],
    },
    FrameworkSpec {
        slug: "fiber",
        language: Go,
        category: Backend,
        patterns: &[r"github\.com/gofiber/fiber", r"\bfiber\."],
    },
    FrameworkSpec {
        slug: "beego",
        language: Go,
        category: Backend,
        patterns: &[r"github\.com/(astaxie|beego)/beego", r"\bbeego\."],
    },
];

/// Files whose presence alone identifies a framework.
pub const FRAMEWORK_MARKERS: &[(&str, &[&str])] = &[
    ("django", &["manage.py"]),
    ("flask", &["app.py", "application.py"]),
    ("micronaut", &["micronaut-cli.yml"]),
    ("nextjs", &["next.config.js", "next.config.mjs"]),
    ("nest", &["nest-cli.json"]),
];

/// Stricter evidence that replaces the normal patterns when the rule applies.
pub const STRICT_RULES: &[StrictSpec] = &[
    StrictSpec {
        slug: "flask",
        when_present: Some("django"),
        patterns: &[r"\bFlask\(", r"@app\.route", r"from flask import"],
    },
    StrictSpec {
        slug: "django",
        when_present: Some("flask"),
        patterns: &[r"from django", r"import django", r"DJANGO_SETTINGS"],
    },
    StrictSpec {
        slug: "vue",
        when_present: None,
        patterns: &[
            r"Vue\.createApp\(",
            r#"from ['"]vue['"]"#,
            r"import.*vue",
            r"createApp\(.*vue",
        ],
    },
];

/// `(winner, loser)`: the winner makes the loser redundant.
pub const SUPERSEDES: &[(&str, &str)] = &[("spring-boot", "spring")];

/// `(preferred, other)`: pairs that cannot coexist in one service. The preferred
/// framework is the later-checked one and wins whenever both have evidence.
pub const MUTUALLY_EXCLUSIVE: &[(&str, &str)] = &[("quarkus", "spring-boot")];
