use crate::catalog::FileMatcher;
use crate::stack::Language;

pub struct TestRunnerSpec {
    pub name: &'static str,
    /// `None` means the patterns apply to files of any language.
    pub language: Option<Language>,
    pub patterns: &'static [&'static str],
}

use FileMatcher::{Name, Prefix};

/// Config files whose presence alone identifies a runner.
pub const TEST_RUNNER_MARKERS: &[(&str, &[FileMatcher])] = &[
    ("pytest", &[Name("pytest.ini"), Name("tox.ini"), Name("conftest.py")]),
    (
        "jest",
        &[Name("jest.config.js"), Name("jest.config.ts"), Name("jest.config.json")],
    ),
    ("mocha", &[Prefix(".mocharc")]),
    ("jasmine", &[Name("jasmine.json")]),
    ("karma", &[Name("karma.conf.js"), Name("karma.conf.ts")]),
    (
        "cypress",
        &[Name("cypress.json"), Name("cypress.config.js"), Name("cypress.env.json")],
    ),
    (
        "playwright",
        &[Name("playwright.config.js"), Name("playwright.config.ts")],
    ),
    (
        "vitest",
        &[
            Name("vitest.config.js"),
            Name("vitest.config.ts"),
            Name("vitest.config.mjs"),
        ],
    ),
    ("phpunit", &[Name("phpunit.xml"), Name("phpunit.xml.dist")]),
    ("rspec", &[Name(".rspec")]),
    ("cucumber", &[Name("cucumber.yml"), Name("cucumber.js")]),
];

pub const TEST_RUNNER_PATTERNS: &[TestRunnerSpec] = &[
    TestRunnerSpec {
        name: "pytest",
        language: Some(Language::Python),
        patterns: &[r"import pytest", r"from pytest", r"pytest\.", r"@pytest\."],
    },
    TestRunnerSpec {
        name: "unittest",
        language: Some(Language::Python),
        patterns: &[r"import unittest", r"from unittest", r"unittest\."],
    },
    TestRunnerSpec {
        name: "jest",
        language: Some(Language::TypeScript),
        patterns: &[
            r#"require\(['"]jest['"]\)"#,
            r"import.*jest",
            r"jest\.config\.",
            r"jest\.test\(",
        ],
    },
    TestRunnerSpec {
        name: "mocha",
        language: Some(Language::TypeScript),
        patterns: &[r#"require\(['"]mocha['"]\)"#, r"import.*mocha", r"mocha\.config\."],
    },
    TestRunnerSpec {
        name: "jasmine",
        language: Some(Language::TypeScript),
        patterns: &[r#"require\(['"]jasmine['"]\)"#, r"import.*jasmine", r"jasmine\."],
    },
    TestRunnerSpec {
        name: "karma",
        language: Some(Language::TypeScript),
        patterns: &[r#"require\(['"]karma['"]\)"#, r"import.*karma", r"karma\.config\."],
    },
    TestRunnerSpec {
        name: "cypress",
        language: Some(Language::TypeScript),
        patterns: &[
            r#"require\(['"]cypress['"]\)"#,
            r"import.*cypress",
            r"cy\.visit",
            r"cy\.get\(",
        ],
    },
    TestRunnerSpec {
        name: "playwright",
        language: Some(Language::TypeScript),
        patterns: &[
            r#"require\(['"]@playwright/test['"]\)"#,
            r"import.*@playwright/test",
            r#"from ['"]@playwright/test['"]"#,
            r"page\.goto",
            r"page\.click",
        ],
    },
    TestRunnerSpec {
        name: "vitest",
        language: Some(Language::TypeScript),
        patterns: &[
            r#"require\(['"]vitest['"]\)"#,
            r"import.*vitest",
            r#"from ['"]vitest['"]"#,
            r"import.*@vitest",
            r"\bdescribe\.",
            r"\bit\.",
            r"\btest\.",
        ],
    },
    TestRunnerSpec {
        name: "junit",
        language: Some(Language::Java),
        patterns: &[r"junit", r"@Test", r"org\.junit"],
    },
    TestRunnerSpec {
        name: "testng",
        language: Some(Language::Java),
        patterns: &[r"TestNG", r"org\.testng"],
    },
    TestRunnerSpec {
        name: "go-testing",
        language: Some(Language::Go),
        patterns: &[r#"import ['"]testing['"]"#, r"func Test", r"t\.Run\("],
    },
    TestRunnerSpec {
        name: "cucumber",
        language: None,
        patterns: &[
            r#"require\(['"]cucumber['"]\)"#,
            r"import.*cucumber",
            r"Given\(",
            r"When\(",
            r"Then\(",
        ],
    },
    TestRunnerSpec {
        name: "selenium",
        language: None,
        patterns: &[r#"require\(['"]selenium['"]\)"#, r"import.*selenium", r"webdriver"],
    },
];
