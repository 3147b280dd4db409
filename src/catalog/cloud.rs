use crate::catalog::FileMatcher;

use FileMatcher::{Name, Segment, Under};

pub const CLOUD_MARKERS: &[(&str, &[FileMatcher])] = &[
    (
        "aws",
        &[Under(".aws"), Segment(".aws"), Name("aws.yml"), Name("aws.yaml")],
    ),
    (
        "azure",
        &[Under(".azure"), Segment(".azure"), Name("azure-pipelines.yml")],
    ),
    (
        "gcp",
        &[Under(".gcp"), Segment(".gcp"), Name("gcp.yaml"), Name("app.yaml")],
    ),
    ("heroku", &[Name("Procfile"), Name("app.json")]),
];

/// Extensions scanned for cloud SDK usage on top of source files.
pub const CLOUD_EXTRA_EXTENSIONS: &[&str] = &[".yaml", ".yml"];

/// Content patterns. Not language-gated.
pub const CLOUD_PATTERNS: &[(&str, &[&str])] = &[
    ("aws", &[r"\baws\b", r"boto3", r"aws-sdk"]),
    ("azure", &[r"\bazure\b", r"azure-sdk"]),
    ("gcp", &[r"google\.cloud", r"\bgcp\b", r"google-cloud"]),
    ("digitalocean", &[r"digitalocean", r"do-spaces"]),
    ("heroku", &[r"\bheroku\b", r"Procfile"]),
];
