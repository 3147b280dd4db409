use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// The closed set of languages a profile may record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    TypeScript,
    Java,
    Go,
}

/// Dialects folded into the language that owns their toolchain.
const LANGUAGE_ALIASES: &[(&str, Language)] = &[
    ("python", Language::Python),
    ("typescript", Language::TypeScript),
    ("javascript", Language::TypeScript),
    ("java", Language::Java),
    ("kotlin", Language::Java),
    ("go", Language::Go),
    ("golang", Language::Go),
];

const EXTENSIONS: &[(&str, Language)] = &[
    ("py", Language::Python),
    ("pyw", Language::Python),
    ("pyx", Language::Python),
    ("pxd", Language::Python),
    ("pyi", Language::Python),
    ("ts", Language::TypeScript),
    ("tsx", Language::TypeScript),
    ("js", Language::TypeScript),
    ("jsx", Language::TypeScript),
    ("java", Language::Java),
    ("kt", Language::Java),
    ("kts", Language::Java),
    ("go", Language::Go),
];

impl Language {
    pub fn all() -> &'static [Language] {
        &[
            Language::Python,
            Language::TypeScript,
            Language::Java,
            Language::Go,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::TypeScript => "typescript",
            Language::Java => "java",
            Language::Go => "go",
        }
    }

    /// Maps a language name or dialect onto the supported set.
    pub fn normalize(name: &str) -> Option<Language> {
        let lowered = name.trim().to_ascii_lowercase();
        LANGUAGE_ALIASES
            .iter()
            .find(|(alias, _)| *alias == lowered)
            .map(|(_, lang)| *lang)
    }

    pub fn from_extension(ext: &str) -> Option<Language> {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        EXTENSIONS
            .iter()
            .find(|(candidate, _)| *candidate == ext)
            .map(|(_, lang)| *lang)
    }

    pub fn from_path(path: &Path) -> Option<Language> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Language::from_extension)
    }

    /// Extensions (without the dot) that map onto this language.
    pub fn extensions(&self) -> Vec<&'static str> {
        EXTENSIONS
            .iter()
            .filter(|(_, lang)| lang == self)
            .map(|(ext, _)| *ext)
            .collect()
    }

    /// Every extension of every supported language.
    pub fn source_extensions() -> Vec<&'static str> {
        EXTENSIONS.iter().map(|(ext, _)| *ext).collect()
    }

    /// Infers the language from the interpreter invoked by a shell command.
    pub fn from_command(command: &str) -> Option<Language> {
        for token in command.split_whitespace() {
            let program = token.rsplit('/').next().unwrap_or(token);
            let program = program.trim_matches(|c| c == '"' || c == '\'' || c == ',');
            match program {
                "node" | "ts-node" | "tsx" | "npm" | "npx" | "yarn" => {
                    return Some(Language::TypeScript)
                }
                p if p.starts_with("python") => return Some(Language::Python),
                "java" | "kotlin" => return Some(Language::Java),
                "go" => return Some(Language::Go),
                _ => {}
            }
        }
        None
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    #[parameterized(
        kotlin = { "kotlin", Some(Language::Java) },
        javascript = { "JavaScript", Some(Language::TypeScript) },
        golang = { "golang", Some(Language::Go) },
        python = { "python", Some(Language::Python) },
        ruby = { "ruby", None },
    )]
    fn test_normalize(name: &str, expected: Option<Language>) {
        assert_eq!(Language::normalize(name), expected);
    }

    #[test]
    fn test_from_extension() {
        assert_eq!(Language::from_extension(".kt"), Some(Language::Java));
        assert_eq!(Language::from_extension("jsx"), Some(Language::TypeScript));
        assert_eq!(Language::from_extension("rs"), None);
        assert_eq!(
            Language::from_path(Path::new("cmd/server/main.go")),
            Some(Language::Go)
        );
    }

    #[test]
    fn test_from_command() {
        assert_eq!(
            Language::from_command("node dist/server.js"),
            Some(Language::TypeScript)
        );
        assert_eq!(
            Language::from_command("/usr/local/bin/python3 app.py"),
            Some(Language::Python)
        );
        assert_eq!(
            Language::from_command("java -jar app.jar"),
            Some(Language::Java)
        );
        assert_eq!(Language::from_command("go run ."), Some(Language::Go));
        assert_eq!(Language::from_command("./start.sh"), None);
    }

    #[test]
    fn test_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Language::TypeScript).unwrap(),
            "\"typescript\""
        );
    }
}
