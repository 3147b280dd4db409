use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Pipeline stages. Declaration order is the canonical execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    PreChecks,
    Lint,
    TypeCheck,
    Security,
    Test,
    Build,
    DockerBuild,
    DockerPush,
    Integration,
    Migration,
    Deploy,
    PostDeploy,
    Cleanup,
}

impl Stage {
    pub const ALL: [Stage; 13] = [
        Stage::PreChecks,
        Stage::Lint,
        Stage::TypeCheck,
        Stage::Security,
        Stage::Test,
        Stage::Build,
        Stage::DockerBuild,
        Stage::DockerPush,
        Stage::Integration,
        Stage::Migration,
        Stage::Deploy,
        Stage::PostDeploy,
        Stage::Cleanup,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::PreChecks => "pre_checks",
            Stage::Lint => "lint",
            Stage::TypeCheck => "type_check",
            Stage::Security => "security",
            Stage::Test => "test",
            Stage::Build => "build",
            Stage::DockerBuild => "docker_build",
            Stage::DockerPush => "docker_push",
            Stage::Integration => "integration",
            Stage::Migration => "migration",
            Stage::Deploy => "deploy",
            Stage::PostDeploy => "post_deploy",
            Stage::Cleanup => "cleanup",
        }
    }

    /// Position in the canonical order.
    pub fn position(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        Stage::ALL
            .iter()
            .copied()
            .find(|stage| stage.as_str() == wanted)
            .ok_or_else(|| format!("unknown stage: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    #[test]
    fn test_declaration_order_is_canonical() {
        for (i, stage) in Stage::ALL.iter().enumerate() {
            assert_eq!(stage.position(), i);
        }
        assert!(Stage::PreChecks < Stage::Cleanup);
        assert!(Stage::Migration < Stage::Deploy);
    }

    #[parameterized(
        snake = { "docker_build", Stage::DockerBuild },
        kebab = { "type-check", Stage::TypeCheck },
        upper = { "DEPLOY", Stage::Deploy },
        padded = { " test ", Stage::Test },
    )]
    fn test_parse(input: &str, expected: Stage) {
        assert_eq!(input.parse::<Stage>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_stage() {
        assert!("release".parse::<Stage>().is_err());
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&Stage::PostDeploy).unwrap(), "\"post_deploy\"");
    }
}
