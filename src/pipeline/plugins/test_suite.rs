use super::Plugin;
use crate::pipeline::settings::UserSettings;
use crate::pipeline::stage::Stage;
use crate::profile::TechProfile;
use std::collections::BTreeSet;

/// Proposes `test` whenever any test runner was detected. The runner-specific
/// commands live in the templates.
pub struct TestSuitePlugin;

impl Plugin for TestSuitePlugin {
    fn name(&self) -> &'static str {
        "tests"
    }

    fn is_applicable(&self, profile: &TechProfile) -> bool {
        profile.test_runner.iter().any(|r| !r.trim().is_empty())
    }

    fn proposed_stages(&self, _profile: &TechProfile, _settings: &UserSettings) -> BTreeSet<Stage> {
        BTreeSet::from([Stage::Test])
    }
}
