use super::Plugin;
use crate::pipeline::settings::UserSettings;
use crate::pipeline::stage::Stage;
use crate::profile::TechProfile;
use std::collections::BTreeSet;

/// Kubernetes or Helm deploys.
pub struct OrchestrationPlugin;

impl Plugin for OrchestrationPlugin {
    fn name(&self) -> &'static str {
        "orchestration"
    }

    fn is_applicable(&self, profile: &TechProfile) -> bool {
        profile.kubernetes
    }

    fn proposed_stages(&self, _profile: &TechProfile, settings: &UserSettings) -> BTreeSet<Stage> {
        let mut stages = BTreeSet::from([Stage::Deploy, Stage::PostDeploy]);
        if settings.use_docker_compose {
            stages.remove(&Stage::Deploy);
        }
        stages
    }
}
