use super::Plugin;
use crate::pipeline::settings::UserSettings;
use crate::pipeline::stage::Stage;
use crate::profile::TechProfile;
use std::collections::BTreeSet;

/// Container image build, push, compose-based integration tests and compose deploys.
pub struct ContainerPlugin;

impl Plugin for ContainerPlugin {
    fn name(&self) -> &'static str {
        "container"
    }

    fn is_applicable(&self, profile: &TechProfile) -> bool {
        profile.docker
    }

    fn proposed_stages(&self, profile: &TechProfile, settings: &UserSettings) -> BTreeSet<Stage> {
        let mut stages = BTreeSet::from([Stage::DockerBuild, Stage::Cleanup]);
        if settings.has_push_target() {
            stages.insert(Stage::DockerPush);
        }

        let has_compose = profile.has_compose();
        if has_compose {
            stages.insert(Stage::Integration);
        }
        // Orchestration owns deploys unless compose is forced.
        if settings.use_docker_compose || (!profile.kubernetes && has_compose) {
            stages.insert(Stage::Deploy);
        }
        stages
    }
}
