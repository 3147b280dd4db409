use super::plugins::PluginRegistry;
use super::settings::UserSettings;
use super::stage::Stage;
use crate::profile::TechProfile;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Parses a stage whitelist. Unknown names are dropped with a warning.
pub fn parse_whitelist(names: &[String]) -> BTreeSet<Stage> {
    names
        .iter()
        .filter_map(|name| match name.parse::<Stage>() {
            Ok(stage) => Some(stage),
            Err(e) => {
                warn!(stage = %name, "Ignoring {}", e);
                None
            }
        })
        .collect()
}

/// Unions the proposals of every applicable plugin and returns them in canonical
/// order, restricted to the user's whitelist when one is given.
pub fn select_stages(registry: &PluginRegistry, profile: &TechProfile, settings: &UserSettings) -> Vec<Stage> {
    let mut proposed: BTreeSet<Stage> = BTreeSet::new();
    for plugin in registry.applicable(profile) {
        let stages = plugin.proposed_stages(profile, settings);
        debug!(plugin = plugin.name(), stages = ?stages, "Plugin proposal");
        proposed.extend(stages);
    }
    proposed.insert(Stage::PreChecks);

    let whitelist = parse_whitelist(&settings.stages);
    // A whitelist of nothing but unknown names still restricts.
    let restrict = !settings.stages.is_empty();

    Stage::ALL
        .iter()
        .copied()
        .filter(|stage| proposed.contains(stage))
        .filter(|stage| !restrict || whitelist.contains(stage))
        .collect()
}
