//! Stage-proposal plugins.
//!
//! Each plugin owns one language or one infrastructure technology. The registry is a
//! fixed list assembled at construction; there is no dynamic lookup.

pub mod container;
pub mod language;
pub mod orchestration;
pub mod test_suite;

use super::settings::UserSettings;
use super::stage::Stage;
use crate::profile::TechProfile;
use std::collections::BTreeSet;

pub use container::ContainerPlugin;
pub use language::LanguagePlugin;
pub use orchestration::OrchestrationPlugin;
pub use test_suite::TestSuitePlugin;

pub trait Plugin: Send + Sync {
    fn name(&self) -> &'static str;

    fn is_applicable(&self, profile: &TechProfile) -> bool;

    /// Stages this plugin wants. A plugin withdraws its own stages when their
    /// preconditions fail; the selector never filters on its behalf.
    fn proposed_stages(&self, profile: &TechProfile, settings: &UserSettings) -> BTreeSet<Stage>;
}

pub struct PluginRegistry {
    plugins: Vec<Box<dyn Plugin>>,
}

impl PluginRegistry {
    pub fn new(plugins: Vec<Box<dyn Plugin>>) -> Self {
        Self { plugins }
    }

    pub fn with_defaults() -> Self {
        Self::new(vec![
            Box::new(LanguagePlugin::python()),
            Box::new(LanguagePlugin::java()),
            Box::new(LanguagePlugin::go()),
            Box::new(LanguagePlugin::typescript()),
            Box::new(TestSuitePlugin),
            Box::new(ContainerPlugin),
            Box::new(OrchestrationPlugin),
        ])
    }

    pub fn plugins(&self) -> &[Box<dyn Plugin>] {
        &self.plugins
    }

    pub fn applicable<'a>(&'a self, profile: &'a TechProfile) -> impl Iterator<Item = &'a dyn Plugin> + 'a {
        self.plugins
            .iter()
            .map(|p| p.as_ref())
            .filter(move |p| p.is_applicable(profile))
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::Language;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_registry_order() {
        let registry = PluginRegistry::with_defaults();
        let names: Vec<_> = registry.plugins().iter().map(|p| p.name()).collect();
        assert_eq!(
            names,
            vec!["python", "java", "go", "typescript", "tests", "container", "orchestration"]
        );
    }

    #[test]
    fn test_applicable_filters_by_profile() {
        let registry = PluginRegistry::with_defaults();
        let mut profile = TechProfile::new();
        profile.add_language(Language::Go);
        profile.mark_docker();

        let names: Vec<_> = registry.applicable(&profile).map(|p| p.name()).collect();
        assert_eq!(names, vec!["go", "container"]);
    }
}
