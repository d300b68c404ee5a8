use crate::plugins::handler::PluginDescriptor;
use std::sync::Arc;
use tracing::warn;

/// Plugins in registration order. Order is the tie-break for dispatch, so
/// this is a list rather than a map keyed by name.
#[derive(Debug, Default)]
pub struct PluginRegistry {
    plugins: Vec<Arc<PluginDescriptor>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self {
            plugins: Vec::new(),
        }
    }

    /// Appends a plugin. A repeated name is kept as a second entry; the
    /// earlier registration still wins every match.
    pub fn register(&mut self, plugin: PluginDescriptor) {
        if self.get(plugin.name()).is_some() {
            warn!(plugin = plugin.name(), "plugin registered twice; earlier entry takes precedence");
        }
        self.plugins.push(Arc::new(plugin));
    }

    pub fn get(&self, name: &str) -> Option<&Arc<PluginDescriptor>> {
        self.plugins.iter().find(|p| p.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<PluginDescriptor>> {
        self.plugins.iter()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Invocation hints of every plugin, in registration order.
    pub fn list_invocation_hints(&self) -> Vec<String> {
        self.plugins
            .iter()
            .map(|p| p.invocation_hint().to_string())
            .collect()
    }
}
