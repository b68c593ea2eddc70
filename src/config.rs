use serde::Deserialize;

/// Settings of a container, loadable from any serde format
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ContainerOptions {
    /// Name reported in log events
    pub label: Option<String>,
    /// Also build transient providers when resolving everything eagerly
    pub eager_transients: bool,
}

impl Default for ContainerOptions {
    fn default() -> Self {
        Self {
            label: None,
            eager_transients: true,
        }
    }
}

impl ContainerOptions {
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_eager_transients(mut self, eager: bool) -> Self {
        self.eager_transients = eager;
        self
    }

    pub(crate) fn label_or_default(&self) -> &str {
        self.label.as_deref().unwrap_or("container")
    }
}
