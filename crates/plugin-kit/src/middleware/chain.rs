//! Sequential composition of plugins

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::Plugin;
use crate::{error::Result, types::FileCollection};

/// Plugins run one after another over the same collection
///
/// Stops at the first failing member.
pub struct Chain<C> {
    plugins: Vec<Arc<dyn Plugin<C>>>,
    name: Option<String>,
}

/// Compose plugins into one
///
/// The chain is named after its named members joined with `+`, unless
/// [`Chain::named`] gives it a label.
pub fn chain<C>(plugins: Vec<Arc<dyn Plugin<C>>>) -> Chain<C>
where
    C: Send + Sync + 'static,
{
    let names: Vec<&str> = plugins.iter().filter_map(|p| p.name()).collect();
    let name = (!names.is_empty()).then(|| names.join("+"));
    Chain { plugins, name }
}

impl<C> Chain<C> {
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

#[async_trait]
impl<C> Plugin<C> for Chain<C>
where
    C: Send + Sync + 'static,
{
    async fn run(&self, files: &FileCollection, context: Arc<C>) -> Result<()> {
        for (index, plugin) in self.plugins.iter().enumerate() {
            debug!(
                chain = self.name.as_deref().unwrap_or("<anonymous>"),
                index = index,
                plugin = plugin.name().unwrap_or("<anonymous>"),
                "Running chained plugin"
            );
            plugin.run(files, Arc::clone(&context)).await?;
        }
        Ok(())
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}
