//! Renderer sink boundary
//!
//! The real scene lives outside this crate. A sink receives
//! `apply(category, name, value)` calls and must never fail: targets it does
//! not know are logged and skipped.

use crate::core::types::Category;
use crate::params::store::ParameterSet;
use crate::render::mapping::RenderCommand;
use tracing::{info, warn};

pub trait RendererSink {
    fn apply(&mut self, category: Category, name: &str, value: f64);

    /// Push every entry of `set`
    fn apply_set(&mut self, set: &ParameterSet) {
        for parameter in set.to_sorted_vec() {
            self.apply(parameter.category, &parameter.name, parameter.value);
        }
    }
}

/// Headless sink: logs each operation and remembers it
#[derive(Debug, Default)]
pub struct TracingRenderer {
    applied: Vec<RenderCommand>,
    ignored: usize,
}

impl TracingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn applied(&self) -> &[RenderCommand] {
        &self.applied
    }

    pub fn ignored(&self) -> usize {
        self.ignored
    }
}

impl RendererSink for TracingRenderer {
    fn apply(&mut self, category: Category, name: &str, value: f64) {
        match RenderCommand::from_parts(category, name, value) {
            Some(command) => {
                info!(%command, "Render");
                self.applied.push(command);
            }
            None => {
                warn!(%category, name, value, "Renderer has no target for parameter");
                self.ignored += 1;
            }
        }
    }
}
