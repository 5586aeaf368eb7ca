//! Renderer boundary: parameter -> bone / expression / material operations

pub mod mapping;
pub mod sink;

pub use mapping::{Axis, RenderCommand};
pub use sink::{RendererSink, TracingRenderer};
