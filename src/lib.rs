//! VRM Studio - natural language posing and styling for VRM avatars

pub mod core;
pub mod llm;
pub mod params;
pub mod pipeline;
pub mod render;
pub mod server;
pub mod session;
