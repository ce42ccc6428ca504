pub mod renderer;

pub use renderer::{AgentPanel, Renderer};
