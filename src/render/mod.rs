//! Drawing render frames onto the terminal

pub mod renderer;

pub use renderer::Renderer;
