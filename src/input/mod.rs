//! Translating terminal key events into tick events

pub mod handler;

pub use handler::{InputBuffer, InputHandler, KeyAction};
