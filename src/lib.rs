pub mod types;
pub mod objects;
pub mod shapes;
pub mod style;
pub mod config;
pub mod error;
pub mod scene;
pub mod history;
pub mod viewport;
pub mod selection;
pub mod engine;
pub mod factory;
pub mod clipboard;
pub mod commands;
pub mod io;
pub mod color;
pub mod raster;
pub mod svg;
pub mod export;
pub mod image_ops;
pub mod collab;
pub mod hotkeys;
pub mod logging;
pub mod render;
pub mod wasm;

pub use commands::Command;
pub use config::EditorConfig;
pub use engine::Editor;
pub use error::{EditorError, Result};
pub use scene::ObjectKey;
pub use types::*;
pub use objects::*;
pub use wasm::EditorHandle;
