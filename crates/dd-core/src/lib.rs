pub mod config;
pub mod emitter;
pub mod error;
pub mod id;
pub mod import;
pub mod model;
pub mod parser;
pub mod store;
pub mod style;

pub use config::EditorConfig;
pub use emitter::{emit_html, escape_html};
pub use error::{EditorError, EditorResult};
pub use id::ElementId;
pub use import::import_html;
pub use model::*;
pub use parser::parse_fragment;
pub use store::ElementStore;
pub use style::{box_style, detect_variant, variant_css};
