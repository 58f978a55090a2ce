//! Link-aware rich text formatting and line layout.
//!
//! Raw text is parsed into a [`FragmentTree`] by a [`TextFormatter`], then
//! [`layout`] breaks it into lines no wider than the configured maximum.

pub mod config;
pub mod format;
pub mod fragment;
pub mod layout;
pub mod measure;
pub mod render;
pub mod rich_text;
pub mod split;
pub mod terminal;

pub use config::{Alignment, ConfigError, LayoutConfig};
pub use format::{Formatter, LinkFormatter, TextFormatter};
pub use fragment::{Fragment, FragmentId, FragmentKind, FragmentTree, FragmentType};
pub use layout::{Layout, LayoutLine, PlacedElement, layout};
pub use measure::{CellMeasure, TextMeasure};
pub use render::{LinkRegion, Renderer, RendererRegistry, TextElement};
pub use rich_text::RichText;
