//! Turning raw annotated text into a fragment tree.

mod link;
mod rewrite;

pub use link::LinkFormatter;
pub use rewrite::{RewriteStats, rewrite};

use crate::fragment::{Fragment, FragmentTree, FragmentType};

/// A pattern matcher that recognizes one kind of raw-text syntax.
pub trait Formatter {
    /// The fragment type this formatter emits for the spans it matches.
    fn fragment_type(&self) -> FragmentType;

    /// Splits `raw` into fragments, or returns `None` when nothing matches.
    ///
    /// The returned fragments must reconstruct `raw` completely: matched spans
    /// become this formatter's fragment type, everything in between comes back
    /// as `Unparsed`.
    fn format(&self, raw: &str) -> Option<Vec<Fragment>>;
}

/// Formatters in priority order. The first one to match a span wins.
pub struct TextFormatter {
    formatters: Vec<Box<dyn Formatter>>,
}

impl TextFormatter {
    pub fn new(formatters: Vec<Box<dyn Formatter>>) -> Self {
        Self { formatters }
    }

    /// Appends a formatter with lower priority than all existing ones.
    pub fn push(&mut self, formatter: Box<dyn Formatter>) {
        self.formatters.push(formatter);
    }

    pub fn formatters(&self) -> &[Box<dyn Formatter>] {
        &self.formatters
    }

    pub fn format(&self, raw: &str) -> FragmentTree {
        let mut tree = FragmentTree::from_fragments(vec![Fragment::unparsed(raw)]);
        let stats = rewrite(&mut tree, &self.formatters);
        tracing::trace!(
            passes = stats.passes,
            splices = stats.splices,
            conversions = stats.conversions,
            "formatted text"
        );
        tree
    }
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self::new(vec![Box::new(LinkFormatter)])
    }
}
