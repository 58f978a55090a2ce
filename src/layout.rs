//! Greedy line breaking of a fragment tree.
//!
//! Top-level fragments are laid out left to right. A fragment that runs past
//! the maximum width is split at the rightmost whitespace that still fits,
//! or character by character when no whitespace does, and the rest of it is
//! carried over to the next line.

use std::mem;

use crate::config::LayoutConfig;
use crate::fragment::{FragmentId, FragmentTree};
use crate::measure::TextMeasure;
use crate::render::{LinkRegion, RenderContext, RendererRegistry, TextElement};
use crate::split::{char_to_byte_idx, split};

#[derive(Clone, Debug, PartialEq)]
pub struct PlacedElement {
    pub element: TextElement,
    /// Offset from the start of the line.
    pub x: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutLine {
    pub elements: Vec<PlacedElement>,
    /// Alignment offset inside the overall width.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl LayoutLine {
    pub fn text(&self) -> String {
        self.elements
            .iter()
            .map(|placed| placed.element.text.as_str())
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    pub lines: Vec<LayoutLine>,
    pub width: f32,
    pub height: f32,
    pub links: Vec<LinkRegion>,
}

impl Layout {
    pub fn line_texts(&self) -> Vec<String> {
        self.lines.iter().map(LayoutLine::text).collect()
    }
}

/// Lays out `tree` into lines. The tree is split in place wherever a line
/// ends inside a fragment.
pub fn layout(
    tree: &mut FragmentTree,
    renderers: &RendererRegistry,
    measure: &dyn TextMeasure,
    config: &LayoutConfig,
) -> Layout {
    let mut engine = LineLayout::new(renderers, measure, config);
    engine.run(tree);
    engine.finish()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Break {
    /// Keep `offset` characters on this line, optionally dropping the next one.
    At { offset: usize, skip: bool },
    /// Nothing of the fragment fits; start it on a fresh line.
    BeforeNode,
}

#[derive(Default)]
struct LineBuilder {
    elements: Vec<PlacedElement>,
    width: f32,
    ends_with_whitespace: bool,
    /// The previous line ended at a wrap, not at a newline.
    after_wrap: bool,
}

impl LineBuilder {
    fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

struct LineLayout<'a> {
    renderers: &'a RendererRegistry,
    measure: &'a dyn TextMeasure,
    config: &'a LayoutConfig,
    line_height: f32,
    lines: Vec<LayoutLine>,
    current: LineBuilder,
    height: f32,
    consumed: usize,
    ctx: RenderContext,
}

impl<'a> LineLayout<'a> {
    fn new(
        renderers: &'a RendererRegistry,
        measure: &'a dyn TextMeasure,
        config: &'a LayoutConfig,
    ) -> Self {
        let line_height = measure.line_height(config.font_size);
        Self {
            renderers,
            measure,
            config,
            line_height,
            lines: Vec::new(),
            current: LineBuilder::default(),
            height: 0.0,
            consumed: 0,
            ctx: RenderContext::default(),
        }
    }

    fn run(&mut self, tree: &mut FragmentTree) {
        let mut idx = 0;
        while idx < tree.roots().len() {
            let id = tree.roots()[idx];

            match tree.text(id).chars().position(|ch| ch == '\n') {
                Some(0) => {
                    // Consume the newline; whatever follows it is the next node.
                    split(tree, None, idx, 0, true);
                    self.consumed += 1;
                    self.finish_line();
                    idx += 1;
                    continue;
                }
                // Keep the newline with the remainder, it ends the line once
                // that node comes up.
                Some(pos) => {
                    split(tree, None, idx, pos, false);
                }
                None => {}
            }

            let mut elements = self.build(tree, id);
            let mut skipped = false;
            let mut break_after = false;

            let total: f32 = elements.iter().map(|element| element.width).sum();
            let overflow = self
                .config
                .max_width
                .filter(|max_width| self.current.width + total > *max_width);

            // Lines started by a wrap drop their leading whitespace, one
            // character at a time.
            if self.current.is_empty()
                && (self.current.after_wrap || overflow.is_some())
                && tree.text(id).starts_with(char::is_whitespace)
            {
                split(tree, None, idx, 0, true);
                self.consumed += 1;
                idx += 1;
                continue;
            }

            if let Some(max_width) = overflow {
                let text = tree.text(id);
                match self.find_break(&text, &elements, max_width) {
                    Break::BeforeNode => {
                        self.finish_wrapped_line();
                        continue;
                    }
                    Break::At { offset, skip } => {
                        debug_assert!(
                            offset > 0 || !self.current.is_empty(),
                            "line break would leave an empty line"
                        );
                        split(tree, None, idx, offset, skip);
                        elements = self.build(tree, id);
                        skipped = skip;
                        break_after = true;
                    }
                }
            }

            self.place(tree, id, elements);
            if skipped {
                self.consumed += 1;
            }
            if break_after {
                self.finish_wrapped_line();
            }
            idx += 1;
        }

        self.finish_line();
    }

    fn build(&self, tree: &FragmentTree, id: FragmentId) -> Vec<TextElement> {
        self.renderers
            .build_elements(tree, id, self.measure, self.config)
    }

    fn fits(&self, width: f32, max_width: f32) -> bool {
        self.current.width + width <= max_width
    }

    fn find_break(&self, text: &str, elements: &[TextElement], max_width: f32) -> Break {
        let line_empty = self.current.is_empty();
        let spaces: Vec<usize> = text
            .chars()
            .enumerate()
            .filter(|(_, ch)| ch.is_whitespace())
            .map(|(pos, _)| pos)
            .collect();

        for &pos in spaces.iter().rev() {
            if self.fits(self.prefix_width(elements, pos), max_width) {
                return Break::At {
                    offset: pos,
                    skip: true,
                };
            }
        }

        // The line already ends on a word boundary, so the fragment can
        // start the next line whole.
        if !line_empty && self.current.ends_with_whitespace {
            return Break::BeforeNode;
        }

        let last = spaces
            .iter()
            .copied()
            .find(|pos| *pos > 0)
            .unwrap_or_else(|| text.chars().count());
        for offset in (1..=last).rev() {
            if self.fits(self.prefix_width(elements, offset), max_width) {
                return Break::At {
                    offset,
                    skip: false,
                };
            }
        }

        // Not even one character fits. An empty line takes it anyway.
        if line_empty {
            Break::At {
                offset: 1,
                skip: false,
            }
        } else {
            Break::BeforeNode
        }
    }

    /// Width of the first `chars` characters covered by `elements`.
    fn prefix_width(&self, elements: &[TextElement], chars: usize) -> f32 {
        let mut width = 0.0;
        let mut remaining = chars;
        for element in elements {
            if remaining == 0 {
                break;
            }
            if element.chars <= remaining {
                width += element.width;
                remaining -= element.chars;
            } else {
                let byte_idx = char_to_byte_idx(&element.text, remaining);
                width += self
                    .measure
                    .measure(&element.text[..byte_idx], self.config.font_size);
                break;
            }
        }
        width
    }

    fn place(&mut self, tree: &FragmentTree, id: FragmentId, elements: Vec<TextElement>) {
        let node_start = self.consumed;
        let mut char_index = node_start;

        for element in elements {
            let x = self.current.width;
            self.ctx.line = self.lines.len();
            self.ctx.x = x;
            self.ctx.y = self.height;
            self.ctx.line_height = self.line_height;
            self.ctx.char_index = char_index;
            self.renderers.notify_placed(tree, &mut self.ctx, &element);

            char_index += element.chars;
            self.current.width += element.width;
            self.current.ends_with_whitespace = element.text.ends_with(char::is_whitespace);
            self.current.elements.push(PlacedElement { element, x });
        }

        self.consumed = node_start + tree.char_len(id);
    }

    fn finish_line(&mut self) {
        let builder = mem::take(&mut self.current);
        self.lines.push(LayoutLine {
            elements: builder.elements,
            x: 0.0,
            y: self.height,
            width: builder.width,
            height: self.line_height,
        });
        self.height += self.line_height;
    }

    fn finish_wrapped_line(&mut self) {
        self.finish_line();
        self.current.after_wrap = true;
    }

    fn finish(self) -> Layout {
        let width = self
            .lines
            .iter()
            .map(|line| line.width)
            .fold(0.0_f32, f32::max);

        let mut lines = self.lines;
        for line in &mut lines {
            line.x = self.config.alignment.offset(line.width, width);
        }

        let mut links = self.ctx.links;
        for link in &mut links {
            if let Some(line) = lines.get(link.line) {
                link.bounds.x += line.x;
            }
        }

        tracing::debug!(
            lines = lines.len(),
            width,
            height = self.height,
            links = links.len(),
            "laid out text"
        );

        Layout {
            lines,
            width,
            height: self.height,
            links,
        }
    }
}

#[cfg(test)]
#[path = "layout_tests.rs"]
mod layout_tests;
