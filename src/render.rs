//! Renderers turn fragments into visual elements.
//!
//! A [`TextElement`] is one run of display text with its presentation style.
//! Every `PlainText` leaf produces one element; the renderers of the leaf and
//! of all its ancestors get to adjust it.

use std::collections::HashMap;

use ratatui::style::{Color, Modifier, Style};

use crate::config::LayoutConfig;
use crate::fragment::{FragmentId, FragmentKind, FragmentTree, FragmentType};
use crate::measure::TextMeasure;

#[derive(Clone, Debug, PartialEq)]
pub struct TextElement {
    pub text: String,
    pub style: Style,
    pub width: f32,
    pub chars: usize,
    /// Fragment ids from the top-level node down to the leaf that produced
    /// this element.
    pub path: Vec<FragmentId>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Screen area covered by (part of) a link.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkRegion {
    pub url: String,
    pub text: String,
    /// Character index of `text` within the whole display text.
    pub start_index: usize,
    pub line: usize,
    pub bounds: Bounds,
}

/// State handed to [`Renderer::on_update`] once an element has its position.
#[derive(Debug, Default)]
pub struct RenderContext {
    pub line: usize,
    pub x: f32,
    pub y: f32,
    pub line_height: f32,
    pub char_index: usize,
    pub links: Vec<LinkRegion>,
}

pub trait Renderer {
    fn fragment_type(&self) -> FragmentType;

    /// Adjusts the presentation of a freshly built element.
    fn modify_element(
        &self,
        config: &LayoutConfig,
        fragment: &FragmentKind,
        element: &mut TextElement,
    );

    /// Called after the element has been placed on a line.
    fn on_update(
        &self,
        _ctx: &mut RenderContext,
        _fragment: &FragmentKind,
        _element: &TextElement,
    ) {
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct PlainTextRenderer;

impl Renderer for PlainTextRenderer {
    fn fragment_type(&self) -> FragmentType {
        FragmentType::PlainText
    }

    fn modify_element(
        &self,
        _config: &LayoutConfig,
        _fragment: &FragmentKind,
        _element: &mut TextElement,
    ) {
    }
}

#[derive(Clone, Copy, Debug)]
pub struct LinkRenderer {
    pub color: Color,
}

impl Default for LinkRenderer {
    fn default() -> Self {
        Self { color: Color::Cyan }
    }
}

impl Renderer for LinkRenderer {
    fn fragment_type(&self) -> FragmentType {
        FragmentType::Link
    }

    fn modify_element(
        &self,
        _config: &LayoutConfig,
        _fragment: &FragmentKind,
        element: &mut TextElement,
    ) {
        element.style = element
            .style
            .fg(self.color)
            .add_modifier(Modifier::UNDERLINED);
    }

    fn on_update(&self, ctx: &mut RenderContext, fragment: &FragmentKind, element: &TextElement) {
        let FragmentKind::Link { url } = fragment else {
            return;
        };
        ctx.links.push(LinkRegion {
            url: url.clone(),
            text: element.text.clone(),
            start_index: ctx.char_index,
            line: ctx.line,
            bounds: Bounds {
                x: ctx.x,
                y: ctx.y,
                width: element.width,
                height: ctx.line_height,
            },
        });
    }
}

/// Renderers keyed by the fragment type they handle.
pub struct RendererRegistry {
    renderers: HashMap<FragmentType, Box<dyn Renderer>>,
}

impl RendererRegistry {
    pub fn empty() -> Self {
        Self {
            renderers: HashMap::new(),
        }
    }

    /// Adds `renderer` unless its type is already taken. Returns whether it
    /// was registered.
    pub fn register(&mut self, renderer: Box<dyn Renderer>) -> bool {
        let fragment_type = renderer.fragment_type();
        if self.renderers.contains_key(&fragment_type) {
            tracing::warn!(%fragment_type, "renderer already registered, ignoring duplicate");
            return false;
        }
        self.renderers.insert(fragment_type, renderer);
        true
    }

    pub fn get(&self, fragment_type: FragmentType) -> Option<&dyn Renderer> {
        self.renderers.get(&fragment_type).map(|renderer| renderer.as_ref())
    }

    /// Builds the elements for `id` and its descendants.
    ///
    /// A subtree whose type has no renderer contributes nothing.
    pub fn build_elements(
        &self,
        tree: &FragmentTree,
        id: FragmentId,
        measure: &dyn TextMeasure,
        config: &LayoutConfig,
    ) -> Vec<TextElement> {
        let mut elements = Vec::new();
        let mut path = Vec::new();
        self.collect_elements(tree, id, measure, config, &mut path, &mut elements);
        elements
    }

    fn collect_elements(
        &self,
        tree: &FragmentTree,
        id: FragmentId,
        measure: &dyn TextMeasure,
        config: &LayoutConfig,
        path: &mut Vec<FragmentId>,
        elements: &mut Vec<TextElement>,
    ) {
        let kind = tree.kind(id);
        if self.get(kind.fragment_type()).is_none() {
            tracing::warn!(
                fragment_type = %kind.fragment_type(),
                "no renderer registered, skipping fragment"
            );
            return;
        }

        path.push(id);
        if let FragmentKind::PlainText(text) = kind {
            if !text.is_empty() {
                let mut element = TextElement {
                    text: text.clone(),
                    style: Style::default(),
                    width: measure.measure(text, config.font_size),
                    chars: text.chars().count(),
                    path: path.clone(),
                };
                for ancestor in path.iter() {
                    let ancestor_kind = tree.kind(*ancestor);
                    if let Some(renderer) = self.get(ancestor_kind.fragment_type()) {
                        renderer.modify_element(config, ancestor_kind, &mut element);
                    }
                }
                elements.push(element);
            }
        }
        for child in tree.children(id) {
            self.collect_elements(tree, *child, measure, config, path, elements);
        }
        path.pop();
    }

    /// Runs `on_update` for every fragment on the element's path.
    pub fn notify_placed(
        &self,
        tree: &FragmentTree,
        ctx: &mut RenderContext,
        element: &TextElement,
    ) {
        for id in &element.path {
            let kind = tree.kind(*id);
            if let Some(renderer) = self.get(kind.fragment_type()) {
                renderer.on_update(ctx, kind, element);
            }
        }
    }
}

impl Default for RendererRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(PlainTextRenderer));
        registry.register(Box::new(LinkRenderer::default()));
        registry
    }
}
