//! A piece of rich text that keeps its layout up to date.

use crate::config::{Alignment, ConfigError, LayoutConfig, check_font_size, check_max_width};
use crate::format::TextFormatter;
use crate::layout::{Layout, LayoutLine, layout};
use crate::measure::TextMeasure;
use crate::render::{LinkRegion, RendererRegistry};

const ELLIPSIS: &str = "...";

/// Raw text plus everything needed to lay it out.
///
/// Any setter that actually changes a value formats and lays out the text
/// again from scratch; nothing of the previous fragment tree is reused.
pub struct RichText {
    text: String,
    config: LayoutConfig,
    formatter: TextFormatter,
    renderers: RendererRegistry,
    measure: Box<dyn TextMeasure>,
    layout: Layout,
}

impl RichText {
    pub fn new(
        text: impl Into<String>,
        config: LayoutConfig,
        measure: Box<dyn TextMeasure>,
    ) -> Result<Self, ConfigError> {
        Self::with_registries(
            text,
            config,
            measure,
            TextFormatter::default(),
            RendererRegistry::default(),
        )
    }

    pub fn with_registries(
        text: impl Into<String>,
        config: LayoutConfig,
        measure: Box<dyn TextMeasure>,
        formatter: TextFormatter,
        renderers: RendererRegistry,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let text = text.into();
        let layout = build_layout(&text, &config, &formatter, &renderers, measure.as_ref());
        Ok(Self {
            text,
            config,
            formatter,
            renderers,
            measure,
            layout,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn lines(&self) -> &[LayoutLine] {
        &self.layout.lines
    }

    pub fn links(&self) -> &[LinkRegion] {
        &self.layout.links
    }

    pub fn width(&self) -> f32 {
        self.layout.width
    }

    pub fn height(&self) -> f32 {
        self.layout.height
    }

    /// Returns whether the text changed.
    pub fn set_text(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if text == self.text {
            return false;
        }
        self.text = text;
        self.refresh();
        true
    }

    pub fn set_max_width(&mut self, max_width: Option<f32>) -> Result<bool, ConfigError> {
        let max_width = check_max_width(max_width)?;
        if max_width == self.config.max_width {
            return Ok(false);
        }
        self.config.max_width = max_width;
        self.refresh();
        Ok(true)
    }

    pub fn set_font_size(&mut self, font_size: f32) -> Result<bool, ConfigError> {
        let font_size = check_font_size(font_size)?;
        if font_size == self.config.font_size {
            return Ok(false);
        }
        self.config.font_size = font_size;
        self.refresh();
        Ok(true)
    }

    pub fn set_alignment(&mut self, alignment: Alignment) -> bool {
        if alignment == self.config.alignment {
            return false;
        }
        self.config.alignment = alignment;
        self.refresh();
        true
    }

    /// Shortens the raw text until it fits `max_width` on a single line and
    /// marks the cut with an ellipsis.
    ///
    /// The ellipsis itself is appended after measuring.
    pub fn truncate_with_ellipsis(&mut self, max_width: f32) {
        let unconstrained = LayoutConfig {
            max_width: None,
            ..self.config
        };
        let mut text = self.text.clone();
        while !text.is_empty() && self.measure_width(&text, &unconstrained) > max_width {
            text.pop();
        }
        if text != self.text {
            text.push_str(ELLIPSIS);
            self.set_text(text);
        }
    }

    fn measure_width(&self, text: &str, config: &LayoutConfig) -> f32 {
        build_layout(
            text,
            config,
            &self.formatter,
            &self.renderers,
            self.measure.as_ref(),
        )
        .width
    }

    fn refresh(&mut self) {
        self.layout = build_layout(
            &self.text,
            &self.config,
            &self.formatter,
            &self.renderers,
            self.measure.as_ref(),
        );
    }
}

fn build_layout(
    text: &str,
    config: &LayoutConfig,
    formatter: &TextFormatter,
    renderers: &RendererRegistry,
    measure: &dyn TextMeasure,
) -> Layout {
    let mut tree = formatter.format(text);
    layout(&mut tree, renderers, measure, config)
}
