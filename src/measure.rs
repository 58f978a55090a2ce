use unicode_width::UnicodeWidthChar;

/// Font measurement used by the layout engine.
pub trait TextMeasure {
    /// Rendered width of `text` at `font_size`.
    fn measure(&self, text: &str, font_size: f32) -> f32;

    /// Height of one line at `font_size`.
    fn line_height(&self, font_size: f32) -> f32;
}

/// Measures text in terminal cells. Font size is ignored, every line is one
/// cell tall.
#[derive(Clone, Copy, Debug, Default)]
pub struct CellMeasure;

impl TextMeasure for CellMeasure {
    fn measure(&self, text: &str, _font_size: f32) -> f32 {
        visible_width(text) as f32
    }

    fn line_height(&self, _font_size: f32) -> f32 {
        1.0
    }
}

pub fn visible_width(text: &str) -> usize {
    text.chars()
        .map(|ch| UnicodeWidthChar::width(ch).unwrap_or(0))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_characters_take_two_cells() {
        assert_eq!(CellMeasure.measure("abc", 12.0), 3.0);
        assert_eq!(CellMeasure.measure("日本", 12.0), 4.0);
        assert_eq!(CellMeasure.line_height(30.0), 1.0);
    }
}
