//! Turning a cell-measured [`Layout`] into ratatui lines.

use ratatui::text::{Line, Span};

use crate::layout::{Layout, LayoutLine};

pub fn to_lines(layout: &Layout) -> Vec<Line<'static>> {
    layout.lines.iter().map(to_line).collect()
}

fn to_line(line: &LayoutLine) -> Line<'static> {
    if line.elements.is_empty() {
        return Line::from("");
    }

    let mut spans: Vec<Span<'static>> = Vec::with_capacity(line.elements.len() + 1);
    let mut column = 0;

    let indent = cells(line.x);
    if indent > 0 {
        spans.push(Span::raw(" ".repeat(indent)));
        column = indent;
    }

    for placed in &line.elements {
        let start = indent + cells(placed.x);
        if start > column {
            spans.push(Span::raw(" ".repeat(start - column)));
            column = start;
        }
        spans.push(Span::styled(placed.element.text.clone(), placed.element.style));
        column += cells(placed.element.width);
    }

    Line::from(spans)
}

/// Plain rendition of the layout, one string per line.
pub fn to_plain_text(layout: &Layout) -> Vec<String> {
    to_lines(layout)
        .iter()
        .map(|line| {
            line.spans
                .iter()
                .map(|span| span.content.as_ref())
                .collect::<String>()
        })
        .collect()
}

fn cells(value: f32) -> usize {
    value.max(0.0).round() as usize
}
