//! Row layout: place column cells side by side and fit rows to the sink width.
//!
//! Styles from `Text` and `Line` are baked into each span so the screen
//! writer only has to look at span styles.

use ratatui::style::Style;
use ratatui::text::{Line, Span, Text};
use unicode_width::UnicodeWidthChar;

/// One rendered column cell.
pub struct Cell {
    pub text: Text<'static>,
    pub no_wrap: bool,
}

/// Lay out one task row. `width == 0` means unbounded.
pub fn compose_row(cells: Vec<Cell>, width: u16) -> Vec<Line<'static>> {
    let truncate = cells.iter().any(|c| c.no_wrap);
    let columns: Vec<Vec<Line<'static>>> = cells.into_iter().map(|c| flatten(c.text)).collect();

    let lines = match columns.len() {
        0 => Vec::new(),
        1 => columns.into_iter().next().unwrap_or_default(),
        _ => join_columns(columns),
    };

    if width == 0 {
        return lines;
    }
    let width = usize::from(width);
    if truncate {
        lines.into_iter().map(|l| truncate_line(l, width)).collect()
    } else {
        lines.into_iter().flat_map(|l| wrap_line(l, width)).collect()
    }
}

/// Bake text- and line-level styles into spans.
pub fn flatten(text: Text<'static>) -> Vec<Line<'static>> {
    let base = text.style;
    text.lines
        .into_iter()
        .map(|line| {
            let line_style = base.patch(line.style);
            Line::from(
                line.spans
                    .into_iter()
                    .map(|span| Span::styled(span.content, line_style.patch(span.style)))
                    .collect::<Vec<_>>(),
            )
        })
        .collect()
}

fn join_columns(columns: Vec<Vec<Line<'static>>>) -> Vec<Line<'static>> {
    let widths: Vec<usize> = columns
        .iter()
        .map(|lines| lines.iter().map(Line::width).max().unwrap_or(0))
        .collect();
    let height = columns.iter().map(Vec::len).max().unwrap_or(0);
    let last = columns.len() - 1;

    let mut iters: Vec<_> = columns.into_iter().map(Vec::into_iter).collect();
    (0..height)
        .map(|_| {
            let mut spans: Vec<Span<'static>> = Vec::new();
            for (i, iter) in iters.iter_mut().enumerate() {
                let line = iter.next().unwrap_or_default();
                let pad = widths[i].saturating_sub(line.width());
                spans.extend(line.spans);
                if i < last {
                    spans.push(Span::raw(" ".repeat(pad + 1)));
                }
            }
            Line::from(spans)
        })
        .collect()
}

/// Cut a line at `width` display columns.
pub fn truncate_line(line: Line<'static>, width: usize) -> Line<'static> {
    let mut used = 0;
    let mut spans = Vec::new();
    for span in line.spans {
        if used >= width {
            break;
        }
        let mut content = String::new();
        for ch in span.content.chars() {
            let w = ch.width().unwrap_or(0);
            if used + w > width {
                used = width;
                break;
            }
            used += w;
            content.push(ch);
        }
        if !content.is_empty() {
            spans.push(Span::styled(content, span.style));
        }
    }
    Line::from(spans)
}

/// Split a line into rows of at most `width` display columns.
pub fn wrap_line(line: Line<'static>, width: usize) -> Vec<Line<'static>> {
    let mut rows = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut used = 0;
    for span in line.spans {
        let style: Style = span.style;
        let mut chunk = String::new();
        for ch in span.content.chars() {
            let w = ch.width().unwrap_or(0);
            if used + w > width && used > 0 {
                if !chunk.is_empty() {
                    current.push(Span::styled(std::mem::take(&mut chunk), style));
                }
                rows.push(Line::from(std::mem::take(&mut current)));
                used = 0;
            }
            chunk.push(ch);
            used += w;
        }
        if !chunk.is_empty() {
            current.push(Span::styled(chunk, style));
        }
    }
    rows.push(Line::from(current));
    rows
}
