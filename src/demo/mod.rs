//! Demo producer: "update panel madness".
//!
//! Publishes a made-up task description and a counter at a fixed cadence.
//! Live output is a rounded panel around a two-column table whose name
//! color cycles with the counter; fallback output is one line per update.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span, Text};
use unicode_width::UnicodeWidthStr;

use crate::panel::PanelContext;

const VERBS: &[&str] = &[
    "Downloading",
    "Rerouting",
    "Retriculating",
    "Collapsing",
    "Folding",
    "Solving",
    "Colliding",
    "Measuring",
];

const NOUNS: &[&str] = &[
    "internet",
    "splines",
    "space",
    "capacitators",
    "quarks",
    "algorithms",
    "data structures",
    "spacetime",
];

const PAD_X: usize = 2;
const PAD_Y: usize = 2;

/// Random "verb noun" descriptions from an explicitly seeded source.
pub struct DescriptionGenerator {
    rng: StdRng,
}

impl DescriptionGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn generate(&mut self) -> String {
        let verb = VERBS[self.rng.gen_range(0..VERBS.len())];
        let noun = NOUNS[self.rng.gen_range(0..NOUNS.len())];
        format!("{verb} {noun}")
    }
}

/// State published by the demo producer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DemoStatus {
    pub name: String,
    pub count: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct DemoOptions {
    pub iterations: u32,
    pub delay: Duration,
    pub seed: u64,
    /// Call `refresh()` after each update (for sessions without auto-refresh).
    pub explicit_refresh: bool,
}

/// The producer: one update per iteration, returns how many were published.
pub async fn run(ctx: PanelContext<DemoStatus>, options: DemoOptions) -> anyhow::Result<u32> {
    let mut generator = DescriptionGenerator::new(options.seed);
    for count in 0..options.iterations {
        ctx.set_status(DemoStatus {
            name: generator.generate(),
            count,
        });
        if options.explicit_refresh {
            ctx.refresh();
        }
        tokio::time::sleep(options.delay).await;
    }
    Ok(options.iterations)
}

/// One line per update, for logs and pipes.
pub fn render_plain(status: &DemoStatus) -> Text<'static> {
    Text::raw(format!("[{}] {}", status.count, status.name))
}

/// Rounded panel with a Name/Value table inside.
pub fn render_table(status: &DemoStatus) -> Text<'static> {
    let color = Color::Indexed((status.count % 60 / 4 + 1) as u8);
    let value = status.count.to_string();
    let name_w = status.name.width().max("Name".len());
    let value_w = value.len().max("Value".len());

    let rule = |left: &str, mid: &str, right: &str| {
        Line::from(format!(
            "{left}{}{mid}{}{right}",
            "─".repeat(name_w + 2),
            "─".repeat(value_w + 2)
        ))
    };
    let table = vec![
        rule("┌", "┬", "┐"),
        Line::from(format!("│ {:<name_w$} │ {:<value_w$} │", "Name", "Value")),
        rule("├", "┼", "┤"),
        Line::from(vec![
            Span::raw("│ "),
            Span::styled(pad(&status.name, name_w), Style::default().fg(color)),
            Span::raw(format!(" │ {value:<value_w$} │")),
        ]),
        rule("└", "┴", "┘"),
    ];

    let header = format!(" update panel madness {} ", status.count);
    let table_w = table.iter().map(Line::width).max().unwrap_or(0);
    let inner_w = (table_w + 2 * PAD_X).max(header.width() + 2);

    let mut lines = Vec::with_capacity(table.len() + 2 * PAD_Y + 2);
    lines.push(Line::from(format!(
        "╭─{header}{}╮",
        "─".repeat(inner_w - header.width() - 1)
    )));
    let blank = || Line::from(format!("│{}│", " ".repeat(inner_w)));
    lines.extend((0..PAD_Y).map(|_| blank()));
    for row in table {
        let fill = inner_w - PAD_X - row.width();
        let mut spans = vec![Span::raw(format!("│{}", " ".repeat(PAD_X)))];
        spans.extend(row.spans);
        spans.push(Span::raw(format!("{}│", " ".repeat(fill))));
        lines.push(Line::from(spans));
    }
    lines.extend((0..PAD_Y).map(|_| blank()));
    lines.push(Line::from(format!("╰{}╯", "─".repeat(inner_w))));
    Text::from(lines)
}

fn pad(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(s.width());
    format!("{s}{}", " ".repeat(fill))
}
