use std::io::{self, IsTerminal, Write};

use anyhow::anyhow;
use tick_shared::{Filter, Theme, ViewSnapshot};
use unicode_width::UnicodeWidthStr;
use uuid::Uuid;

use crate::config::Config;

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        let color_cfg = cfg.get("color").unwrap_or_else(|| "on".to_string());
        let color = match color_cfg.to_ascii_lowercase().as_str() {
            "on" | "yes" | "true" | "1" => true,
            "off" | "no" | "false" | "0" => false,
            other => return Err(anyhow!("invalid color setting: {other}")),
        };

        Ok(Self { color })
    }

    #[tracing::instrument(skip(self, snapshot))]
    pub fn print_snapshot(&mut self, snapshot: &ViewSnapshot) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        if snapshot.tasks.is_empty() {
            writeln!(out, "No tasks.")?;
            return Ok(());
        }

        let accent = match snapshot.theme {
            Theme::Light => "33",
            Theme::Dark => "93",
        };

        let headers = vec![
            "ID".to_string(),
            "Done".to_string(),
            "Description".to_string(),
        ];

        let mut rows = Vec::new();
        for task in &snapshot.tasks {
            if !task.visible {
                continue;
            }

            let id = self.paint(&short_id(task.id), accent);
            let done = if task.completed { "x" } else { "" };
            let description = if task.completed {
                self.paint(&task.description, "2")
            } else {
                task.description.clone()
            };

            rows.push(vec![id, done.to_string(), description]);
        }

        write_table(&mut out, headers, rows)?;

        if snapshot.show_controls {
            writeln!(out)?;
            writeln!(
                out,
                "{} item(s) left. Filter: {}.",
                snapshot.active_count,
                filter_label(snapshot.filter)
            )?;
        }

        Ok(())
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color || !io::stdout().is_terminal() {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

pub(crate) fn short_id(id: Uuid) -> String {
    id.to_string().chars().take(8).collect()
}

fn filter_label(filter: Filter) -> &'static str {
    match filter {
        Filter::All => "all",
        Filter::Active => "active",
        Filter::Completed => "completed",
    }
}

fn write_table<W: Write>(
    mut writer: W,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let column_count = headers.len();
    let mut widths = vec![0usize; column_count];

    for (idx, header) in headers.iter().enumerate() {
        widths[idx] = widths[idx].max(UnicodeWidthStr::width(header.as_str()));
    }

    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    for idx in 0..column_count {
        write!(writer, "{:width$} ", headers[idx], width = widths[idx])?;
    }
    writeln!(writer)?;

    for idx in 0..column_count {
        write!(writer, "{:-<width$} ", "", width = widths[idx])?;
    }
    writeln!(writer)?;

    for row in rows {
        for idx in 0..column_count {
            let cell = &row[idx];
            let visible_width = UnicodeWidthStr::width(strip_ansi(cell).as_str());
            let padding = widths[idx].saturating_sub(visible_width);
            write!(writer, "{}{} ", cell, " ".repeat(padding))?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}
