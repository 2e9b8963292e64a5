//! Paints the active section into a frame buffer.

use crossterm::style::Color;

use editgrid_lib::cell::CellView;
use editgrid_lib::overlay::SelectionState;
use editgrid_lib::query::{ColumnFilter, Direction};
use editgrid_lib::section::SectionMode;
use editgrid_lib::style::StyleTag;

use crate::app::App;
use crate::buffer::{Buffer, Style};
use crate::features::{people, products};
use crate::text::fit;

/// Lines given to the package panel, title included.
const PACKAGE_LINES: u16 = 6;

const HELP: &str = "q quit  tab section  e edit  s save  esc cancel  enter edit cell  \
                    p package  i assign  space select  a all  d delete  \
                    / filter  f filters  c clear  o sort";

const HEADER_BG: Color = Color::Rgb {
    r: 40,
    g: 44,
    b: 52,
};
const STRIPE_BG: Color = Color::Rgb {
    r: 26,
    g: 26,
    b: 30,
};
const SELECTED_BG: Color = Color::Rgb {
    r: 24,
    g: 52,
    b: 92,
};
const CURSOR_BG: Color = Color::Rgb {
    r: 64,
    g: 64,
    b: 72,
};

fn tag_color(tag: &StyleTag) -> Option<Color> {
    match tag.as_str() {
        people::AGE_THIRTIES => Some(Color::Cyan),
        products::OUT_OF_STOCK => Some(Color::Red),
        _ => None,
    }
}

fn checkbox(state: SelectionState) -> &'static str {
    match state {
        SelectionState::None => "[ ]",
        SelectionState::Some => "[-]",
        SelectionState::All => "[x]",
    }
}

fn filter_summary(filter: &ColumnFilter) -> String {
    match filter {
        ColumnFilter::Range { min, max } => {
            let bound = |b: &Option<f64>| b.map(|v| v.to_string()).unwrap_or_default();
            format!("{}..{}", bound(min), bound(max))
        }
        ColumnFilter::Contains(text) => format!("~{}", text.pattern()),
    }
}

pub fn render(app: &mut App, buf: &mut Buffer) {
    let width = buf.width();
    let height = buf.height();
    if height < 4 {
        return;
    }

    let status_line = match (app.prompt(), app.status()) {
        (Some(prompt), _) => format!("{}: {}_", prompt.label(), prompt.input),
        (None, Some(status)) => status.to_string(),
        (None, None) => HELP.to_string(),
    };
    let cursor = app.cursor();

    let mut y = 0;
    render_tabs(app, buf, y);
    y += 1;

    let section = app.section_mut();
    let counts = section.counts();
    let mode = section.mode();

    // Toolbar
    let mut x = buf.put_str(0, y, section.title(), width, Style::default().bold()) + 2;
    let count_text = format!("count: {} / {}", counts.filtered, counts.total);
    x += buf.put_str(x, y, &count_text, width.saturating_sub(x), Style::default()) + 2;
    if counts.selected > 0 {
        let text = format!("selected: {}", counts.selected);
        x += buf.put_str(x, y, &text, width.saturating_sub(x), Style::default()) + 2;
    }
    let mut badges: Vec<(&str, Color)> = Vec::new();
    if section.is_read_only() {
        badges.push(("Read-only", Color::DarkGrey));
    }
    match mode {
        SectionMode::Editing => badges.push(("Edit Mode", Color::Green)),
        SectionMode::Packaging => badges.push(("Packaging", Color::Magenta)),
        SectionMode::Browse => {}
    }
    if section.has_unsaved_changes() {
        badges.push(("Unsaved Changes", Color::Yellow));
    }
    for (badge, color) in badges {
        let style = Style::default().fg(color).bold();
        x += buf.put_str(x, y, &format!("[{badge}]"), width.saturating_sub(x), style) + 1;
    }
    y += 1;

    let show_package = mode == SectionMode::Packaging || !section.package().is_empty();
    let filters_visible = section.filters_visible();
    let grid = section.grid_mut();
    let layout = grid.column_layout();

    // Filter row
    if filters_visible {
        let style = Style::default().fg(Color::DarkGrey);
        for slot in &layout.slots {
            let column = &grid.columns()[slot.index];
            let text = match grid.filters().get(&column.id) {
                Some(filter) => filter_summary(filter),
                None if column.filterable => "·".to_string(),
                None => String::new(),
            };
            let cell = fit(&text, slot.width.saturating_sub(1) as usize);
            buf.put_str(slot.x, y, &cell, slot.width, style);
        }
        y += 1;
    }

    // Header
    let header_style = Style::default().bg(HEADER_BG).bold();
    buf.fill(0, y, width, header_style);
    if layout.checkbox_width > 0 {
        buf.put_str(0, y, checkbox(grid.header_selection()), layout.checkbox_width, header_style);
    }
    for (i, slot) in layout.slots.iter().enumerate() {
        let column = &grid.columns()[slot.index];
        let arrow = match grid.sort().direction_of(&column.id) {
            Some(Direction::Asc) => " ▲",
            Some(Direction::Desc) => " ▼",
            None => "",
        };
        let mut style = header_style;
        if i == cursor.col {
            style = style.fg(Color::Yellow);
        }
        let label = format!("{}{}", column.header, arrow);
        let text = fit(&label, slot.width.saturating_sub(1) as usize);
        buf.put_str(slot.x, y, &text, slot.width, style);
    }
    y += 1;

    // Body
    let reserved = 1 + if show_package { PACKAGE_LINES } else { 0 };
    let body_height = height.saturating_sub(y + reserved);
    let row_height = grid.options().row_height.max(1);
    grid.set_viewport(body_height as u64 * row_height);
    let slice = grid.visible_rows();
    let offset = grid.scroll().offset;

    for row in &slice.rows {
        let top = row.view_index as u64 * row_height;
        if top < offset {
            continue;
        }
        let line = (top - offset) / row_height;
        if line >= body_height as u64 {
            break;
        }
        let ry = y + line as u16;

        let row_bg = if row.view_index == cursor.row {
            CURSOR_BG
        } else if row.selected {
            SELECTED_BG
        } else if row.striped {
            STRIPE_BG
        } else {
            Color::Reset
        };
        let row_style = Style::default().bg(row_bg);
        buf.fill(0, ry, width, row_style);

        if layout.checkbox_width > 0 {
            let mark = if row.selected { "[x]" } else { "[ ]" };
            buf.put_str(0, ry, mark, layout.checkbox_width, row_style);
        }
        for (i, (slot, cell)) in layout.slots.iter().zip(&row.cells).enumerate() {
            let mut style = row_style;
            if let Some(color) = cell.style.as_ref().and_then(tag_color) {
                style = style.fg(color);
            }
            if cell.dirty {
                style = style.fg(Color::Yellow).bold();
            }
            if row.view_index == cursor.row && i == cursor.col {
                style = match cell.view {
                    CellView::Editor(_) => style.bg(Color::DarkGreen),
                    CellView::Display { .. } => style.bg(Color::Grey).fg(Color::Black),
                };
            }
            let text = fit(cell.view.text(), slot.width.saturating_sub(1) as usize);
            buf.put_str(slot.x, ry, &text, slot.width, style);
        }
    }
    y += body_height;

    // Package panel
    if show_package {
        let package = section_package_lines(app, PACKAGE_LINES as usize - 1);
        let title = format!("Package ({})", package.0);
        buf.fill(0, y, width, Style::default().bg(HEADER_BG));
        buf.put_str(0, y, &title, width, Style::default().bg(HEADER_BG).bold());
        for (i, line) in package.1.iter().enumerate() {
            buf.put_str(0, y + 1 + i as u16, line, width, Style::default().fg(Color::Grey));
        }
    }

    buf.put_str(0, height - 1, &status_line, width, Style::default().fg(Color::DarkGrey));
}

fn render_tabs(app: &App, buf: &mut Buffer, y: u16) {
    let mut x = 0;
    for (i, section) in app.sections().iter().enumerate() {
        let label = format!(" {} ", section.title());
        let style = if i == app.active_index() {
            Style::default().bg(Color::Blue).fg(Color::White).bold()
        } else {
            Style::default().fg(Color::Grey)
        };
        x += buf.put_str(x, y, &label, buf.width().saturating_sub(x), style) + 1;
    }
}

/// Package size and the JSON of its most recent `lines` records.
fn section_package_lines(app: &App, lines: usize) -> (usize, Vec<String>) {
    let package = app.section().package();
    let skip = package.len().saturating_sub(lines);
    let json = package[skip..]
        .iter()
        .map(|record| record.to_json().to_string())
        .collect();
    (package.len(), json)
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use editgrid_lib::GridOptions;
    use editgrid_lib::column::{Column, ColumnKind};
    use editgrid_lib::model::{Dataset, Record};
    use editgrid_lib::section::Section;

    use super::*;

    fn app(rows: usize) -> App {
        let records = (0..rows)
            .map(|i| {
                Record::new(format!("p-{}", i + 1))
                    .set("name", format!("Person {}", i + 1))
                    .set("age", 20 + i as i64)
            })
            .collect();
        let section = Section::with_options(
            "People",
            Dataset::new(records).unwrap(),
            vec![
                Column::new("name", "Name").width(12),
                Column::new("age", "Age").width(6).kind(ColumnKind::Number),
            ],
            GridOptions::default().row_height(1).overscan(2).checkbox_width(4),
        );
        App::new(vec![section])
    }

    fn lines(buf: &Buffer) -> Vec<String> {
        (0..buf.height()).map(|y| buf.line(y)).collect()
    }

    #[test]
    fn test_render_toolbar_and_rows() {
        let mut app = app(50);
        let mut buf = Buffer::new(60, 12);
        render(&mut app, &mut buf);
        let lines = lines(&buf);

        assert!(lines[0].contains(" People "));
        assert!(lines[1].contains("count: 50 / 50"));
        assert!(lines[3].starts_with("[ ] Name"));
        assert!(lines[4].starts_with("[ ] Person 1 "));
        assert!(lines[4].contains("20"));
        assert!(lines[11].starts_with("q quit"));
        // 12 lines minus tabs, toolbar, filters, header and status
        assert_eq!(app.section().grid().scroll().viewport, 7);
    }

    #[test]
    fn test_render_follows_scroll_and_sort() {
        let mut app = app(50);
        let mut buf = Buffer::new(60, 12);
        app.handle_key(KeyEvent::new(KeyCode::Right, KeyModifiers::NONE));
        app.handle_key(KeyEvent::new(KeyCode::Char('o'), KeyModifiers::NONE));
        app.handle_key(KeyEvent::new(KeyCode::Char('o'), KeyModifiers::NONE));
        render(&mut app, &mut buf);
        let lines = lines(&buf);
        assert!(lines[3].contains("Age ▼"));
        assert!(lines[4].contains("Person 50"));

        app.handle_key(KeyEvent::new(KeyCode::End, KeyModifiers::NONE));
        render(&mut app, &mut buf);
        let lines = (0..buf.height()).map(|y| buf.line(y)).collect::<Vec<_>>();
        assert!(lines[10].contains("Person 1 "));
    }

    #[test]
    fn test_render_package_panel_and_badges() {
        let mut app = app(3);
        app.handle_key(KeyEvent::new(KeyCode::Char('p'), KeyModifiers::NONE));
        app.handle_key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE));
        app.handle_key(KeyEvent::new(KeyCode::Char('i'), KeyModifiers::NONE));

        let mut buf = Buffer::new(80, 16);
        render(&mut app, &mut buf);
        let text = lines(&buf).join("\n");
        assert!(text.contains("[Packaging]"));
        assert!(text.contains("Package (3)"));
        assert!(text.contains(r#""id":"p-1""#));
    }

    #[test]
    fn test_filter_summary() {
        assert_eq!(filter_summary(&ColumnFilter::range(Some(30.0), None)), "30..");
        assert_eq!(filter_summary(&ColumnFilter::contains("ab")), "~ab");
    }
}
