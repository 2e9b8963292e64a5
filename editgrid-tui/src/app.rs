//! Demo application state and input handling.

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use log::{debug, info};

use editgrid_lib::GridEvent;
use editgrid_lib::column::ColumnKind;
use editgrid_lib::error::{GridError, SectionError};
use editgrid_lib::query::ColumnFilter;
use editgrid_lib::section::{Section, SectionMode};

/// Rows scrolled per mouse wheel notch.
const WHEEL_STEP: i64 = 3;

/// What a line of input on the status bar is for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    EditCell { row_id: String, column_id: String },
    TextFilter { column_id: String },
    RangeMin { column_id: String },
    RangeMax { column_id: String, min: String },
    ConfirmDelete(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub input: String,
}

impl Prompt {
    fn new(kind: PromptKind, input: impl Into<String>) -> Self {
        Self {
            kind,
            input: input.into(),
        }
    }

    pub fn label(&self) -> String {
        match &self.kind {
            PromptKind::EditCell { row_id, column_id } => format!("{row_id}.{column_id}"),
            PromptKind::TextFilter { column_id } => format!("filter {column_id} contains"),
            PromptKind::RangeMin { column_id } => format!("filter {column_id} min"),
            PromptKind::RangeMax { column_id, .. } => format!("filter {column_id} max"),
            PromptKind::ConfirmDelete(n) => format!("delete {n} row(s)? (y/n)"),
        }
    }
}

/// Focused cell: a view index and an index into the visible columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub row: usize,
    pub col: usize,
}

pub struct App {
    sections: Vec<Section>,
    cursors: Vec<Cursor>,
    active: usize,
    prompt: Option<Prompt>,
    status: Option<String>,
    quit: bool,
}

impl App {
    pub fn new(mut sections: Vec<Section>) -> Self {
        for section in &mut sections {
            let title = section.title().to_string();
            section.grid_mut().subscribe(move |event| match event {
                GridEvent::FilteredCountChanged(n) => debug!("{title}: {n} row(s) match"),
                GridEvent::SelectedCountChanged(n) => debug!("{title}: {n} row(s) selected"),
            });
        }
        Self {
            cursors: vec![Cursor::default(); sections.len()],
            sections,
            active: 0,
            prompt: None,
            status: None,
            quit: false,
        }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn section(&self) -> &Section {
        &self.sections[self.active]
    }

    pub fn section_mut(&mut self) -> &mut Section {
        &mut self.sections[self.active]
    }

    pub fn cursor(&self) -> Cursor {
        self.cursors[self.active]
    }

    pub fn prompt(&self) -> Option<&Prompt> {
        self.prompt.as_ref()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let step = self.section().grid().options().row_height as i64 * WHEEL_STEP;
        match mouse.kind {
            MouseEventKind::ScrollDown => self.section_mut().grid_mut().scroll_by(step),
            MouseEventKind::ScrollUp => self.section_mut().grid_mut().scroll_by(-step),
            _ => {}
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.prompt.is_some() {
            self.handle_prompt_key(key);
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit = true;
            return;
        }
        self.status = None;

        match key.code {
            KeyCode::Char('q') => self.quit = true,
            KeyCode::Tab => self.switch_section(1),
            KeyCode::BackTab => self.switch_section(self.sections.len() - 1),

            KeyCode::Up | KeyCode::Char('k') => self.move_row(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_row(1),
            KeyCode::PageUp => self.move_row(-(self.page_rows() as isize)),
            KeyCode::PageDown => self.move_row(self.page_rows() as isize),
            KeyCode::Home | KeyCode::Char('g') => self.move_row(isize::MIN / 2),
            KeyCode::End | KeyCode::Char('G') => self.move_row(isize::MAX / 2),
            KeyCode::Left | KeyCode::Char('h') => self.move_col(-1),
            KeyCode::Right | KeyCode::Char('l') => self.move_col(1),

            KeyCode::Char('e') => {
                let result = self.section_mut().toggle_edit();
                self.report(result.map(|_| None));
            }
            KeyCode::Char('s') => {
                let result = self.section_mut().save();
                self.report(result.map(|_| Some("saved".into())));
            }
            KeyCode::Esc => {
                let result = match self.section().mode() {
                    SectionMode::Editing => self.section_mut().cancel_edit(),
                    SectionMode::Packaging => self.section_mut().toggle_packaging(),
                    SectionMode::Browse => Ok(()),
                };
                self.report(result.map(|_| None));
            }
            KeyCode::Enter => self.open_cell_editor(),

            KeyCode::Char('p') => {
                let result = self.section_mut().toggle_packaging();
                self.report(result.map(|_| None));
                self.clamp_cursor();
            }
            KeyCode::Char('i') => {
                let result = self.section_mut().assign();
                self.report(result.map(|n| Some(format!("assigned {n} record(s)"))));
            }
            KeyCode::Char(' ') => self.toggle_current_row(),
            KeyCode::Char('a') => {
                let result = self.section_mut().grid_mut().toggle_all();
                self.report_grid(result);
            }
            KeyCode::Char('d') => self.request_delete(),

            KeyCode::Char('f') => self.section_mut().toggle_filters(),
            KeyCode::Char('/') => self.open_filter_prompt(),
            KeyCode::Char('c') => {
                self.section_mut().clear_filters();
                self.clamp_cursor();
            }
            KeyCode::Char('o') => {
                if let Some(column_id) = self.current_column_id() {
                    let result = self.section_mut().grid_mut().toggle_sort(&column_id);
                    self.report_grid(result);
                }
            }
            _ => {}
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        let Some(prompt) = self.prompt.as_mut() else {
            return;
        };
        if let PromptKind::ConfirmDelete(_) = prompt.kind {
            self.prompt = None;
            if key.code == KeyCode::Char('y') {
                let result = self.section_mut().delete_selected();
                self.report(result.map(|n| Some(format!("deleted {n} row(s)"))));
                self.clamp_cursor();
            }
            return;
        }

        match key.code {
            KeyCode::Esc => self.prompt = None,
            KeyCode::Enter => {
                if let Some(prompt) = self.prompt.take() {
                    self.submit(prompt);
                }
            }
            KeyCode::Backspace => {
                prompt.input.pop();
            }
            KeyCode::Char(c) => prompt.input.push(c),
            _ => {}
        }
    }

    fn submit(&mut self, prompt: Prompt) {
        let Prompt { kind, input } = prompt;
        match kind {
            PromptKind::EditCell { row_id, column_id } => {
                let result = self
                    .section_mut()
                    .grid_mut()
                    .edit_cell(&row_id, &column_id, &input);
                self.report_grid(result);
            }
            PromptKind::TextFilter { column_id } => {
                self.section_mut()
                    .grid_mut()
                    .set_text_filter(&column_id, &input);
                self.clamp_cursor();
            }
            PromptKind::RangeMin { column_id } => {
                let max = match self.section().grid().filters().get(&column_id) {
                    Some(ColumnFilter::Range { max: Some(max), .. }) => max.to_string(),
                    _ => String::new(),
                };
                self.prompt = Some(Prompt::new(
                    PromptKind::RangeMax {
                        column_id,
                        min: input,
                    },
                    max,
                ));
            }
            PromptKind::RangeMax { column_id, min } => {
                self.section_mut()
                    .grid_mut()
                    .set_range_filter_input(&column_id, &min, &input);
                self.clamp_cursor();
            }
            PromptKind::ConfirmDelete(_) => {}
        }
    }

    fn report(&mut self, result: Result<Option<String>, SectionError>) {
        match result {
            Ok(message) => self.status = message,
            Err(e) => {
                debug!("{}: {}", self.section().title(), e);
                self.status = Some(e.to_string());
            }
        }
    }

    fn report_grid(&mut self, result: Result<(), GridError>) {
        if let Err(e) = result {
            debug!("{}: {}", self.section().title(), e);
            self.status = Some(e.to_string());
        }
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    fn switch_section(&mut self, step: usize) {
        self.active = (self.active + step) % self.sections.len();
        info!("Switched to {}", self.section().title());
    }

    fn page_rows(&self) -> u64 {
        let grid = self.section().grid();
        (grid.scroll().viewport / grid.options().row_height.max(1)).max(1)
    }

    fn move_row(&mut self, delta: isize) {
        let count = self.section().grid().filtered_count();
        let cursor = &mut self.cursors[self.active];
        cursor.row = if count == 0 {
            0
        } else {
            cursor.row.saturating_add_signed(delta).min(count - 1)
        };
        let row = cursor.row;
        self.section_mut().grid_mut().scroll_into_view(row);
    }

    fn move_col(&mut self, delta: isize) {
        let count = self.section().grid().visible_columns().len();
        let cursor = &mut self.cursors[self.active];
        cursor.col = cursor
            .col
            .saturating_add_signed(delta)
            .min(count.saturating_sub(1));
    }

    /// Keeps the cursor inside the current view after rows or columns change.
    fn clamp_cursor(&mut self) {
        self.move_row(0);
        self.move_col(0);
    }

    fn current_row_id(&self) -> Option<String> {
        let grid = self.section().grid();
        let position = grid.view().position(self.cursor().row)?;
        grid.dataset().get(position).map(|r| r.id().to_string())
    }

    fn current_column_id(&self) -> Option<String> {
        self.section()
            .grid()
            .visible_columns()
            .get(self.cursor().col)
            .map(|c| c.id.clone())
    }

    // =========================================================================
    // Actions
    // =========================================================================

    fn toggle_current_row(&mut self) {
        let Some(row_id) = self.current_row_id() else {
            return;
        };
        let result = self.section_mut().grid_mut().toggle_row(&row_id);
        self.report_grid(result.map(|_| ()));
    }

    fn request_delete(&mut self) {
        let counts = self.section().counts();
        if self.section().mode() != SectionMode::Browse || counts.selected == 0 {
            let result = self.section_mut().delete_selected();
            self.report(result.map(|_| None));
            return;
        }
        self.prompt = Some(Prompt::new(PromptKind::ConfirmDelete(counts.selected), ""));
    }

    fn open_cell_editor(&mut self) {
        let mode = self.section().mode();
        if mode != SectionMode::Editing {
            self.status = Some(
                SectionError::WrongMode {
                    action: "edit cells",
                    mode,
                }
                .to_string(),
            );
            return;
        }
        let (Some(row_id), Some(column_id)) = (self.current_row_id(), self.current_column_id())
        else {
            return;
        };
        let grid = self.section().grid();
        if grid.column(&column_id).is_some_and(|c| !c.editable) {
            self.status = Some(GridError::ReadOnlyColumn(column_id).to_string());
            return;
        }
        let text = grid.effective_value(&row_id, &column_id).to_string();
        self.prompt = Some(Prompt::new(PromptKind::EditCell { row_id, column_id }, text));
    }

    fn open_filter_prompt(&mut self) {
        let Some(column_id) = self.current_column_id() else {
            return;
        };
        let grid = self.section().grid();
        if grid.column(&column_id).is_some_and(|c| !c.filterable) {
            return;
        }
        let existing = grid.filters().get(&column_id);
        self.prompt = Some(match grid.column_kind(&column_id) {
            ColumnKind::Number => {
                let min = match existing {
                    Some(ColumnFilter::Range { min: Some(min), .. }) => min.to_string(),
                    _ => String::new(),
                };
                Prompt::new(PromptKind::RangeMin { column_id }, min)
            }
            _ => {
                let pattern = match existing {
                    Some(ColumnFilter::Contains(text)) => text.pattern().to_string(),
                    _ => String::new(),
                };
                Prompt::new(PromptKind::TextFilter { column_id }, pattern)
            }
        });
    }
}
