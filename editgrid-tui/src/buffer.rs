//! Cell grid painted each frame and diffed against the previous one.

use crossterm::style::Color;

use crate::text::char_width;

/// Foreground, background and weight of painted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub fg: Color,
    pub bg: Color,
    pub bold: bool,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fg: Color::Reset,
            bg: Color::Reset,
            bold: false,
        }
    }
}

impl Style {
    pub fn fg(mut self, fg: Color) -> Self {
        self.fg = fg;
        self
    }

    pub fn bg(mut self, bg: Color) -> Self {
        self.bg = bg;
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub char: char,
    pub style: Style,
    /// Second column of a wide character.
    pub wide_continuation: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            char: ' ',
            style: Style::default(),
            wide_continuation: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Buffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Buffer {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    #[cfg(test)]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        (x < self.width && y < self.height).then(|| &self.cells[self.index(x, y)])
    }

    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if x < self.width && y < self.height {
            let idx = self.index(x, y);
            self.cells[idx] = cell;
        }
    }

    /// Paints `text` from `(x, y)`, never past `x + max_width` or the right
    /// edge. A wide character that would straddle the limit is dropped.
    /// Returns the number of columns painted.
    pub fn put_str(&mut self, x: u16, y: u16, text: &str, max_width: u16, style: Style) -> u16 {
        let limit = x.saturating_add(max_width).min(self.width);
        let mut cx = x;
        for ch in text.chars() {
            let w = char_width(ch) as u16;
            if w == 0 {
                continue;
            }
            if cx + w > limit {
                break;
            }
            self.set(
                cx,
                y,
                Cell {
                    char: ch,
                    style,
                    wide_continuation: false,
                },
            );
            if w == 2 {
                self.set(
                    cx + 1,
                    y,
                    Cell {
                        char: ' ',
                        style,
                        wide_continuation: true,
                    },
                );
            }
            cx += w;
        }
        cx - x
    }

    /// Fills a horizontal run with `style`'s background.
    pub fn fill(&mut self, x: u16, y: u16, width: u16, style: Style) {
        let end = x.saturating_add(width).min(self.width);
        for cx in x..end {
            self.set(
                cx,
                y,
                Cell {
                    char: ' ',
                    style,
                    wide_continuation: false,
                },
            );
        }
    }

    fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Cells of `self` that differ from `other`.
    pub fn diff<'a>(&'a self, other: &'a Buffer) -> impl Iterator<Item = (u16, u16, &'a Cell)> {
        self.cells
            .iter()
            .zip(other.cells.iter())
            .enumerate()
            .filter(|(_, (a, b))| a != b)
            .map(move |(i, (cell, _))| {
                let x = (i % self.width as usize) as u16;
                let y = (i / self.width as usize) as u16;
                (x, y, cell)
            })
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// Row `y` as a string, skipping wide continuations.
    #[cfg(test)]
    pub fn line(&self, y: u16) -> String {
        (0..self.width)
            .filter_map(|x| self.get(x, y))
            .filter(|c| !c.wide_continuation)
            .map(|c| c.char)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_str_clips() {
        let mut buf = Buffer::new(6, 1);
        assert_eq!(buf.put_str(1, 0, "abcdef", 3, Style::default()), 3);
        assert_eq!(buf.line(0), " abc  ");
        assert_eq!(buf.put_str(4, 0, "xyz", 10, Style::default()), 2);
        assert_eq!(buf.line(0), " abcxy");
    }

    #[test]
    fn test_put_str_wide_chars() {
        let mut buf = Buffer::new(5, 1);
        assert_eq!(buf.put_str(0, 0, "名名名", 5, Style::default()), 4);
        assert!(buf.get(1, 0).unwrap().wide_continuation);
        assert_eq!(buf.line(0), "名名 ");
    }

    #[test]
    fn test_diff_reports_changed_cells() {
        let a = Buffer::new(3, 2);
        let mut b = a.clone();
        b.put_str(2, 1, "x", 1, Style::default().bold());
        let changed: Vec<(u16, u16)> = b.diff(&a).map(|(x, y, _)| (x, y)).collect();
        assert_eq!(changed, vec![(2, 1)]);
    }
}
