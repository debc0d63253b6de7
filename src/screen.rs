use crate::color::Rgb;
use crate::graphics::Frame;
use crate::widget::{PanelLine, PANEL_WIDTH};
use crossterm::{
    cursor, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{BeginSynchronizedUpdate, EndSynchronizedUpdate},
};
use std::io::{self, Write};

/// Upper half block: foreground paints the top pixel, background the bottom
const HALF_BLOCK: char = '▀';

const PANEL_BG: Rgb = Rgb::new(20, 22, 30);
const PANEL_SELECTED_BG: Rgb = Rgb::new(52, 58, 80);
const PANEL_FG: Rgb = Rgb::new(210, 215, 225);
const SWATCH_WIDTH: usize = 3;

/// One terminal character cell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
}

impl Cell {
    fn new(ch: char, fg: Color, bg: Color) -> Self {
        Cell { ch, fg, bg }
    }

    fn blank() -> Self {
        Cell::new('\0', Color::Reset, Color::Reset)
    }
}

/// Diff-based presenter: only cells that changed since the last frame are
/// written to the terminal
pub struct Screen {
    cols: usize,
    rows: usize,
    prev: Vec<Cell>,
}

impl Screen {
    pub fn new(cols: usize, rows: usize) -> Self {
        Screen {
            cols,
            rows,
            prev: vec![Cell::blank(); cols * rows],
        }
    }

    pub fn resize(&mut self, cols: usize, rows: usize) {
        *self = Screen::new(cols, rows);
    }

    /// Pixel size of the frame this screen shows: two pixels per row
    pub fn frame_size(&self) -> (usize, usize) {
        (self.cols, self.rows * 2)
    }

    /// Turns a pixel frame plus the optional panel into terminal cells
    pub fn compose(&self, frame: &Frame, panel: Option<&[PanelLine]>) -> Vec<Cell> {
        let mut cells = Vec::with_capacity(self.cols * self.rows);
        for row in 0..self.rows {
            for col in 0..self.cols {
                let top = pixel_at(frame, col, row * 2);
                let bottom = pixel_at(frame, col, row * 2 + 1);
                cells.push(Cell::new(HALF_BLOCK, top.into(), bottom.into()));
            }
        }
        if let Some(lines) = panel {
            self.overlay_panel(&mut cells, lines);
        }
        cells
    }

    fn overlay_panel(&self, cells: &mut [Cell], lines: &[PanelLine]) {
        let width = PANEL_WIDTH.min(self.cols);
        let left = self.cols.saturating_sub(PANEL_WIDTH + 1);
        let top = usize::from(self.rows > lines.len() + 1);

        for (i, line) in lines.iter().enumerate() {
            let row = top + i;
            if row >= self.rows {
                break;
            }
            let bg = if line.selected { PANEL_SELECTED_BG } else { PANEL_BG };
            let mut chars = line.text.chars();
            for x in 0..width {
                let swatch_col = width.saturating_sub(SWATCH_WIDTH + 1)..width - 1;
                let cell = match line.swatch {
                    Some(color) if swatch_col.contains(&x) => Cell::new(' ', PANEL_FG.into(), color.into()),
                    _ => Cell::new(chars.next().unwrap_or(' '), PANEL_FG.into(), bg.into()),
                };
                cells[row * self.cols + left + x] = cell;
            }
        }
    }

    /// Paints the whole screen once and forgets what was on it
    pub fn clear_all<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        queue!(out, BeginSynchronizedUpdate)?;
        for y in 0..self.rows {
            queue!(
                out,
                cursor::MoveTo(0, y as u16),
                SetBackgroundColor(Color::Black),
                Print(" ".repeat(self.cols)),
                ResetColor
            )?;
        }
        queue!(out, EndSynchronizedUpdate)?;
        out.flush()?;
        self.prev.fill(Cell::blank());
        Ok(())
    }

    /// Writes the cells that differ from the previous frame, grouped in
    /// same-colored runs
    pub fn draw<W: Write>(&mut self, out: &mut W, cells: &[Cell]) -> io::Result<()> {
        queue!(out, BeginSynchronizedUpdate)?;
        let w = self.cols;
        for y in 0..self.rows {
            let row_off = y * w;
            let mut x = 0;
            while x < w {
                let i = row_off + x;
                let cur = cells[i];
                if cur == self.prev[i] {
                    x += 1;
                    continue;
                }

                let mut end = x + 1;
                while end < w {
                    let cj = cells[row_off + end];
                    if cj == self.prev[row_off + end] || cj.fg != cur.fg || cj.bg != cur.bg {
                        break;
                    }
                    end += 1;
                }

                queue!(
                    out,
                    cursor::MoveTo(x as u16, y as u16),
                    SetForegroundColor(cur.fg),
                    SetBackgroundColor(cur.bg),
                )?;
                let run: String = cells[row_off + x..row_off + end].iter().map(|c| c.ch).collect();
                queue!(out, Print(run))?;
                self.prev[row_off + x..row_off + end].copy_from_slice(&cells[row_off + x..row_off + end]);
                x = end;
            }
        }
        queue!(out, ResetColor, EndSynchronizedUpdate)?;
        out.flush()
    }
}

fn pixel_at(frame: &Frame, x: usize, y: usize) -> Rgb {
    if x < frame.width && y < frame.height {
        frame.get(x, y)
    } else {
        Rgb::BLACK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> Frame {
        let mut frame = Frame::new(2, 2, Rgb::BLACK);
        frame.set(0, 0, Rgb::new(255, 0, 0));
        frame.set(0, 1, Rgb::new(0, 0, 255));
        frame
    }

    #[test]
    fn pixels_pair_up_into_half_blocks() {
        let screen = Screen::new(2, 1);
        assert_eq!(screen.frame_size(), (2, 2));
        let cells = screen.compose(&checker(), None);
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].ch, HALF_BLOCK);
        assert_eq!(cells[0].fg, Color::Rgb { r: 255, g: 0, b: 0 });
        assert_eq!(cells[0].bg, Color::Rgb { r: 0, g: 0, b: 255 });
    }

    #[test]
    fn panel_is_drawn_top_right() {
        let screen = Screen::new(60, 20);
        let frame = Frame::new(60, 40, Rgb::BLACK);
        let lines = vec![PanelLine {
            text: "Hello".to_string(),
            swatch: Some(Rgb::new(1, 2, 3)),
            selected: true,
        }];
        let cells = screen.compose(&frame, Some(&lines));
        let left = 60 - PANEL_WIDTH - 1;
        let row = 60;
        assert_eq!(cells[row + left].ch, 'H');
        assert_eq!(cells[row + left].bg, Color::from(PANEL_SELECTED_BG));
        assert_eq!(cells[row + left + PANEL_WIDTH - 2].bg, Color::Rgb { r: 1, g: 2, b: 3 });
        // Row 0 keeps the grid
        assert_eq!(cells[left].ch, HALF_BLOCK);
    }

    #[test]
    fn unchanged_frames_write_no_cells() {
        let mut screen = Screen::new(2, 1);
        let cells = screen.compose(&checker(), None);
        let mut first: Vec<u8> = Vec::new();
        screen.draw(&mut first, &cells).unwrap();
        let mut second: Vec<u8> = Vec::new();
        screen.draw(&mut second, &cells).unwrap();
        assert!(String::from_utf8_lossy(&first).contains(HALF_BLOCK));
        assert!(!String::from_utf8_lossy(&second).contains(HALF_BLOCK));
    }

    #[test]
    fn resize_resets_the_previous_frame() {
        let mut screen = Screen::new(2, 1);
        let cells = screen.compose(&checker(), None);
        screen.draw(&mut Vec::<u8>::new(), &cells).unwrap();
        screen.resize(4, 2);
        assert_eq!(screen.frame_size(), (4, 4));
        let cells = screen.compose(&checker(), None);
        let mut out: Vec<u8> = Vec::new();
        screen.draw(&mut out, &cells).unwrap();
        assert!(String::from_utf8_lossy(&out).contains(HALF_BLOCK));
    }
}
