use crate::color::Rgb;
use crate::state::{Action, ControlEvent, Field, Parameters};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Width of the floating panel in terminal columns
pub const PANEL_WIDTH: usize = 38;

const SLIDER_BAR: usize = 10;
const CHANNELS: [&str; 3] = ["R", "G", "B"];

/// One row of the control panel
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Color(Field),
    Slider(Field),
    Button(Action),
}

/// A rendered panel row
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PanelLine {
    pub text: String,
    /// Color shown as a swatch at the end of the row
    pub swatch: Option<Rgb>,
    pub selected: bool,
}

impl PanelLine {
    fn plain(text: String) -> Self {
        PanelLine {
            text,
            swatch: None,
            selected: false,
        }
    }
}

/// Keyboard-driven parameter panel: two color pickers, five sliders and three
/// buttons bound to `Parameters`
pub struct ControlPanel {
    controls: Vec<Control>,
    selected: usize,
    visible: bool,
    /// Active RGB channel of the color pickers
    channel: usize,
    /// Hex text field of the selected color picker, while open
    editing: Option<String>,
    /// Slider edited since its last commit
    uncommitted: Option<Field>,
    status: Option<String>,
}

impl ControlPanel {
    pub fn new(visible: bool) -> Self {
        ControlPanel {
            controls: vec![
                Control::Color(Field::Color1),
                Control::Color(Field::Color2),
                Control::Slider(Field::AngleOffset),
                Control::Slider(Field::Rows),
                Control::Slider(Field::Columns),
                Control::Slider(Field::Spread),
                Control::Slider(Field::Twirl),
                Control::Button(Action::Randomize),
                Control::Button(Action::StartAnimation),
                Control::Button(Action::StopAnimation),
            ],
            selected: 0,
            visible,
            channel: 0,
            editing: None,
            uncommitted: None,
            status: None,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Shows or hides the panel. Hiding it finishes a pending slider change.
    pub fn toggle_visible(&mut self) -> Vec<ControlEvent> {
        self.visible = !self.visible;
        match self.uncommitted.take() {
            Some(field) if !self.visible => vec![ControlEvent::Commit(field)],
            pending => {
                self.uncommitted = pending;
                Vec::new()
            }
        }
    }

    /// True while the hex text field owns the keyboard
    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn selected(&self) -> Control {
        self.controls[self.selected]
    }

    /// Applies a key to the bound parameters and reports what changed
    pub fn handle_key(&mut self, key: KeyEvent, params: &mut Parameters) -> Vec<ControlEvent> {
        if !self.visible {
            return Vec::new();
        }
        if self.editing.is_some() {
            return self.handle_text_field(key, params);
        }

        let coarse = key.modifiers.contains(KeyModifiers::SHIFT);
        match key.code {
            KeyCode::Up => self.select(self.selected.checked_sub(1).unwrap_or(self.controls.len() - 1)),
            KeyCode::Down | KeyCode::Tab => self.select((self.selected + 1) % self.controls.len()),
            KeyCode::Left => self.adjust(params, -1, coarse),
            KeyCode::Right => self.adjust(params, 1, coarse),
            KeyCode::Home => self.set_extreme(params, false),
            KeyCode::End => self.set_extreme(params, true),
            KeyCode::Char('c') | KeyCode::Char('C') => {
                if let Control::Color(_) = self.selected() {
                    self.channel = (self.channel + 1) % CHANNELS.len();
                }
                Vec::new()
            }
            KeyCode::Enter => match self.selected() {
                Control::Slider(field) => {
                    self.uncommitted = None;
                    vec![ControlEvent::Commit(field)]
                }
                Control::Color(field) => {
                    self.editing = params.color(field).map(|c| c.to_hex());
                    self.status = None;
                    Vec::new()
                }
                Control::Button(action) => vec![ControlEvent::Pressed(action)],
            },
            KeyCode::Char(' ') => match self.selected() {
                Control::Button(action) => vec![ControlEvent::Pressed(action)],
                _ => Vec::new(),
            },
            _ => Vec::new(),
        }
    }

    /// Moves the selection; leaving an edited slider finishes its change
    fn select(&mut self, index: usize) -> Vec<ControlEvent> {
        let mut events = Vec::new();
        if index != self.selected {
            if let Some(field) = self.uncommitted.take() {
                events.push(ControlEvent::Commit(field));
            }
        }
        self.selected = index;
        events
    }

    fn adjust(&mut self, params: &mut Parameters, direction: i32, coarse: bool) -> Vec<ControlEvent> {
        match self.selected() {
            Control::Slider(field) => {
                let Some(spec) = field.spec() else {
                    return Vec::new();
                };
                let step = if coarse { spec.step * 10 } else { spec.step };
                let current = params.value(field).unwrap_or(spec.min);
                self.store_value(params, field, current + direction * step)
            }
            Control::Color(field) => {
                let Some(color) = params.color(field) else {
                    return Vec::new();
                };
                let step = if coarse { 16 } else { 1 };
                let current = color.channel(self.channel) as i32;
                let value = (current + direction * step).clamp(0, 255) as u8;
                if params.set_color(field, color.with_channel(self.channel, value)) {
                    vec![ControlEvent::Change(field)]
                } else {
                    Vec::new()
                }
            }
            Control::Button(_) => Vec::new(),
        }
    }

    fn set_extreme(&mut self, params: &mut Parameters, max: bool) -> Vec<ControlEvent> {
        match self.selected() {
            Control::Slider(field) => match field.spec() {
                Some(spec) => self.store_value(params, field, if max { spec.max } else { spec.min }),
                None => Vec::new(),
            },
            _ => Vec::new(),
        }
    }

    fn store_value(&mut self, params: &mut Parameters, field: Field, value: i32) -> Vec<ControlEvent> {
        if params.set_value(field, value) {
            self.uncommitted = Some(field);
            vec![ControlEvent::Change(field)]
        } else {
            Vec::new()
        }
    }

    fn handle_text_field(&mut self, key: KeyEvent, params: &mut Parameters) -> Vec<ControlEvent> {
        let Some(buffer) = self.editing.as_mut() else {
            return Vec::new();
        };
        match key.code {
            KeyCode::Char(c) if (c.is_ascii_hexdigit() || c == '#') && buffer.len() < 7 => {
                buffer.push(c);
                Vec::new()
            }
            KeyCode::Backspace => {
                buffer.pop();
                Vec::new()
            }
            KeyCode::Esc => {
                self.editing = None;
                Vec::new()
            }
            KeyCode::Enter => {
                let text = self.editing.take().unwrap_or_default();
                let Control::Color(field) = self.selected() else {
                    return Vec::new();
                };
                match Rgb::from_hex(&text) {
                    Ok(color) => {
                        self.status = None;
                        if params.set_color(field, color) {
                            vec![ControlEvent::Change(field)]
                        } else {
                            Vec::new()
                        }
                    }
                    Err(err) => {
                        self.status = Some(err.to_string());
                        Vec::new()
                    }
                }
            }
            _ => Vec::new(),
        }
    }

    /// Panel rows for the current values
    pub fn lines(&self, params: &Parameters, animating: bool) -> Vec<PanelLine> {
        let mut lines = vec![PanelLine::plain(format!(
            " Controls  {}",
            if animating { "(animating)" } else { "" }
        ))];
        for (index, control) in self.controls.iter().enumerate() {
            let selected = index == self.selected;
            let marker = if selected { '>' } else { ' ' };
            let (text, swatch) = match *control {
                Control::Color(field) => {
                    let color = params.color(field).unwrap_or_default();
                    let value = match (&self.editing, selected) {
                        (Some(buffer), true) => format!("{buffer:<7}_"),
                        _ if selected => format!("{color} {}", CHANNELS[self.channel]),
                        _ => color.to_string(),
                    };
                    (format!("{marker} {:<16}{value}", field.label()), Some(color))
                }
                Control::Slider(field) => {
                    let value = params.value(field).unwrap_or_default();
                    let bar = field.spec().map(|s| slider_bar(value, s.min, s.max)).unwrap_or_default();
                    (format!("{marker} {:<16}{value:>4} {bar}", field.label()), None)
                }
                Control::Button(action) => (format!("{marker} [ {} ]", action.label()), None),
            };
            lines.push(PanelLine {
                text,
                swatch,
                selected,
            });
        }
        let footer = match &self.status {
            Some(status) => format!(" {status}"),
            None => " ↑↓ select ←→ adjust ⏎ apply".to_string(),
        };
        lines.push(PanelLine::plain(footer));
        lines
    }
}

fn slider_bar(value: i32, min: i32, max: i32) -> String {
    let span = (max - min).max(1) as f64;
    let filled = (((value - min) as f64 / span) * SLIDER_BAR as f64).round() as usize;
    let filled = filled.min(SLIDER_BAR);
    format!("{}{}", "█".repeat(filled), "░".repeat(SLIDER_BAR - filled))
}
