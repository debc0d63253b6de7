use crate::angles::AngleArray;
use crate::animator::Animator;
use crate::color::Rgb;
use crate::glass::GlassPanel;
use crate::grid::{self, Container};
use rand::rngs::StdRng;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Adjustable visual parameters
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parameters {
    /// Gradient start color
    pub color1: Rgb,
    /// Gradient end color
    pub color2: Rgb,
    /// Manual angle adjustment, applied on commit
    pub angle_offset: i32,
    /// Number of grid rows
    pub rows: u32,
    /// Number of grid columns
    pub columns: u32,
    /// Position of the end color stop, in percent
    pub spread: u32,
    /// Rotation of the center panel, in degrees
    pub twirl: u32,
}

impl Default for Parameters {
    fn default() -> Self {
        Parameters {
            color1: Rgb::new(0xff, 0x2d, 0x2d),
            color2: Rgb::new(0xff, 0xac, 0x8c),
            angle_offset: 0,
            rows: 3,
            columns: 3,
            spread: 50,
            twirl: 0,
        }
    }
}

/// Range and step of a numeric parameter
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParamSpec {
    pub min: i32,
    pub max: i32,
    pub step: i32,
}

impl ParamSpec {
    pub fn clamp(&self, value: i32) -> i32 {
        value.clamp(self.min, self.max)
    }
}

/// Parameter fields bound to controls
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Color1,
    Color2,
    AngleOffset,
    Rows,
    Columns,
    Spread,
    Twirl,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Field::Color1 => "Color 1",
            Field::Color2 => "Color 2",
            Field::AngleOffset => "Adjust Angle",
            Field::Rows => "Rows",
            Field::Columns => "Columns",
            Field::Spread => "Gradient Spread",
            Field::Twirl => "Twirl Intensity",
        }
    }

    /// Range of a numeric field; colors have none
    pub fn spec(self) -> Option<ParamSpec> {
        let (min, max) = match self {
            Field::Color1 | Field::Color2 => return None,
            Field::AngleOffset => (-180, 180),
            Field::Rows | Field::Columns => (1, 60),
            Field::Spread => (0, 200),
            Field::Twirl => (0, 360),
        };
        Some(ParamSpec { min, max, step: 1 })
    }
}

/// Momentary buttons
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Randomize,
    StartAnimation,
    StopAnimation,
}

impl Action {
    pub fn label(self) -> &'static str {
        match self {
            Action::Randomize => "Randomize Angles",
            Action::StartAnimation => "Start Animation",
            Action::StopAnimation => "Stop Animation",
        }
    }
}

/// What a control reports after the user touches it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlEvent {
    /// Fired for every intermediate value
    Change(Field),
    /// Fired once when the interaction with a field ends
    Commit(Field),
    Pressed(Action),
}

impl Parameters {
    pub fn cell_count(&self) -> usize {
        self.rows as usize * self.columns as usize
    }

    pub fn value(&self, field: Field) -> Option<i32> {
        match field {
            Field::Color1 | Field::Color2 => None,
            Field::AngleOffset => Some(self.angle_offset),
            Field::Rows => Some(self.rows as i32),
            Field::Columns => Some(self.columns as i32),
            Field::Spread => Some(self.spread as i32),
            Field::Twirl => Some(self.twirl as i32),
        }
    }

    /// Stores a numeric value clamped to the field's range. Returns whether
    /// the stored value changed.
    pub fn set_value(&mut self, field: Field, value: i32) -> bool {
        let Some(spec) = field.spec() else {
            return false;
        };
        let value = spec.clamp(value);
        if self.value(field) == Some(value) {
            return false;
        }
        match field {
            Field::AngleOffset => self.angle_offset = value,
            Field::Rows => self.rows = value as u32,
            Field::Columns => self.columns = value as u32,
            Field::Spread => self.spread = value as u32,
            Field::Twirl => self.twirl = value as u32,
            Field::Color1 | Field::Color2 => {}
        }
        true
    }

    pub fn color(&self, field: Field) -> Option<Rgb> {
        match field {
            Field::Color1 => Some(self.color1),
            Field::Color2 => Some(self.color2),
            _ => None,
        }
    }

    /// Stores a color field. Returns whether the stored value changed.
    pub fn set_color(&mut self, field: Field, color: Rgb) -> bool {
        let slot = match field {
            Field::Color1 => &mut self.color1,
            Field::Color2 => &mut self.color2,
            _ => return false,
        };
        if *slot == color {
            return false;
        }
        *slot = color;
        true
    }
}

/// Application state: the single owner of everything the visual mutates
pub struct AppState {
    /// Current parameter values
    pub params: Parameters,
    angles: AngleArray,
    animator: Animator,
    container: Container,
    rng: StdRng,
}

impl AppState {
    /// Builds the initial grid and styles the center panel
    pub fn new(params: Parameters, tick_period: Duration, rng: StdRng) -> Self {
        let mut state = AppState {
            params,
            angles: AngleArray::new(),
            animator: Animator::new(tick_period),
            container: Container::new(GlassPanel::new()),
            rng,
        };
        state.render(false);
        state.apply_glass_effect();
        state
    }

    pub fn angles(&self) -> &AngleArray {
        &self.angles
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    pub fn is_animating(&self) -> bool {
        self.animator.is_running()
    }

    /// Rebuilds the grid from the current parameters and angles
    pub fn render(&mut self, apply_offset: bool) {
        grid::render(
            &mut self.container,
            &mut self.angles,
            &self.params,
            &mut self.rng,
            apply_offset,
        );
    }

    fn apply_glass_effect(&mut self) {
        let twirl = self.params.twirl;
        self.container.center_mut().apply_style(twirl);
    }

    /// Discards every angle and draws a fresh random set
    pub fn randomize(&mut self) {
        self.angles.clear();
        self.render(false);
        debug!(cells = self.angles.len(), "angles randomized");
    }

    pub fn start_animation(&mut self, now: Instant) -> bool {
        self.animator.start(now)
    }

    pub fn stop_animation(&mut self) -> bool {
        self.animator.stop()
    }

    /// Runs every animation tick due by `now`. Each tick advances all angles
    /// by one degree and rebuilds the grid without re-applying the offset.
    pub fn tick(&mut self, now: Instant) -> u32 {
        let due = self.animator.due_ticks(now);
        for _ in 0..due {
            self.angles.advance();
            self.render(false);
        }
        due
    }

    /// Routes a control event to its handler, synchronously
    pub fn dispatch(&mut self, event: ControlEvent, now: Instant) {
        match event {
            ControlEvent::Change(Field::AngleOffset) => {
                // Dragging the angle slider only updates the stored value
            }
            ControlEvent::Commit(Field::AngleOffset) => {
                info!(offset = self.params.angle_offset, "angle offset committed");
                self.render(true);
            }
            ControlEvent::Change(Field::Rows) | ControlEvent::Change(Field::Columns) => {
                info!(rows = self.params.rows, columns = self.params.columns, "grid resized");
                self.angles.clear();
                self.render(false);
            }
            ControlEvent::Change(Field::Twirl) => self.apply_glass_effect(),
            ControlEvent::Change(Field::Color1)
            | ControlEvent::Change(Field::Color2)
            | ControlEvent::Change(Field::Spread) => self.render(false),
            ControlEvent::Commit(_) => {}
            ControlEvent::Pressed(Action::Randomize) => self.randomize(),
            ControlEvent::Pressed(Action::StartAnimation) => {
                self.start_animation(now);
            }
            ControlEvent::Pressed(Action::StopAnimation) => {
                self.stop_animation();
            }
        }
    }
}
