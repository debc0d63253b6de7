use crate::color::Rgb;
use crate::glass::GlassPanel;
use crate::grid::{CellStyle, Container, Node};
use crate::math::{gradient_position, rotate_point, rounded_rect_distance, sample_gradient, track_edges};

/// Frame pixels per CSS pixel of the glass styling
pub const PX_PER_CSS: f64 = 0.2;

/// RGB pixel buffer
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub width: usize,
    pub height: usize,
    pixels: Vec<Rgb>,
}

impl Frame {
    pub fn new(width: usize, height: usize, fill: Rgb) -> Self {
        Frame {
            width,
            height,
            pixels: vec![fill; width * height],
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.pixels[y * self.width + x]
    }

    pub fn set(&mut self, x: usize, y: usize, color: Rgb) {
        self.pixels[y * self.width + x] = color;
    }

    /// Mean color of the square of side `2 * radius + 1` around (x, y),
    /// clipped to the frame
    fn box_average(&self, x: usize, y: usize, radius: usize) -> Rgb {
        let x0 = x.saturating_sub(radius);
        let y0 = y.saturating_sub(radius);
        let x1 = (x + radius).min(self.width - 1);
        let y1 = (y + radius).min(self.height - 1);
        let (mut r, mut g, mut b, mut n) = (0u32, 0u32, 0u32, 0u32);
        for yy in y0..=y1 {
            for xx in x0..=x1 {
                let c = self.get(xx, yy);
                r += c.r as u32;
                g += c.g as u32;
                b += c.b as u32;
                n += 1;
            }
        }
        let avg = |sum: u32| ((sum as f64) / (n as f64)).round() as u8;
        Rgb::new(avg(r), avg(g), avg(b))
    }
}

/// Draws every cell into its grid track, then the center panel on top
pub fn draw_container(frame: &mut Frame, container: &Container) {
    let columns = container.columns().max(1) as usize;
    let rows = container.rows().max(1) as usize;
    let col_edges = track_edges(frame.width, columns);
    let row_edges = track_edges(frame.height, rows);

    // The center element is positioned above the grid, so it is painted last
    let mut center = None;
    let mut index = 0;
    for node in container.children() {
        let cell = match node {
            Node::Center(panel) => {
                center = Some(panel);
                continue;
            }
            Node::Cell(cell) => cell,
        };
        let (row, column) = (index / columns, index % columns);
        index += 1;
        if row >= rows {
            break;
        }
        draw_gradient_cell(
            frame,
            [col_edges[column], row_edges[row]],
            [col_edges[column + 1], row_edges[row + 1]],
            cell,
        );
    }

    if let Some(panel) = center {
        draw_glass_panel(frame, panel);
    }
}

/// Fills the rectangle `min..max` with the cell's linear gradient
pub fn draw_gradient_cell(frame: &mut Frame, min: [usize; 2], max: [usize; 2], cell: &CellStyle) {
    let width = max[0].saturating_sub(min[0]) as f64;
    let height = max[1].saturating_sub(min[1]) as f64;
    let angle = cell.angle as f64;

    for y in min[1]..max[1].min(frame.height) {
        for x in min[0]..max[0].min(frame.width) {
            let p = [(x - min[0]) as f64 + 0.5, (y - min[1]) as f64 + 0.5];
            let t = gradient_position(p, width, height, angle);
            frame.set(x, y, sample_gradient(t, cell.color1, cell.color2, cell.spread));
        }
    }
}

/// Composites the frosted panel over the middle of the frame: blurred
/// backdrop, white tint, border, drop shadow, rounded corners, rotated by
/// the twirl angle
pub fn draw_glass_panel(frame: &mut Frame, panel: &GlassPanel) {
    let Some(style) = panel.style() else {
        return;
    };
    if frame.width == 0 || frame.height == 0 {
        return;
    }

    let side = frame.width.min(frame.height) as f64 / 3.0;
    let half = [side / 2.0, side / 2.0];
    let center = [frame.width as f64 / 2.0, frame.height as f64 / 2.0];
    let border = (style.border_width * PX_PER_CSS).max(1.0);
    let radius = style.corner_radius * PX_PER_CSS;
    let blur = (style.blur_radius * PX_PER_CSS).round() as usize;
    let shadow_offset = (style.shadow_offset * PX_PER_CSS).ceil();
    let shadow_blur = (style.shadow_blur * PX_PER_CSS).max(1.0);
    let twirl = panel.twirl() as f64;

    // Bounding box of the panel at any rotation, shadow included
    let reach = half[0] * std::f64::consts::SQRT_2 + shadow_offset + shadow_blur + 1.0;
    let min_x = (center[0] - reach).floor().max(0.0) as usize;
    let max_x = ((center[0] + reach).ceil() as usize).min(frame.width - 1);
    let min_y = (center[1] - reach).floor().max(0.0) as usize;
    let max_y = ((center[1] + reach).ceil() as usize).min(frame.height - 1);

    let backdrop = frame.clone();
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let p = [x as f64 + 0.5, y as f64 + 0.5];
            let unrotated = rotate_point(p, center, -twirl);
            let local = [unrotated[0] - center[0], unrotated[1] - center[1]];

            let distance = rounded_rect_distance(local, half, radius);
            if distance <= 0.0 {
                let mut color = backdrop
                    .box_average(x, y, blur)
                    .blend(style.tint, style.tint_alpha);
                if distance > -border {
                    color = color.blend(Rgb::WHITE, style.border_alpha);
                }
                frame.set(x, y, color);
                continue;
            }

            let shadow = rounded_rect_distance([local[0], local[1] - shadow_offset], half, radius);
            if shadow < shadow_blur {
                let falloff = 1.0 - shadow.max(0.0) / shadow_blur;
                let color = backdrop.get(x, y).blend(Rgb::BLACK, style.shadow_alpha * falloff);
                frame.set(x, y, color);
            }
        }
    }
}
