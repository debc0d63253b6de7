use crate::color::Rgb;

/// Wraps any degree value into [0, 360)
pub fn wrap_degrees(degrees: i32) -> u16 {
    degrees.rem_euclid(360) as u16
}

/// Splits `total` pixels into `count` equal tracks and returns the
/// `count + 1` track boundaries
pub fn track_edges(total: usize, count: usize) -> Vec<usize> {
    let count = count.max(1);
    (0..=count).map(|i| i * total / count).collect()
}

/// Position of point `p` along a CSS gradient line, as a fraction of its length.
///
/// The gradient runs through the center of a `width` x `height` box at
/// `angle_deg` (0 points up, positive angles turn clockwise). 0.0 is where the
/// first color stop sits and 1.0 the opposite corner's projection.
pub fn gradient_position(p: [f64; 2], width: f64, height: f64, angle_deg: f64) -> f64 {
    let (sin_a, cos_a) = angle_deg.to_radians().sin_cos();
    // Screen y grows downwards, so "up" is -y
    let direction = [sin_a, -cos_a];
    let length = (width * sin_a).abs() + (height * cos_a).abs();
    if length <= f64::EPSILON {
        return 0.5;
    }
    let dx = p[0] - width / 2.0;
    let dy = p[1] - height / 2.0;
    (dx * direction[0] + dy * direction[1]) / length + 0.5
}

/// Samples a two-stop linear gradient: `color1` at 0%, `color2` at `spread_percent`
pub fn sample_gradient(t: f64, color1: Rgb, color2: Rgb, spread_percent: u32) -> Rgb {
    let stop = spread_percent as f64 / 100.0;
    if t <= 0.0 {
        return color1;
    }
    if t >= stop {
        // Covers a zero spread too: a hard stop right at the start
        return color2;
    }
    color1.lerp(color2, t / stop)
}

/// Rotates `p` around `center` by `angle_deg` (clockwise on screen)
pub fn rotate_point(p: [f64; 2], center: [f64; 2], angle_deg: f64) -> [f64; 2] {
    let (sin_a, cos_a) = angle_deg.to_radians().sin_cos();
    let dx = p[0] - center[0];
    let dy = p[1] - center[1];
    [
        center[0] + dx * cos_a - dy * sin_a,
        center[1] + dx * sin_a + dy * cos_a,
    ]
}

/// Signed distance from `p` to a rounded rectangle centered at the origin
/// with half extents `half` and corner radius `radius`. Negative inside.
pub fn rounded_rect_distance(p: [f64; 2], half: [f64; 2], radius: f64) -> f64 {
    let radius = radius.min(half[0]).min(half[1]).max(0.0);
    let qx = p[0].abs() - (half[0] - radius);
    let qy = p[1].abs() - (half[1] - radius);
    let outside = (qx.max(0.0).powi(2) + qy.max(0.0).powi(2)).sqrt();
    let inside = qx.max(qy).min(0.0);
    outside + inside - radius
}
