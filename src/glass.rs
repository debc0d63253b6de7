//! The frosted-glass panel that sits in the middle of the grid.

use crate::color::Rgb;
use tracing::debug;

/// Element id of the reserved center element
pub const CENTER_ID: &str = "three-container";

/// Static translucency styling of the panel, in CSS pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlassStyle {
    pub tint: Rgb,
    pub tint_alpha: f64,
    pub border_width: f64,
    pub border_alpha: f64,
    pub blur_radius: f64,
    pub shadow_offset: f64,
    pub shadow_blur: f64,
    pub shadow_alpha: f64,
    pub corner_radius: f64,
}

impl Default for GlassStyle {
    fn default() -> Self {
        GlassStyle {
            tint: Rgb::WHITE,
            tint_alpha: 0.1,
            border_width: 2.0,
            border_alpha: 0.2,
            blur_radius: 10.0,
            shadow_offset: 4.0,
            shadow_blur: 6.0,
            shadow_alpha: 0.2,
            corner_radius: 10.0,
        }
    }
}

impl GlassStyle {
    /// CSS declarations equivalent to this style
    pub fn declarations(&self) -> Vec<(&'static str, String)> {
        vec![
            ("background", format!("rgba(255, 255, 255, {})", self.tint_alpha)),
            (
                "border",
                format!("{}px solid rgba(255, 255, 255, {})", self.border_width, self.border_alpha),
            ),
            ("backdrop-filter", format!("blur({}px)", self.blur_radius)),
            (
                "box-shadow",
                format!(
                    "0 {}px {}px rgba(0, 0, 0, {})",
                    self.shadow_offset, self.shadow_blur, self.shadow_alpha
                ),
            ),
            ("border-radius", format!("{}px", self.corner_radius)),
        ]
    }
}

/// Center panel state: its one-time style plus the current twirl rotation
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GlassPanel {
    style: Option<GlassStyle>,
    twirl: u32,
}

impl GlassPanel {
    /// An unstyled center element
    pub fn new() -> Self {
        GlassPanel {
            style: None,
            twirl: 0,
        }
    }

    /// Applies the glass look and the initial twirl
    pub fn apply_style(&mut self, twirl: u32) {
        let style = GlassStyle::default();
        debug!(element = CENTER_ID, declarations = ?style.declarations(), "glass style applied");
        self.style = Some(style);
        self.apply_twirl(twirl);
    }

    /// Re-applies the rotation transform
    pub fn apply_twirl(&mut self, twirl: u32) {
        self.twirl = twirl;
        debug!(element = CENTER_ID, transform = %self.transform(), "twirl applied");
    }

    /// The glass look, once applied
    pub fn style(&self) -> Option<&GlassStyle> {
        self.style.as_ref()
    }

    /// Current rotation in degrees
    pub fn twirl(&self) -> u32 {
        self.twirl
    }

    /// Centered rotation transform, as CSS
    pub fn transform(&self) -> String {
        format!("translate(-50%, -50%) rotate({}deg)", self.twirl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unstyled() {
        let panel = GlassPanel::new();
        assert!(panel.style().is_none());
        assert_eq!(panel.transform(), "translate(-50%, -50%) rotate(0deg)");
    }

    #[test]
    fn style_is_applied_with_twirl() {
        let mut panel = GlassPanel::new();
        panel.apply_style(45);
        assert_eq!(panel.style(), Some(&GlassStyle::default()));
        assert_eq!(panel.transform(), "translate(-50%, -50%) rotate(45deg)");
    }

    #[test]
    fn twirl_changes_only_the_transform() {
        let mut panel = GlassPanel::new();
        panel.apply_style(0);
        let before = panel.style().cloned();
        panel.apply_twirl(360);
        assert_eq!(panel.twirl(), 360);
        assert_eq!(panel.style().cloned(), before);
    }

    #[test]
    fn declarations_match_the_glass_look() {
        let decls = GlassStyle::default().declarations();
        assert!(decls.contains(&("backdrop-filter", "blur(10px)".to_string())));
        assert!(decls.contains(&("border-radius", "10px".to_string())));
        assert!(decls.contains(&(
            "box-shadow",
            "0 4px 6px rgba(0, 0, 0, 0.2)".to_string()
        )));
    }
}
