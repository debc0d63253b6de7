//! Container model of the gradient grid and its full-rebuild renderer.

use crate::angles::AngleArray;
use crate::color::Rgb;
use crate::glass::GlassPanel;
use crate::state::Parameters;
use rand::Rng;
use tracing::trace;

/// Class marker of the grid container
pub const CONTAINER_CLASS: &str = "gradient-container";

/// Background of a single grid cell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellStyle {
    pub angle: u16,
    pub color1: Rgb,
    pub color2: Rgb,
    pub spread: u32,
}

impl CellStyle {
    /// CSS `background` value for this cell
    pub fn background(&self) -> String {
        format!(
            "linear-gradient({}deg, {} 0%, {} {}%)",
            self.angle, self.color1, self.color2, self.spread
        )
    }
}

/// A child of the container, in document order
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Node<'a> {
    Center(&'a GlassPanel),
    Cell(&'a CellStyle),
}

/// The grid container: equal row/column tracks, the reserved center element
/// and one gradient cell per angle
#[derive(Clone, Debug, PartialEq)]
pub struct Container {
    rows: u32,
    columns: u32,
    center: GlassPanel,
    cells: Vec<CellStyle>,
}

impl Container {
    /// A 1x1 container holding only the reserved center element
    pub fn new(center: GlassPanel) -> Self {
        Container {
            rows: 1,
            columns: 1,
            center,
            cells: Vec::new(),
        }
    }

    /// Row track count
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Column track count
    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// `grid-template-rows` value: equal tracks
    pub fn grid_template_rows(&self) -> String {
        format!("repeat({}, 1fr)", self.rows)
    }

    /// `grid-template-columns` value: equal tracks
    pub fn grid_template_columns(&self) -> String {
        format!("repeat({}, 1fr)", self.columns)
    }

    /// The reserved center element
    pub fn center(&self) -> &GlassPanel {
        &self.center
    }

    /// Mutable access to the center element, for restyling
    pub fn center_mut(&mut self) -> &mut GlassPanel {
        &mut self.center
    }

    /// Gradient cells in row-major order
    pub fn cells(&self) -> &[CellStyle] {
        &self.cells
    }

    /// Children in document order: the center element first, then the cells
    pub fn children(&self) -> impl Iterator<Item = Node<'_>> {
        std::iter::once(Node::Center(&self.center)).chain(self.cells.iter().map(Node::Cell))
    }

    /// Sets the track counts of the grid layout
    fn set_tracks(&mut self, rows: u32, columns: u32) {
        self.rows = rows;
        self.columns = columns;
    }

    /// Drops every cell; the center element is kept
    fn clear_cells(&mut self) {
        self.cells.clear();
    }
}

/// Rebuilds the container from the parameters and the angle array.
///
/// The angle array is regenerated first if its length no longer matches
/// `rows * columns`, so no stale index is ever read. With `apply_offset` the
/// manual angle offset is added to every angle before the cells are built.
pub fn render<R: Rng + ?Sized>(
    container: &mut Container,
    angles: &mut AngleArray,
    params: &Parameters,
    rng: &mut R,
    apply_offset: bool,
) {
    let cell_count = params.cell_count();
    if angles.ensure_len(cell_count, rng) {
        trace!(cell_count, "drew fresh angles");
    }
    if apply_offset {
        angles.apply_offset(params.angle_offset);
    }

    container.set_tracks(params.rows, params.columns);
    container.clear_cells();
    container.cells.extend(angles.as_slice().iter().map(|&angle| CellStyle {
        angle,
        color1: params.color1,
        color2: params.color2,
        spread: params.spread,
    }));
    trace!(
        class = CONTAINER_CLASS,
        template_rows = %container.grid_template_rows(),
        template_columns = %container.grid_template_columns(),
        cells = container.cells.len(),
        first = ?container.cells.first().map(CellStyle::background),
        apply_offset,
        "grid rebuilt"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn setup() -> (Container, AngleArray, Parameters, StdRng) {
        let mut center = GlassPanel::new();
        center.apply_style(0);
        (
            Container::new(center),
            AngleArray::new(),
            Parameters::default(),
            StdRng::seed_from_u64(42),
        )
    }

    #[test]
    fn length_always_matches_grid_size() {
        let (mut container, mut angles, mut params, mut rng) = setup();
        for (rows, columns) in [(1, 1), (60, 60), (3, 7), (60, 1), (1, 60), (2, 2)] {
            params.rows = rows;
            params.columns = columns;
            render(&mut container, &mut angles, &params, &mut rng, false);
            assert_eq!(angles.len(), (rows * columns) as usize);
            assert_eq!(container.cells().len(), angles.len());
        }
    }

    #[test]
    fn every_size_in_range_matches() {
        let (mut container, mut angles, mut params, mut rng) = setup();
        for rows in 1..=60 {
            for columns in [1, 17, 60] {
                params.rows = rows;
                params.columns = columns;
                render(&mut container, &mut angles, &params, &mut rng, false);
                assert_eq!(angles.len(), (rows * columns) as usize);
            }
        }
    }

    #[test]
    fn center_element_comes_first_and_survives() {
        let (mut container, mut angles, params, mut rng) = setup();
        render(&mut container, &mut angles, &params, &mut rng, false);
        render(&mut container, &mut angles, &params, &mut rng, false);
        let children: Vec<_> = container.children().collect();
        assert_eq!(children.len(), 10);
        assert!(matches!(children[0], Node::Center(c) if c.style().is_some()));
        assert!(children[1..].iter().all(|n| matches!(n, Node::Cell(_))));
    }

    #[test]
    fn render_is_idempotent() {
        let (mut container, mut angles, params, mut rng) = setup();
        render(&mut container, &mut angles, &params, &mut rng, false);
        let first = container.clone();
        render(&mut container, &mut angles, &params, &mut rng, false);
        assert_eq!(container, first);
    }

    #[test]
    fn cells_carry_gradient_backgrounds() {
        let (mut container, _, params, mut rng) = setup();
        let mut angles = AngleArray::from(vec![0, 45, 90, 135, 180, 225, 270, 315, 359]);
        render(&mut container, &mut angles, &params, &mut rng, false);
        assert_eq!(container.grid_template_rows(), "repeat(3, 1fr)");
        assert_eq!(container.grid_template_columns(), "repeat(3, 1fr)");
        assert_eq!(
            container.cells()[1].background(),
            "linear-gradient(45deg, #ff2d2d 0%, #ffac8c 50%)"
        );
    }

    #[test]
    fn offset_applies_only_when_asked() {
        let (mut container, _, mut params, mut rng) = setup();
        params.rows = 1;
        params.columns = 3;
        params.angle_offset = -20;
        let mut angles = AngleArray::from(vec![10, 20, 30]);
        render(&mut container, &mut angles, &params, &mut rng, false);
        assert_eq!(angles.as_slice(), &[10, 20, 30]);
        render(&mut container, &mut angles, &params, &mut rng, true);
        assert_eq!(angles.as_slice(), &[350, 0, 10]);
        let drawn: Vec<u16> = container.cells().iter().map(|c| c.angle).collect();
        assert_eq!(drawn, vec![350, 0, 10]);
    }
}
