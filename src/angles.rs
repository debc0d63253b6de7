use crate::math::wrap_degrees;
use rand::Rng;

/// Per-cell gradient angles in degrees, each in [0, 360)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AngleArray {
    angles: Vec<u16>,
}

impl AngleArray {
    /// An empty array; the first render fills it
    pub fn new() -> Self {
        AngleArray { angles: Vec::new() }
    }

    /// Number of cells the angles cover
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.angles.len()
    }

    /// Angles in cell order
    pub fn as_slice(&self) -> &[u16] {
        &self.angles
    }

    /// Drops every angle so the next `ensure_len` draws a fresh set
    pub fn clear(&mut self) {
        self.angles.clear();
    }

    /// Replaces the whole array with `len` uniformly random angles
    pub fn randomize<R: Rng + ?Sized>(&mut self, len: usize, rng: &mut R) {
        self.angles = (0..len).map(|_| rng.gen_range(0..360)).collect();
    }

    /// Regenerates the array if its length is not `len`. Existing angles are
    /// never truncated or extended. Returns true when a new set was drawn.
    pub fn ensure_len<R: Rng + ?Sized>(&mut self, len: usize, rng: &mut R) -> bool {
        if self.angles.len() == len {
            return false;
        }
        self.randomize(len, rng);
        true
    }

    /// Rotates every angle by `offset` degrees, wrapping into [0, 360)
    pub fn apply_offset(&mut self, offset: i32) {
        for angle in self.angles.iter_mut() {
            *angle = wrap_degrees(*angle as i32 + offset);
        }
    }

    /// One animation step: every angle advances by a single degree
    pub fn advance(&mut self) {
        self.apply_offset(1);
    }
}

impl From<Vec<u16>> for AngleArray {
    fn from(angles: Vec<u16>) -> Self {
        AngleArray {
            angles: angles.into_iter().map(|a| a % 360).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn randomized_angles_stay_in_range() {
        let mut angles = AngleArray::new();
        angles.randomize(3600, &mut rng());
        assert_eq!(angles.len(), 3600);
        assert!(angles.as_slice().iter().all(|&a| a < 360));
    }

    #[test]
    fn ensure_len_keeps_matching_array() {
        let mut angles = AngleArray::from(vec![10, 20, 30]);
        assert!(!angles.ensure_len(3, &mut rng()));
        assert_eq!(angles.as_slice(), &[10, 20, 30]);
    }

    #[test]
    fn ensure_len_regenerates_on_mismatch() {
        let mut angles = AngleArray::from(vec![10, 20, 30]);
        assert!(angles.ensure_len(4, &mut rng()));
        assert_eq!(angles.len(), 4);
        assert!(angles.as_slice().iter().all(|&a| a < 360));
    }

    #[test]
    fn offsets_wrap_without_going_negative() {
        for (offset, expected) in [(-180, 270), (0, 90), (180, 270), (359, 89), (-359, 91)] {
            let mut angles = AngleArray::from(vec![90; 5]);
            angles.apply_offset(offset);
            assert!(
                angles.as_slice().iter().all(|&a| a == expected),
                "offset {offset}: {:?}",
                angles.as_slice()
            );
        }
    }

    #[test]
    fn offset_from_zero_wraps_below() {
        let mut angles = AngleArray::from(vec![0, 1, 359]);
        angles.apply_offset(-180);
        assert_eq!(angles.as_slice(), &[180, 181, 179]);
    }

    #[test]
    fn advance_wraps_at_full_turn() {
        let mut angles = AngleArray::from(vec![0, 358, 359]);
        angles.advance();
        assert_eq!(angles.as_slice(), &[1, 359, 0]);
    }
}
