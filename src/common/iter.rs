use super::metadata::Version;

// Iterator for placing data in encoding region of QR
//------------------------------------------------------------------------------

// Walks column pairs right to left, alternating bottom-up and top-down,
// hopping over the vertical timing column.
pub struct EncRegionIter {
    r: i16,
    c: i16,
    width: i16,
}

const VERT_TIMING_COL: i16 = 6;

impl EncRegionIter {
    pub const fn new(version: Version) -> Self {
        let w = version.width();
        Self { r: w - 1, c: w - 1, width: w }
    }
}

impl Iterator for EncRegionIter {
    type Item = (i16, i16);
    fn next(&mut self) -> Option<Self::Item> {
        let adjusted_col = if self.c <= VERT_TIMING_COL { self.c + 1 } else { self.c };
        if self.c < 0 {
            return None;
        }
        let res = (self.r, self.c);
        let col_type = (self.width - adjusted_col) % 4;
        match col_type {
            2 if self.r > 0 => {
                self.r -= 1;
                self.c += 1;
            }
            0 if self.r < self.width - 1 => {
                self.r += 1;
                self.c += 1;
            }
            0 | 2 if self.c == VERT_TIMING_COL + 1 => {
                self.c -= 2;
            }
            _ => {
                self.c -= 1;
            }
        }
        Some(res)
    }
}

#[cfg(test)]
mod iter_tests {
    use super::{EncRegionIter, VERT_TIMING_COL};
    use crate::common::metadata::Version;

    #[test]
    fn test_enc_region_iter_starts_bottom_right() {
        let ver = Version::new(1);
        let w = ver.width();
        let mut coords = EncRegionIter::new(ver);
        assert_eq!(coords.next(), Some((w - 1, w - 1)));
        assert_eq!(coords.next(), Some((w - 1, w - 2)));
        assert_eq!(coords.next(), Some((w - 2, w - 1)));
        assert_eq!(coords.next(), Some((w - 2, w - 2)));
    }

    #[test]
    fn test_enc_region_iter_covers_grid_once() {
        for v in 1..=5 {
            let ver = Version::new(v);
            let w = ver.width();
            let mut visited = vec![false; (w * w) as usize];
            for (r, c) in EncRegionIter::new(ver) {
                assert!((0..w).contains(&r), "Row out of bounds: {r}");
                assert!((0..w).contains(&c), "Col out of bounds: {c}");
                assert_ne!(c, VERT_TIMING_COL, "Iterator entered the timing column");
                let idx = (r * w + c) as usize;
                assert!(!visited[idx], "Cell visited twice: ({r}, {c})");
                visited[idx] = true;
            }
            let visited_count = visited.iter().filter(|&&v| v).count();
            assert_eq!(visited_count, (w * (w - 1)) as usize);
        }
    }
}
