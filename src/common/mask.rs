use std::ops::Deref;

use super::metadata::Color;
use crate::builder::QR;

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord)]
pub struct MaskPattern(u8);

impl MaskPattern {
    pub fn new(pattern: u8) -> Self {
        debug_assert!(pattern < 8, "Invalid masking pattern");
        Self(pattern)
    }
}

impl Deref for MaskPattern {
    type Target = u8;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

mod mask_functions {
    pub fn checkerboard(r: i16, c: i16) -> bool {
        (r + c) & 1 == 0
    }

    pub fn horizontal_lines(r: i16, _: i16) -> bool {
        r & 1 == 0
    }

    pub fn vertical_lines(_: i16, c: i16) -> bool {
        c % 3 == 0
    }

    pub fn diagonal_lines(r: i16, c: i16) -> bool {
        (r + c) % 3 == 0
    }

    pub fn large_checkerboard(r: i16, c: i16) -> bool {
        ((r >> 1) + (c / 3)) & 1 == 0
    }

    pub fn fields(r: i16, c: i16) -> bool {
        ((r * c) & 1) + ((r * c) % 3) == 0
    }

    pub fn diamonds(r: i16, c: i16) -> bool {
        (((r * c) & 1) + ((r * c) % 3)) & 1 == 0
    }

    pub fn meadow(r: i16, c: i16) -> bool {
        (((r + c) & 1) + ((r * c) % 3)) & 1 == 0
    }
}

impl MaskPattern {
    pub fn mask_function(self) -> fn(i16, i16) -> bool {
        debug_assert!(*self < 8, "Invalid pattern");

        match *self {
            0b000 => mask_functions::checkerboard,
            0b001 => mask_functions::horizontal_lines,
            0b010 => mask_functions::vertical_lines,
            0b011 => mask_functions::diagonal_lines,
            0b100 => mask_functions::large_checkerboard,
            0b101 => mask_functions::fields,
            0b110 => mask_functions::diamonds,
            0b111 => mask_functions::meadow,
            _ => unreachable!(),
        }
    }
}

// Mask selection
//------------------------------------------------------------------------------

// Exhaustive search over the 8 patterns; on equal scores the lowest pattern
// index wins since min_by_key keeps the first minimum.
pub fn apply_best_mask(qr: &mut QR) -> MaskPattern {
    let best_mask = (0..8)
        .min_by_key(|m| {
            let mut qr = qr.clone();
            qr.apply_mask(MaskPattern(*m));
            compute_total_penalty(&qr)
        })
        .expect("Should return atleast 1 mask");
    let best_mask = MaskPattern(best_mask);
    qr.apply_mask(best_mask);
    best_mask
}

pub fn compute_total_penalty(qr: &QR) -> u32 {
    let run_pen = compute_run_penalty(qr);
    let blk_pen = compute_block_penalty(qr);
    let fp_pen_h = compute_finder_pattern_penalty(qr, true);
    let fp_pen_v = compute_finder_pattern_penalty(qr, false);
    let bal_pen = compute_balance_penalty(qr);
    run_pen + blk_pen + fp_pen_h + fp_pen_v + bal_pen
}

fn compute_run_penalty(qr: &QR) -> u32 {
    let w = qr.width() as i16;
    let mut pen = 0;
    for i in 0..w {
        pen += line_run_penalty((0..w).map(|j| *qr.get(i, j)));
        pen += line_run_penalty((0..w).map(|j| *qr.get(j, i)));
    }
    pen
}

// A run of exactly 5 scores 3, every module beyond 5 scores 1 more
fn line_run_penalty(line: impl Iterator<Item = Color>) -> u32 {
    let mut pen = 0;
    let mut run_len = 0;
    let mut run_clr = None;
    for clr in line {
        if run_clr == Some(clr) {
            run_len += 1;
        } else {
            run_clr = Some(clr);
            run_len = 1;
        }
        if run_len == 5 {
            pen += 3;
        } else if run_len > 5 {
            pen += 1;
        }
    }
    pen
}

fn compute_block_penalty(qr: &QR) -> u32 {
    let mut pen = 0;
    let w = qr.width() as i16;
    for r in 0..w - 1 {
        for c in 0..w - 1 {
            let clr = *qr.get(r, c);
            if clr == *qr.get(r + 1, c) && clr == *qr.get(r, c + 1) && clr == *qr.get(r + 1, c + 1)
            {
                pen += 3;
            }
        }
    }
    pen
}

fn compute_finder_pattern_penalty(qr: &QR, is_hor: bool) -> u32 {
    static PATTERN: [Color; 7] = [
        Color::Dark,
        Color::Light,
        Color::Dark,
        Color::Dark,
        Color::Dark,
        Color::Light,
        Color::Dark,
    ];
    let w = qr.width() as i16;
    let mut pen = 0;
    for i in 0..w {
        let line: Vec<Color> =
            (0..w).map(|j| if is_hor { *qr.get(i, j) } else { *qr.get(j, i) }).collect();
        for win in line.windows(11) {
            let leading = win[..4].iter().all(|&c| c == Color::Light) && win[4..] == PATTERN;
            let trailing = win[..7] == PATTERN && win[7..].iter().all(|&c| c == Color::Light);
            if leading || trailing {
                pen += 40;
            }
        }
    }
    pen
}

// Deviation of the dark-module share from 50%, in steps of 5 percentage
// points, 10 penalty points per step; the nearer of the two enclosing
// multiples of 5 counts
fn compute_balance_penalty(qr: &QR) -> u32 {
    let dark_cnt = qr.count_dark_modules();
    let w = qr.width();
    let pct = dark_cnt * 100 / (w * w);
    let low = pct - pct % 5;
    let high = if pct % 5 == 0 { low } else { low + 5 };
    let dev = low.abs_diff(50).min(high.abs_diff(50));
    (dev / 5 * 10) as u32
}
