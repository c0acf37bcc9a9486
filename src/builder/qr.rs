use image::{GrayImage, Luma};

use crate::common::{
    bit_utils::BitStream,
    error::{QRError, QRResult},
    iter::EncRegionIter,
    mask::MaskPattern,
    metadata::{
        generate_format_info, Color, ECLevel, Version, FORMAT_INFO_BIT_LEN,
        FORMAT_INFO_COORDS_MAIN, FORMAT_INFO_COORDS_SIDE,
    },
};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Module {
    Empty,
    Func(Color),
    Format(Color),
    Data(Color),
}

impl std::ops::Deref for Module {
    type Target = Color;
    fn deref(&self) -> &Self::Target {
        match self {
            Module::Empty => &Color::Light,
            Module::Func(c) => c,
            Module::Format(c) => c,
            Module::Data(c) => c,
        }
    }
}

#[derive(Debug, Clone)]
pub struct QR {
    grid: Vec<Module>,
    w: usize,
    ver: Version,
    ecl: ECLevel,
    mask: Option<MaskPattern>,
}

// QR type for builder
//------------------------------------------------------------------------------

impl QR {
    pub(crate) fn new(ver: Version, ecl: ECLevel) -> Self {
        let w = ver.width() as usize;
        Self { grid: vec![Module::Empty; w * w], w, ver, ecl, mask: None }
    }

    pub fn version(&self) -> Version {
        self.ver
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn ec_level(&self) -> ECLevel {
        self.ecl
    }

    pub fn mask(&self) -> Option<MaskPattern> {
        self.mask
    }

    pub fn count_dark_modules(&self) -> usize {
        self.grid.iter().filter(|&m| matches!(**m, Color::Dark)).count()
    }

    #[cfg(test)]
    pub fn to_debug_str(&self) -> String {
        let w = self.w as i16;
        let mut res = String::with_capacity((w * (w + 1)) as usize);
        res.push('\n');
        for i in 0..w {
            for j in 0..w {
                let c = match self.get(i, j) {
                    Module::Empty => '.',
                    Module::Func(Color::Dark) => 'f',
                    Module::Func(Color::Light) => 'F',
                    Module::Format(Color::Dark) => 'm',
                    Module::Format(Color::Light) => 'M',
                    Module::Data(Color::Dark) => 'd',
                    Module::Data(Color::Light) => 'D',
                };
                res.push(c);
            }
            res.push('\n');
        }
        res
    }

    fn coord_to_index(&self, r: i16, c: i16) -> usize {
        let w = self.w as i16;
        debug_assert!(-w <= r && r < w, "row should be greater than or equal to -w");
        debug_assert!(-w <= c && c < w, "column should be greater than or equal to -w");

        let r = if r < 0 { r + w } else { r };
        let c = if c < 0 { c + w } else { c };
        (r * w + c) as _
    }

    pub fn get(&self, r: i16, c: i16) -> Module {
        self.grid[self.coord_to_index(r, c)]
    }

    pub fn get_mut(&mut self, r: i16, c: i16) -> &mut Module {
        let index = self.coord_to_index(r, c);
        &mut self.grid[index]
    }

    pub fn set(&mut self, r: i16, c: i16, module: Module) {
        *self.get_mut(r, c) = module;
    }

    /// A reserved module belongs to a function pattern or the format info
    /// area; data placement and masking never touch it.
    pub fn is_reserved(&self, r: i16, c: i16) -> bool {
        !matches!(self.get(r, c), Module::Empty | Module::Data(_))
    }
}


// Finder pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_finder_patterns(&mut self) {
        self.draw_finder_pattern_at(3, 3);
        self.draw_finder_pattern_at(3, -4);
        self.draw_finder_pattern_at(-4, 3);
    }

    // Draws the 8x8 region around the center (r, c): dark 7x7 ring, light
    // 5x5 ring, dark 3x3 core, plus the light separator on the sides facing
    // the symbol interior
    fn draw_finder_pattern_at(&mut self, r: i16, c: i16) {
        let (dr_left, dr_right) = if r > 0 { (-3, 4) } else { (-4, 3) };
        let (dc_top, dc_bottom) = if c > 0 { (-3, 4) } else { (-4, 3) };
        for i in dr_left..=dr_right {
            for j in dc_top..=dc_bottom {
                self.set(
                    r + i,
                    c + j,
                    match (i, j) {
                        (4 | -4, _) | (_, 4 | -4) => Module::Func(Color::Light),
                        (3 | -3, _) | (_, 3 | -3) => Module::Func(Color::Dark),
                        (2 | -2, _) | (_, 2 | -2) => Module::Func(Color::Light),
                        _ => Module::Func(Color::Dark),
                    },
                );
            }
        }
    }
}

#[cfg(test)]
mod finder_pattern_tests {
    use crate::builder::QR;
    use crate::common::metadata::{ECLevel, Version};

    #[test]
    fn test_finder_pattern() {
        let mut qr = QR::new(Version::new(1), ECLevel::L);
        qr.draw_finder_patterns();
        assert_eq!(
            qr.to_debug_str(),
            "\n\
             fffffffF.....Ffffffff\n\
             fFFFFFfF.....FfFFFFFf\n\
             fFfffFfF.....FfFfffFf\n\
             fFfffFfF.....FfFfffFf\n\
             fFfffFfF.....FfFfffFf\n\
             fFFFFFfF.....FfFFFFFf\n\
             fffffffF.....Ffffffff\n\
             FFFFFFFF.....FFFFFFFF\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             FFFFFFFF.............\n\
             fffffffF.............\n\
             fFFFFFfF.............\n\
             fFfffFfF.............\n\
             fFfffFfF.............\n\
             fFfffFfF.............\n\
             fFFFFFfF.............\n\
             fffffffF.............\n"
        );
    }
}

// Timing pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_timing_pattern(&mut self) {
        let w = self.w as i16;
        self.draw_line(6, 8, 6, w - 9);
        self.draw_line(8, 6, w - 9, 6);
    }

    fn draw_line(&mut self, r1: i16, c1: i16, r2: i16, c2: i16) {
        debug_assert!(r1 == r2 || c1 == c2, "Line is neither vertical nor horizontal");

        if r1 == r2 {
            for j in c1..=c2 {
                let m =
                    if j & 1 == 0 { Module::Func(Color::Dark) } else { Module::Func(Color::Light) };
                self.set(r1, j, m);
            }
        } else {
            for i in r1..=r2 {
                let m =
                    if i & 1 == 0 { Module::Func(Color::Dark) } else { Module::Func(Color::Light) };
                self.set(i, c1, m);
            }
        }
    }
}

#[cfg(test)]
mod timing_pattern_tests {
    use crate::builder::QR;
    use crate::common::metadata::{ECLevel, Version};

    #[test]
    fn test_timing_pattern() {
        let mut qr = QR::new(Version::new(1), ECLevel::L);
        qr.draw_timing_pattern();
        assert_eq!(
            qr.to_debug_str(),
            "\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             ........fFfFf........\n\
             .....................\n\
             ......f..............\n\
             ......F..............\n\
             ......f..............\n\
             ......F..............\n\
             ......f..............\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n"
        );
    }
}

// Alignment pattern
//------------------------------------------------------------------------------

impl QR {
    fn draw_alignment_patterns(&mut self) {
        let poses = self.ver.alignment_pattern();
        for &r in poses {
            for &c in poses {
                self.draw_alignment_pattern_at(r, c)
            }
        }
    }

    fn draw_alignment_pattern_at(&mut self, r: i16, c: i16) {
        let w = self.w as i16;
        if (r == 6 && (c == 6 || c - w == -7)) || (r - w == -7 && c == 6) {
            return;
        }
        for i in -2..=2 {
            for j in -2..=2 {
                self.set(
                    r + i,
                    c + j,
                    match (i, j) {
                        (-2 | 2, _) | (_, -2 | 2) | (0, 0) => Module::Func(Color::Dark),
                        _ => Module::Func(Color::Light),
                    },
                )
            }
        }
    }
}


// All function patterns
//------------------------------------------------------------------------------

impl QR {
    pub(crate) fn draw_all_function_patterns(&mut self) {
        self.draw_finder_patterns();
        self.draw_timing_pattern();
        self.draw_alignment_patterns();
    }
}

#[cfg(test)]
mod all_function_patterns_test {
    use crate::builder::QR;
    use crate::common::metadata::{ECLevel, Version};

    #[test]
    fn test_all_function_patterns() {
        let mut qr = QR::new(Version::new(3), ECLevel::L);
        qr.draw_all_function_patterns();
        assert_eq!(
            qr.to_debug_str(),
            "\n\
             fffffffF.............Ffffffff\n\
             fFFFFFfF.............FfFFFFFf\n\
             fFfffFfF.............FfFfffFf\n\
             fFfffFfF.............FfFfffFf\n\
             fFfffFfF.............FfFfffFf\n\
             fFFFFFfF.............FfFFFFFf\n\
             fffffffFfFfFfFfFfFfFfFfffffff\n\
             FFFFFFFF.............FFFFFFFF\n\
             ......f......................\n\
             ......F......................\n\
             ......f......................\n\
             ......F......................\n\
             ......f......................\n\
             ......F......................\n\
             ......f......................\n\
             ......F......................\n\
             ......f......................\n\
             ......F......................\n\
             ......f......................\n\
             ......F......................\n\
             ......f.............fffff....\n\
             FFFFFFFF............fFFFf....\n\
             fffffffF............fFfFf....\n\
             fFFFFFfF............fFFFf....\n\
             fFfffFfF............fffff....\n\
             fFfffFfF.....................\n\
             fFfffFfF.....................\n\
             fFFFFFfF.....................\n\
             fffffffF.....................\n"
        );
    }
}

// Format info
//------------------------------------------------------------------------------

impl QR {
    pub(crate) fn reserve_format_area(&mut self) {
        self.draw_format_info((1 << FORMAT_INFO_BIT_LEN) - 1);
    }

    fn draw_format_info(&mut self, format_info: u32) {
        self.draw_number(
            format_info,
            FORMAT_INFO_BIT_LEN,
            Module::Format(Color::Light),
            Module::Format(Color::Dark),
            &FORMAT_INFO_COORDS_MAIN,
        );
        self.draw_number(
            format_info,
            FORMAT_INFO_BIT_LEN,
            Module::Format(Color::Light),
            Module::Format(Color::Dark),
            &FORMAT_INFO_COORDS_SIDE,
        );
        // The dark module sits above the bottom-left finder, next to the
        // side copy of the format info
        self.set(-8, 8, Module::Format(Color::Dark));
    }

    fn draw_number(
        &mut self,
        number: u32,
        bit_len: usize,
        off_clr: Module,
        on_clr: Module,
        coords: &[(i16, i16)],
    ) {
        let mut mask = 1 << (bit_len - 1);
        for (r, c) in coords {
            if number & mask == 0 {
                self.set(*r, *c, off_clr);
            } else {
                self.set(*r, *c, on_clr);
            }
            mask >>= 1;
        }
    }
}

#[cfg(test)]
mod qr_information_tests {
    use crate::builder::QR;
    use crate::common::metadata::{ECLevel, Version};

    #[test]
    fn test_reserve_format_info() {
        let mut qr = QR::new(Version::new(1), ECLevel::L);
        qr.reserve_format_area();
        assert_eq!(
            qr.to_debug_str(),
            "\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             .....................\n\
             ........m............\n\
             mmmmmm.mm....mmmmmmmm\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             ........m............\n\
             ........m............\n"
        );
    }
}

// Encoding region
//------------------------------------------------------------------------------

impl QR {
    pub(crate) fn draw_encoding_region(&mut self, payload: BitStream) -> QRResult<()> {
        self.reserve_format_area();
        self.draw_payload(payload)?;

        if self.grid.contains(&Module::Empty) {
            return Err(QRError::CapacityMismatch);
        }
        Ok(())
    }

    fn draw_payload(&mut self, payload: BitStream) -> QRResult<()> {
        let mut coords = EncRegionIter::new(self.ver);
        'bits: for bit in payload {
            let module = Module::Data(if bit { Color::Dark } else { Color::Light });
            for (r, c) in coords.by_ref() {
                if matches!(self.get(r, c), Module::Empty) {
                    self.set(r, c, module);
                    continue 'bits;
                }
            }
            // The walk ran out of cells with payload bits left over
            return Err(QRError::CapacityMismatch);
        }
        self.fill_remainder_bits(&mut coords);
        Ok(())
    }

    fn fill_remainder_bits(&mut self, coords: impl Iterator<Item = (i16, i16)>) {
        let n = self.ver.remainder_bits();
        for (r, c) in coords.take(n) {
            if matches!(self.get(r, c), Module::Empty) {
                self.set(r, c, Module::Data(Color::Light));
            }
        }
    }

    pub(crate) fn apply_mask(&mut self, pattern: MaskPattern) {
        self.mask = Some(pattern);
        let mask_fn = pattern.mask_function();
        let w = self.w as i16;
        for r in 0..w {
            for c in 0..w {
                if mask_fn(r, c) {
                    if let Module::Data(clr) = self.get(r, c) {
                        self.set(r, c, Module::Data(!clr))
                    }
                }
            }
        }
        let format_info = generate_format_info(self.ecl, pattern);
        self.draw_format_info(format_info);
    }
}

// Render
//------------------------------------------------------------------------------

impl QR {
    pub fn to_image(&self, module_sz: u32) -> GrayImage {
        let qz_sz = QUIET_ZONE_WIDTH as u32 * module_sz;
        let qr_sz = self.w as u32 * module_sz;
        let total_sz = qz_sz + qr_sz + qz_sz;

        let mut canvas = GrayImage::new(total_sz, total_sz);
        for i in 0..total_sz {
            for j in 0..total_sz {
                if i < qz_sz || i >= qz_sz + qr_sz || j < qz_sz || j >= qz_sz + qr_sz {
                    canvas.put_pixel(j, i, Luma([255]));
                    continue;
                }
                let r = (i - qz_sz) / module_sz;
                let c = (j - qz_sz) / module_sz;

                let pixel = self.module_color(r as i16, c as i16).select(Luma([0]), Luma([255]));
                canvas.put_pixel(j, i, pixel);
            }
        }

        canvas
    }

    pub fn to_str(&self, module_sz: usize) -> String {
        let qz_sz = QUIET_ZONE_WIDTH * module_sz;
        let qr_sz = self.w * module_sz;
        let total_sz = qz_sz + qr_sz + qz_sz;

        let mut canvas = String::new();
        for i in 0..total_sz {
            for j in 0..total_sz {
                if i < qz_sz || i >= qz_sz + qr_sz || j < qz_sz || j >= qz_sz + qr_sz {
                    canvas.push('█');
                    continue;
                }
                let r = ((i - qz_sz) / module_sz) as i16;
                let c = ((j - qz_sz) / module_sz) as i16;
                canvas.push(self.module_color(r, c).select(' ', '█'));
            }
            canvas.push('\n');
        }

        canvas
    }

    /// Module matrix with the quiet zone included; `true` marks a dark
    /// module. Suitable for handing to an external renderer.
    pub fn to_grid(&self) -> Vec<Vec<bool>> {
        let total_sz = self.w + 2 * QUIET_ZONE_WIDTH;
        let mut rows = vec![vec![false; total_sz]; total_sz];
        for r in 0..self.w {
            for c in 0..self.w {
                rows[r + QUIET_ZONE_WIDTH][c + QUIET_ZONE_WIDTH] =
                    self.module_color(r as i16, c as i16) == Color::Dark;
            }
        }
        rows
    }

    fn module_color(&self, r: i16, c: i16) -> Color {
        match self.get(r, c) {
            Module::Func(c) | Module::Format(c) | Module::Data(c) => c,
            Module::Empty => panic!("Empty module found at: {r} {c}"),
        }
    }
}

#[cfg(test)]
mod render_tests {
    use crate::builder::QRBuilder;
    use crate::common::metadata::{ECLevel, Version};

    #[test]
    fn test_to_grid_has_quiet_zone() {
        let qr = QRBuilder::new(b"HELLO WORLD")
            .version(Version::new(1))
            .ec_level(ECLevel::L)
            .build()
            .unwrap();
        let grid = qr.to_grid();
        assert_eq!(grid.len(), 21 + 8);
        assert!(grid.iter().all(|row| row.len() == 21 + 8));
        assert!(grid[..4].iter().flatten().all(|&dark| !dark));
        assert!(grid.iter().all(|row| row[..4].iter().all(|&dark| !dark)));
        // Top-left corner of the finder pattern
        assert!(grid[4][4]);
    }

    #[test]
    fn test_to_image_dimensions() {
        let qr = QRBuilder::new(b"HELLO WORLD")
            .version(Version::new(1))
            .ec_level(ECLevel::L)
            .build()
            .unwrap();
        let img = qr.to_image(2);
        assert_eq!(img.dimensions(), ((21 + 8) * 2, (21 + 8) * 2));
    }
}

// Global constants
//------------------------------------------------------------------------------

pub(crate) const QUIET_ZONE_WIDTH: usize = 4;
