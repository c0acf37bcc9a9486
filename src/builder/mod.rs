mod qr;

pub use qr::{Module, QR};

use crate::common::{
    bit_utils::BitStream,
    codec::{detect_mode, encode_to_bitstream, encoded_segment_len, Mode},
    ec::Block,
    error::{QRError, QRResult},
    mask::{apply_best_mask, MaskPattern},
    metadata::{CapacityTable, ECLevel, Version},
};

pub struct QRBuilder<'a> {
    data: &'a [u8],
    mode: Option<Mode>,
    version: Option<Version>,
    ec_level: ECLevel,
    mask: Option<MaskPattern>,
    capacities: &'a CapacityTable,
}

impl<'a> QRBuilder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            mode: None,
            version: None,
            ec_level: ECLevel::M,
            mask: None,
            capacities: CapacityTable::standard(),
        }
    }

    pub fn data(&mut self, data: &'a [u8]) -> &mut Self {
        self.data = data;
        self
    }

    pub fn mode(&mut self, mode: Mode) -> &mut Self {
        self.mode = Some(mode);
        self
    }

    pub fn version(&mut self, version: Version) -> &mut Self {
        self.version = Some(version);
        self
    }

    pub fn unset_version(&mut self) -> &mut Self {
        self.version = None;
        self
    }

    pub fn ec_level(&mut self, ec_level: ECLevel) -> &mut Self {
        self.ec_level = ec_level;
        self
    }

    pub fn mask(&mut self, mask: MaskPattern) -> &mut Self {
        self.mask = Some(mask);
        self
    }

    /// Swap in an alternate codeword capacity table. Defaults to the
    /// standard single-block table.
    pub fn capacities(&mut self, capacities: &'a CapacityTable) -> &mut Self {
        self.capacities = capacities;
        self
    }

    pub fn metadata(&self) -> String {
        match self.version {
            Some(v) => format!("{{ Version: {}, Ec level: {:?} }}", *v, self.ec_level),
            None => format!("{{ Version: None, Ec level: {:?} }}", self.ec_level),
        }
    }
}


impl QRBuilder<'_> {
    pub fn build(&self) -> QRResult<QR> {
        println!("\nGenerating QR {}...", self.metadata());
        if self.data.is_empty() {
            return Err(QRError::EmptyData);
        }

        let mode = match self.mode {
            Some(m) => m,
            None => detect_mode(self.data),
        };

        let version = match self.version {
            Some(v) => v,
            None => {
                println!("Finding best version...");
                self.find_smallest_version(mode)?
            }
        };

        let capacity =
            *self.capacities.get(version, self.ec_level).ok_or(QRError::UnsupportedConfiguration)?;

        println!("Encoding data...");
        let encoded =
            encode_to_bitstream(self.data, mode, version, capacity.data_codewords << 3)?;

        println!("Computing error correction codewords...");
        let block = Block::new(encoded.data(), capacity.total_codewords);
        let mut payload = BitStream::new(capacity.total_codewords << 3);
        payload.extend(block.full());

        println!("Constructing QR...");
        let mut qr = QR::new(version, self.ec_level);
        qr.draw_all_function_patterns();
        qr.draw_encoding_region(payload)?;

        let mask = match self.mask {
            Some(m) => {
                println!("Applying mask {}...", *m);
                qr.apply_mask(m);
                m
            }
            None => {
                println!("Finding & applying best mask...");
                apply_best_mask(&mut qr)
            }
        };

        let total_modules = qr.width() * qr.width();
        let dark_modules = qr.count_dark_modules();
        let light_modules = total_modules - dark_modules;

        println!("Report:");
        println!(
            "Version: {}, Ec level: {:?}, Mode: {:?}, Mask: {}",
            *version, self.ec_level, mode, *mask
        );
        println!(
            "Data codewords: {}, Ec codewords: {}",
            capacity.data_codewords, capacity.ec_codewords
        );
        println!(
            "Dark cells: {}, Light cells: {}, Balance: {}%\n",
            dark_modules,
            light_modules,
            dark_modules * 100 / total_modules
        );

        Ok(qr)
    }

    fn find_smallest_version(&self, mode: Mode) -> QRResult<Version> {
        for version in self.capacities.versions() {
            let Some(capacity) = self.capacities.get(version, self.ec_level) else {
                continue;
            };
            let seg_len = encoded_segment_len(self.data.len(), mode, version);
            let char_count_fits = self.data.len() < 1 << mode.char_count_bits(version);
            if char_count_fits && seg_len <= capacity.data_codewords << 3 {
                return Ok(version);
            }
        }
        Err(QRError::DataTooLong)
    }
}
