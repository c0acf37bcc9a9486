//! # qrsmith
//!
//! A Rust library for generating QR code symbols with Reed-Solomon error
//! correction. Covers the single-block QR configurations (versions 1-5,
//! depending on error correction level) with numeric, alphanumeric and byte
//! mode encoding, automatic mask selection and format info generation.
//!
//! ## Quick Start
//!
//! ```rust
//! use qrsmith::QRBuilder;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Simplest usage - provide only data, all other settings are automatically chosen
//! let qr = QRBuilder::new(b"HELLO WORLD").build()?;
//!
//! let img = qr.to_image(4); // 4x scale factor
//! img.save("simple_qr.png")?;
//! # std::fs::remove_file("simple_qr.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Full Configuration
//!
//! ```rust
//! use qrsmith::{ECLevel, MaskPattern, Mode, QRBuilder, Version};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = QRBuilder::new(b"HELLO WORLD")
//!     .version(Version::new(2))     // QR version (size) - if not provided, finds smallest version to fit data
//!     .ec_level(ECLevel::M)         // Error correction level - if not provided, defaults to ECLevel::M
//!     .mode(Mode::Alphanumeric)     // Encoding mode - if not provided, finds tightest mode for the data
//!     .mask(MaskPattern::new(3))    // Mask pattern - if not provided, finds best mask based on penalty score
//!     .build()?;
//!
//! println!("{}", qr.to_str(1));
//! # Ok(())
//! # }
//! ```
//!
//! ## Components
//!
//! - **Versions**: 1-5, single error correction block only. The capacity
//!   lookup decides which (version, EC level) pairs are available; pairs
//!   that would need block interleaving are rejected up front.
//! - **Error correction levels**: L (~7%), M (~15%), Q (~25%), H (~30%).
//! - **Output**: a module grid with a 4-module quiet zone, rendered as a
//!   grayscale image, a terminal string or a plain boolean matrix.

#![allow(clippy::items_after_test_module)]

pub mod builder;
pub(crate) mod common;

pub use builder::{Module, QRBuilder, QR};
pub use common::codec::Mode;
pub use common::error::{QRError, QRResult};
pub use common::mask::MaskPattern;
pub use common::metadata::{Capacity, CapacityTable, ECLevel, Version};
