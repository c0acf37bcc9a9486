use std::error::Error;

use qrsmith::{ECLevel, QRBuilder, Version};

fn main() -> Result<(), Box<dyn Error>> {
    let data = "HELLO WORLD";

    let qr = QRBuilder::new(data.as_bytes())
        .version(Version::new(1))
        .ec_level(ECLevel::L)
        .build()?;
    println!("{}", qr.to_str(1));

    Ok(())
}
