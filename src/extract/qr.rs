//! Barcode extraction using rqrr

use std::io::Write;
use std::path::Path;

use image::DynamicImage;
use rqrr::PreparedImage;

use crate::config::PayloadPolicy;
use crate::domain::SerialNumber;
use crate::error::ExtractError;
use crate::journal::Journal;

/// Symbology a payload was decoded from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Symbology {
    Qr,
}

/// Raw bytes recovered from one code in an image
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedPayload {
    pub symbology: Symbology,
    pub data: Vec<u8>,
}

/// A barcode engine: zero or more payloads per image, in engine order
pub trait BarcodeDecoder {
    fn decode(&self, img: &DynamicImage) -> Vec<DecodedPayload>;
}

/// QR decoding backed by rqrr
#[derive(Clone, Copy, Debug, Default)]
pub struct RqrrDecoder;

impl BarcodeDecoder for RqrrDecoder {
    fn decode(&self, img: &DynamicImage) -> Vec<DecodedPayload> {
        let mut prepared = PreparedImage::prepare(img.to_luma8());
        let grids = prepared.detect_grids();
        log::debug!("rqrr detected {} grid(s)", grids.len());

        let mut payloads = Vec::new();
        for grid in grids {
            let mut data = Vec::new();
            match grid.decode_to(&mut data) {
                Ok(_) => payloads.push(DecodedPayload {
                    symbology: Symbology::Qr,
                    data,
                }),
                Err(err) => log::debug!("Skipping undecodable QR grid: {}", err),
            }
        }
        payloads
    }
}

/// Look for a serial number in the barcodes of the image at `path`.
///
/// Any failure is written to the journal at ERROR and reported as not found.
pub fn extract_serial<W: Write>(
    path: &Path,
    decoder: &dyn BarcodeDecoder,
    policy: PayloadPolicy,
    journal: &mut Journal<W>,
) -> Option<SerialNumber> {
    match try_extract_serial(path, decoder, policy, journal) {
        Ok(serial) => serial,
        Err(err) => {
            journal.error(format!(
                "Error processing {} with barcode decoder: {}",
                path.display(),
                err
            ));
            None
        }
    }
}

fn try_extract_serial<W: Write>(
    path: &Path,
    decoder: &dyn BarcodeDecoder,
    policy: PayloadPolicy,
    journal: &mut Journal<W>,
) -> Result<Option<SerialNumber>, ExtractError> {
    let img = image::open(path)?;
    let payloads = decoder.decode(&img);

    if payloads.is_empty() {
        journal.info(format!("No barcode/QR code found in {}", path.display()));
        return Ok(None);
    }

    let inspected = match policy {
        PayloadPolicy::First => &payloads[..1],
        PayloadPolicy::Any => &payloads[..],
    };

    for payload in inspected {
        let text = String::from_utf8(payload.data.clone())?;
        log::debug!(
            "{:?} payload in {}: {}",
            payload.symbology,
            path.display(),
            text
        );

        if let Some(serial) = SerialNumber::from_barcode_text(&text) {
            return Ok(Some(serial));
        }
        journal.info(format!(
            "Could not find a serial number in barcode data from {}",
            path.display()
        ));
    }

    Ok(None)
}

#[cfg(test)]
pub mod testing {
    use super::*;

    /// Decoder that returns the same scripted payloads for every image
    pub struct ScriptedDecoder {
        pub payloads: Vec<Vec<u8>>,
    }

    impl ScriptedDecoder {
        pub fn new(payloads: &[&str]) -> Self {
            Self {
                payloads: payloads.iter().map(|p| p.as_bytes().to_vec()).collect(),
            }
        }

        pub fn empty() -> Self {
            Self {
                payloads: Vec::new(),
            }
        }
    }

    impl BarcodeDecoder for ScriptedDecoder {
        fn decode(&self, _img: &DynamicImage) -> Vec<DecodedPayload> {
            self.payloads
                .iter()
                .map(|data| DecodedPayload {
                    symbology: Symbology::Qr,
                    data: data.clone(),
                })
                .collect()
        }
    }

    /// Write a small blank PNG to `path`
    pub fn write_blank_image(path: &Path) {
        image::GrayImage::from_pixel(32, 32, image::Luma([255]))
            .save(path)
            .expect("write fixture image");
    }

    /// Render `payload` as a QR code, as it would appear on a product label
    pub fn qr_image(payload: &str) -> image::GrayImage {
        const MODULE_PX: u32 = 8;
        const QUIET_ZONE: u32 = 4;

        let code = qrcode::QrCode::new(payload.as_bytes()).expect("payload fits in a QR code");
        let width = code.width() as u32;
        let colors = code.to_colors();
        let side = (width + 2 * QUIET_ZONE) * MODULE_PX;

        image::GrayImage::from_fn(side, side, |x, y| {
            let mx = (x / MODULE_PX).checked_sub(QUIET_ZONE);
            let my = (y / MODULE_PX).checked_sub(QUIET_ZONE);
            match (mx, my) {
                (Some(mx), Some(my)) if mx < width && my < width => {
                    match colors[(my * width + mx) as usize] {
                        qrcode::Color::Dark => image::Luma([0]),
                        qrcode::Color::Light => image::Luma([255]),
                    }
                }
                _ => image::Luma([255]),
            }
        })
    }

    /// Write a QR code image carrying `payload` to `path`
    pub fn write_qr_image(path: &Path, payload: &str) {
        qr_image(payload).save(path).expect("write QR fixture image");
    }
}
