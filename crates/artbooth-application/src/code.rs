//! Scannable code rendering.

use artbooth_core::config::CodeConfig;
use artbooth_core::error::{BoothError, Result};
use image::{ImageBuffer, ImageFormat, Luma};
use qrcode::types::QrError;
use qrcode::{EcLevel, QrCode};
use std::io::Cursor;

const DARK: Luma<u8> = Luma([0]);
const LIGHT: Luma<u8> = Luma([255]);

/// Largest rendered code, in pixels per side.
const MAX_CODE_SIDE: u32 = 8192;

/// Renders references as black-on-white PNG QR codes at EC level M.
#[derive(Debug, Clone, Copy)]
pub struct ScannableCodeRenderer {
    config: CodeConfig,
}

impl ScannableCodeRenderer {
    pub fn new(config: CodeConfig) -> Self {
        Self { config }
    }

    /// Encodes `reference` and returns the PNG bytes.
    ///
    /// Fails with `CodeTooLarge` when the reference is longer than
    /// `max_reference_len` or does not fit in any QR version.
    pub fn render(&self, reference: &str) -> Result<Vec<u8>> {
        let length = reference.len();
        let capacity = self.config.max_reference_len;
        if length > capacity {
            return Err(BoothError::CodeTooLarge { length, capacity });
        }

        let code = QrCode::with_error_correction_level(reference.as_bytes(), EcLevel::M)
            .map_err(|err| match err {
                QrError::DataTooLong => BoothError::CodeTooLarge { length, capacity },
                other => BoothError::internal(format!("QR encoding failed: {}", other)),
            })?;

        let scale = self.config.module_scale.max(1);
        let border = self.config.border;
        let side = u32::try_from(code.width())
            .ok()
            .and_then(|cells| border.checked_mul(2)?.checked_add(cells))
            .and_then(|cells| cells.checked_mul(scale))
            .filter(|side| *side <= MAX_CODE_SIDE)
            .ok_or_else(|| {
                BoothError::config(format!(
                    "code image exceeds {}px per side (module_scale {}, border {})",
                    MAX_CODE_SIDE, scale, border
                ))
            })?;
        // Bounded by `side` above.
        let margin = border * scale;

        let modules = code
            .render::<Luma<u8>>()
            .quiet_zone(false)
            .dark_color(DARK)
            .light_color(LIGHT)
            .module_dimensions(scale, scale)
            .build();

        let mut canvas = ImageBuffer::from_pixel(side, side, LIGHT);
        image::imageops::overlay(&mut canvas, &modules, i64::from(margin), i64::from(margin));

        let mut png = Vec::new();
        canvas
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|err| BoothError::internal(format!("PNG encoding failed: {}", err)))?;
        Ok(png)
    }
}

impl Default for ScannableCodeRenderer {
    fn default() -> Self {
        Self::new(CodeConfig::default())
    }
}
