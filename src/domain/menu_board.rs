use std::fmt;

use crate::error::BoardError;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageFormat::Png => write!(f, "PNG"),
            ImageFormat::Jpeg => write!(f, "JPEG"),
        }
    }
}

/// The menu-board photo currently on display. Only the latest upload is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuImage {
    pub label: String,
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

impl MenuImage {
    /// Accepts PNG or JPEG data and reads its pixel dimensions from the header.
    pub fn decode(bytes: Vec<u8>, label: impl Into<String>) -> Result<Self, BoardError> {
        let (format, (width, height)) = if bytes.starts_with(&PNG_SIGNATURE) {
            (ImageFormat::Png, png_dimensions(&bytes)?)
        } else if bytes.starts_with(&[0xFF, 0xD8]) {
            (ImageFormat::Jpeg, jpeg_dimensions(&bytes)?)
        } else {
            return Err(BoardError::Image(
                "unsupported image type (expected PNG or JPEG)".to_string(),
            ));
        };
        if width == 0 || height == 0 {
            return Err(BoardError::Image(format!("{format} has zero dimensions")));
        }
        Ok(Self {
            label: label.into(),
            format,
            width,
            height,
            bytes,
        })
    }

    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }
}

fn be_u16(bytes: &[u8], at: usize) -> Option<u16> {
    bytes.get(at..at + 2).map(|b| u16::from_be_bytes([b[0], b[1]]))
}

fn be_u32(bytes: &[u8], at: usize) -> Option<u32> {
    bytes
        .get(at..at + 4)
        .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
}

// IHDR is always the first chunk: length(4) type(4) width(4) height(4).
fn png_dimensions(bytes: &[u8]) -> Result<(u32, u32), BoardError> {
    if bytes.get(12..16) != Some(b"IHDR".as_slice()) {
        return Err(BoardError::Image("PNG is missing its IHDR chunk".to_string()));
    }
    match (be_u32(bytes, 16), be_u32(bytes, 20)) {
        (Some(width), Some(height)) => Ok((width, height)),
        _ => Err(BoardError::Image("PNG header is truncated".to_string())),
    }
}

fn jpeg_dimensions(bytes: &[u8]) -> Result<(u32, u32), BoardError> {
    let truncated = || BoardError::Image("JPEG header is truncated".to_string());
    let mut pos = 2;
    loop {
        if *bytes.get(pos).ok_or_else(truncated)? != 0xFF {
            return Err(BoardError::Image(format!("JPEG marker expected at byte {pos}")));
        }
        while bytes.get(pos) == Some(&0xFF) {
            pos += 1;
        }
        let marker = *bytes.get(pos).ok_or_else(truncated)?;
        pos += 1;
        match marker {
            // standalone markers carry no length
            0x01 | 0xD0..=0xD7 => continue,
            0xD9 | 0xDA => {
                return Err(BoardError::Image("JPEG has no frame header".to_string()))
            }
            0xC0..=0xCF if !matches!(marker, 0xC4 | 0xC8 | 0xCC) => {
                // length(2) precision(1) height(2) width(2)
                let height = be_u16(bytes, pos + 3).ok_or_else(truncated)?;
                let width = be_u16(bytes, pos + 5).ok_or_else(truncated)?;
                return Ok((u32::from(width), u32::from(height)));
            }
            _ => {
                let len = be_u16(bytes, pos).ok_or_else(truncated)?;
                if len < 2 {
                    return Err(BoardError::Image("JPEG segment length is invalid".to_string()));
                }
                pos += usize::from(len);
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::PNG_SIGNATURE;

    pub fn png(width: u32, height: u32) -> Vec<u8> {
        let mut bytes = PNG_SIGNATURE.to_vec();
        bytes.extend_from_slice(&13u32.to_be_bytes());
        bytes.extend_from_slice(b"IHDR");
        bytes.extend_from_slice(&width.to_be_bytes());
        bytes.extend_from_slice(&height.to_be_bytes());
        bytes.extend_from_slice(&[8, 6, 0, 0, 0]);
        bytes
    }

    pub fn jpeg(width: u16, height: u16) -> Vec<u8> {
        let mut bytes = vec![0xFF, 0xD8];
        // APP0 segment with a 4-byte payload
        bytes.extend_from_slice(&[0xFF, 0xE0, 0x00, 0x06, b'J', b'F', b'I', b'F']);
        bytes.extend_from_slice(&[0xFF, 0xC0, 0x00, 0x11, 0x08]);
        bytes.extend_from_slice(&height.to_be_bytes());
        bytes.extend_from_slice(&width.to_be_bytes());
        bytes.extend_from_slice(&[0x03, 0x01, 0x22, 0x00]);
        bytes.extend_from_slice(&[0xFF, 0xD9]);
        bytes
    }
}
