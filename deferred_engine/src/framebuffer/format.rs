/// Attachment format resolution
///
/// Maps an internal pixel format to the (channel layout, storage datatype)
/// pair used to allocate the attachment image. Only three families are
/// supported:
///
/// | Family | Formats                          | Layout  |
/// |--------|----------------------------------|---------|
/// | RGB    | RGB16F, RGB16UI, RGB32F, RGB32UI | `Rgb`   |
/// | RGBA   | RGBA16F, RGBA16UI, RGBA32F, RGBA32UI | `Rgba` |
/// | Depth  | D32F                             | `Depth` |
///
/// Everything else resolves to `Error::UnsupportedFormat`.

use crate::error::{Error, Result};
use crate::graphics_device::{ChannelLayout, PixelFormat, StorageDatatype};

/// Layout and datatype of a supported attachment format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResolvedFormat {
    pub layout: ChannelLayout,
    pub datatype: StorageDatatype,
}

impl ResolvedFormat {
    /// Returns true for the depth family
    pub fn is_depth(&self) -> bool {
        self.layout == ChannelLayout::Depth
    }
}

/// Channel layout of a supported format
pub fn channel_layout(format: PixelFormat) -> Option<ChannelLayout> {
    match format {
        PixelFormat::R16G16B16_SFLOAT
        | PixelFormat::R16G16B16_UINT
        | PixelFormat::R32G32B32_SFLOAT
        | PixelFormat::R32G32B32_UINT => Some(ChannelLayout::Rgb),

        PixelFormat::R16G16B16A16_SFLOAT
        | PixelFormat::R16G16B16A16_UINT
        | PixelFormat::R32G32B32A32_SFLOAT
        | PixelFormat::R32G32B32A32_UINT => Some(ChannelLayout::Rgba),

        PixelFormat::D32_SFLOAT => Some(ChannelLayout::Depth),

        PixelFormat::D16_UNORM
        | PixelFormat::D24_UNORM_S8_UINT
        | PixelFormat::R8G8B8A8_UNORM
        | PixelFormat::R8G8B8A8_SRGB
        | PixelFormat::R32_SFLOAT => None,
    }
}

/// Storage datatype of a supported format
pub fn storage_datatype(format: PixelFormat) -> Option<StorageDatatype> {
    match format {
        PixelFormat::R16G16B16_SFLOAT | PixelFormat::R16G16B16A16_SFLOAT => {
            Some(StorageDatatype::HalfFloat)
        }

        PixelFormat::R32G32B32_SFLOAT
        | PixelFormat::R32G32B32A32_SFLOAT
        | PixelFormat::D32_SFLOAT => Some(StorageDatatype::Float),

        PixelFormat::R16G16B16_UINT | PixelFormat::R16G16B16A16_UINT => {
            Some(StorageDatatype::UnsignedShort)
        }

        PixelFormat::R32G32B32_UINT | PixelFormat::R32G32B32A32_UINT => {
            Some(StorageDatatype::UnsignedInt)
        }

        PixelFormat::D16_UNORM
        | PixelFormat::D24_UNORM_S8_UINT
        | PixelFormat::R8G8B8A8_UNORM
        | PixelFormat::R8G8B8A8_SRGB
        | PixelFormat::R32_SFLOAT => None,
    }
}

/// Resolve `format` to its layout and datatype
///
/// Pure: performs no allocation and no logging.
///
/// # Errors
///
/// `Error::UnsupportedFormat` if `format` is outside the RGB, RGBA and
/// depth families.
pub fn resolve(format: PixelFormat) -> Result<ResolvedFormat> {
    match (channel_layout(format), storage_datatype(format)) {
        (Some(layout), Some(datatype)) => Ok(ResolvedFormat { layout, datatype }),
        _ => Err(Error::UnsupportedFormat(format)),
    }
}

#[cfg(test)]
#[path = "format_tests.rs"]
mod tests;
