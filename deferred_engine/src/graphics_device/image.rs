/// Image handle, pixel formats, image descriptor and image info

use slotmap::new_key_type;

new_key_type! {
    /// Handle to a GPU 2D image owned by the device
    pub struct ImageHandle;
}

/// Internal (sized) pixel format of a GPU image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum PixelFormat {
    // RGB formats
    R16G16B16_SFLOAT,
    R16G16B16_UINT,
    R32G32B32_SFLOAT,
    R32G32B32_UINT,

    // RGBA formats
    R16G16B16A16_SFLOAT,
    R16G16B16A16_UINT,
    R32G32B32A32_SFLOAT,
    R32G32B32A32_UINT,

    // Depth formats
    D16_UNORM,
    D24_UNORM_S8_UINT,
    D32_SFLOAT,

    // Normalized / single channel formats
    R8G8B8A8_UNORM,
    R8G8B8A8_SRGB,
    R32_SFLOAT,
}

impl PixelFormat {
    /// Every format the device knows about
    pub const ALL: [PixelFormat; 14] = [
        PixelFormat::R16G16B16_SFLOAT,
        PixelFormat::R16G16B16_UINT,
        PixelFormat::R32G32B32_SFLOAT,
        PixelFormat::R32G32B32_UINT,
        PixelFormat::R16G16B16A16_SFLOAT,
        PixelFormat::R16G16B16A16_UINT,
        PixelFormat::R32G32B32A32_SFLOAT,
        PixelFormat::R32G32B32A32_UINT,
        PixelFormat::D16_UNORM,
        PixelFormat::D24_UNORM_S8_UINT,
        PixelFormat::D32_SFLOAT,
        PixelFormat::R8G8B8A8_UNORM,
        PixelFormat::R8G8B8A8_SRGB,
        PixelFormat::R32_SFLOAT,
    ];

    /// Returns true for depth and depth/stencil formats
    pub fn is_depth_format(&self) -> bool {
        matches!(
            self,
            PixelFormat::D16_UNORM | PixelFormat::D24_UNORM_S8_UINT | PixelFormat::D32_SFLOAT
        )
    }
}

/// Channel layout of the pixel data (client-side format)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelLayout {
    Rgb,
    Rgba,
    Depth,
}

/// Storage datatype of each channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageDatatype {
    /// 16-bit floating point
    HalfFloat,
    /// 32-bit floating point
    Float,
    /// 16-bit unsigned integer
    UnsignedShort,
    /// 32-bit unsigned integer
    UnsignedInt,
}

/// Minification / magnification filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFilter {
    Nearest,
    Linear,
}

/// Texture coordinate wrap mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageWrap {
    Repeat,
    ClampToEdge,
}

/// Sampler state applied to an image (min/mag filter, S/T wrap)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerState {
    pub filter: ImageFilter,
    pub wrap: ImageWrap,
}

impl Default for SamplerState {
    /// Linear filtering, clamped to the edge
    fn default() -> Self {
        Self {
            filter: ImageFilter::Linear,
            wrap: ImageWrap::ClampToEdge,
        }
    }
}

/// Descriptor for creating a GPU 2D image
#[derive(Debug, Clone)]
pub struct ImageDesc {
    /// Debug label
    pub label: String,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Internal pixel format
    pub format: PixelFormat,
    /// Channel layout
    pub layout: ChannelLayout,
    /// Channel storage datatype
    pub datatype: StorageDatatype,
    /// Sampling filter (min and mag)
    pub filter: ImageFilter,
    /// Wrap mode (S and T)
    pub wrap: ImageWrap,
}

/// Read-only properties of a created image
#[derive(Debug, Clone, PartialEq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub layout: ChannelLayout,
    pub datatype: StorageDatatype,
    pub filter: ImageFilter,
    pub wrap: ImageWrap,
}

impl From<&ImageDesc> for ImageInfo {
    fn from(desc: &ImageDesc) -> Self {
        Self {
            width: desc.width,
            height: desc.height,
            format: desc.format,
            layout: desc.layout,
            datatype: desc.datatype,
            filter: desc.filter,
            wrap: desc.wrap,
        }
    }
}
