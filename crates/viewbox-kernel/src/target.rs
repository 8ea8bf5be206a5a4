//! Render-target descriptor and related enumerations.

use serde::{Deserialize, Serialize};

/// Pixel format of the render-target color surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SurfaceFormat {
    /// 8-bit-per-channel RGBA.
    #[default]
    Rgba8,
    /// 8-bit-per-channel BGRA.
    Bgra8,
    /// 16-bit floating point RGBA (HDR intermediate).
    Rgba16Float,
}

/// Depth/stencil attachment format of the render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DepthFormat {
    /// No depth attachment.
    #[default]
    None,
    /// 16-bit depth.
    Depth16,
    /// 24-bit depth.
    Depth24,
    /// 24-bit depth with 8-bit stencil.
    Depth24Stencil8,
}

/// What happens to the render-target contents when it is rebound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TargetUsage {
    /// Contents may be discarded when the target is rebound.
    #[default]
    DiscardContents,
    /// Contents survive rebinding.
    PreserveContents,
}

/// Sampling filter used when blitting the render target to the back
/// buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterMode {
    /// Nearest-neighbor sampling (crisp pixels).
    #[default]
    Point,
    /// Bilinear sampling.
    Linear,
}

/// Creation parameters for the owned render target.
///
/// Each knob has a manager setter that marks the scale transform dirty;
/// the target itself is rebuilt lazily on the next recomputation or draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RenderTargetDesc {
    /// Whether to allocate a mip chain.
    pub mip_map: bool,
    /// Color surface format.
    pub surface_format: SurfaceFormat,
    /// Depth/stencil format.
    pub depth_format: DepthFormat,
    /// Preferred multisample count (0 or 1 disables multisampling).
    pub multisample_count: u32,
    /// Contents policy on rebind.
    pub usage: TargetUsage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desc_defaults() {
        let desc = RenderTargetDesc::default();
        assert!(!desc.mip_map);
        assert_eq!(desc.surface_format, SurfaceFormat::Rgba8);
        assert_eq!(desc.depth_format, DepthFormat::None);
        assert_eq!(desc.multisample_count, 0);
        assert_eq!(desc.usage, TargetUsage::DiscardContents);
    }
}
