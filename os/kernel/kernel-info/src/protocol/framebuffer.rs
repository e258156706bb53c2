/// The only framebuffer memory model defined by the protocol: direct colour
/// with per-channel mask size and shift.
pub const MEMORY_MODEL_RGB: u8 = 1;

/// Response to a framebuffer request.
#[repr(C)]
#[derive(Debug)]
pub struct FramebufferResponse {
    /// The revision of the response structure.
    pub revision: u64,
    /// How many framebuffers are present.
    pub framebuffer_count: u64,
    /// Pointer to an array of `framebuffer_count` framebuffer pointers.
    pub framebuffers: *const *const RawFramebuffer,
}

/// A framebuffer as described by the bootloader.
///
/// Only the fields present since response revision 0 are modelled, so a
/// reference to this type never reaches past a revision-0 allocation.
#[repr(C)]
#[derive(Debug)]
pub struct RawFramebuffer {
    /// Linear framebuffer base, a virtual address inside the direct map.
    pub address: *mut u8,
    /// Visible width in **pixels**.
    pub width: u64,
    /// Visible height in **pixels**.
    pub height: u64,
    /// Bytes per scanline.
    pub pitch: u64,
    /// Bits per pixel.
    pub bpp: u16,
    /// See [`MEMORY_MODEL_RGB`].
    pub memory_model: u8,
    pub red_mask_size: u8,
    pub red_mask_shift: u8,
    pub green_mask_size: u8,
    pub green_mask_shift: u8,
    pub blue_mask_size: u8,
    pub blue_mask_shift: u8,
    pub unused: [u8; 7],
    /// Size of the EDID blob in bytes.
    pub edid_size: u64,
    /// Pointer to the EDID blob, or null.
    pub edid: *mut u8,
}
