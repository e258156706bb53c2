//! # Framebuffer descriptor
//!
//! The bootloader hands over a list of linear framebuffers. The kernel uses
//! the first one and only accepts direct-color (RGB memory model) modes whose
//! geometry is internally consistent.

use crate::error::{Malformation, ValidationError};
use crate::window::ResponseWindow;
use bitfield_struct::bitfield;
use kernel_info::protocol::{FramebufferResponse, MEMORY_MODEL_RGB, RawFramebuffer};
use kernel_memory_addresses::{DirectMapOffset, PhysicalAddress, VirtualAddress};
use utils_accessors_derive::Getters;

/// Size and position of the three color channels inside a pixel.
///
/// Packed into a single `u64`: red, green and blue size/shift bytes,
/// followed by 16 reserved bits.
#[bitfield(u64)]
#[derive(PartialEq, Eq)]
pub struct PixelLayout {
    pub red_size: u8,
    pub red_shift: u8,
    pub green_size: u8,
    pub green_shift: u8,
    pub blue_size: u8,
    pub blue_shift: u8,
    #[bits(16)]
    __: u16,
}

impl PixelLayout {
    fn from_raw(raw: &RawFramebuffer) -> Self {
        Self::new()
            .with_red_size(raw.red_mask_size)
            .with_red_shift(raw.red_mask_shift)
            .with_green_size(raw.green_mask_size)
            .with_green_shift(raw.green_mask_shift)
            .with_blue_size(raw.blue_mask_size)
            .with_blue_shift(raw.blue_mask_shift)
    }

    const fn channels(self) -> [(u8, u8); 3] {
        [
            (self.red_size(), self.red_shift()),
            (self.green_size(), self.green_shift()),
            (self.blue_size(), self.blue_shift()),
        ]
    }

    /// Encodes an 8-bit-per-channel color into a pixel value of this layout.
    ///
    /// Channels narrower than eight bits keep their most significant bits.
    #[must_use]
    pub fn encode(self, r: u8, g: u8, b: u8) -> u32 {
        [r, g, b]
            .into_iter()
            .zip(self.channels())
            .fold(0, |pixel, (value, (size, shift))| {
                let size = u32::from(size.min(8));
                let value = u32::from(value) >> (8 - size);
                pixel | value.checked_shl(u32::from(shift)).unwrap_or(0)
            })
    }
}

/// How color channels are laid out in memory.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PixelFormat {
    /// 8:8:8, stored as R,G,B in low-to-high bytes.
    Rgb,
    /// 8:8:8, stored as B,G,R in low-to-high bytes.
    Bgr,
    /// Any other direct-color layout; see [`PixelLayout`].
    Bitmask,
}

impl PixelFormat {
    fn classify(layout: PixelLayout) -> Self {
        let sizes = [layout.red_size(), layout.green_size(), layout.blue_size()];
        if sizes != [8, 8, 8] || layout.green_shift() != 8 {
            return Self::Bitmask;
        }
        match (layout.red_shift(), layout.blue_shift()) {
            (0, 16) => Self::Rgb,
            (16, 0) => Self::Bgr,
            _ => Self::Bitmask,
        }
    }
}

/// A validated framebuffer, still living in bootloader memory.
#[derive(Debug, Copy, Clone)]
pub struct FramebufferView<'w> {
    raw: &'w RawFramebuffer,
    layout: PixelLayout,
    format: PixelFormat,
}

impl<'w> FramebufferView<'w> {
    pub(crate) fn inspect(
        window: &'w ResponseWindow,
        response: &'w FramebufferResponse,
    ) -> Result<Self, ValidationError> {
        if response.framebuffer_count == 0 {
            // Headless boot: the bootloader answered, but has nothing to offer.
            return Err(ValidationError::Missing);
        }
        if response.framebuffers.is_null() {
            return Err(Malformation::NullFramebuffer.into());
        }

        // SAFETY: the array is non-null, holds `framebuffer_count` pointers
        // and is covered by the window.
        let framebuffers = unsafe { window.borrow_slice(response.framebuffers, 1) };
        // SAFETY: a non-null entry points to a framebuffer covered by the window.
        let raw = unsafe { window.borrow(framebuffers[0]) }.ok_or(Malformation::NullFramebuffer)?;
        Ok(Self::check(raw)?)
    }

    fn check(raw: &'w RawFramebuffer) -> Result<Self, Malformation> {
        if raw.address.is_null() {
            return Err(Malformation::NullFramebufferAddress);
        }
        if raw.width == 0 || raw.height == 0 {
            return Err(Malformation::EmptyFramebufferGeometry);
        }
        if raw.bpp == 0 || raw.bpp % 8 != 0 {
            return Err(Malformation::BitsPerPixel(raw.bpp));
        }

        let row = raw
            .width
            .checked_mul(u64::from(raw.bpp / 8))
            .ok_or(Malformation::PitchOverflow)?;
        if raw.pitch < row {
            return Err(Malformation::PitchTooSmall {
                pitch: raw.pitch,
                row,
            });
        }
        let span = raw
            .pitch
            .checked_mul(raw.height)
            .ok_or(Malformation::PitchOverflow)?;
        if VirtualAddress::from_ptr(raw.address)
            .as_u64()
            .checked_add(span)
            .is_none()
        {
            return Err(Malformation::PitchOverflow);
        }

        if raw.memory_model != MEMORY_MODEL_RGB {
            return Err(Malformation::UnsupportedMemoryModel(raw.memory_model));
        }
        let layout = PixelLayout::from_raw(raw);
        let fits = layout
            .channels()
            .iter()
            .all(|&(size, shift)| u16::from(size) + u16::from(shift) <= raw.bpp);
        if !fits {
            return Err(Malformation::ChannelOutOfRange { bpp: raw.bpp });
        }

        Ok(Self {
            raw,
            layout,
            format: PixelFormat::classify(layout),
        })
    }

    #[must_use]
    pub fn address(&self) -> VirtualAddress {
        VirtualAddress::from_ptr(self.raw.address)
    }

    #[must_use]
    pub const fn width(&self) -> u64 {
        self.raw.width
    }

    #[must_use]
    pub const fn height(&self) -> u64 {
        self.raw.height
    }

    /// Bytes per scanline.
    #[must_use]
    pub const fn pitch(&self) -> u64 {
        self.raw.pitch
    }

    #[must_use]
    pub const fn bits_per_pixel(&self) -> u16 {
        self.raw.bpp
    }

    #[must_use]
    pub const fn layout(&self) -> PixelLayout {
        self.layout
    }

    #[must_use]
    pub const fn format(&self) -> PixelFormat {
        self.format
    }

    /// Copies the descriptor out of bootloader memory, recovering the
    /// physical address through the direct map.
    ///
    /// # Errors
    /// [`Malformation::FramebufferOutsideDirectMap`] if the framebuffer is not
    /// mapped through `direct_map`.
    pub(crate) fn place(self, direct_map: DirectMapOffset) -> Result<Framebuffer, Malformation> {
        let address = self.address();
        let physical = direct_map
            .virt_to_phys(address)
            .ok_or(Malformation::FramebufferOutsideDirectMap(address.as_u64()))?;
        Ok(Framebuffer {
            address,
            physical,
            width: self.width(),
            height: self.height(),
            pitch: self.pitch(),
            bits_per_pixel: self.bits_per_pixel(),
            format: self.format,
            layout: self.layout,
        })
    }
}

/// The framebuffer as handed to the console driver.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Getters)]
pub struct Framebuffer {
    /// Where the bootloader mapped the framebuffer (inside the direct map).
    #[getters(copy)]
    address: VirtualAddress,
    #[getters(copy)]
    physical: PhysicalAddress,
    #[getters(copy)]
    width: u64,
    #[getters(copy)]
    height: u64,
    /// Bytes per scanline; at least `width * bytes_per_pixel()`.
    #[getters(copy)]
    pitch: u64,
    #[getters(copy)]
    bits_per_pixel: u16,
    #[getters(copy)]
    format: PixelFormat,
    #[getters(copy)]
    layout: PixelLayout,
}

impl Framebuffer {
    #[must_use]
    pub const fn bytes_per_pixel(&self) -> u16 {
        self.bits_per_pixel / 8
    }

    /// Total size of the pixel memory in bytes.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.pitch * self.height
    }
}

/// Either a usable framebuffer or an explicit "no display" state.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FramebufferState {
    Available(Framebuffer),
    Absent,
}

impl FramebufferState {
    #[must_use]
    pub const fn available(&self) -> Option<&Framebuffer> {
        match self {
            Self::Available(fb) => Some(fb),
            Self::Absent => None,
        }
    }

    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}
