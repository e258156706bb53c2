//! # Kernel Framebuffer helpers

use kernel_boot::FramebufferView;

/// Fills the whole framebuffer with one color.
///
/// Used as the last-resort diagnostic on a fatal boot error.
///
/// # Safety
/// The framebuffer memory described by `fb` must be mapped and writable.
pub unsafe fn fill_solid(fb: &FramebufferView<'_>, r: u8, g: u8, b: u8) {
    let Ok(pitch) = usize::try_from(fb.pitch()) else {
        return;
    };
    let Ok(width) = usize::try_from(fb.width()) else {
        return;
    };
    let Ok(height) = usize::try_from(fb.height()) else {
        return;
    };
    let bytes_per_pixel = usize::from(fb.bits_per_pixel() / 8);
    let pixel = fb.layout().encode(r, g, b).to_le_bytes();
    let pixel = &pixel[..bytes_per_pixel.min(pixel.len())];

    let Ok(base) = usize::try_from(fb.address().as_u64()) else {
        return;
    };
    let base = core::ptr::with_exposed_provenance_mut::<u8>(base);
    for y in 0..height {
        // SAFETY: validation guarantees `pitch * height` bytes behind `base`.
        let mut dst = unsafe { base.add(y * pitch) };
        for _x in 0..width {
            for (i, &byte) in pixel.iter().enumerate() {
                // SAFETY: `pitch >= width * bytes_per_pixel`.
                unsafe { core::ptr::write_volatile(dst.add(i), byte) };
            }
            // SAFETY: as above.
            dst = unsafe { dst.add(bytes_per_pixel) };
        }
    }
}
