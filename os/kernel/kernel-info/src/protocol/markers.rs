/// Marks the start of the request section.
#[repr(C)]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct RequestsStartMarker([u64; 4]);

impl RequestsStartMarker {
    #[must_use]
    pub const fn new() -> Self {
        Self([
            0xf6b8_f4b3_9de7_d1ae,
            0xfab9_1a69_40fc_b9cf,
            0x785c_6ed0_15d3_e316,
            0x181e_920a_7852_b9d9,
        ])
    }
}

impl Default for RequestsStartMarker {
    fn default() -> Self {
        Self::new()
    }
}

/// Marks the end of the request section.
#[repr(C)]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct RequestsEndMarker([u64; 2]);

impl RequestsEndMarker {
    #[must_use]
    pub const fn new() -> Self {
        Self([0xadc0_e053_1bb1_0d03, 0x9572_709f_3176_4c62])
    }
}

impl Default for RequestsEndMarker {
    fn default() -> Self {
        Self::new()
    }
}
