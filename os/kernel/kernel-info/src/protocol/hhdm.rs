/// Response to a Higher Half Direct Map request.
#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct HhdmResponse {
    /// The revision of the response structure.
    pub revision: u64,
    /// Virtual address offset of the direct map.
    pub offset: u64,
}
