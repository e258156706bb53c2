//! End-to-end boots against responses laid out the way a bootloader leaves
//! them in memory.

use kernel_boot::{
    BootError, BootInfo, FramebufferState, MAX_MEMORY_REGIONS, Malformation, MemoryRegionKind,
    Necessity, NegotiationConfig, PixelFormat, RequestTable, ResponseWindow, RevisionOutcome,
    ValidationError, adapt, boot_info, collect, negotiate, validate,
};
use kernel_info::protocol::{
    BaseRevision, DirectMapRequest, FeatureKind, FramebufferRequest, FramebufferResponse,
    HhdmResponse, MEMORY_MODEL_RGB, MemoryMapEntry, MemoryMapEntryType, MemoryMapRequest,
    MemoryMapResponse, RawFramebuffer,
};
use kernel_memory_addresses::{DirectMapOffset, PhysicalAddress};
use std::ptr;

const HHDM: u64 = 0xffff_8000_0000_0000;
const FRAMEBUFFER_PHYS: u64 = 0xfd00_0000;

fn leak<T>(value: T) -> *const T {
    Box::leak(Box::new(value))
}

fn hhdm(offset: u64) -> *const HhdmResponse {
    leak(HhdmResponse {
        revision: 0,
        offset,
    })
}

fn memory_map(entries: &[MemoryMapEntry]) -> *const MemoryMapResponse {
    let pointers = entries
        .iter()
        .map(|&entry| leak(entry))
        .collect::<Vec<_>>()
        .leak();
    leak(MemoryMapResponse {
        revision: 0,
        entry_count: pointers.len() as u64,
        entries: pointers.as_ptr(),
    })
}

fn framebuffer(raw: RawFramebuffer) -> *const FramebufferResponse {
    let pointers = vec![leak(raw)].leak();
    leak(FramebufferResponse {
        revision: 0,
        framebuffer_count: 1,
        framebuffers: pointers.as_ptr(),
    })
}

/// A 1024x768 32-bpp BGR mode mapped through the direct map.
fn raw_framebuffer() -> RawFramebuffer {
    let address = usize::try_from(HHDM + FRAMEBUFFER_PHYS).unwrap();
    RawFramebuffer {
        address: ptr::without_provenance_mut(address),
        width: 1024,
        height: 768,
        pitch: 4096,
        bpp: 32,
        memory_model: MEMORY_MODEL_RGB,
        red_mask_size: 8,
        red_mask_shift: 16,
        green_mask_size: 8,
        green_mask_shift: 8,
        blue_mask_size: 8,
        blue_mask_shift: 0,
        unused: [0; 7],
        edid_size: 0,
        edid: ptr::null_mut(),
    }
}

fn two_usable_regions() -> [MemoryMapEntry; 2] {
    [
        MemoryMapEntry::new(0x1000, 0x9_f000, MemoryMapEntryType::USABLE),
        MemoryMapEntry::new(0x10_0000, 0x7ff0_0000, MemoryMapEntryType::USABLE),
    ]
}

/// The request section as the bootloader left it.
struct Section {
    revision: BaseRevision,
    framebuffer: FramebufferRequest,
    memory_map: MemoryMapRequest,
    direct_map: DirectMapRequest,
}

impl Section {
    /// A complete answer: revision 2, two usable regions, a framebuffer and
    /// a direct map.
    fn answered() -> Self {
        Self {
            revision: BaseRevision::new(2),
            framebuffer: FramebufferRequest::with_response(framebuffer(raw_framebuffer())),
            memory_map: MemoryMapRequest::with_response(memory_map(&two_usable_regions())),
            direct_map: DirectMapRequest::with_response(hhdm(HHDM)),
        }
    }

    fn table(&self) -> RequestTable<'_> {
        RequestTable::new(
            &self.revision,
            &self.framebuffer,
            &self.memory_map,
            &self.direct_map,
        )
    }

    fn boot(&self) -> Result<BootInfo, BootError> {
        self.boot_with(&NegotiationConfig::DEFAULT)
    }

    fn boot_with(&self, config: &NegotiationConfig) -> Result<BootInfo, BootError> {
        let window = unsafe { ResponseWindow::open() };
        let result = boot_info(&window, &self.table(), config);
        window.close();
        result
    }
}

#[test]
fn scenario_a_revision_two_with_two_usable_regions() {
    let section = Section::answered();
    assert_eq!(negotiate(&section.revision), RevisionOutcome::Supported(2));

    let info = section.boot().expect("boot succeeds");
    assert_eq!(info.revision(), 2);

    let regions = info.memory_map().as_slice();
    assert_eq!(regions.len(), 2);
    assert_eq!(regions[0].base(), PhysicalAddress::new(0x1000));
    assert_eq!(regions[0].length(), 0x9_f000);
    assert_eq!(regions[1].base(), PhysicalAddress::new(0x10_0000));
    assert!(regions.iter().all(|r| r.kind() == MemoryRegionKind::Usable));
    assert_eq!(info.memory_map().usable_bytes(), 0x9_f000 + 0x7ff0_0000);
    assert_eq!(info.direct_map(), DirectMapOffset::new(HHDM));
}

#[test]
fn scenario_b_headless_boot_continues() {
    let section = Section {
        framebuffer: FramebufferRequest::new(),
        ..Section::answered()
    };

    let info = section.boot().expect("boot succeeds without a framebuffer");
    assert_eq!(*info.framebuffer(), FramebufferState::Absent);
    assert_eq!(info.memory_map().len(), 2);
}

#[test]
fn scenario_c_missing_direct_map_is_fatal() {
    let section = Section {
        direct_map: DirectMapRequest::new(),
        ..Section::answered()
    };

    assert_eq!(
        section.boot(),
        Err(BootError::MissingMandatoryResponse(FeatureKind::DirectMap))
    );
}

#[test]
fn missing_memory_map_is_fatal() {
    let section = Section {
        memory_map: MemoryMapRequest::new(),
        ..Section::answered()
    };

    assert_eq!(
        section.boot(),
        Err(BootError::MissingMandatoryResponse(FeatureKind::MemoryMap))
    );
}

#[test]
fn unsupported_revision_stops_before_validation() {
    let section = Section {
        revision: BaseRevision::new(4),
        ..Section::answered()
    };

    assert_eq!(negotiate(&section.revision), RevisionOutcome::Unsupported);
    assert_eq!(section.boot(), Err(BootError::UnsupportedRevision));
}

#[test]
fn framebuffer_physical_address_comes_from_the_direct_map() {
    let info = Section::answered().boot().expect("boot succeeds");
    let FramebufferState::Available(fb) = *info.framebuffer() else {
        panic!("framebuffer should be available");
    };

    assert_eq!(fb.physical(), PhysicalAddress::new(FRAMEBUFFER_PHYS));
    assert_eq!(fb.address().as_u64(), HHDM + FRAMEBUFFER_PHYS);
    assert_eq!((fb.width(), fb.height(), fb.pitch()), (1024, 768, 4096));
    assert_eq!(fb.bytes_per_pixel(), 4);
    assert_eq!(fb.format(), PixelFormat::Bgr);
    assert_eq!(fb.size(), 4096 * 768);
}

#[test]
fn headless_response_counts_as_missing() {
    let response = leak(FramebufferResponse {
        revision: 0,
        framebuffer_count: 0,
        framebuffers: ptr::null(),
    });
    let request = FramebufferRequest::with_response(response);
    let window = unsafe { ResponseWindow::open() };

    assert!(matches!(
        validate(&window, &request),
        Err(ValidationError::Missing)
    ));
}

#[test]
fn short_pitch_is_malformed() {
    let mut raw = raw_framebuffer();
    raw.pitch = 1024 * 4 - 1;
    let request = FramebufferRequest::with_response(framebuffer(raw));
    let window = unsafe { ResponseWindow::open() };

    assert!(matches!(
        validate(&window, &request),
        Err(ValidationError::Malformed(Malformation::PitchTooSmall {
            pitch: 4095,
            row: 4096
        }))
    ));
}

#[test]
fn malformed_optional_framebuffer_is_recovered_as_absent() {
    let mut raw = raw_framebuffer();
    raw.pitch = 100;
    let section = Section {
        framebuffer: FramebufferRequest::with_response(framebuffer(raw)),
        ..Section::answered()
    };

    let info = section.boot().expect("optional failures are not fatal");
    assert!(info.framebuffer().is_absent());

    let strict = NegotiationConfig {
        framebuffer: Necessity::Mandatory,
        ..NegotiationConfig::DEFAULT
    };
    assert_eq!(
        section.boot_with(&strict),
        Err(BootError::MalformedResponse {
            feature: FeatureKind::Framebuffer,
            reason: Malformation::PitchTooSmall {
                pitch: 100,
                row: 4096
            },
        })
    );
}

#[test]
fn framebuffer_outside_the_direct_map_follows_the_policy() {
    let mut raw = raw_framebuffer();
    raw.address = ptr::without_provenance_mut(0x1000_0000);
    let section = Section {
        framebuffer: FramebufferRequest::with_response(framebuffer(raw)),
        ..Section::answered()
    };

    let info = section.boot().expect("an optional framebuffer is not fatal");
    assert!(info.framebuffer().is_absent());

    let strict = NegotiationConfig {
        framebuffer: Necessity::Mandatory,
        ..NegotiationConfig::DEFAULT
    };
    assert_eq!(
        section.boot_with(&strict),
        Err(BootError::MalformedResponse {
            feature: FeatureKind::Framebuffer,
            reason: Malformation::FramebufferOutsideDirectMap(0x1000_0000),
        })
    );
}

#[test]
fn mandatory_framebuffer_inside_the_direct_map_is_available() {
    let strict = NegotiationConfig {
        framebuffer: Necessity::Mandatory,
        ..NegotiationConfig::DEFAULT
    };
    let info = Section::answered()
        .boot_with(&strict)
        .expect("boot succeeds");
    assert!(info.framebuffer().available().is_some());
}

#[test]
fn empty_memory_map_is_malformed() {
    let request = MemoryMapRequest::with_response(memory_map(&[]));
    let window = unsafe { ResponseWindow::open() };

    assert!(matches!(
        validate(&window, &request),
        Err(ValidationError::Malformed(Malformation::EmptyMemoryMap))
    ));
    window.close();

    let section = Section {
        memory_map: request,
        ..Section::answered()
    };
    assert_eq!(
        section.boot(),
        Err(BootError::MalformedResponse {
            feature: FeatureKind::MemoryMap,
            reason: Malformation::EmptyMemoryMap,
        })
    );
}

#[test]
fn null_entry_array_is_malformed() {
    let response = leak(MemoryMapResponse {
        revision: 0,
        entry_count: 2,
        entries: ptr::null(),
    });
    let request = MemoryMapRequest::with_response(response);
    let window = unsafe { ResponseWindow::open() };

    assert!(matches!(
        validate(&window, &request),
        Err(ValidationError::Malformed(Malformation::NullEntryArray))
    ));
}

#[test]
fn null_framebuffer_array_is_malformed() {
    let response = leak(FramebufferResponse {
        revision: 0,
        framebuffer_count: 1,
        framebuffers: ptr::null(),
    });
    let request = FramebufferRequest::with_response(response);
    let window = unsafe { ResponseWindow::open() };

    assert!(matches!(
        validate(&window, &request),
        Err(ValidationError::Malformed(Malformation::NullFramebuffer))
    ));
}

#[test]
fn null_first_framebuffer_is_malformed() {
    let pointers = vec![ptr::null::<RawFramebuffer>()].leak();
    let response = leak(FramebufferResponse {
        revision: 0,
        framebuffer_count: 1,
        framebuffers: pointers.as_ptr(),
    });
    let request = FramebufferRequest::with_response(response);
    let window = unsafe { ResponseWindow::open() };

    assert!(matches!(
        validate(&window, &request),
        Err(ValidationError::Malformed(Malformation::NullFramebuffer))
    ));
}

#[test]
fn null_framebuffer_address_is_malformed() {
    let mut raw = raw_framebuffer();
    raw.address = ptr::null_mut();
    let request = FramebufferRequest::with_response(framebuffer(raw));
    let window = unsafe { ResponseWindow::open() };

    assert!(matches!(
        validate(&window, &request),
        Err(ValidationError::Malformed(
            Malformation::NullFramebufferAddress
        ))
    ));
}

#[test]
fn overlapping_memory_map_is_malformed() {
    let entries = [
        MemoryMapEntry::new(0x1000, 0x3000, MemoryMapEntryType::USABLE),
        MemoryMapEntry::new(0x2000, 0x1000, MemoryMapEntryType::RESERVED),
    ];
    let request = MemoryMapRequest::with_response(memory_map(&entries));
    let window = unsafe { ResponseWindow::open() };

    assert!(matches!(
        validate(&window, &request),
        Err(ValidationError::Malformed(
            Malformation::OverlappingRegions { index: 1 }
        ))
    ));
    window.close();

    let section = Section {
        memory_map: request,
        ..Section::answered()
    };
    assert_eq!(
        section.boot(),
        Err(BootError::MalformedResponse {
            feature: FeatureKind::MemoryMap,
            reason: Malformation::OverlappingRegions { index: 1 },
        })
    );
}

#[test]
fn oversized_memory_map_is_malformed() {
    let entries = (0..=MAX_MEMORY_REGIONS as u64)
        .map(|i| MemoryMapEntry::new(i * 0x1000, 0x1000, MemoryMapEntryType::USABLE))
        .collect::<Vec<_>>();
    let request = MemoryMapRequest::with_response(memory_map(&entries));
    let window = unsafe { ResponseWindow::open() };

    assert!(matches!(
        validate(&window, &request),
        Err(ValidationError::Malformed(Malformation::TooManyRegions(257)))
    ));
}

#[test]
fn null_entry_pointer_is_malformed() {
    let pointers = vec![leak(two_usable_regions()[0]), ptr::null()].leak();
    let response = leak(MemoryMapResponse {
        revision: 0,
        entry_count: 2,
        entries: pointers.as_ptr(),
    });
    let request = MemoryMapRequest::with_response(response);
    let window = unsafe { ResponseWindow::open() };

    assert!(matches!(
        validate(&window, &request),
        Err(ValidationError::Malformed(Malformation::NullEntry { index: 1 }))
    ));
}

#[test]
fn unknown_region_types_survive_adaptation() {
    let entries = [
        MemoryMapEntry::new(0, 0x1000, MemoryMapEntryType::BOOTLOADER_RECLAIMABLE),
        MemoryMapEntry::new(0x1000, 0x1000, MemoryMapEntryType(0x42)),
    ];
    let section = Section {
        memory_map: MemoryMapRequest::with_response(memory_map(&entries)),
        ..Section::answered()
    };

    let info = section.boot().expect("boot succeeds");
    let kinds = info
        .memory_map()
        .iter()
        .map(|region| region.kind())
        .collect::<Vec<_>>();
    assert_eq!(
        kinds,
        [
            MemoryRegionKind::BootloaderReclaimable,
            MemoryRegionKind::Unknown(0x42)
        ]
    );
    assert_eq!(info.memory_map().usable_bytes(), 0);
}

#[test]
fn adapting_twice_yields_identical_snapshots() {
    let section = Section::answered();
    let window = unsafe { ResponseWindow::open() };
    let responses = collect(&window, &section.table(), &NegotiationConfig::DEFAULT)
        .expect("responses validate");

    let first = adapt(&responses);
    let second = adapt(&responses);
    window.close();

    assert_eq!(first, second);
}

#[test]
fn table_dispatches_on_feature_kind() {
    let section = Section::answered();
    let table = section.table();
    let window = unsafe { ResponseWindow::open() };

    for kind in FeatureKind::ALL {
        let payload = table.validate(&window, kind).expect("every feature validates");
        assert_eq!(payload.kind(), kind);
    }
}
