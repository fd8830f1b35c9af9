// ─────────────────────────────────────────────────────────────────────
// Decay Bridge — Layout Descriptor Table
// ─────────────────────────────────────────────────────────────────────
//! Size and alignment of every type a caller must allocate.
//!
//! Each descriptor is exported as an immutable symbol
//! (`DECAY_LAYOUT_<NAME>`, `DECAY_LAYOUT_VEC_<NAME>`) and listed in
//! [`LAYOUT_TABLE`] for enumeration. A descriptor that disagreed with the
//! real layout would corrupt memory silently, so the layouts that foreign
//! code reads field by field are pinned at compile time.

use std::ffi::{c_char, CStr};
use std::mem::{align_of, size_of};

use static_assertions::const_assert_eq;

use decay_physics::{
    CoincidencePair, Database, EnergyCountPair, EnergyIntensityPair, EnergyRatePair, Nuclide,
    NuclideAbundancePair, NuclideActivityPair, NuclideMixture, NuclideNumAtomsPair,
    NuclideTimeEvolution, TimeEvolutionTerm,
};

use crate::capsule::ExceptionCapsule;
use crate::registry::{value_types, vector_element_types};
use crate::string::DecayString;

/// (size, alignment) in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(C)]
pub struct LayoutDescriptor {
    pub size: usize,
    pub align: usize,
}

impl LayoutDescriptor {
    pub const fn of<T>() -> Self {
        Self {
            size: size_of::<T>(),
            align: align_of::<T>(),
        }
    }
}

const fn table_name(bytes: &'static [u8]) -> &'static CStr {
    match CStr::from_bytes_with_nul(bytes) {
        Ok(name) => name,
        Err(_) => panic!("layout name must end in a single NUL"),
    }
}

macro_rules! layout_table {
    (
        types { $($name:ident => $ty:ty),+ $(,)? }
        vectors $($vname:ident => $vty:ty),+ $(,)?
    ) => {
        paste::paste! {
            $(
                #[no_mangle]
                pub static [<DECAY_LAYOUT_ $name:upper>]: LayoutDescriptor = LayoutDescriptor::of::<$ty>();
            )+
            $(
                #[no_mangle]
                pub static [<DECAY_LAYOUT_VEC_ $vname:upper>]: LayoutDescriptor = LayoutDescriptor::of::<Vec<$vty>>();
            )+

            /// Every exported descriptor by name; vector entries are
            /// prefixed with `vec_`.
            pub static LAYOUT_TABLE: &[(&CStr, LayoutDescriptor)] = &[
                $((table_name(concat!(stringify!($name), "\0").as_bytes()), LayoutDescriptor::of::<$ty>()),)+
                $((table_name(concat!("vec_", stringify!($vname), "\0").as_bytes()), LayoutDescriptor::of::<Vec<$vty>>()),)+
            ];
        }
    };
}

/// Carries the value list into the vector list expansion.
macro_rules! layout_with_values {
    ($($name:ident => $ty:ty),+ $(,)?) => {
        vector_element_types!(layout_table, types { $($name => $ty),+ } vectors);
    };
}

value_types!(layout_with_values);

// Pinned layouts of the records foreign code reads in place.
#[cfg(target_pointer_width = "64")]
mod pinned {
    use super::*;

    const_assert_eq!(size_of::<DecayString>(), 24);
    const_assert_eq!(size_of::<ExceptionCapsule>(), 8);
    const_assert_eq!(align_of::<ExceptionCapsule>(), 8);

    const_assert_eq!(size_of::<NuclideAbundancePair<'static>>(), 16);
    const_assert_eq!(size_of::<NuclideActivityPair<'static>>(), 16);
    const_assert_eq!(size_of::<NuclideNumAtomsPair<'static>>(), 16);
    const_assert_eq!(align_of::<NuclideActivityPair<'static>>(), 8);
    const_assert_eq!(size_of::<EnergyIntensityPair>(), 16);
    const_assert_eq!(size_of::<EnergyCountPair>(), 16);
    const_assert_eq!(size_of::<EnergyRatePair>(), 16);
    const_assert_eq!(align_of::<EnergyRatePair>(), 8);
    const_assert_eq!(size_of::<TimeEvolutionTerm>(), 16);
    const_assert_eq!(size_of::<CoincidencePair>(), 8);
    const_assert_eq!(align_of::<CoincidencePair>(), 4);

    const_assert_eq!(size_of::<Vec<c_char>>(), 24);
    const_assert_eq!(size_of::<Vec<&'static Nuclide>>(), 24);
    const_assert_eq!(size_of::<Vec<NuclideTimeEvolution<'static>>>(), 24);
    const_assert_eq!(align_of::<Vec<c_char>>(), 8);

    const_assert_eq!(size_of::<LayoutDescriptor>(), 16);
}

const_assert_eq!(size_of::<&'static Nuclide>(), size_of::<usize>());
const_assert_eq!(size_of::<ExceptionCapsule>(), size_of::<usize>());

/// Descriptor registered under `name`, e.g. `"nuclide"` or `"vec_char"`.
pub fn layout_of(name: &str) -> Option<LayoutDescriptor> {
    LAYOUT_TABLE
        .iter()
        .find(|(entry, _)| entry.to_bytes() == name.as_bytes())
        .map(|&(_, layout)| layout)
}

// ─── C ABI ──────────────────────────────────────────────────────────

/// Look up `name_len` bytes of `name`. Writes `out` and returns true when
/// found; `out` is untouched otherwise.
#[no_mangle]
pub unsafe extern "C" fn decay_layout_lookup(
    name: *const c_char,
    name_len: usize,
    out: *mut LayoutDescriptor,
) -> bool {
    let bytes: &[u8] = if name_len == 0 {
        &[]
    } else {
        // SAFETY: `name` is valid for `name_len` bytes.
        unsafe { std::slice::from_raw_parts(name.cast::<u8>(), name_len) }
    };
    let Ok(name) = std::str::from_utf8(bytes) else {
        return false;
    };
    match layout_of(name) {
        Some(layout) => {
            // SAFETY: `out` is writable.
            unsafe { out.write(layout) };
            true
        }
        None => false,
    }
}

#[no_mangle]
pub extern "C" fn decay_layout_count() -> usize {
    LAYOUT_TABLE.len()
}

/// Entry `index` of the table: a static NUL-terminated name and its
/// descriptor. Returns false past the end.
#[no_mangle]
pub unsafe extern "C" fn decay_layout_entry(
    index: usize,
    name_out: *mut *const c_char,
    out: *mut LayoutDescriptor,
) -> bool {
    let Some(&(name, layout)) = LAYOUT_TABLE.get(index) else {
        return false;
    };
    // SAFETY: both outputs are writable.
    unsafe {
        name_out.write(name.as_ptr());
        out.write(layout);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_table_matches_measured_layouts() {
        assert_eq!(layout_of("database"), Some(LayoutDescriptor::of::<Database>()));
        assert_eq!(
            layout_of("mixture"),
            Some(LayoutDescriptor::of::<NuclideMixture<'static>>())
        );
        assert_eq!(
            layout_of("vec_nuclide_time_evolution"),
            Some(LayoutDescriptor::of::<Vec<NuclideTimeEvolution<'static>>>())
        );
        assert_eq!(layout_of("vec_char"), Some(LayoutDescriptor::of::<Vec<c_char>>()));
        assert_eq!(layout_of("no_such_type"), None);
    }

    #[test]
    fn test_table_is_complete_and_unique() {
        assert_eq!(decay_layout_count(), 17 + 17);
        let names: HashSet<&[u8]> = LAYOUT_TABLE.iter().map(|(n, _)| n.to_bytes()).collect();
        assert_eq!(names.len(), LAYOUT_TABLE.len());
        for (_, layout) in LAYOUT_TABLE {
            assert!(layout.align.is_power_of_two());
            assert_eq!(layout.size % layout.align, 0);
        }
    }

    #[test]
    fn test_lookup_via_abi() {
        let name = b"energy_rate_pair";
        let mut out = LayoutDescriptor { size: 0, align: 0 };
        let found = unsafe { decay_layout_lookup(name.as_ptr().cast(), name.len(), &mut out) };
        assert!(found);
        assert_eq!(out, DECAY_LAYOUT_ENERGY_RATE_PAIR);
        assert_eq!(out.size, size_of::<EnergyRatePair>());

        let mut untouched = LayoutDescriptor { size: 1, align: 1 };
        assert!(!unsafe { decay_layout_lookup(b"meow".as_ptr().cast(), 4, &mut untouched) });
        assert_eq!(untouched, LayoutDescriptor { size: 1, align: 1 });
    }

    #[test]
    fn test_enumerate_via_abi() {
        let mut name = std::ptr::null();
        let mut layout = LayoutDescriptor { size: 0, align: 0 };
        assert!(unsafe { decay_layout_entry(0, &mut name, &mut layout) });
        let first = unsafe { CStr::from_ptr(name) };
        assert_eq!(first.to_bytes(), b"string");
        assert_eq!(layout, DECAY_LAYOUT_STRING);
        assert!(!unsafe { decay_layout_entry(decay_layout_count(), &mut name, &mut layout) });
    }
}
