//! Cache storage formats a harness reads and writes.
//!
//! `StorageType` in the test input is a numeric bit set. Each bit selects one on-disk cache format the
//! executor binds its token cache to; several may be combined so one run writes a cache for every format at
//! once. An absent `StorageType` leaves the choice to the executor.

use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// Cache formats selected by a test input.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StorageType: u32 {
        /// Legacy ADAL v3 cache blob.
        const ADAL = 0b001;
        /// Unified cache shared by MSAL v2-era libraries.
        const MSAL_V2 = 0b010;
        /// MSAL v3 cache.
        const MSAL_V3 = 0b100;
    }
}

const NAMES: [(StorageType, &str); 3] = [
    (StorageType::ADAL, "Adal"),
    (StorageType::MSAL_V2, "MsalV2"),
    (StorageType::MSAL_V3, "MsalV3"),
];

impl StorageType {
    /// Description of accepted values, used in type-mismatch errors.
    pub const EXPECTED: &'static str = "storage type flags (1 = Adal, 2 = MsalV2, 4 = MsalV3)";

    /// Interpret the wire value. Zero and unknown bits are rejected.
    pub fn from_wire(value: u64) -> Option<StorageType> {
        let bits = u32::try_from(value).ok()?;
        StorageType::from_bits(bits).filter(|flags| !flags.is_empty())
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (flag, name) in NAMES {
            if self.contains(flag) {
                if !first {
                    f.write_str(" | ")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}
