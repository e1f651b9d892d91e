use crate::GameMode;

macro_rules! impl_mods {
    ($func_name:ident, $const_name:ident) => {
        #[inline]
        fn $func_name(self) -> bool {
            self & Self::$const_name == Self::$const_name
        }
    };
}

/// Abstract type to define mods as a `u32` bitmask.
///
/// Bit values are the same as in the game client's API.
pub trait Mods: Copy {
    const NM: u32 = 0;
    const NF: u32 = 1 << 0;
    const EZ: u32 = 1 << 1;
    const TD: u32 = 1 << 2;
    const HD: u32 = 1 << 3;
    const HR: u32 = 1 << 4;
    const SD: u32 = 1 << 5;
    const DT: u32 = 1 << 6;
    const RX: u32 = 1 << 7;
    const HT: u32 = 1 << 8;
    const NC: u32 = (1 << 9) | Self::DT;
    const FL: u32 = 1 << 10;
    const AT: u32 = 1 << 11;
    const SO: u32 = 1 << 12;
    const AP: u32 = 1 << 13;
    const PF: u32 = (1 << 14) | Self::SD;
    const K4: u32 = 1 << 15;
    const K5: u32 = 1 << 16;
    const K6: u32 = 1 << 17;
    const K7: u32 = 1 << 18;
    const K8: u32 = 1 << 19;
    const FI: u32 = 1 << 20;
    const RD: u32 = 1 << 21;
    const CN: u32 = 1 << 22;
    const TP: u32 = 1 << 23;
    const K9: u32 = 1 << 24;
    const CO: u32 = 1 << 25;
    const K1: u32 = 1 << 26;
    const K3: u32 = 1 << 27;
    const K2: u32 = 1 << 28;
    const V2: u32 = 1 << 29;
    const MR: u32 = 1 << 30;

    /// All key mods.
    const KEY_MODS: u32 = Self::K1
        | Self::K2
        | Self::K3
        | Self::K4
        | Self::K5
        | Self::K6
        | Self::K7
        | Self::K8
        | Self::K9;

    /// Every bit that belongs to a known mod.
    const KNOWN: u32 = (1 << 31) - 1;

    /// Speed multiplier of DT/NC or HT.
    fn clock_rate(self) -> f64;

    /// Multiplier applied to AR, OD and HP by HR or EZ.
    fn od_ar_hp_multiplier(self) -> f64;

    /// Whether the chart's settings or speed differ from nomod.
    fn change_map(self) -> bool;

    fn nf(self) -> bool;
    fn ez(self) -> bool;
    fn td(self) -> bool;
    fn hd(self) -> bool;
    fn hr(self) -> bool;
    fn sd(self) -> bool;
    fn dt(self) -> bool;
    fn rx(self) -> bool;
    fn ht(self) -> bool;
    fn nc(self) -> bool;
    fn fl(self) -> bool;
    fn at(self) -> bool;
    fn so(self) -> bool;
    fn ap(self) -> bool;
    fn pf(self) -> bool;
    fn cn(self) -> bool;
    fn v2(self) -> bool;

    /// Amount of keys requested through a key mod, if any.
    fn key_count(self) -> Option<usize>;
}

impl Mods for u32 {
    #[inline]
    fn clock_rate(self) -> f64 {
        if self.dt() {
            1.5
        } else if self.ht() {
            0.75
        } else {
            1.0
        }
    }

    #[inline]
    fn od_ar_hp_multiplier(self) -> f64 {
        if self.hr() {
            1.4
        } else if self.ez() {
            0.5
        } else {
            1.0
        }
    }

    #[inline]
    fn change_map(self) -> bool {
        self & (Self::HT | Self::DT | Self::HR | Self::EZ) > 0
    }

    impl_mods!(nf, NF);
    impl_mods!(ez, EZ);
    impl_mods!(td, TD);
    impl_mods!(hd, HD);
    impl_mods!(hr, HR);
    impl_mods!(sd, SD);
    impl_mods!(dt, DT);
    impl_mods!(rx, RX);
    impl_mods!(ht, HT);
    impl_mods!(nc, NC);
    impl_mods!(fl, FL);
    impl_mods!(at, AT);
    impl_mods!(so, SO);
    impl_mods!(ap, AP);
    impl_mods!(pf, PF);
    impl_mods!(cn, CN);
    impl_mods!(v2, V2);

    fn key_count(self) -> Option<usize> {
        const KEYS: [(u32, usize); 9] = [
            (u32::K1, 1),
            (u32::K2, 2),
            (u32::K3, 3),
            (u32::K4, 4),
            (u32::K5, 5),
            (u32::K6, 6),
            (u32::K7, 7),
            (u32::K8, 8),
            (u32::K9, 9),
        ];

        KEYS.iter()
            .find(|(bits, _)| self & bits > 0)
            .map(|(_, keys)| *keys)
    }
}

/// How to deal with mods that cannot be active at the same time.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModConflictPolicy {
    /// Fail with [`InvalidModError::Conflict`].
    #[default]
    Reject,
    /// Keep the first mod of each conflicting pair and drop the other.
    Normalize,
}

/// A mod bitmask that cannot be used for a calculation.
#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum InvalidModError {
    #[error("unknown mod bits {bits:#x}")]
    Unknown { bits: u32 },
    #[error("mod bits {bits:#x} are not available in {mode}")]
    Unsupported { bits: u32, mode: GameMode },
    #[error("mods {first:#x} and {second:#x} cannot be combined")]
    Conflict { first: u32, second: u32 },
}

const NC_BIT: u32 = 1 << 9;
const PF_BIT: u32 = 1 << 14;

// Order matters for `ModConflictPolicy::Normalize`
const CONFLICTS: [(u32, u32); 10] = [
    (u32::DT, u32::HT),
    (u32::EZ, u32::HR),
    (u32::NF, u32::SD),
    (u32::NF, u32::PF),
    (u32::RX, u32::AP),
    (u32::AT, u32::RX),
    (u32::AT, u32::AP),
    (u32::CN, u32::RX),
    (u32::CN, u32::AP),
    (u32::SO, u32::AP),
];

/// Check that the given mods can be used for the given mode.
///
/// Returns the mods to calculate with, which differ from the input only if
/// conflicts were normalized or a compound mod (NC, PF) lacked its base mod.
pub fn validate(
    mods: u32,
    mode: GameMode,
    policy: ModConflictPolicy,
) -> Result<u32, InvalidModError> {
    let unknown = mods & !u32::KNOWN;

    if unknown > 0 {
        return Err(InvalidModError::Unknown { bits: unknown });
    }

    let unsupported = match mode {
        GameMode::Osu => mods & (u32::KEY_MODS | u32::FI | u32::RD | u32::CO | u32::MR),
        GameMode::Taiko | GameMode::Catch => {
            mods & (u32::KEY_MODS | u32::FI | u32::RD | u32::CO | u32::MR | u32::AP)
        }
        GameMode::Mania => mods & (u32::RX | u32::AP),
    };

    if unsupported > 0 {
        return Err(InvalidModError::Unsupported {
            bits: unsupported,
            mode,
        });
    }

    // NC and PF carry their base mod
    let mut mods = mods;

    if mods & NC_BIT > 0 {
        mods |= u32::DT;
    }

    if mods & PF_BIT > 0 {
        mods |= u32::SD;
    }

    for (first, second) in CONFLICTS {
        if mods & first != first || mods & second != second {
            continue;
        }

        match policy {
            ModConflictPolicy::Reject => return Err(InvalidModError::Conflict { first, second }),
            ModConflictPolicy::Normalize => {
                // Don't strip bits that are shared with the kept mod
                mods &= !(second & !first);

                if mods & u32::DT == 0 {
                    mods &= !NC_BIT;
                }

                if mods & u32::SD == 0 {
                    mods &= !PF_BIT;
                }

                tracing::debug!(kept = first, dropped = second, "Normalized mod conflict");
            }
        }
    }

    Ok(mods)
}
