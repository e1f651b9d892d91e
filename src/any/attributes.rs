use crate::{
    catch::{CatchAttributeProvider, CatchDifficultyAttributes, CatchPerformanceAttributes},
    mania::{ManiaAttributeProvider, ManiaDifficultyAttributes, ManiaPerformanceAttributes},
    osu::{OsuAttributeProvider, OsuDifficultyAttributes, OsuPerformanceAttributes},
    relax::{RelaxAttributeProvider, RelaxDifficultyAttributes, RelaxPerformanceAttributes},
    taiko::{TaikoAttributeProvider, TaikoDifficultyAttributes, TaikoPerformanceAttributes},
    Beatmap, GameMode,
};

use super::AnyPP;

/// The result of a difficulty calculation based on the mode.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DifficultyAttributes {
    Osu(OsuDifficultyAttributes),
    /// osu!standard with relax
    Relax(RelaxDifficultyAttributes),
    Taiko(TaikoDifficultyAttributes),
    Catch(CatchDifficultyAttributes),
    Mania(ManiaDifficultyAttributes),
}

impl DifficultyAttributes {
    /// The star value.
    pub const fn stars(&self) -> f64 {
        match self {
            Self::Osu(attrs) => attrs.stars,
            Self::Relax(attrs) => attrs.stars,
            Self::Taiko(attrs) => attrs.stars,
            Self::Catch(attrs) => attrs.stars,
            Self::Mania(attrs) => attrs.stars,
        }
    }

    /// The maximum combo of the map.
    pub const fn max_combo(&self) -> u32 {
        match self {
            Self::Osu(attrs) => attrs.max_combo,
            Self::Relax(attrs) => attrs.max_combo,
            Self::Taiko(attrs) => attrs.max_combo,
            Self::Catch(attrs) => attrs.max_combo(),
            Self::Mania(attrs) => attrs.max_combo,
        }
    }

    /// The mode the attributes were calculated for.
    pub const fn mode(&self) -> GameMode {
        match self {
            Self::Osu(_) => GameMode::Osu,
            Self::Relax(_) => GameMode::Osu,
            Self::Taiko(_) => GameMode::Taiko,
            Self::Catch(_) => GameMode::Catch,
            Self::Mania(_) => GameMode::Mania,
        }
    }

    /// Named skill values of the mode, excluding the star rating.
    pub fn skills(&self) -> Vec<(&'static str, f64)> {
        match self {
            Self::Osu(attrs) => attrs.skills().to_vec(),
            Self::Relax(attrs) => attrs.skills().to_vec(),
            Self::Taiko(attrs) => attrs.skills().to_vec(),
            Self::Catch(attrs) => attrs.skills().to_vec(),
            Self::Mania(attrs) => attrs.skills().to_vec(),
        }
    }

    /// Returns a builder for performance calculation.
    pub fn performance(self, map: &Beatmap) -> AnyPP<'_> {
        AnyPP::with_mode(map, self.mode()).attributes(self)
    }
}

/// The result of a performance calculation based on the mode.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PerformanceAttributes {
    Osu(OsuPerformanceAttributes),
    /// osu!standard with relax
    Relax(RelaxPerformanceAttributes),
    Taiko(TaikoPerformanceAttributes),
    Catch(CatchPerformanceAttributes),
    Mania(ManiaPerformanceAttributes),
}

impl PerformanceAttributes {
    /// The pp value.
    pub const fn pp(&self) -> f64 {
        match self {
            Self::Osu(attrs) => attrs.pp,
            Self::Relax(attrs) => attrs.pp,
            Self::Taiko(attrs) => attrs.pp,
            Self::Catch(attrs) => attrs.pp,
            Self::Mania(attrs) => attrs.pp,
        }
    }

    /// The star value.
    pub const fn stars(&self) -> f64 {
        match self {
            Self::Osu(attrs) => attrs.stars(),
            Self::Relax(attrs) => attrs.stars(),
            Self::Taiko(attrs) => attrs.stars(),
            Self::Catch(attrs) => attrs.stars(),
            Self::Mania(attrs) => attrs.stars(),
        }
    }

    /// The maximum combo of the map.
    pub const fn max_combo(&self) -> u32 {
        match self {
            Self::Osu(attrs) => attrs.max_combo(),
            Self::Relax(attrs) => attrs.max_combo(),
            Self::Taiko(attrs) => attrs.max_combo(),
            Self::Catch(attrs) => attrs.max_combo(),
            Self::Mania(attrs) => attrs.max_combo(),
        }
    }

    /// Difficulty attributes that were used for the performance calculation.
    pub fn difficulty_attributes(&self) -> DifficultyAttributes {
        match self {
            Self::Osu(attrs) => DifficultyAttributes::Osu(attrs.difficulty.clone()),
            Self::Relax(attrs) => DifficultyAttributes::Relax(attrs.difficulty.clone()),
            Self::Taiko(attrs) => DifficultyAttributes::Taiko(attrs.difficulty.clone()),
            Self::Catch(attrs) => DifficultyAttributes::Catch(attrs.difficulty.clone()),
            Self::Mania(attrs) => DifficultyAttributes::Mania(attrs.difficulty.clone()),
        }
    }
}

impl From<PerformanceAttributes> for DifficultyAttributes {
    #[inline]
    fn from(attributes: PerformanceAttributes) -> Self {
        match attributes {
            PerformanceAttributes::Osu(attrs) => Self::Osu(attrs.difficulty),
            PerformanceAttributes::Relax(attrs) => Self::Relax(attrs.difficulty),
            PerformanceAttributes::Taiko(attrs) => Self::Taiko(attrs.difficulty),
            PerformanceAttributes::Catch(attrs) => Self::Catch(attrs.difficulty),
            PerformanceAttributes::Mania(attrs) => Self::Mania(attrs.difficulty),
        }
    }
}

/// Abstract type to provide flexibility when passing difficulty attributes to a performance calculation.
pub trait AttributeProvider {
    /// Provide the actual difficulty attributes.
    fn attributes(self) -> DifficultyAttributes;
}

impl AttributeProvider for DifficultyAttributes {
    #[inline]
    fn attributes(self) -> DifficultyAttributes {
        self
    }
}

impl AttributeProvider for PerformanceAttributes {
    #[inline]
    fn attributes(self) -> DifficultyAttributes {
        self.into()
    }
}

macro_rules! impl_attr_provider {
    ( $( $variant:ident: $provider:ident, $diff:ident, $perf:ident; )* ) => {
        $(
            impl $provider for DifficultyAttributes {
                #[inline]
                fn attributes(self) -> Option<$diff> {
                    match self {
                        Self::$variant(attrs) => Some(attrs),
                        _ => None,
                    }
                }
            }

            impl $provider for PerformanceAttributes {
                #[inline]
                fn attributes(self) -> Option<$diff> {
                    match self {
                        Self::$variant(attrs) => Some(attrs.difficulty),
                        _ => None,
                    }
                }
            }

            impl AttributeProvider for $diff {
                #[inline]
                fn attributes(self) -> DifficultyAttributes {
                    DifficultyAttributes::$variant(self)
                }
            }

            impl AttributeProvider for $perf {
                #[inline]
                fn attributes(self) -> DifficultyAttributes {
                    DifficultyAttributes::$variant(self.difficulty)
                }
            }
        )*
    };
}

impl_attr_provider! {
    Osu: OsuAttributeProvider, OsuDifficultyAttributes, OsuPerformanceAttributes;
    Relax: RelaxAttributeProvider, RelaxDifficultyAttributes, RelaxPerformanceAttributes;
    Taiko: TaikoAttributeProvider, TaikoDifficultyAttributes, TaikoPerformanceAttributes;
    Catch: CatchAttributeProvider, CatchDifficultyAttributes, CatchPerformanceAttributes;
    Mania: ManiaAttributeProvider, ManiaDifficultyAttributes, ManiaPerformanceAttributes;
}
