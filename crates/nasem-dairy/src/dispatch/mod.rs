//! Equation selection and physiological-state dispatch
//!
//! Every integer in [`EquationSelection`] is converted once into a typed
//! selector. An integer without a matching variant is rejected with
//! [`NasemError::InvalidSelector`] before any equation runs.
//!
//! Each dispatch component computes the chosen variant under its own name
//! (for example `Dt_DMIn_Lact1`) and copies it to the shared name read
//! downstream (`Dt_DMIn`). State gating, such as zero milk output for a
//! non-lactating animal, is applied here after the variant has been computed.

pub mod intake;
pub mod methane;
pub mod microbial;
pub mod milk;

use crate::inputs::EquationSelection;
use nasem_core::errors::{NasemError, NasemResult};
use serde::{Deserialize, Serialize};

/// A typed equation selector backed by an integer code.
pub trait Selector: Sized + Copy + 'static {
    /// Name of the selection key, as written in input files
    const KEY: &'static str;
    /// Every variant, in code order
    const VARIANTS: &'static [Self];

    fn code(&self) -> i64;

    fn from_code(value: i64) -> NasemResult<Self> {
        Self::VARIANTS
            .iter()
            .copied()
            .find(|v| v.code() == value)
            .ok_or_else(|| NasemError::InvalidSelector {
                key: Self::KEY.to_string(),
                value,
            })
    }
}

/// Basis for total-tract NDF digestibility (`Use_DNDF_IV`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NdfDigestibility {
    /// Lignin-based prediction for all feeds
    Lignin,
    /// 48 h in vitro digestibility for forage NDF, lignin for the rest
    InVitroForage,
    /// 48 h in vitro digestibility for all NDF
    InVitroAll,
}

impl Selector for NdfDigestibility {
    const KEY: &'static str = "Use_DNDF_IV";
    const VARIANTS: &'static [Self] = &[
        NdfDigestibility::Lignin,
        NdfDigestibility::InVitroForage,
        NdfDigestibility::InVitroAll,
    ];

    fn code(&self) -> i64 {
        match self {
            NdfDigestibility::Lignin => 0,
            NdfDigestibility::InVitroForage => 1,
            NdfDigestibility::InVitroAll => 2,
        }
    }
}

/// Dry matter intake equation (`DMIn_eqn`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DmiEquation {
    /// The intake supplied with the animal
    Target,
    Calf,
    HeiferNrc,
    HeiferNrcAdj,
    HeiferH1,
    HeiferH2,
    HeiferHj1,
    HeiferHj2,
    Lact1,
    Lact2,
    DryCow1,
    DryCow2,
    HeiferNrcPrepart,
    HeiferNrcAdjPrepart,
    HeiferH1Prepart,
    HeiferH2Prepart,
    HeiferHj1Prepart,
    HeiferHj2Prepart,
}

impl DmiEquation {
    /// Namespace name the variant writes before it is copied to `Dt_DMIn`.
    ///
    /// `None` for the target intake, which is copied directly.
    pub fn variant_name(&self) -> Option<&'static str> {
        match self {
            DmiEquation::Target => None,
            DmiEquation::Calf => Some("Dt_DMIn_Calf1"),
            DmiEquation::HeiferNrc => Some("Dt_DMIn_Heif_NRCa"),
            DmiEquation::HeiferNrcAdj => Some("Dt_DMIn_Heif_NRCad"),
            DmiEquation::HeiferH1 => Some("Dt_DMIn_Heif_H1"),
            DmiEquation::HeiferH2 => Some("Dt_DMIn_Heif_H2"),
            DmiEquation::HeiferHj1 => Some("Dt_DMIn_Heif_HJ1"),
            DmiEquation::HeiferHj2 => Some("Dt_DMIn_Heif_HJ2"),
            DmiEquation::Lact1 => Some("Dt_DMIn_Lact1"),
            DmiEquation::Lact2 => Some("Dt_DMIn_Lact2"),
            DmiEquation::DryCow1 => Some("Dt_DMIn_DryCow1"),
            DmiEquation::DryCow2 => Some("Dt_DMIn_DryCow2"),
            DmiEquation::HeiferNrcPrepart => Some("Dt_DMIn_Heif_NRCap"),
            DmiEquation::HeiferNrcAdjPrepart => Some("Dt_DMIn_Heif_NRCadp"),
            DmiEquation::HeiferH1Prepart => Some("Dt_DMIn_Heif_H1p"),
            DmiEquation::HeiferH2Prepart => Some("Dt_DMIn_Heif_H2p"),
            DmiEquation::HeiferHj1Prepart => Some("Dt_DMIn_Heif_HJ1p"),
            DmiEquation::HeiferHj2Prepart => Some("Dt_DMIn_Heif_HJ2p"),
        }
    }

    /// Whether the monensin intake adjustment applies to this variant.
    pub fn is_lactation(&self) -> bool {
        matches!(self, DmiEquation::Lact1 | DmiEquation::Lact2)
    }
}

impl Selector for DmiEquation {
    const KEY: &'static str = "DMIn_eqn";
    const VARIANTS: &'static [Self] = &[
        DmiEquation::Target,
        DmiEquation::Calf,
        DmiEquation::HeiferNrc,
        DmiEquation::HeiferNrcAdj,
        DmiEquation::HeiferH1,
        DmiEquation::HeiferH2,
        DmiEquation::HeiferHj1,
        DmiEquation::HeiferHj2,
        DmiEquation::Lact1,
        DmiEquation::Lact2,
        DmiEquation::DryCow1,
        DmiEquation::DryCow2,
        DmiEquation::HeiferNrcPrepart,
        DmiEquation::HeiferNrcAdjPrepart,
        DmiEquation::HeiferH1Prepart,
        DmiEquation::HeiferH2Prepart,
        DmiEquation::HeiferHj1Prepart,
        DmiEquation::HeiferHj2Prepart,
    ];

    fn code(&self) -> i64 {
        match self {
            DmiEquation::Target => 0,
            DmiEquation::Calf => 1,
            DmiEquation::HeiferNrc => 2,
            DmiEquation::HeiferNrcAdj => 3,
            DmiEquation::HeiferH1 => 4,
            DmiEquation::HeiferH2 => 5,
            DmiEquation::HeiferHj1 => 6,
            DmiEquation::HeiferHj2 => 7,
            DmiEquation::Lact1 => 8,
            DmiEquation::Lact2 => 9,
            DmiEquation::DryCow1 => 10,
            DmiEquation::DryCow2 => 11,
            DmiEquation::HeiferNrcPrepart => 12,
            DmiEquation::HeiferNrcAdjPrepart => 13,
            DmiEquation::HeiferH1Prepart => 14,
            DmiEquation::HeiferH2Prepart => 15,
            DmiEquation::HeiferHj1Prepart => 16,
            DmiEquation::HeiferHj2Prepart => 17,
        }
    }
}

/// Milk yield predictor (`mProd_eqn`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MilkProductionEquation {
    Target,
    ComponentBased,
    EnergyAllowable,
    ProteinAllowable,
    MinimumAllowable,
}

impl Selector for MilkProductionEquation {
    const KEY: &'static str = "mProd_eqn";
    const VARIANTS: &'static [Self] = &[
        MilkProductionEquation::Target,
        MilkProductionEquation::ComponentBased,
        MilkProductionEquation::EnergyAllowable,
        MilkProductionEquation::ProteinAllowable,
        MilkProductionEquation::MinimumAllowable,
    ];

    fn code(&self) -> i64 {
        match self {
            MilkProductionEquation::Target => 0,
            MilkProductionEquation::ComponentBased => 1,
            MilkProductionEquation::EnergyAllowable => 2,
            MilkProductionEquation::ProteinAllowable => 3,
            MilkProductionEquation::MinimumAllowable => 4,
        }
    }
}

/// Source of duodenal microbial nitrogen (`MiN_eqn`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MicrobialNitrogenEquation {
    Nrc2021,
    VtLinear,
    VtNonLinear,
}

impl MicrobialNitrogenEquation {
    pub fn variant_name(&self) -> &'static str {
        match self {
            MicrobialNitrogenEquation::Nrc2021 => "Du_MiN_NRC2021_g",
            MicrobialNitrogenEquation::VtLinear => "Du_MiN_VTln_g",
            MicrobialNitrogenEquation::VtNonLinear => "Du_MiN_VTnln_g",
        }
    }
}

impl Selector for MicrobialNitrogenEquation {
    const KEY: &'static str = "MiN_eqn";
    const VARIANTS: &'static [Self] = &[
        MicrobialNitrogenEquation::Nrc2021,
        MicrobialNitrogenEquation::VtLinear,
        MicrobialNitrogenEquation::VtNonLinear,
    ];

    fn code(&self) -> i64 {
        match self {
            MicrobialNitrogenEquation::Nrc2021 => 1,
            MicrobialNitrogenEquation::VtLinear => 2,
            MicrobialNitrogenEquation::VtNonLinear => 3,
        }
    }
}

/// Milk protein predictor (`mPrt_eqn`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MilkProteinEquation {
    Target,
    Nrc2021,
    Vt1,
    Vt2,
}

impl MilkProteinEquation {
    /// Suffix of the coefficient family used by this predictor.
    ///
    /// The target predictor still needs a family for the maximum-response
    /// terms and uses the NRC one.
    pub fn source(&self) -> &'static str {
        match self {
            MilkProteinEquation::Target | MilkProteinEquation::Nrc2021 => "NRC",
            MilkProteinEquation::Vt1 => "VT1",
            MilkProteinEquation::Vt2 => "VT2",
        }
    }

    /// Name of the regression prediction. The target predictor still
    /// reports the NRC regression alongside the copied target.
    pub fn variant_name(&self) -> &'static str {
        match self {
            MilkProteinEquation::Target | MilkProteinEquation::Nrc2021 => "Mlk_NP_g_NRC",
            MilkProteinEquation::Vt1 => "Mlk_NP_g_VT1",
            MilkProteinEquation::Vt2 => "Mlk_NP_g_VT2",
        }
    }
}

impl Selector for MilkProteinEquation {
    const KEY: &'static str = "mPrt_eqn";
    const VARIANTS: &'static [Self] = &[
        MilkProteinEquation::Target,
        MilkProteinEquation::Nrc2021,
        MilkProteinEquation::Vt1,
        MilkProteinEquation::Vt2,
    ];

    fn code(&self) -> i64 {
        match self {
            MilkProteinEquation::Target => 0,
            MilkProteinEquation::Nrc2021 => 1,
            MilkProteinEquation::Vt1 => 2,
            MilkProteinEquation::Vt2 => 3,
        }
    }
}

/// Milk fat predictor (`mFat_eqn`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MilkFatEquation {
    Target,
    Regression,
}

impl Selector for MilkFatEquation {
    const KEY: &'static str = "mFat_eqn";
    const VARIANTS: &'static [Self] = &[MilkFatEquation::Target, MilkFatEquation::Regression];

    fn code(&self) -> i64 {
        match self {
            MilkFatEquation::Target => 0,
            MilkFatEquation::Regression => 1,
        }
    }
}

/// A yes/no selector, such as whether monensin is fed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Toggle {
    Off,
    On,
}

impl Toggle {
    pub fn is_on(&self) -> bool {
        matches!(self, Toggle::On)
    }

    fn from_flag(key: &str, value: i64) -> NasemResult<Self> {
        match value {
            0 => Ok(Toggle::Off),
            1 => Ok(Toggle::On),
            _ => Err(NasemError::InvalidSelector {
                key: key.to_string(),
                value,
            }),
        }
    }
}

/// Equation selection after validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedSelection {
    pub ndf_digestibility: NdfDigestibility,
    pub dmi: DmiEquation,
    pub milk_production: MilkProductionEquation,
    pub microbial_nitrogen: MicrobialNitrogenEquation,
    pub non_milk_cp_discount: Toggle,
    pub monensin: Toggle,
    pub milk_protein: MilkProteinEquation,
    pub milk_fat: MilkFatEquation,
    pub rumen_development_discount: Toggle,
}

impl EquationSelection {
    /// Convert every selector integer to its typed variant.
    pub fn resolve(&self) -> NasemResult<ResolvedSelection> {
        Ok(ResolvedSelection {
            ndf_digestibility: NdfDigestibility::from_code(self.use_dndf_iv)?,
            dmi: DmiEquation::from_code(self.dmin_eqn)?,
            milk_production: MilkProductionEquation::from_code(self.mprod_eqn)?,
            microbial_nitrogen: MicrobialNitrogenEquation::from_code(self.min_eqn)?,
            non_milk_cp_discount: Toggle::from_flag("NonMilkCP_ClfLiq", self.non_milk_cp_clf_liq)?,
            monensin: Toggle::from_flag("Monensin_eqn", self.monensin_eqn)?,
            milk_protein: MilkProteinEquation::from_code(self.mprt_eqn)?,
            milk_fat: MilkFatEquation::from_code(self.mfat_eqn)?,
            rumen_development_discount: Toggle::from_flag("RumDevDisc_Clf", self.rum_dev_disc_clf)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_codes_roundtrip<S: Selector + PartialEq + std::fmt::Debug>() {
        for (i, variant) in S::VARIANTS.iter().enumerate() {
            assert_eq!(S::from_code(variant.code()).unwrap(), *variant);
            for other in S::VARIANTS.iter().skip(i + 1) {
                assert_ne!(variant.code(), other.code());
            }
        }
    }

    #[test]
    fn test_codes_are_distinct() {
        assert_codes_roundtrip::<NdfDigestibility>();
        assert_codes_roundtrip::<DmiEquation>();
        assert_codes_roundtrip::<MilkProductionEquation>();
        assert_codes_roundtrip::<MicrobialNitrogenEquation>();
        assert_codes_roundtrip::<MilkProteinEquation>();
        assert_codes_roundtrip::<MilkFatEquation>();
    }

    #[test]
    fn test_dmi_codes_cover_range() {
        for code in 0..=17 {
            assert_eq!(DmiEquation::from_code(code).unwrap().code(), code);
        }
        assert_eq!(
            DmiEquation::from_code(18).unwrap_err(),
            NasemError::InvalidSelector {
                key: "DMIn_eqn".to_string(),
                value: 18
            }
        );
    }

    #[test]
    fn test_microbial_codes_start_at_one() {
        assert!(MicrobialNitrogenEquation::from_code(0).is_err());
        assert_eq!(
            MicrobialNitrogenEquation::from_code(3).unwrap(),
            MicrobialNitrogenEquation::VtNonLinear
        );
    }

    #[test]
    fn test_resolve_reports_offending_key() {
        let selection = EquationSelection {
            monensin_eqn: 2,
            ..EquationSelection::default()
        };
        assert_eq!(
            selection.resolve().unwrap_err(),
            NasemError::InvalidSelector {
                key: "Monensin_eqn".to_string(),
                value: 2
            }
        );

        let resolved = EquationSelection::default().resolve().unwrap();
        assert_eq!(resolved.dmi, DmiEquation::Lact1);
        assert_eq!(resolved.microbial_nitrogen, MicrobialNitrogenEquation::Nrc2021);
        assert!(!resolved.monensin.is_on());
    }
}
