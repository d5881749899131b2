//! Default NASEM coefficients
//!
//! The default set matches the published NASEM (2021) parameterisation. A
//! partial TOML or JSON file can be layered on top of it with
//! [`CoefficientSet::from_toml_str_with_defaults`], and single values can be
//! swept with [`CoefficientSet::with_override`].

mod amino_acids;

pub use amino_acids::{
    default_tables, AaTable, BODY_PROFILE, GESTATION_PROFILE, MICROBIAL_PROFILE, MILK_PROFILE,
    NRC_MILK_PROTEIN, SCURF_PROFILE, TARGET_EFFICIENCY, URINARY_ENDOGENOUS_PROFILE,
    VT1_MILK_PROTEIN, VT2_MILK_PROTEIN,
};

use nasem_core::coefficients::CoefficientSet;

/// Scalar coefficients as `(name, value)` pairs.
const SCALAR_COEFFICIENTS: &[(&str, f64)] = &[
    // Gross energy of nutrients, Mcal/kg
    ("En_CP", 5.65),
    ("En_FA", 9.4),
    ("En_rOM", 4.0),
    ("En_St", 4.23),
    ("En_NDF", 4.2),
    ("En_NPNCP", 0.89),
    ("En_Glc", 3.75),
    ("En_Acet", 3.48),
    ("En_Prop", 4.96),
    ("En_Butr", 5.95),
    // Methane energy, Mcal/g
    ("En_CH4", 0.01328),
    // Energy content of body tissue gain, Mcal/kg
    ("En_Fat_Body", 9.4),
    ("En_CP_Body", 5.55),
    // Energy efficiencies
    ("Km_ME_NE_Cow", 0.66),
    ("Km_ME_NE_Heif", 0.63),
    ("Km_ME_NE_Clf", 0.69),
    ("Kl_ME_NE", 0.66),
    ("Kf_ME_RE", 0.4),
    ("Kf_ME_RE_Clf", 0.56),
    ("Kr_ME_RE_Lact", 0.75),
    ("Kr_ME_RE_Mobil", 0.89),
    ("Kr_ME_RE_Dry", 0.60),
    ("Ky_ME_NE", 0.14),
    // Protein efficiencies
    ("Km_MP_NP_Trg", 0.69),
    ("Kl_MP_NP_Trg", 0.69),
    ("Kg_MP_NP_Trg_Cow", 0.69),
    ("Ky_MP_NP_Trg", 0.33),
    ("Ky_NP_MP_Trg", 1.0),
    ("Body_NP_CP", 0.86),
    // Minimum heifer MP use, g per Mcal ME
    ("MinMPuse_Int_Heif", 53.0),
    ("MinMPuse_BW_Heif", 25.0),
    // Body composition of gain
    ("FatGain_RsrvGain", 0.622),
    ("CPGain_RsrvGain", 0.068),
    ("An_GutFill_BW", 0.18),
    ("An_GutFill_BW_Clf", 0.06),
    ("An_EBW_BW_mature", 0.85),
    // Gravid uterus
    ("UterWt_FetBWbrth", 0.2311),
    ("Uter_Ksyn", 2.42e-2),
    ("Uter_KsynDecay", 3.53e-5),
    ("Uter_Kpart", 1.08e-2),
    ("Uter_Wt_NonPreg", 0.204),
    ("GrUterWt_FetBWbrth", 1.816),
    ("GrUter_Ksyn", 2.43e-2),
    ("GrUter_KsynDecay", 2.45e-5),
    ("CP_GrUtWt", 0.123),
    ("NE_GrUtWt", 0.95),
    // Microbial nitrogen, NRC (2021)
    ("VmMiNInt", 100.8),
    ("VmMiNRDPSlp", 81.56),
    ("KmMiNRDNDF", 0.0939),
    ("KmMiNRDSt", 0.0274),
    // Microbial nitrogen, linear alternate
    ("Int_MiN_VT", 18.686),
    ("KrdSt_MiN_VT", 10.214),
    ("KrdNDF_MiN_VT", 28.976),
    ("KRDP_MiN_VT", 43.405),
    ("KrOM_MiN_VT", -11.731),
    ("KForNDF_MiN_VT", 8.895),
    ("KrOM2_MiN_VT", 2.861),
    ("KrdStxrOM_MiN_VT", 5.637),
    ("KrdNDFxForNDF_MiN_VT", -2.22),
    // Microbial nitrogen, saturating alternate
    ("Int_MiN_VTnln", 7.47),
    ("KRDP_MiN_VTnln", 0.574),
    ("KrdNDF_MiN_VTnln", 3.60),
    ("KrdSt_MiN_VTnln", 12.3),
    // Microbial protein flows
    ("fMiTP_MiCP", 0.824),
    ("SI_dcMiCP", 80.0),
    // Total-tract digestion
    ("Fe_rOMend_DMI", 3.43),
    ("dcNonMilkCP_ClfLiq", 0.6),
    ("RumDevDisc_Clf_ME", 0.10),
    // Intake and methane adjustments for monensin
    ("Monensin_DMIn_Adj", 0.973),
    ("Monensin_GasE_Adj", 0.95),
    // Milk protein, NRC (2021)
    ("mPrt_Int_NRC", -97.0),
    ("mPrt_k_BW_NRC", -0.4201),
    ("mPrt_k_DEInp_NRC", 10.79),
    ("mPrt_k_DigNDF_NRC", -4.595),
    ("mPrt_k_DEIn_StFA_NRC", 0.0),
    ("mPrt_k_DEIn_NDF_NRC", 0.0),
    ("mPrt_k_NEAA_NRC", 0.0),
    ("mPrt_k_OthAA_NRC", 0.0773),
    ("mPrt_k_EAA2_NRC", -0.00215),
    // Milk protein, first alternate
    ("mPrt_Int_VT1", -104.0),
    ("mPrt_k_BW_VT1", -0.41),
    ("mPrt_k_DEInp_VT1", 10.0),
    ("mPrt_k_DigNDF_VT1", -4.3),
    ("mPrt_k_DEIn_StFA_VT1", 0.0),
    ("mPrt_k_DEIn_NDF_VT1", 0.0),
    ("mPrt_k_NEAA_VT1", 0.0),
    ("mPrt_k_OthAA_VT1", 0.07),
    ("mPrt_k_EAA2_VT1", -0.0021),
    // Milk protein, second alternate
    ("mPrt_Int_VT2", -80.0),
    ("mPrt_k_BW_VT2", -0.38),
    ("mPrt_k_DEInp_VT2", 0.0),
    ("mPrt_k_DigNDF_VT2", 0.0),
    ("mPrt_k_DEIn_StFA_VT2", 10.8),
    ("mPrt_k_DEIn_NDF_VT2", 5.2),
    ("mPrt_k_NEAA_VT2", 0.0),
    ("mPrt_k_OthAA_VT2", 0.075),
    ("mPrt_k_EAA2_VT2", -0.0022),
    // Herd production level adjustment of maximum milk protein
    ("K_305RHA_MlkTP", 1.0),
    // Milk fat
    ("mFat_Int", 453.0),
    ("mFat_k_LactDay", -1.42),
    ("mFat_k_DMIn_FA", 24.52),
    ("mFat_k_DigC160", 0.41),
    ("mFat_k_DigC183", 1.80),
    ("mFat_k_AbsIle", 1.45),
    ("mFat_k_AbsMet", 1.34),
    // Component-based milk yield
    ("mProd_Int", 4.541),
    ("mProd_k_NP", 11.13),
    ("mProd_k_Fat", 2.648),
    ("mProd_k_DEIn", 0.1829),
    ("mProd_k_LactDay", -0.06257),
    ("mProd_k_LactDay2", 2.766e-4),
    ("mProd_k_LactDay3", 1.603e-6),
    ("mProd_k_LactDay4", -7.397e-9),
    ("mProd_k_Parity", 1.231),
];

/// The default NASEM coefficient set.
pub fn default_coefficients() -> CoefficientSet {
    let mut values: Vec<(String, f64)> = SCALAR_COEFFICIENTS
        .iter()
        .map(|(name, value)| (name.to_string(), *value))
        .collect();
    values.extend(default_tables().iter().flat_map(AaTable::entries));
    values.extend(crate::requirements::minerals::default_mineral_coefficients());
    CoefficientSet::new(values.into_iter().collect())
}
