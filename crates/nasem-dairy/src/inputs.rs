//! Typed model inputs.
//!
//! Field names follow the canonical NASEM variable names when serialised, so
//! input files written for other NASEM implementations can be read directly.
//! Each input knows how to turn itself into the exogenous namespace values the
//! equation graph reads.

use nasem_core::amino_acids::AminoAcid;
use nasem_core::errors::{NasemError, NasemResult};
use nasem_core::namespace::StateValue;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Physiological state of the animal. Several equations branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhysiologicalState {
    Calf,
    Heifer,
    #[serde(rename = "Dry Cow")]
    DryCow,
    #[serde(rename = "Lactating Cow")]
    LactatingCow,
    Other,
}

impl PhysiologicalState {
    pub fn is_lactating(&self) -> bool {
        matches!(self, PhysiologicalState::LactatingCow)
    }

    pub fn is_calf(&self) -> bool {
        matches!(self, PhysiologicalState::Calf)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Breed {
    Holstein,
    Jersey,
    Other,
}

/// Description of the animal being fed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimalInput {
    /// Parity, 1 for primiparous, 2 for multiparous. Fractional values average the two.
    #[serde(rename = "An_Parity_rl")]
    pub parity: f64,
    /// unit: kg/d
    #[serde(rename = "Trg_MilkProd")]
    pub target_milk_prod: f64,
    /// unit: kg
    #[serde(rename = "An_BW")]
    pub bw: f64,
    /// Body condition score, 1 to 5
    #[serde(rename = "An_BCS")]
    pub bcs: f64,
    /// unit: d
    #[serde(rename = "An_LactDay")]
    pub lact_day: f64,
    /// unit: %
    #[serde(rename = "Trg_MilkFatp")]
    pub target_milk_fat_pct: f64,
    /// unit: %
    #[serde(rename = "Trg_MilkTPp")]
    pub target_milk_tp_pct: f64,
    /// unit: %
    #[serde(rename = "Trg_MilkLacp")]
    pub target_milk_lactose_pct: f64,
    /// User-entered dry matter intake, used when `DMIn_eqn` is 0
    /// unit: kg/d
    #[serde(rename = "DMI")]
    pub dmi: f64,
    /// unit: kg
    #[serde(rename = "An_BW_mature")]
    pub bw_mature: f64,
    /// Target frame gain
    /// unit: kg/d
    #[serde(rename = "Trg_FrmGain")]
    pub target_frame_gain: f64,
    /// unit: d
    #[serde(rename = "An_GestDay")]
    pub gest_day: f64,
    /// unit: d
    #[serde(rename = "An_GestLength")]
    pub gest_length: f64,
    /// Target body reserve gain, negative when mobilising reserves
    /// unit: kg/d
    #[serde(rename = "Trg_RsrvGain")]
    pub target_reserve_gain: f64,
    /// Calf birth weight
    /// unit: kg
    #[serde(rename = "Fet_BWbrth")]
    pub fetal_bw_birth: f64,
    /// unit: d
    #[serde(rename = "An_AgeDay")]
    pub age_day: f64,
    /// Rolling herd average milk true protein
    /// unit: kg/305 d
    #[serde(rename = "An_305RHA_MlkTP")]
    pub rha_milk_tp: f64,
    #[serde(rename = "An_StatePhys")]
    pub state: PhysiologicalState,
    #[serde(rename = "An_Breed")]
    pub breed: Breed,
    /// Age at which dry feed was first offered to a calf
    /// unit: d
    #[serde(rename = "An_AgeDryFdStart")]
    pub age_dry_feed_start: f64,
    /// unit: °C
    #[serde(rename = "Env_TempCurr")]
    pub temp_current: f64,
    /// unit: m
    #[serde(rename = "Env_DistParlor")]
    pub dist_parlor: f64,
    /// unit: trips/d
    #[serde(rename = "Env_TripsParlor")]
    pub trips_parlor: f64,
    /// Vertical distance walked
    /// unit: m
    #[serde(rename = "Env_Topo")]
    pub topography: f64,
}

impl AnimalInput {
    /// The animal's scalar values under their namespace names.
    pub fn exogenous_values(&self) -> Vec<(String, StateValue)> {
        [
            ("An_Parity_rl", self.parity),
            ("Trg_MilkProd", self.target_milk_prod),
            ("An_BW", self.bw),
            ("An_BCS", self.bcs),
            ("An_LactDay", self.lact_day),
            ("Trg_MilkFatp", self.target_milk_fat_pct),
            ("Trg_MilkTPp", self.target_milk_tp_pct),
            ("Trg_MilkLacp", self.target_milk_lactose_pct),
            ("Trg_Dt_DMIn", self.dmi),
            ("An_BW_mature", self.bw_mature),
            ("Trg_FrmGain", self.target_frame_gain),
            ("An_GestDay", self.gest_day),
            ("An_GestLength", self.gest_length),
            ("Trg_RsrvGain", self.target_reserve_gain),
            ("Fet_BWbrth", self.fetal_bw_birth),
            ("An_AgeDay", self.age_day),
            ("An_305RHA_MlkTP", self.rha_milk_tp),
            ("An_AgeDryFdStart", self.age_dry_feed_start),
            ("Env_TempCurr", self.temp_current),
            ("Env_DistParlor", self.dist_parlor),
            ("Env_TripsParlor", self.trips_parlor),
            ("Env_Topo", self.topography),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), StateValue::Scalar(value)))
        .collect()
    }
}

/// Integer selectors choosing among alternative equations.
///
/// Values are validated when the model is assembled; see [`crate::dispatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EquationSelection {
    /// NDF digestibility basis: 0 lignin, 1 in vitro for forages, 2 in vitro for all feeds
    #[serde(rename = "Use_DNDF_IV")]
    pub use_dndf_iv: i64,
    /// Dry matter intake equation, 0 to 17
    #[serde(rename = "DMIn_eqn")]
    pub dmin_eqn: i64,
    /// Milk production equation, 0 to 4
    #[serde(rename = "mProd_eqn")]
    pub mprod_eqn: i64,
    /// Microbial nitrogen equation, 1 to 3
    #[serde(rename = "MiN_eqn")]
    pub min_eqn: i64,
    /// Discount digestibility of non-milk protein in calf liquid feed, 0 or 1
    #[serde(rename = "NonMilkCP_ClfLiq")]
    pub non_milk_cp_clf_liq: i64,
    /// Monensin fed, 0 or 1
    #[serde(rename = "Monensin_eqn")]
    pub monensin_eqn: i64,
    /// Milk protein equation, 0 to 3
    #[serde(rename = "mPrt_eqn")]
    pub mprt_eqn: i64,
    /// Milk fat equation, 0 or 1
    #[serde(rename = "mFat_eqn")]
    pub mfat_eqn: i64,
    /// Discount calf ME for an undeveloped rumen, 0 or 1
    #[serde(rename = "RumDevDisc_Clf")]
    pub rum_dev_disc_clf: i64,
}

impl Default for EquationSelection {
    fn default() -> Self {
        Self {
            use_dndf_iv: 0,
            dmin_eqn: 8,
            mprod_eqn: 1,
            min_eqn: 1,
            non_milk_cp_clf_liq: 0,
            monensin_eqn: 0,
            mprt_eqn: 1,
            mfat_eqn: 1,
            rum_dev_disc_clf: 0,
        }
    }
}

/// Site of an infusion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InfusionLocation {
    #[default]
    Rumen,
    #[serde(rename = "Abomasum or Duodenum", alias = "Abomasum", alias = "Duodenum")]
    AbomasumOrDuodenum,
    #[serde(rename = "Jugular or Arterial", alias = "Jugular", alias = "Arterial")]
    JugularOrArterial,
}

/// Infused nutrients. All rates default to zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfusionInput {
    #[serde(rename = "Inf_Location")]
    pub location: InfusionLocation,
    /// unit: g/d
    #[serde(rename = "Inf_CP_g")]
    pub cp_g: f64,
    /// unit: g/d
    #[serde(rename = "Inf_St_g")]
    pub starch_g: f64,
    /// unit: g/d
    #[serde(rename = "Inf_NDF_g")]
    pub ndf_g: f64,
    /// unit: g/d
    #[serde(rename = "Inf_ADF_g")]
    pub adf_g: f64,
    /// unit: g/d
    #[serde(rename = "Inf_Glc_g")]
    pub glucose_g: f64,
    /// unit: g/d
    #[serde(rename = "Inf_FA_g")]
    pub fa_g: f64,
    /// unit: g/d
    #[serde(rename = "Inf_Acet_g")]
    pub acetate_g: f64,
    /// unit: g/d
    #[serde(rename = "Inf_Prop_g")]
    pub propionate_g: f64,
    /// unit: g/d
    #[serde(rename = "Inf_Butr_g")]
    pub butyrate_g: f64,
    #[serde(rename = "Inf_Arg_g")]
    pub arg_g: f64,
    #[serde(rename = "Inf_His_g")]
    pub his_g: f64,
    #[serde(rename = "Inf_Ile_g")]
    pub ile_g: f64,
    #[serde(rename = "Inf_Leu_g")]
    pub leu_g: f64,
    #[serde(rename = "Inf_Lys_g")]
    pub lys_g: f64,
    #[serde(rename = "Inf_Met_g")]
    pub met_g: f64,
    #[serde(rename = "Inf_Phe_g")]
    pub phe_g: f64,
    #[serde(rename = "Inf_Thr_g")]
    pub thr_g: f64,
    #[serde(rename = "Inf_Trp_g")]
    pub trp_g: f64,
    #[serde(rename = "Inf_Val_g")]
    pub val_g: f64,
    /// Intestinal digestibility of infused protein
    /// unit: %
    #[serde(rename = "Inf_dcRUP")]
    pub dc_rup: f64,
    /// unit: %
    #[serde(rename = "Inf_dcFA")]
    pub dc_fa: f64,
    /// unit: %
    #[serde(rename = "Inf_ttdcSt")]
    pub ttdc_starch: f64,
    /// unit: %
    #[serde(rename = "Inf_ttdcNDF")]
    pub ttdc_ndf: f64,
}

impl InfusionInput {
    pub fn amino_acid(&self, aa: AminoAcid) -> f64 {
        match aa {
            AminoAcid::Arg => self.arg_g,
            AminoAcid::His => self.his_g,
            AminoAcid::Ile => self.ile_g,
            AminoAcid::Leu => self.leu_g,
            AminoAcid::Lys => self.lys_g,
            AminoAcid::Met => self.met_g,
            AminoAcid::Phe => self.phe_g,
            AminoAcid::Thr => self.thr_g,
            AminoAcid::Trp => self.trp_g,
            AminoAcid::Val => self.val_g,
        }
    }

    /// Infusion rates under their namespace names. The site is carried by the
    /// infusion component, not the namespace.
    pub fn exogenous_values(&self) -> Vec<(String, StateValue)> {
        let mut values: Vec<(String, f64)> = [
            ("Inf_CP_g", self.cp_g),
            ("Inf_St_g", self.starch_g),
            ("Inf_NDF_g", self.ndf_g),
            ("Inf_ADF_g", self.adf_g),
            ("Inf_Glc_g", self.glucose_g),
            ("Inf_FA_g", self.fa_g),
            ("Inf_Acet_g", self.acetate_g),
            ("Inf_Prop_g", self.propionate_g),
            ("Inf_Butr_g", self.butyrate_g),
            ("Inf_dcRUP", self.dc_rup),
            ("Inf_dcFA", self.dc_fa),
            ("Inf_ttdcSt", self.ttdc_starch),
            ("Inf_ttdcNDF", self.ttdc_ndf),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect();
        for aa in AminoAcid::ALL {
            values.push((aa.expand("Inf_{AA}_g"), self.amino_acid(aa)));
        }
        values
            .into_iter()
            .map(|(name, value)| (name, StateValue::Scalar(value)))
            .collect()
    }
}

/// Diet-level composition not carried by the feed table.
///
/// Values are % of dry matter unless stated otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DietSummary {
    #[serde(rename = "Dt_NDF")]
    pub ndf: f64,
    #[serde(rename = "Dt_ADF")]
    pub adf: f64,
    /// Lignin
    #[serde(rename = "Dt_Lg")]
    pub lignin: f64,
    #[serde(rename = "Dt_Ash")]
    pub ash: f64,
    /// Non-protein nitrogen as crude protein
    /// unit: % of CP
    #[serde(rename = "Dt_NPNCP")]
    pub npn_cp: f64,
    /// Forage NDF
    #[serde(rename = "Dt_ForNDF")]
    pub forage_ndf: f64,
    /// Wet forage (silages, pasture)
    #[serde(rename = "Dt_ForWet")]
    pub forage_wet: f64,
    /// 48 h in vitro NDF digestibility of forage NDF
    /// unit: % of forage NDF
    #[serde(rename = "Dt_ForDNDF48_ForNDF")]
    pub forage_dndf48: f64,
    /// 48 h in vitro NDF digestibility of dietary NDF
    /// unit: % of NDF
    #[serde(rename = "Dt_DNDF48_NDF")]
    pub dndf48: f64,
    /// Palmitic acid
    #[serde(rename = "Dt_C160")]
    pub c160: f64,
    /// Linolenic acid
    #[serde(rename = "Dt_C183")]
    pub c183: f64,
    /// Dry matter content
    /// unit: % as fed
    #[serde(rename = "Dt_DM")]
    pub dm: f64,
    #[serde(rename = "Dt_Ca")]
    pub ca: f64,
    #[serde(rename = "Dt_P")]
    pub p: f64,
    #[serde(rename = "Dt_Mg")]
    pub mg: f64,
    #[serde(rename = "Dt_Na")]
    pub na: f64,
    #[serde(rename = "Dt_K")]
    pub k: f64,
    #[serde(rename = "Dt_Cl")]
    pub cl: f64,
    /// Absorption coefficients, fraction
    #[serde(rename = "Dt_acCa")]
    pub ac_ca: f64,
    #[serde(rename = "Dt_acP")]
    pub ac_p: f64,
    #[serde(rename = "Dt_acMg")]
    pub ac_mg: f64,
    #[serde(rename = "Dt_acNa")]
    pub ac_na: f64,
    #[serde(rename = "Dt_acK")]
    pub ac_k: f64,
    #[serde(rename = "Dt_acCl")]
    pub ac_cl: f64,
    /// Calf liquid feed dry matter intake
    /// unit: kg/d
    #[serde(rename = "Dt_DMIn_ClfLiq", default)]
    pub dmin_clf_liq: f64,
    /// Calf forage dry matter intake
    /// unit: kg/d
    #[serde(rename = "Dt_DMIn_ClfFor", default)]
    pub dmin_clf_for: f64,
    /// ME density of calf liquid feed
    /// unit: Mcal/kg
    #[serde(rename = "Dt_ME_ClfLiq", default)]
    pub me_clf_liq: f64,
    /// Non-milk crude protein in calf liquid feed
    /// unit: kg/d
    #[serde(rename = "Dt_NonMilkCPIn_ClfLiq", default)]
    pub non_milk_cp_in_clf_liq: f64,
}

impl DietSummary {
    pub fn exogenous_values(&self) -> Vec<(String, StateValue)> {
        [
            ("Dt_NDF", self.ndf),
            ("Dt_ADF", self.adf),
            ("Dt_Lg", self.lignin),
            ("Dt_Ash", self.ash),
            ("Dt_NPNCP", self.npn_cp),
            ("Dt_ForNDF", self.forage_ndf),
            ("Dt_ForWet", self.forage_wet),
            ("Dt_ForDNDF48_ForNDF", self.forage_dndf48),
            ("Dt_DNDF48_NDF", self.dndf48),
            ("Dt_C160", self.c160),
            ("Dt_C183", self.c183),
            ("Dt_DM", self.dm),
            ("Dt_Ca", self.ca),
            ("Dt_P", self.p),
            ("Dt_Mg", self.mg),
            ("Dt_Na", self.na),
            ("Dt_K", self.k),
            ("Dt_Cl", self.cl),
            ("Dt_acCa", self.ac_ca),
            ("Dt_acP", self.ac_p),
            ("Dt_acMg", self.ac_mg),
            ("Dt_acNa", self.ac_na),
            ("Dt_acK", self.ac_k),
            ("Dt_acCl", self.ac_cl),
            ("Dt_DMIn_ClfLiq", self.dmin_clf_liq),
            ("Dt_DMIn_ClfFor", self.dmin_clf_for),
            ("Dt_ME_ClfLiq", self.me_clf_liq),
            ("Dt_NonMilkCPIn_ClfLiq", self.non_milk_cp_in_clf_liq),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), StateValue::Scalar(value)))
        .collect()
    }
}

/// One feed of the ration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedRow {
    #[serde(rename = "Fd_Name")]
    pub name: String,
    /// Share of ration dry matter
    /// unit: % of DM
    #[serde(rename = "Fd_DMInp")]
    pub dm_share: f64,
    /// unit: % of DM
    #[serde(rename = "Fd_CP")]
    pub cp: f64,
    /// unit: % of CP
    #[serde(rename = "Fd_RUP_base")]
    pub rup: f64,
    /// Intestinal digestibility of RUP
    /// unit: %
    #[serde(rename = "Fd_dcRUP")]
    pub dc_rup: f64,
    /// unit: % of DM
    #[serde(rename = "Fd_St")]
    pub starch: f64,
    /// Total-tract starch digestibility
    /// unit: %
    #[serde(rename = "Fd_dcSt")]
    pub dc_starch: f64,
    /// unit: % of DM
    #[serde(rename = "Fd_FA")]
    pub fa: f64,
    /// unit: %
    #[serde(rename = "Fd_dcFA")]
    pub dc_fa: f64,
    /// Amino-acid contents of crude protein
    /// unit: g/100 g CP
    #[serde(rename = "Fd_Argt_CP")]
    pub arg: f64,
    #[serde(rename = "Fd_Hist_CP")]
    pub his: f64,
    #[serde(rename = "Fd_Ilet_CP")]
    pub ile: f64,
    #[serde(rename = "Fd_Leut_CP")]
    pub leu: f64,
    #[serde(rename = "Fd_Lyst_CP")]
    pub lys: f64,
    #[serde(rename = "Fd_Mett_CP")]
    pub met: f64,
    #[serde(rename = "Fd_Phet_CP")]
    pub phe: f64,
    #[serde(rename = "Fd_Thrt_CP")]
    pub thr: f64,
    #[serde(rename = "Fd_Trpt_CP")]
    pub trp: f64,
    #[serde(rename = "Fd_Valt_CP")]
    pub val: f64,
}

impl FeedRow {
    pub fn amino_acid(&self, aa: AminoAcid) -> f64 {
        match aa {
            AminoAcid::Arg => self.arg,
            AminoAcid::His => self.his,
            AminoAcid::Ile => self.ile,
            AminoAcid::Leu => self.leu,
            AminoAcid::Lys => self.lys,
            AminoAcid::Met => self.met,
            AminoAcid::Phe => self.phe,
            AminoAcid::Thr => self.thr,
            AminoAcid::Trp => self.trp,
            AminoAcid::Val => self.val,
        }
    }
}

/// Namespace name of a feed's amino-acid content column.
pub fn feed_aa_column(aa: AminoAcid) -> String {
    aa.expand("Fd_{AA}t_CP")
}

/// The resolved ration, one row per feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedTable {
    pub feeds: Vec<FeedRow>,
}

impl FeedTable {
    pub fn new(feeds: Vec<FeedRow>) -> NasemResult<Self> {
        if feeds.is_empty() {
            return Err(NasemError::Config(
                "Feed table must contain at least one feed".to_string(),
            ));
        }
        Ok(Self { feeds })
    }

    pub fn len(&self) -> usize {
        self.feeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feeds.is_empty()
    }

    fn column<F>(&self, f: F) -> StateValue
    where
        F: Fn(&FeedRow) -> f64,
    {
        StateValue::PerFeed(self.feeds.iter().map(f).collect::<Array1<f64>>())
    }

    /// Feed columns as per-feed vectors under their namespace names.
    pub fn exogenous_values(&self) -> Vec<(String, StateValue)> {
        let mut values = vec![
            ("Fd_DMInp".to_string(), self.column(|f| f.dm_share)),
            ("Fd_CP".to_string(), self.column(|f| f.cp)),
            ("Fd_RUP_base".to_string(), self.column(|f| f.rup)),
            ("Fd_dcRUP".to_string(), self.column(|f| f.dc_rup)),
            ("Fd_St".to_string(), self.column(|f| f.starch)),
            ("Fd_dcSt".to_string(), self.column(|f| f.dc_starch)),
            ("Fd_FA".to_string(), self.column(|f| f.fa)),
            ("Fd_dcFA".to_string(), self.column(|f| f.dc_fa)),
        ];
        for aa in AminoAcid::ALL {
            values.push((feed_aa_column(aa), self.column(|f| f.amino_acid(aa))));
        }
        values
    }
}
