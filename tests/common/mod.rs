//! Shared scenarios for the integration tests.
#![allow(dead_code)]

use nasem::{AnimalInput, Breed, DietSummary, FeedRow, FeedTable, NasemModel, PhysiologicalState};

/// A primiparous Holstein at 100 days in milk.
pub fn lactating_cow() -> AnimalInput {
    AnimalInput {
        parity: 1.0,
        target_milk_prod: 25.062,
        bw: 624.795,
        bcs: 3.0,
        lact_day: 100.0,
        target_milk_fat_pct: 4.55,
        target_milk_tp_pct: 3.66,
        target_milk_lactose_pct: 4.85,
        dmi: 24.521,
        bw_mature: 700.0,
        target_frame_gain: 0.19,
        gest_day: 46.0,
        gest_length: 280.0,
        target_reserve_gain: 0.0,
        fetal_bw_birth: 44.1,
        age_day: 820.0,
        rha_milk_tp: 396.0,
        state: PhysiologicalState::LactatingCow,
        breed: Breed::Holstein,
        age_dry_feed_start: 14.0,
        temp_current: 22.0,
        dist_parlor: 500.0,
        trips_parlor: 2.0,
        topography: 0.0,
    }
}

/// A multiparous cow 30 days before calving.
pub fn dry_cow() -> AnimalInput {
    AnimalInput {
        parity: 2.0,
        target_milk_prod: 0.0,
        bw: 720.0,
        bcs: 3.25,
        lact_day: 0.0,
        target_milk_fat_pct: 0.0,
        target_milk_tp_pct: 0.0,
        target_milk_lactose_pct: 0.0,
        dmi: 13.0,
        gest_day: 250.0,
        state: PhysiologicalState::DryCow,
        target_frame_gain: 0.0,
        ..lactating_cow()
    }
}

/// A growing open heifer at 43 % of mature weight.
pub fn heifer() -> AnimalInput {
    AnimalInput {
        parity: 0.0,
        target_milk_prod: 0.0,
        bw: 300.0,
        lact_day: 0.0,
        target_milk_fat_pct: 0.0,
        target_milk_tp_pct: 0.0,
        target_milk_lactose_pct: 0.0,
        dmi: 7.5,
        gest_day: 0.0,
        age_day: 300.0,
        state: PhysiologicalState::Heifer,
        target_frame_gain: 0.8,
        ..lactating_cow()
    }
}

pub fn diet() -> DietSummary {
    DietSummary {
        ndf: 30.5,
        adf: 20.1,
        lignin: 3.1,
        ash: 7.2,
        npn_cp: 6.0,
        forage_ndf: 21.0,
        forage_wet: 40.0,
        forage_dndf48: 48.3,
        dndf48: 45.0,
        c160: 0.8,
        c183: 0.25,
        dm: 52.0,
        ca: 0.8,
        p: 0.38,
        mg: 0.3,
        na: 0.25,
        k: 1.4,
        cl: 0.35,
        ac_ca: 0.6,
        ac_p: 0.7,
        ac_mg: 0.16,
        ac_na: 0.9,
        ac_k: 0.9,
        ac_cl: 0.9,
        dmin_clf_liq: 0.0,
        dmin_clf_for: 0.0,
        me_clf_liq: 0.0,
        non_milk_cp_in_clf_liq: 0.0,
    }
}

#[allow(clippy::too_many_arguments)]
fn feed(name: &str, dm_share: f64, cp: f64, rup: f64, dc_rup: f64, starch: f64, fa: f64, aa: [f64; 10]) -> FeedRow {
    FeedRow {
        name: name.to_string(),
        dm_share,
        cp,
        rup,
        dc_rup,
        starch,
        dc_starch: 90.0,
        fa,
        dc_fa: 73.0,
        arg: aa[0],
        his: aa[1],
        ile: aa[2],
        leu: aa[3],
        lys: aa[4],
        met: aa[5],
        phe: aa[6],
        thr: aa[7],
        trp: aa[8],
        val: aa[9],
    }
}

pub fn feeds() -> FeedTable {
    FeedTable::new(vec![
        feed(
            "Corn silage",
            40.0,
            8.5,
            30.0,
            75.0,
            32.0,
            2.5,
            [2.1, 1.8, 3.6, 8.6, 2.5, 1.5, 3.9, 3.5, 0.5, 4.8],
        ),
        feed(
            "Legume haylage",
            25.0,
            21.0,
            18.0,
            70.0,
            2.0,
            2.0,
            [4.1, 1.8, 4.1, 7.2, 4.6, 1.4, 4.6, 4.0, 1.3, 5.4],
        ),
        feed(
            "Concentrate mix",
            35.0,
            24.0,
            45.0,
            88.0,
            35.0,
            4.5,
            [6.2, 2.6, 4.2, 8.4, 5.3, 1.7, 4.8, 3.8, 1.2, 4.9],
        ),
    ])
    .unwrap()
}

pub fn lactating_model() -> NasemModel {
    NasemModel::new(lactating_cow(), diet(), feeds())
}

pub fn dry_cow_model() -> NasemModel {
    NasemModel::new(dry_cow(), diet(), feeds())
}

pub fn heifer_model() -> NasemModel {
    NasemModel::new(heifer(), diet(), feeds())
}
