//! Dry matter intake equations
//!
//! Each function is one published intake regression. Which one is used is
//! decided by [`crate::dispatch::intake::IntakeSelection`].
//!
//! # Reference
//!
//! NASEM (2021) chapter 2. The lactating-cow equation is
//!
//! $$DMI = (3.7 + 5.7(P-1) + 0.305 NE_{milk} + 0.022 BW + (-0.689 - 1.87(P-1)) BCS)
//!        \cdot (1 - (0.212 + 0.136(P-1)) e^{-0.053 d})$$
//!
//! where $P$ is parity, $NE_{milk}$ the target milk energy output and $d$ the day of lactation.

use nasem_core::errors::NasemResult;
use nasem_core::math::{checked_div, ClampPolicy};

/// Pre-partum week used by the late-gestation equations
pub const PREPART_WEEK_CLAMP: ClampPolicy = ClampPolicy::Range { min: -3.0, max: 0.0 };
/// Dietary NDF used by the late-gestation slope
pub const PREPART_NDF_CLAMP: ClampPolicy = ClampPolicy::Range {
    min: 30.0,
    max: 55.0,
};
/// Starter intake of a calf cannot be negative
pub const CALF_STARTER_CLAMP: ClampPolicy = ClampPolicy::Floor(0.0);

/// Lactating cow intake from animal factors.
pub fn lact1(parity: f64, ne_milk_out: f64, bw: f64, bcs: f64, lact_day: f64) -> f64 {
    let multiparous = parity - 1.0;
    (3.7 + 5.7 * multiparous + 0.305 * ne_milk_out + 0.022 * bw
        + (-0.689 - 1.87 * multiparous) * bcs)
        * (1.0 - (0.212 + 0.136 * multiparous) * (-0.053 * lact_day).exp())
}

/// Lactating cow intake from diet fibre and milk yield.
pub fn lact2(
    for_ndf: f64,
    adf: f64,
    ndf: f64,
    for_dndf48: f64,
    milk_prod: f64,
) -> NasemResult<f64> {
    let adf_ndf = checked_div("Dt_DMIn_Lact2", adf, ndf)?;
    Ok(12.0 - 0.107 * for_ndf + 8.17 * adf_ndf + 0.0253 * for_dndf48
        - 0.328 * (adf_ndf - 0.602) * (for_dndf48 - 48.3)
        + 0.225 * milk_prod
        + 0.00390 * (for_dndf48 - 48.3) * (milk_prod - 33.1))
}

/// Deviation of dietary NDF from the level expected for the heifer's weight.
pub fn heifer_ndf_deviation(bw: f64, ndf: f64) -> f64 {
    ndf - (23.11 + 0.07968 * bw - 0.00006627 * bw.powi(2))
}

pub fn heifer_nrca(bw: f64, bw_mature: f64) -> NasemResult<f64> {
    let ratio = checked_div("Dt_DMIn_Heif_NRCa", bw, bw_mature)?;
    Ok(0.022 * bw_mature * (1.0 - (-1.54 * ratio).exp()))
}

pub fn heifer_nrcad(bw: f64, bw_mature: f64, ndf: f64) -> NasemResult<f64> {
    let ratio = checked_div("Dt_DMIn_Heif_NRCad", bw, bw_mature)?;
    Ok(0.0226 * bw_mature * (1.0 - (-1.47 * ratio).exp()) - 0.082 * heifer_ndf_deviation(bw, ndf))
}

/// Holstein heifer
pub fn heifer_h1(bw: f64) -> f64 {
    15.36 * (1.0 - (-0.0022 * bw).exp())
}

/// Holstein heifer, adjusted for dietary NDF
pub fn heifer_h2(bw: f64, ndf: f64) -> f64 {
    15.79 * (1.0 - (-0.0021 * bw).exp()) - 0.082 * heifer_ndf_deviation(bw, ndf)
}

/// Holstein x Jersey heifer
pub fn heifer_hj1(bw: f64) -> f64 {
    12.91 * (1.0 - (-0.00295 * bw).exp())
}

/// Holstein x Jersey heifer, adjusted for dietary NDF
pub fn heifer_hj2(bw: f64, ndf: f64) -> f64 {
    13.48 * (1.0 - (-0.0027 * bw).exp()) - 0.082 * heifer_ndf_deviation(bw, ndf)
}

/// Weeks relative to calving. Negative before calving.
pub fn prepartum_week(gest_day: f64, gest_length: f64) -> f64 {
    (gest_day - gest_length) / 7.0
}

/// Decline of intake over the last weeks of gestation
///
/// The slope depends on dietary NDF, clamped to [`PREPART_NDF_CLAMP`].
pub fn late_gestation_slope(ndf: f64) -> f64 {
    -(0.365 - 0.0028 * PREPART_NDF_CLAMP.apply(ndf))
}

/// Intake as % of BW at a given (clamped) pre-partum week.
pub fn late_gestation_intake_bw(week: f64, ndf: f64) -> f64 {
    late_gestation_slope(ndf) * PREPART_WEEK_CLAMP.apply(week) + 1.47
}

/// Start of the pre-partum decline window (`An_PrePartWkDurat`), in weeks
/// relative to calving. Twice the clamped pre-partum week.
pub fn prepartum_duration(week: f64) -> f64 {
    PREPART_WEEK_CLAMP.apply(week) * 2.0
}

/// Multiplier applied to heifer intake during the pre-partum decline.
///
/// Equal to one before `duration`. After it, intake is scaled by the ratio of
/// the late-gestation intake at the current week to that at `duration`.
pub fn prepartum_adjustment(week: f64, duration: f64, ndf: f64) -> NasemResult<f64> {
    if week <= duration {
        return Ok(1.0);
    }
    let current = late_gestation_intake_bw(week, ndf);
    let start = late_gestation_slope(ndf) * duration + 1.47;
    Ok(1.0 + checked_div("Dt_DMIn_Heif_LateGestPen", current - start, start)?)
}

/// Dry cow intake from the late-gestation curve
pub fn dry_cow1(bw: f64, gest_day: f64, gest_length: f64, ndf: f64) -> f64 {
    bw * late_gestation_intake_bw(prepartum_week(gest_day, gest_length), ndf) / 100.0
}

/// Dry cow intake with a close-up adjustment in the last three weeks
pub fn dry_cow2(bw: f64, gest_day: f64, gest_length: f64) -> f64 {
    let days_to_calving = gest_day - gest_length;
    if days_to_calving >= -21.0 {
        bw * (1.97 - 0.75 * (0.16 * days_to_calving).exp()) / 100.0
    } else {
        0.0185 * bw
    }
}

/// Calf starter intake
/// unit: kg/d
pub fn calf_starter(bw: f64, age_day: f64, age_dry_feed_start: f64, me_in_liquid: f64) -> f64 {
    if age_day < age_dry_feed_start {
        return 0.0;
    }
    let week = (age_day - age_dry_feed_start) / 7.0;
    let starter_g = -652.5 + 14.734 * bw + 18.896 * me_in_liquid + 73.3 * week
        + 13.496 * week.powi(2)
        - 29.614 * week * me_in_liquid;
    CALF_STARTER_CLAMP.apply(starter_g / 1000.0)
}

/// Calf intake as liquid feed plus starter plus forage.
pub fn calf1(
    bw: f64,
    age_day: f64,
    age_dry_feed_start: f64,
    liquid_dmi: f64,
    liquid_me: f64,
    forage_dmi: f64,
) -> f64 {
    let me_in_liquid = liquid_dmi * liquid_me;
    liquid_dmi + calf_starter(bw, age_day, age_dry_feed_start, me_in_liquid) + forage_dmi
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_lact1_reference() {
        // Primiparous cow, 25.062 kg/d at 4.55 % fat, 3.66 % TP, 4.85 % lactose
        let ne_milk = 25.062 * (9.29 * 4.55 / 100.0 + 5.85 * 3.66 / 100.0 + 3.95 * 4.85 / 100.0);
        let dmi = lact1(1.0, ne_milk, 624.795, 3.0, 100.0);
        assert_relative_eq!(dmi, 21.687577670699824, max_relative = 1e-4);
    }

    #[test]
    fn test_lact2_requires_ndf() {
        assert!(lact2(20.0, 18.0, 0.0, 50.0, 35.0).is_err());
        let dmi = lact2(20.0, 18.0, 30.0, 48.3, 33.1).unwrap();
        assert_relative_eq!(
            dmi,
            12.0 - 2.14 + 8.17 * 0.6 + 0.0253 * 48.3 + 0.225 * 33.1,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_heifer_equations_increase_with_weight() {
        for f in [heifer_h1, heifer_hj1] {
            assert!(f(400.0) > f(200.0));
        }
        assert!(heifer_nrca(400.0, 700.0).unwrap() > heifer_nrca(200.0, 700.0).unwrap());
        assert!(heifer_nrca(400.0, 0.0).is_err());
    }

    #[test]
    fn test_ndf_adjustment_lowers_intake_for_fibrous_diet() {
        let bw = 350.0;
        let expected_ndf = 23.11 + 0.07968 * bw - 0.00006627 * bw * bw;
        assert_abs_diff_eq!(heifer_ndf_deviation(bw, expected_ndf), 0.0, epsilon = 1e-9);
        assert!(heifer_h2(bw, expected_ndf + 10.0) < heifer_h2(bw, expected_ndf));
    }

    #[test]
    fn test_prepartum_week_clamps() {
        assert_eq!(late_gestation_intake_bw(-10.0, 40.0), late_gestation_intake_bw(-3.0, 40.0));
        assert_eq!(late_gestation_intake_bw(2.0, 40.0), 1.47);
        // NDF outside [30, 55] behaves like the nearest bound
        assert_eq!(late_gestation_slope(10.0), late_gestation_slope(30.0));
        assert_eq!(late_gestation_slope(70.0), late_gestation_slope(55.0));
    }

    fn adjustment_at(gest_day: f64) -> f64 {
        let week = prepartum_week(gest_day, 280.0);
        prepartum_adjustment(week, prepartum_duration(week), 40.0).unwrap()
    }

    #[test]
    fn test_prepartum_duration() {
        assert_eq!(prepartum_duration(-1.0), -2.0);
        assert_eq!(prepartum_duration(-10.0), -6.0);
        assert_eq!(prepartum_duration(1.0), 0.0);
    }

    #[test]
    fn test_prepartum_adjustment() {
        // Far from calving the adjustment is inactive
        assert_eq!(adjustment_at(200.0), 1.0);
        // The window closes at calving
        assert_eq!(adjustment_at(280.0), 1.0);
        let one_week = adjustment_at(273.0);
        let slope = late_gestation_slope(40.0);
        assert_relative_eq!(
            one_week,
            (slope * -1.0 + 1.47) / (slope * -2.0 + 1.47),
            max_relative = 1e-12
        );
        assert!(one_week < 1.0);
    }

    /// The reference week moves with the duration rather than a fixed start.
    #[test]
    fn test_prepartum_adjustment_follows_duration() {
        let slope = late_gestation_slope(40.0);
        assert_relative_eq!(
            prepartum_adjustment(-2.0, -4.0, 40.0).unwrap(),
            (slope * -2.0 + 1.47) / (slope * -4.0 + 1.47),
            max_relative = 1e-12
        );
        assert_relative_eq!(
            prepartum_adjustment(-2.0, -2.5, 40.0).unwrap(),
            (slope * -2.0 + 1.47) / (slope * -2.5 + 1.47),
            max_relative = 1e-12
        );
        assert_eq!(prepartum_adjustment(-2.0, -2.0, 40.0).unwrap(), 1.0);
    }

    #[test]
    fn test_dry_cow2_close_up() {
        assert_relative_eq!(dry_cow2(700.0, 200.0, 280.0), 12.95, max_relative = 1e-12);
        assert_relative_eq!(dry_cow2(700.0, 280.0, 280.0), 8.54, max_relative = 1e-12);
    }

    #[test]
    fn test_calf_starter() {
        assert_eq!(calf_starter(50.0, 5.0, 10.0, 4.0), 0.0);
        let starter = calf_starter(70.0, 45.0, 3.0, 4.0);
        assert!(starter > 0.0);
        assert_relative_eq!(
            calf1(70.0, 45.0, 3.0, 0.8, 5.0, 0.1),
            0.9 + starter,
            max_relative = 1e-12
        );
    }
}
