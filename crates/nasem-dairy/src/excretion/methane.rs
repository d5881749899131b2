//! Gaseous energy loss regressions
//!
//! Each physiological state has its own regression; the one applied is
//! chosen in [`crate::dispatch::methane`].

/// Density of methane at standard conditions, g/L
pub const CH4_DENSITY: f64 = 0.716;

/// Lactating cows, Mcal/d, from DMI (kg/d), dietary FA (% DM) and
/// digestible NDF (% DM).
pub fn lactating_gas_energy(dmi: f64, fa_pct: f64, dig_ndf_pct: f64) -> f64 {
    0.294 * dmi - 0.347 * fa_pct + 0.0409 * dig_ndf_pct
}

/// Heifers, Mcal/d, from gross energy intake (Mcal/d) and dietary NDF (% DM).
pub fn heifer_gas_energy(ge_in: f64, ndf_pct: f64) -> f64 {
    -0.038 + 0.051 * ge_in - 0.0091 * ndf_pct
}

/// Dry cows, Mcal/d, from gross energy intake (Mcal/d) and dietary FA (% DM).
pub fn dry_cow_gas_energy(ge_in: f64, fa_pct: f64) -> f64 {
    -0.69 + 0.053 * ge_in - 0.0789 * fa_pct
}

/// Methane mass, g/d, from gaseous energy (Mcal/d) and the energy content
/// of methane (Mcal/g).
pub fn methane_mass(gas_energy: f64, energy_per_g: f64) -> f64 {
    gas_energy / energy_per_g
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lactating_regression() {
        assert_relative_eq!(
            lactating_gas_energy(25.0, 3.5, 20.0),
            7.35 - 1.2145 + 0.818,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_fat_lowers_dry_cow_loss() {
        assert!(dry_cow_gas_energy(50.0, 5.0) < dry_cow_gas_energy(50.0, 2.0));
        assert!(heifer_gas_energy(40.0, 45.0) < heifer_gas_energy(40.0, 30.0));
    }
}
