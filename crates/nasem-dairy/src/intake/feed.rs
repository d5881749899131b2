//! Feed-level intakes
//!
//! Splits the selected dry matter intake over the feeds of the ration and
//! aggregates their protein, starch, fat and amino-acid flows to diet level.

use crate::inputs::feed_aa_column;
use nasem_core::amino_acids::AminoAcid;
use nasem_core::component::{
    Component, EvaluationContext, InputState, OutputState, RequirementDefinition,
};
use nasem_core::errors::{NasemError, NasemResult};
use nasem_core::math::checked_div;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Per-feed intakes and their diet totals.
///
/// Intakes are in kg/d except amino acids, which are in g/d.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedIntakes {}

impl FeedIntakes {
    pub fn new() -> Self {
        Self {}
    }
}

fn per_feed_inputs() -> Vec<String> {
    let mut names: Vec<String> = [
        "Fd_DMInp",
        "Fd_CP",
        "Fd_RUP_base",
        "Fd_dcRUP",
        "Fd_St",
        "Fd_dcSt",
        "Fd_FA",
        "Fd_dcFA",
    ]
    .iter()
    .map(|n| n.to_string())
    .collect();
    names.extend(AminoAcid::ALL.iter().map(|&aa| feed_aa_column(aa)));
    names
}

fn check_lengths(columns: &[(&str, &Array1<f64>)]) -> NasemResult<()> {
    let n = columns.first().map(|(_, c)| c.len()).unwrap_or(0);
    for (name, column) in columns {
        if column.len() != n {
            return Err(NasemError::domain(
                "FeedIntakes",
                format!("{name} has {} rows, expected {n}", column.len()),
            ));
        }
    }
    Ok(())
}

#[typetag::serde]
impl Component for FeedIntakes {
    fn definitions(&self) -> Vec<RequirementDefinition> {
        let mut definitions = vec![RequirementDefinition::scalar_input("Dt_DMIn", "kg/d")];
        definitions.extend(
            per_feed_inputs()
                .iter()
                .map(|n| RequirementDefinition::per_feed_input(n, "%")),
        );
        definitions.extend([
            RequirementDefinition::per_feed_output("Fd_DMIn", "kg/d"),
            RequirementDefinition::per_feed_output("Fd_CPIn", "kg/d"),
            RequirementDefinition::per_feed_output("Fd_RUPIn", "kg/d"),
            RequirementDefinition::per_feed_output("Fd_idRUPIn", "kg/d"),
            RequirementDefinition::scalar_output("Dt_CPIn", "kg/d"),
            RequirementDefinition::scalar_output("Dt_RUPIn", "kg/d"),
            RequirementDefinition::scalar_output("Dt_idRUPIn", "kg/d"),
            RequirementDefinition::scalar_output("Dt_StIn", "kg/d"),
            RequirementDefinition::scalar_output("Dt_DigStIn_Base", "kg/d"),
            RequirementDefinition::scalar_output("Dt_FAIn", "kg/d"),
            RequirementDefinition::scalar_output("Dt_DigFAIn", "kg/d"),
            RequirementDefinition::scalar_output("Dt_CP", "% DM"),
            RequirementDefinition::scalar_output("Dt_St", "% DM"),
            RequirementDefinition::scalar_output("Dt_FA", "% DM"),
            RequirementDefinition::series_output("Dt_AAIn", "g/d"),
            RequirementDefinition::series_output("Dt_IdAARUPIn", "g/d"),
        ]);
        definitions
    }

    fn solve(
        &self,
        input_state: &InputState,
        context: &EvaluationContext,
    ) -> NasemResult<OutputState> {
        let dmi = input_state.scalar("Dt_DMIn")?;
        let dm_share = input_state.per_feed("Fd_DMInp")?;
        let cp = input_state.per_feed("Fd_CP")?;
        let rup = input_state.per_feed("Fd_RUP_base")?;
        let dc_rup = input_state.per_feed("Fd_dcRUP")?;
        let starch = input_state.per_feed("Fd_St")?;
        let dc_starch = input_state.per_feed("Fd_dcSt")?;
        let fa = input_state.per_feed("Fd_FA")?;
        let dc_fa = input_state.per_feed("Fd_dcFA")?;
        check_lengths(&[
            ("Fd_DMInp", dm_share),
            ("Fd_CP", cp),
            ("Fd_RUP_base", rup),
            ("Fd_dcRUP", dc_rup),
            ("Fd_St", starch),
            ("Fd_dcSt", dc_starch),
            ("Fd_FA", fa),
            ("Fd_dcFA", dc_fa),
        ])?;

        // Shares are renormalised so a ration that does not sum to 100 % still uses all of the DMI
        let share_total = dm_share.sum();
        let fraction = checked_div("Fd_DMIn", 1.0, share_total)?;
        let fd_dmi = dm_share.mapv(|p| p * fraction * dmi);
        let fd_cp = &fd_dmi * cp / 100.0;
        let fd_rup = &fd_cp * rup / 100.0;
        let fd_id_rup = &fd_rup * dc_rup / 100.0;
        let fd_starch = &fd_dmi * starch / 100.0;
        let fd_dig_starch = &fd_starch * dc_starch / 100.0;
        let fd_fa = &fd_dmi * fa / 100.0;
        let fd_dig_fa = &fd_fa * dc_fa / 100.0;

        let cp_in = fd_cp.sum();
        let starch_in = fd_starch.sum();
        let fa_in = fd_fa.sum();

        let aa_content = |aa: AminoAcid| {
            let name = feed_aa_column(aa);
            let content = input_state.per_feed(&name)?;
            check_lengths(&[("Fd_DMInp", dm_share), (name.as_str(), content)])?;
            Ok::<&Array1<f64>, NasemError>(content)
        };
        let aa_in = context
            .try_series_from_fn(|aa| Ok((&fd_cp * aa_content(aa)?).sum() * 1000.0 / 100.0))?;
        let id_aa_rup = context
            .try_series_from_fn(|aa| Ok((&fd_id_rup * aa_content(aa)?).sum() * 1000.0 / 100.0))?;

        let mut output = OutputState::new();
        output
            .set_scalar("Dt_CPIn", cp_in)
            .set_scalar("Dt_RUPIn", fd_rup.sum())
            .set_scalar("Dt_idRUPIn", fd_id_rup.sum())
            .set_scalar("Dt_StIn", starch_in)
            .set_scalar("Dt_DigStIn_Base", fd_dig_starch.sum())
            .set_scalar("Dt_FAIn", fa_in)
            .set_scalar("Dt_DigFAIn", fd_dig_fa.sum())
            .set_scalar("Dt_CP", checked_div("Dt_CP", cp_in, dmi)? * 100.0)
            .set_scalar("Dt_St", checked_div("Dt_St", starch_in, dmi)? * 100.0)
            .set_scalar("Dt_FA", checked_div("Dt_FA", fa_in, dmi)? * 100.0)
            .set_series("Dt_AAIn", aa_in)
            .set_series("Dt_IdAARUPIn", id_aa_rup)
            .set_per_feed("Fd_DMIn", fd_dmi)
            .set_per_feed("Fd_CPIn", fd_cp)
            .set_per_feed("Fd_RUPIn", fd_rup)
            .set_per_feed("Fd_idRUPIn", fd_id_rup);
        Ok(output)
    }
}
