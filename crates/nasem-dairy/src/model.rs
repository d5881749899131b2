//! Assembly of the full NASEM dairy model
//!
//! [`NasemModel`] turns the typed inputs into exogenous namespace values,
//! resolves the equation selection and registers one instance of every
//! component. Solve order is left to the dependency graph.

use crate::digestion::{
    AminoAcidAbsorption, DigestibleEnergy, FiberDigestion, MetabolizableEnergy, ProteinDigestion,
    StarchFatDigestion,
};
use crate::dispatch::intake::IntakeSelection;
use crate::dispatch::methane::Methane;
use crate::dispatch::microbial::MicrobialSelection;
use crate::dispatch::milk::{MilkFatSelection, MilkProductionSelection, MilkProteinSelection};
use crate::dispatch::ResolvedSelection;
use crate::excretion::{Urine, Water};
use crate::inputs::{AnimalInput, DietSummary, EquationSelection, FeedTable, InfusionInput};
use crate::intake::{AnimalIntakes, DietIntakes, FeedIntakes, Infusions};
use crate::milk::{MaxMilkProtein, MilkAllowances, MilkComposition, MilkSummary, TargetMilk};
use crate::parameters::default_coefficients;
use crate::requirements::{
    BodyComposition, BodyWeight, EnergyRequirement, Gestation, Minerals, ProteinRequirement,
    TargetAminoAcids,
};
use crate::rumen::{MicrobialFlows, RumenDigestion};
use log::debug;
use nasem_core::amino_acids::AminoAcid;
use nasem_core::coefficients::CoefficientSet;
use nasem_core::component::Component;
use nasem_core::errors::NasemResult;
use nasem_core::model::{Model, ModelBuilder};
use nasem_core::namespace::NamespaceSnapshot;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Inputs of one evaluation of the dairy model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NasemModel {
    pub animal: AnimalInput,
    pub diet: DietSummary,
    pub feeds: FeedTable,
    #[serde(default)]
    pub selection: EquationSelection,
    #[serde(default)]
    pub infusion: InfusionInput,
    #[serde(default = "default_coefficients")]
    pub coefficients: CoefficientSet,
    #[serde(default = "canonical_order")]
    pub aa_order: Vec<AminoAcid>,
}

fn canonical_order() -> Vec<AminoAcid> {
    AminoAcid::ALL.to_vec()
}

impl NasemModel {
    /// A model with the default equation selection, no infusion and the
    /// NASEM coefficient tables.
    pub fn new(animal: AnimalInput, diet: DietSummary, feeds: FeedTable) -> Self {
        Self {
            animal,
            diet,
            feeds,
            selection: EquationSelection::default(),
            infusion: InfusionInput::default(),
            coefficients: default_coefficients(),
            aa_order: canonical_order(),
        }
    }

    pub fn with_selection(mut self, selection: EquationSelection) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_infusion(mut self, infusion: InfusionInput) -> Self {
        self.infusion = infusion;
        self
    }

    pub fn with_coefficients(mut self, coefficients: CoefficientSet) -> Self {
        self.coefficients = coefficients;
        self
    }

    pub fn with_aa_order(mut self, order: Vec<AminoAcid>) -> Self {
        self.aa_order = order;
        self
    }

    /// One instance of every component, configured for the animal and selection.
    pub fn components(&self, selection: &ResolvedSelection) -> Vec<Arc<dyn Component>> {
        let state = self.animal.state;
        vec![
            // Intake
            Arc::new(Infusions::new(self.infusion.location)),
            Arc::new(FeedIntakes::new()),
            Arc::new(IntakeSelection::new(selection.dmi, selection.monensin)),
            Arc::new(DietIntakes::new()),
            Arc::new(AnimalIntakes::new()),
            // Rumen
            Arc::new(RumenDigestion::new()),
            Arc::new(MicrobialSelection::new(selection.microbial_nitrogen)),
            Arc::new(MicrobialFlows::new()),
            // Digestion
            Arc::new(FiberDigestion::new(selection.ndf_digestibility)),
            Arc::new(StarchFatDigestion::new()),
            Arc::new(ProteinDigestion::new(state, selection.non_milk_cp_discount)),
            Arc::new(DigestibleEnergy::new()),
            Arc::new(AminoAcidAbsorption::new()),
            // Requirements
            Arc::new(Gestation::new()),
            Arc::new(BodyWeight::new(state)),
            Arc::new(BodyComposition::new(state)),
            Arc::new(EnergyRequirement::new(state)),
            Arc::new(ProteinRequirement::new(state)),
            Arc::new(TargetAminoAcids::new(state)),
            Arc::new(Minerals::new(state, self.animal.breed)),
            // Milk
            Arc::new(TargetMilk::new()),
            Arc::new(MaxMilkProtein::new(selection.milk_protein)),
            Arc::new(MilkProteinSelection::new(selection.milk_protein, state)),
            Arc::new(MilkFatSelection::new(selection.milk_fat, state)),
            Arc::new(MilkComposition::new()),
            Arc::new(MilkAllowances::new()),
            Arc::new(MilkProductionSelection::new(selection.milk_production, state)),
            Arc::new(MilkSummary::new()),
            // Losses and energy supply
            Arc::new(Methane::new(state, selection.monensin)),
            Arc::new(Urine::new()),
            Arc::new(MetabolizableEnergy::new(state, selection.rumen_development_discount)),
            Arc::new(Water::new(state)),
        ]
    }

    /// Validate the selection and wire every component into a model.
    pub fn build(&self) -> NasemResult<Model> {
        let selection = self.selection.resolve()?;
        debug!(
            "Assembling NASEM model for {:?} with {:?}",
            self.animal.state, selection
        );

        let mut builder = ModelBuilder::new();
        for component in self.components(&selection) {
            builder.with_component(component);
        }
        builder
            .with_exogenous_values(self.animal.exogenous_values())
            .with_exogenous_values(self.diet.exogenous_values())
            .with_exogenous_values(self.feeds.exogenous_values())
            .with_exogenous_values(self.infusion.exogenous_values())
            .with_coefficients(self.coefficients.clone())
            .with_aa_order(self.aa_order.clone());
        builder.build()
    }

    /// Build and evaluate the model, returning every computed value.
    pub fn evaluate(&self) -> NasemResult<NamespaceSnapshot> {
        self.build()?.evaluate()
    }
}

/// Evaluate the dairy model once.
pub fn evaluate(
    animal: &AnimalInput,
    selection: &EquationSelection,
    diet: &DietSummary,
    feeds: &FeedTable,
    coefficients: &CoefficientSet,
    infusion: &InfusionInput,
) -> NasemResult<NamespaceSnapshot> {
    NasemModel::new(animal.clone(), diet.clone(), feeds.clone())
        .with_selection(*selection)
        .with_coefficients(coefficients.clone())
        .with_infusion(infusion.clone())
        .evaluate()
}
