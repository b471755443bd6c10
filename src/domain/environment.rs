//! Carbon footprint, equivalencies, savings and sequestration projections.

use serde::Serialize;

use super::entities::ShippingMethod;

/// kg CO₂ emitted per kilometre by an average passenger car.
pub const CAR_KG_PER_KM: f64 = 0.121;
/// kg CO₂ over one smartphone's lifecycle.
pub const SMARTPHONE_KG: f64 = 8.3;
/// kg CO₂ absorbed by one mature tree per year.
pub const TREE_KG_PER_YEAR: f64 = 21.0;

const ECO_SELECTED_TIMELINE_LEN: u32 = 5;
/// Last year a sequestration timeline may reach.
const MAX_TIMELINE_YEAR: u32 = 100;

/// Footprint in kg CO₂e for moving `total_weight_kg` over `distance_km`.
pub fn footprint_kg(distance_km: f64, total_weight_kg: f64, method: ShippingMethod) -> f64 {
    distance_km * (total_weight_kg / 1000.0) * method.emission_factor()
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Equivalencies {
    pub car_km: f64,
    pub smartphones: f64,
    pub tree_years: f64,
}

pub fn equivalencies(footprint_kg: f64) -> Equivalencies {
    Equivalencies {
        car_km: footprint_kg / CAR_KG_PER_KM,
        smartphones: footprint_kg / SMARTPHONE_KG,
        tree_years: footprint_kg / TREE_KG_PER_YEAR,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SequestrationPoint {
    pub year: u32,
    pub absorbed_kg: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SavingsBreakdown {
    pub co2_savings_kg: f64,
    pub remaining_co2_kg: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EnvironmentalImpact {
    pub selected_footprint_kg: f64,
    pub eco_footprint_kg: f64,
    pub selected_equivalencies: Equivalencies,
    pub eco_equivalencies: Equivalencies,
    /// selected − eco; zero or negative means no savings.
    pub savings_kg: f64,
    pub is_eco_selected: bool,
    pub percentage_reduction: f64,
    pub trees_needed: u64,
    pub years_to_absorb: f64,
    pub sequestration: Vec<SequestrationPoint>,
    pub breakdown: SavingsBreakdown,
    /// 1 (worst) to 5 (best).
    pub eco_rating: u8,
}

pub fn impact(selected_footprint_kg: f64, eco_footprint_kg: f64) -> EnvironmentalImpact {
    let savings = selected_footprint_kg - eco_footprint_kg;
    let is_eco_selected = selected_footprint_kg <= eco_footprint_kg;

    // Saturates at u64::MAX for non-finite or astronomically large savings.
    let trees_needed = (savings.max(0.0) / TREE_KG_PER_YEAR).ceil() as u64;
    let years_to_absorb = if savings <= 0.0 || trees_needed == 0 {
        0.0
    } else {
        savings / (trees_needed as f64 * TREE_KG_PER_YEAR)
    };

    let sequestration = if is_eco_selected {
        (0..ECO_SELECTED_TIMELINE_LEN)
            .map(|year| SequestrationPoint {
                year,
                absorbed_kg: 0.0,
            })
            .collect()
    } else {
        sequestration_timeline(savings, trees_needed, years_to_absorb)
    };

    let percentage_reduction = if selected_footprint_kg == 0.0 {
        0.0
    } else {
        savings / selected_footprint_kg * 100.0
    };

    EnvironmentalImpact {
        selected_footprint_kg,
        eco_footprint_kg,
        selected_equivalencies: equivalencies(selected_footprint_kg),
        eco_equivalencies: equivalencies(eco_footprint_kg),
        savings_kg: savings,
        is_eco_selected,
        percentage_reduction,
        trees_needed,
        years_to_absorb,
        sequestration,
        breakdown: SavingsBreakdown {
            co2_savings_kg: savings.max(0.0),
            remaining_co2_kg: if is_eco_selected {
                selected_footprint_kg
            } else {
                eco_footprint_kg
            },
        },
        eco_rating: eco_rating(selected_footprint_kg, eco_footprint_kg),
    }
}

fn sequestration_timeline(
    savings: f64,
    trees_needed: u64,
    years_to_absorb: f64,
) -> Vec<SequestrationPoint> {
    let last_year = (years_to_absorb.ceil() as u32)
        .saturating_add(2)
        .min(MAX_TIMELINE_YEAR);
    let yearly = trees_needed as f64 * TREE_KG_PER_YEAR;

    (0..=last_year)
        .map(|year| SequestrationPoint {
            year,
            absorbed_kg: savings.min(year as f64 * yearly),
        })
        .collect()
}

/// Rating from how far the selected footprint is above the eco baseline.
pub fn eco_rating(selected_footprint_kg: f64, eco_footprint_kg: f64) -> u8 {
    if eco_footprint_kg <= 0.0 {
        return if selected_footprint_kg <= 0.0 { 5 } else { 1 };
    }

    match selected_footprint_kg / eco_footprint_kg {
        ratio if ratio <= 1.0 => 5,
        ratio if ratio <= 1.25 => 4,
        ratio if ratio <= 1.75 => 3,
        ratio if ratio <= 2.5 => 2,
        _ => 1,
    }
}
