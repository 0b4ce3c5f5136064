//! CSV input/output: the food-access attribute table and plan files.

use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{AllocationError, Result};
use crate::types::{AllocationPlan, Tract};

/// One row of the USDA Food Access Research Atlas table. Numeric fields are
/// optional so that a blank cell surfaces as a missing attribute instead of
/// a parse failure.
#[derive(Debug, Deserialize)]
struct AtlasRecord {
    #[serde(rename = "CensusTract")]
    census_tract: String,
    #[serde(rename = "State")]
    state: String,
    #[serde(rename = "County")]
    county: String,
    #[serde(rename = "POP2010")]
    population: Option<f64>,
    #[serde(rename = "TractSNAP")]
    snap_households: Option<f64>,
    #[serde(rename = "MedianFamilyIncome")]
    median_family_income: Option<f64>,
}

/// Reads the atlas table and keeps the rows for one county/state pair.
///
/// Population and SNAP counts are required per tract; a blank cell raises
/// [`AllocationError::MissingAttribute`] rather than defaulting to zero,
/// which would skew normalization. Median income may be blank.
pub fn load_tracts(path: &Path, state: &str, county: &str) -> Result<Vec<Tract>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut tracts = Vec::new();
    for record in reader.deserialize::<AtlasRecord>() {
        let record = record?;
        if record.state != state || record.county != county {
            continue;
        }
        let population = require(record.population, &record.census_tract, "POP2010")?;
        let snap_households = require(record.snap_households, &record.census_tract, "TractSNAP")?;
        let median_family_income = record.median_family_income.filter(|v| v.is_finite());
        tracts.push(Tract::new(
            record.census_tract,
            population,
            snap_households,
            median_family_income,
        ));
    }
    if tracts.is_empty() {
        return Err(AllocationError::DegenerateInput(format!(
            "no tracts found for {county} County, {state}"
        )));
    }
    info!("loaded {} tracts for {county} County, {state}", tracts.len());
    Ok(tracts)
}

fn require(value: Option<f64>, tract: &str, field: &'static str) -> Result<u32> {
    match value {
        Some(v) if v.is_finite() && v >= 0.0 => Ok(v.round() as u32),
        _ => Err(AllocationError::MissingAttribute {
            tract: tract.to_string(),
            field,
        }),
    }
}

/// One row of a plan file, the terminal CSV output.
#[derive(Debug, Serialize, Deserialize)]
struct PlanRecord {
    #[serde(rename = "CensusTract")]
    census_tract: String,
    #[serde(rename = "POP2010")]
    population: u32,
    #[serde(rename = "TractSNAP")]
    snap_households: u32,
    #[serde(rename = "MedianFamilyIncome")]
    median_family_income: Option<f64>,
    #[serde(rename = "Assigned_Supermarkets")]
    assigned: u32,
}

/// Writes a plan next to its tract attributes, one row per tract in the
/// input order. Called only after a successful solve, so a failed run never
/// leaves a partial file behind.
pub fn write_plan(path: &Path, tracts: &[Tract], plan: &AllocationPlan) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for tract in tracts {
        writer.serialize(PlanRecord {
            census_tract: tract.geoid.clone(),
            population: tract.population,
            snap_households: tract.snap_households,
            median_family_income: tract.median_family_income,
            assigned: plan.count(&tract.geoid),
        })?;
    }
    writer.flush()?;
    info!("wrote plan for {} tracts to {}", tracts.len(), path.display());
    Ok(())
}

/// Reads a plan file back for evaluation.
pub fn read_plan(path: &Path) -> Result<(Vec<Tract>, AllocationPlan)> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut tracts = Vec::new();
    let mut counts = std::collections::BTreeMap::new();
    for record in reader.deserialize::<PlanRecord>() {
        let record = record?;
        counts.insert(record.census_tract.clone(), record.assigned);
        tracts.push(Tract::new(
            record.census_tract,
            record.population,
            record.snap_households,
            record.median_family_income,
        ));
    }
    Ok((tracts, AllocationPlan::from_counts(counts)))
}
