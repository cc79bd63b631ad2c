use std::f64::consts::PI;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ensure_positive, CoolingError, Result};

const METERS_PER_INCH: f64 = 0.0254;
/// Coffee is treated as water
const COFFEE_DENSITY: f64 = 1000.0; // kg/m³
const COFFEE_SPECIFIC_HEAT: f64 = 4186.0; // J/(kg·K)

/// Material types for coffee mugs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MugMaterial {
    #[default]
    Ceramic,
    Glass,
    #[serde(alias = "stainless")]
    StainlessSteel,
    Plastic,
}

impl MugMaterial {
    pub const ALL: [MugMaterial; 4] = [
        MugMaterial::Ceramic,
        MugMaterial::Glass,
        MugMaterial::StainlessSteel,
        MugMaterial::Plastic,
    ];

    /// Specific heat capacity in J/(kg·K)
    pub fn specific_heat(&self) -> f64 {
        match self {
            MugMaterial::Ceramic => 900.0,
            MugMaterial::Glass => 840.0,
            MugMaterial::StainlessSteel => 500.0,
            MugMaterial::Plastic => 1200.0,
        }
    }

    /// Density in kg/m³
    pub fn density(&self) -> f64 {
        match self {
            MugMaterial::Ceramic => 3000.0,
            MugMaterial::Glass => 2500.0,
            MugMaterial::StainlessSteel => 8000.0,
            MugMaterial::Plastic => 1200.0,
        }
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            MugMaterial::Ceramic => "Ceramic",
            MugMaterial::Glass => "Glass",
            MugMaterial::StainlessSteel => "Stainless Steel",
            MugMaterial::Plastic => "Plastic",
        }
    }
}

impl FromStr for MugMaterial {
    type Err = CoolingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ceramic" => Ok(MugMaterial::Ceramic),
            "glass" => Ok(MugMaterial::Glass),
            "stainless" | "stainless_steel" | "steel" => Ok(MugMaterial::StainlessSteel),
            "plastic" => Ok(MugMaterial::Plastic),
            _ => Err(CoolingError::UnknownMaterial(s.to_string())),
        }
    }
}

/// Mug geometry, approximated as an open cylinder with a solid wall.
///
/// Dimensions are in inches, as measured with a ruler. `diameter_in` is the
/// outside diameter; the coffee fills the inner cylinder up to `height_in`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Mug {
    pub material: MugMaterial,
    pub height_in: f64,
    pub diameter_in: f64,
    pub wall_thickness_in: f64,
}

impl Default for Mug {
    fn default() -> Self {
        Self {
            material: MugMaterial::Ceramic,
            height_in: 4.0,
            diameter_in: 3.0,
            wall_thickness_in: 0.1825,
        }
    }
}

impl Mug {
    /// Check that the geometry describes a real mug.
    pub fn validate(&self) -> Result<()> {
        ensure_positive("mug.height_in", self.height_in)?;
        ensure_positive("mug.diameter_in", self.diameter_in)?;
        ensure_positive("mug.wall_thickness_in", self.wall_thickness_in)?;
        if 2.0 * self.wall_thickness_in >= self.diameter_in {
            return Err(CoolingError::invalid(
                "mug.wall_thickness_in",
                self.wall_thickness_in,
                "walls leave no room for coffee",
            ));
        }
        Ok(())
    }

    fn outer_radius_m(&self) -> f64 {
        self.diameter_in * METERS_PER_INCH / 2.0
    }

    fn inner_radius_m(&self) -> f64 {
        (self.diameter_in - 2.0 * self.wall_thickness_in) * METERS_PER_INCH / 2.0
    }

    fn height_m(&self) -> f64 {
        self.height_in * METERS_PER_INCH
    }

    /// Volume of coffee a full mug holds, in m³
    pub fn coffee_volume_m3(&self) -> f64 {
        PI * self.inner_radius_m().powi(2) * self.height_m()
    }

    /// Volume of coffee a full mug holds, in ml
    pub fn coffee_volume_ml(&self) -> f64 {
        self.coffee_volume_m3() * 1e6
    }

    /// Volume of the cylindrical wall in m³ (the base is ignored)
    pub fn wall_volume_m3(&self) -> f64 {
        PI * (self.outer_radius_m().powi(2) - self.inner_radius_m().powi(2)) * self.height_m()
    }

    /// Mass of the mug walls in kg
    pub fn mug_mass_kg(&self) -> f64 {
        self.wall_volume_m3() * self.material.density()
    }

    /// Thermal mass of the mug in J/K
    pub fn mug_heat_capacity(&self) -> f64 {
        self.mug_mass_kg() * self.material.specific_heat()
    }

    /// Thermal mass of a full mug of coffee in J/K
    pub fn coffee_heat_capacity(&self) -> f64 {
        self.coffee_volume_m3() * COFFEE_DENSITY * COFFEE_SPECIFIC_HEAT
    }
}
