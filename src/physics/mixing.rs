use crate::error::{ensure_finite, ensure_positive, Result};

/// Temperature of coffee right after creamer is stirred in.
///
/// Energy balance with equal specific heats, assuming instantaneous and
/// complete equilibration:
///
/// ```text
/// T_mix = (m_coffee × T_coffee + m_creamer × T_creamer) / (m_coffee + m_creamer)
/// ```
///
/// Masses can be in any consistent unit (kg, ml of a water-like liquid, or
/// fractions of the total). Both must be greater than zero.
pub fn mix_creamer(
    coffee_temperature: f64,
    coffee_mass: f64,
    creamer_temperature: f64,
    creamer_mass: f64,
) -> Result<f64> {
    ensure_finite("coffee_temperature", coffee_temperature)?;
    ensure_finite("creamer_temperature", creamer_temperature)?;
    ensure_positive("coffee_mass", coffee_mass)?;
    ensure_positive("creamer_mass", creamer_mass)?;

    Ok(weighted_average(coffee_temperature, coffee_mass, creamer_temperature, creamer_mass))
}

/// Temperature of freshly poured coffee once it has equilibrated with the mug wall.
///
/// Same balance as [`mix_creamer`], weighted by heat capacity (J/K) since
/// coffee and ceramic have very different specific heats:
///
/// ```text
/// T = T_coffee + C_mug / (C_mug + C_coffee) × (T_mug - T_coffee)
/// ```
///
/// A room-temperature mug pulls the coffee down noticeably; a preheated
/// mug much less so.
pub fn settle_into_mug(
    coffee_temperature: f64,
    coffee_heat_capacity: f64,
    mug_temperature: f64,
    mug_heat_capacity: f64,
) -> Result<f64> {
    ensure_finite("coffee_temperature", coffee_temperature)?;
    ensure_finite("mug_temperature", mug_temperature)?;
    ensure_positive("coffee_heat_capacity", coffee_heat_capacity)?;
    ensure_positive("mug_heat_capacity", mug_heat_capacity)?;

    let share = mug_heat_capacity / (mug_heat_capacity + coffee_heat_capacity);
    Ok(coffee_temperature + share * (mug_temperature - coffee_temperature))
}

#[inline]
pub(crate) fn weighted_average(t1: f64, w1: f64, t2: f64, w2: f64) -> f64 {
    (w1 * t1 + w2 * t2) / (w1 + w2)
}
