//! Activity advisories derived from a normalized snapshot.

/// Advisory shown when the condition text mentions rain
pub const SLIPPERY_ROADS: &str = "Caution: Roads may be slippery.";

/// Advisory shown below the cold threshold
pub const COLD_SNAP: &str = "Warning: Sudden temperature drop detected, wear warm clothing.";

/// Temperature below which the cold advisory fires, in Celsius
pub const COLD_THRESHOLD_CELSIUS: f64 = 5.0;

/// Derive activity advisories from temperature and condition text.
///
/// The checks are independent and both may fire: the rain check first,
/// then the cold check. An unknown temperature fires no cold advisory.
pub fn activity_advisories(temperature: Option<f64>, description: &str) -> Vec<&'static str> {
    let mut advisories = Vec::new();

    if description.to_lowercase().contains("rain") {
        advisories.push(SLIPPERY_ROADS);
    }

    if matches!(temperature, Some(t) if t < COLD_THRESHOLD_CELSIUS) {
        advisories.push(COLD_SNAP);
    }

    advisories
}
