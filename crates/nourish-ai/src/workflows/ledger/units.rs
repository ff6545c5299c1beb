use super::domain::QuantityUnit;

/// Grams represented by one unit of each kind. Volume units assume a density
/// of 1 g/ml; piece/serving/pack are population averages. This table is a
/// deliberate lossy approximation so every ledger row can be compared on a
/// single mass basis, not a nutrition-grade conversion.
const GRAMS_PER_UNIT: [(QuantityUnit, f64); 10] = [
    (QuantityUnit::Kg, 1000.0),
    (QuantityUnit::G, 1.0),
    (QuantityUnit::Lb, 453.592),
    (QuantityUnit::Oz, 28.3495),
    (QuantityUnit::L, 1000.0),
    (QuantityUnit::Ml, 1.0),
    (QuantityUnit::Cup, 240.0),
    (QuantityUnit::Piece, 150.0),
    (QuantityUnit::Serving, 200.0),
    (QuantityUnit::Pack, 500.0),
];

const DEFAULT_GRAMS_PER_UNIT: f64 = 100.0;

/// Convert a quantity to grams. Never fails; unknown units fall back to the
/// 100 g/unit default.
pub fn to_grams(quantity: f64, unit: QuantityUnit) -> f64 {
    let multiplier = GRAMS_PER_UNIT
        .iter()
        .find(|(candidate, _)| *candidate == unit)
        .map(|(_, grams)| *grams)
        .unwrap_or(DEFAULT_GRAMS_PER_UNIT);

    quantity * multiplier
}
