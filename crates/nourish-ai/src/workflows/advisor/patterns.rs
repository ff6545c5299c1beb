//! Consumption pattern analysis over the owner's log: per-category rates,
//! weekday heatmaps, distribution shares, diet imbalances, and nutrient
//! gaps. Everything here is a pure function of the records passed in.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::workflows::ledger::domain::{ConsumptionRecord, FoodCategory};

pub const DEFAULT_LOOKBACK_DAYS: i64 = 30;
const HEATMAP_LOOKBACK_DAYS: i64 = 28;

/// A category claiming more than this share of a weekday's consumption is
/// reported as a weekly pattern.
const DOMINANT_SHARE: f64 = 0.40;

/// Frequency assigned when a category was consumed on a single day in the
/// window, read as "about once a month".
const SINGLE_OBSERVATION_FREQUENCY: f64 = 30.0;

pub const WEEKDAY_LABELS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Aggregated consumption behavior for one category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryPattern {
    pub total_consumed: f64,
    pub consumption_days: usize,
    /// Average quantity per distinct consumption day.
    pub avg_daily: f64,
    /// Mean days between distinct consumption dates.
    pub frequency: f64,
}

pub type ConsumptionPatterns = BTreeMap<FoodCategory, CategoryPattern>;

/// Per-category quantity totals for each ISO weekday over the last 4 weeks.
#[derive(Debug, Clone, Serialize)]
pub struct WeekdayHeatmap {
    pub days: Vec<WeekdayLoad>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeekdayLoad {
    pub weekday: &'static str,
    pub by_category: BTreeMap<FoodCategory, f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeekdayPattern {
    pub weekday: &'static str,
    pub category: FoodCategory,
    pub percentage: f64,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryShare {
    pub category: FoodCategory,
    pub total: f64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImbalanceKind {
    UnderConsumption,
    OverConsumption,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImbalanceSeverity {
    High,
    Medium,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryImbalance {
    pub category: FoodCategory,
    pub kind: ImbalanceKind,
    pub severity: ImbalanceSeverity,
    pub actual_pct: f64,
    pub expected_pct: f64,
    pub gap_pct: f64,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NutrientGap {
    pub nutrient: String,
    pub current_daily: f64,
    pub recommended_daily: f64,
    pub gap_percentage: f64,
    pub suggested_categories: Vec<FoodCategory>,
}

/// Diet rubric: expected category distribution, the category-nutrient table,
/// and daily requirements. The values are illustrative defaults carried over
/// from the reference data set, not clinical guidance; inject alternates for
/// other rubrics.
#[derive(Debug, Clone)]
pub struct NutritionConfig {
    pub expected_distribution: BTreeMap<FoodCategory, f64>,
    pub nutrient_database: BTreeMap<FoodCategory, BTreeMap<String, f64>>,
    pub daily_requirements: BTreeMap<String, f64>,
    /// Gaps below this percentage are not reported.
    pub gap_threshold_pct: f64,
}

impl Default for NutritionConfig {
    fn default() -> Self {
        let expected_distribution = BTreeMap::from([
            (FoodCategory::Vegetable, 0.30),
            (FoodCategory::Fruit, 0.20),
            (FoodCategory::Grain, 0.25),
            (FoodCategory::Dairy, 0.10),
            (FoodCategory::Meat, 0.10),
            (FoodCategory::Other, 0.05),
        ]);

        let nutrient = |pairs: &[(&str, f64)]| {
            pairs
                .iter()
                .map(|(name, value)| (name.to_string(), *value))
                .collect::<BTreeMap<_, _>>()
        };

        let nutrient_database = BTreeMap::from([
            (
                FoodCategory::Vegetable,
                nutrient(&[
                    ("vitamin_c", 50.0),
                    ("fiber", 30.0),
                    ("vitamin_a", 40.0),
                    ("iron", 10.0),
                ]),
            ),
            (
                FoodCategory::Fruit,
                nutrient(&[
                    ("vitamin_c", 80.0),
                    ("fiber", 25.0),
                    ("vitamin_a", 20.0),
                    ("potassium", 60.0),
                ]),
            ),
            (
                FoodCategory::Dairy,
                nutrient(&[
                    ("calcium", 90.0),
                    ("protein", 40.0),
                    ("vitamin_d", 30.0),
                    ("vitamin_b12", 50.0),
                ]),
            ),
            (
                FoodCategory::Meat,
                nutrient(&[
                    ("protein", 80.0),
                    ("iron", 60.0),
                    ("vitamin_b12", 70.0),
                    ("zinc", 50.0),
                ]),
            ),
            (
                FoodCategory::Grain,
                nutrient(&[
                    ("fiber", 40.0),
                    ("iron", 20.0),
                    ("vitamin_b", 30.0),
                    ("protein", 15.0),
                ]),
            ),
        ]);

        let daily_requirements = nutrient(&[
            ("vitamin_c", 90.0),
            ("fiber", 25.0),
            ("vitamin_a", 900.0),
            ("iron", 18.0),
            ("calcium", 1000.0),
            ("protein", 50.0),
            ("vitamin_d", 20.0),
            ("vitamin_b12", 2.4),
            ("potassium", 3500.0),
            ("zinc", 11.0),
            ("vitamin_b", 1.5),
        ]);

        Self {
            expected_distribution,
            nutrient_database,
            daily_requirements,
            gap_threshold_pct: 20.0,
        }
    }
}

/// Aggregate the log into per-category consumption patterns for the window
/// ending at `today`.
pub fn analyze(
    logs: &[ConsumptionRecord],
    today: NaiveDate,
    lookback_days: i64,
) -> ConsumptionPatterns {
    let window_start = today - chrono::Duration::days(lookback_days);

    let mut totals: BTreeMap<FoodCategory, f64> = BTreeMap::new();
    let mut dates: BTreeMap<FoodCategory, BTreeSet<NaiveDate>> = BTreeMap::new();

    for log in logs {
        if log.date_consumed < window_start || log.date_consumed > today {
            continue;
        }
        *totals.entry(log.category).or_insert(0.0) += log.quantity;
        dates.entry(log.category).or_default().insert(log.date_consumed);
    }

    let mut patterns = ConsumptionPatterns::new();
    for (category, total) in totals {
        let unique_dates = dates.get(&category).map(BTreeSet::len).unwrap_or(0);
        let frequency = match dates.get(&category) {
            Some(set) if set.len() > 1 => {
                let ordered: Vec<NaiveDate> = set.iter().copied().collect();
                let gaps: i64 = ordered
                    .windows(2)
                    .map(|pair| (pair[1] - pair[0]).num_days())
                    .sum();
                gaps as f64 / (ordered.len() - 1) as f64
            }
            _ => SINGLE_OBSERVATION_FREQUENCY,
        };

        patterns.insert(
            category,
            CategoryPattern {
                total_consumed: total,
                consumption_days: unique_dates,
                avg_daily: total / unique_dates.max(1) as f64,
                frequency,
            },
        );
    }

    patterns
}

/// Build the 4-week weekday-by-category heatmap.
pub fn weekday_heatmap(logs: &[ConsumptionRecord], today: NaiveDate) -> WeekdayHeatmap {
    let window_start = today - chrono::Duration::days(HEATMAP_LOOKBACK_DAYS);
    let mut grid: [BTreeMap<FoodCategory, f64>; 7] = Default::default();

    for log in logs {
        if log.date_consumed < window_start || log.date_consumed > today {
            continue;
        }
        let slot = log.date_consumed.weekday().num_days_from_monday() as usize;
        *grid[slot].entry(log.category).or_insert(0.0) += log.quantity;
    }

    WeekdayHeatmap {
        days: grid
            .into_iter()
            .zip(WEEKDAY_LABELS)
            .map(|(by_category, weekday)| WeekdayLoad {
                weekday,
                by_category,
            })
            .collect(),
    }
}

/// Flag weekdays where a single category dominates consumption.
pub fn detect_weekly_patterns(heatmap: &WeekdayHeatmap) -> Vec<WeekdayPattern> {
    let mut patterns = Vec::new();

    for day in &heatmap.days {
        let day_total: f64 = day.by_category.values().sum();
        if day_total <= 0.0 {
            continue;
        }

        let Some((category, quantity)) = day
            .by_category
            .iter()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(category, quantity)| (*category, *quantity))
        else {
            continue;
        };

        if quantity > day_total * DOMINANT_SHARE {
            let percentage = quantity / day_total * 100.0;
            patterns.push(WeekdayPattern {
                weekday: day.weekday,
                category,
                percentage,
                description: format!(
                    "High {} consumption on {}s",
                    category.label(),
                    day.weekday
                ),
            });
        }
    }

    patterns
}

/// Category share of total consumption, for distribution views.
pub fn category_distribution(logs: &[ConsumptionRecord]) -> Vec<CategoryShare> {
    let mut totals: BTreeMap<FoodCategory, f64> = BTreeMap::new();
    for log in logs {
        *totals.entry(log.category).or_insert(0.0) += log.quantity;
    }

    let grand_total: f64 = totals.values().sum();
    let denominator = if grand_total > 0.0 { grand_total } else { 1.0 };

    totals
        .into_iter()
        .map(|(category, total)| CategoryShare {
            category,
            total,
            percentage: total / denominator * 100.0,
        })
        .collect()
}

/// Compare actual category shares against the expected distribution.
pub fn detect_imbalances(
    logs: &[ConsumptionRecord],
    config: &NutritionConfig,
) -> Vec<CategoryImbalance> {
    let mut totals: BTreeMap<FoodCategory, f64> = BTreeMap::new();
    let mut grand_total = 0.0;
    for log in logs {
        *totals.entry(log.category).or_insert(0.0) += log.quantity;
        grand_total += log.quantity;
    }

    if grand_total <= 0.0 {
        return Vec::new();
    }

    let mut imbalances = Vec::new();
    for (category, expected_share) in &config.expected_distribution {
        let actual_pct = totals.get(category).copied().unwrap_or(0.0) / grand_total * 100.0;
        let expected_pct = expected_share * 100.0;

        if actual_pct < expected_pct * 0.5 {
            let severity = if actual_pct < expected_pct * 0.3 {
                ImbalanceSeverity::High
            } else {
                ImbalanceSeverity::Medium
            };
            imbalances.push(CategoryImbalance {
                category: *category,
                kind: ImbalanceKind::UnderConsumption,
                severity,
                actual_pct,
                expected_pct,
                gap_pct: expected_pct - actual_pct,
                description: format!(
                    "Low {} consumption ({:.1}% vs {:.1}% recommended)",
                    category.label(),
                    actual_pct,
                    expected_pct
                ),
            });
        } else if actual_pct > expected_pct * 1.5 {
            imbalances.push(CategoryImbalance {
                category: *category,
                kind: ImbalanceKind::OverConsumption,
                severity: ImbalanceSeverity::Medium,
                actual_pct,
                expected_pct,
                gap_pct: actual_pct - expected_pct,
                description: format!(
                    "High {} consumption ({:.1}% vs {:.1}% recommended)",
                    category.label(),
                    actual_pct,
                    expected_pct
                ),
            });
        }
    }

    imbalances
}

/// Estimate average daily nutrient intake from the log and report nutrients
/// falling short of the configured requirements.
pub fn detect_nutrient_gaps(
    logs: &[ConsumptionRecord],
    config: &NutritionConfig,
) -> Vec<NutrientGap> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    let mut tracked_dates: BTreeSet<NaiveDate> = BTreeSet::new();

    for log in logs {
        tracked_dates.insert(log.date_consumed);
        if let Some(nutrients) = config.nutrient_database.get(&log.category) {
            for (nutrient, value_per_unit) in nutrients {
                *totals.entry(nutrient.as_str()).or_insert(0.0) +=
                    value_per_unit * log.quantity / 100.0;
            }
        }
    }

    let days_tracked = tracked_dates.len().max(1) as f64;

    let mut gaps = Vec::new();
    for (nutrient, total) in totals {
        let Some(required) = config.daily_requirements.get(nutrient) else {
            continue;
        };
        if *required <= 0.0 {
            continue;
        }

        let daily_average = total / days_tracked;
        let gap_pct = ((required - daily_average) / required * 100.0).max(0.0);
        if gap_pct <= config.gap_threshold_pct {
            continue;
        }

        let suggested_categories = config
            .nutrient_database
            .iter()
            .filter(|(_, nutrients)| {
                nutrients
                    .get(nutrient)
                    .map(|value| *value > 50.0)
                    .unwrap_or(false)
            })
            .map(|(category, _)| *category)
            .collect();

        gaps.push(NutrientGap {
            nutrient: nutrient.to_string(),
            current_daily: daily_average,
            recommended_daily: *required,
            gap_percentage: gap_pct,
            suggested_categories,
        });
    }

    gaps
}
