use serde::{Deserialize, Serialize};

use crate::workflows::advisor::patterns::{CategoryImbalance, ImbalanceKind, NutrientGap};
use crate::workflows::advisor::waste::WasteEstimate;
use crate::workflows::ledger::domain::InventoryRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Success,
    Warning,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightCategory {
    Waste,
    Nutrition,
    Sustainability,
    Overall,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    High,
    Medium,
    Positive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub category: InsightCategory,
    pub message: String,
    pub impact: Impact,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub improvement_potential: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepPriority {
    High,
    Medium,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionStep {
    pub priority: StepPriority,
    pub action: String,
    pub expected_improvement: String,
    pub category: InsightCategory,
    pub specific: bool,
}

const MAX_STEPS: usize = 6;

pub(crate) struct InsightInputs<'a> {
    pub waste_score: f64,
    pub nutrition_score: f64,
    pub sustainability_score: f64,
    pub overall_score: f64,
    pub previous_overall: Option<f64>,
    pub weekly_waste: &'a WasteEstimate,
    pub imbalances: &'a [CategoryImbalance],
    pub nutrient_gaps: &'a [NutrientGap],
}

pub(crate) fn generate_insights(inputs: &InsightInputs<'_>) -> Vec<Insight> {
    let mut insights = Vec::new();

    if let Some(previous) = inputs.previous_overall {
        let change = inputs.overall_score - previous;
        if change > 5.0 {
            insights.push(Insight {
                kind: InsightKind::Success,
                category: InsightCategory::Overall,
                message: format!(
                    "Great progress! Your score improved by {change:.1} points this week."
                ),
                impact: Impact::Positive,
                improvement_potential: None,
            });
        } else if change < -5.0 {
            insights.push(Insight {
                kind: InsightKind::Warning,
                category: InsightCategory::Overall,
                message: format!(
                    "Your score decreased by {:.1} points. Focus on the actionable steps below.",
                    change.abs()
                ),
                impact: Impact::High,
                improvement_potential: None,
            });
        }
    }

    if inputs.waste_score < 60.0 {
        insights.push(Insight {
            kind: InsightKind::Warning,
            category: InsightCategory::Waste,
            message: format!(
                "Your waste reduction score is {:.1}/100. You're wasting {:.0}g per week (${:.2}). Focus on using items before they expire.",
                inputs.waste_score,
                inputs.weekly_waste.total_waste_grams,
                inputs.weekly_waste.total_waste_cost
            ),
            impact: Impact::High,
            improvement_potential: Some("15-20 points".to_string()),
        });
    } else if inputs.waste_score >= 80.0 {
        insights.push(Insight {
            kind: InsightKind::Success,
            category: InsightCategory::Waste,
            message: format!(
                "Excellent waste management! Your score is {:.1}/100. Keep up the great work!",
                inputs.waste_score
            ),
            impact: Impact::Positive,
            improvement_potential: None,
        });
    }

    if inputs.nutrition_score < 70.0 {
        let low_categories: Vec<&str> = inputs
            .imbalances
            .iter()
            .filter(|imbalance| imbalance.kind == ImbalanceKind::UnderConsumption)
            .map(|imbalance| imbalance.category.label())
            .take(3)
            .collect();

        if !low_categories.is_empty() {
            insights.push(Insight {
                kind: InsightKind::Info,
                category: InsightCategory::Nutrition,
                message: format!(
                    "Your nutrition score is {:.1}/100. You're under-consuming: {}. Adding these can boost your score significantly.",
                    inputs.nutrition_score,
                    low_categories.join(", ")
                ),
                impact: Impact::High,
                improvement_potential: Some("10-15 points".to_string()),
            });
        } else if !inputs.nutrient_gaps.is_empty() {
            let gap_names: Vec<&str> = inputs
                .nutrient_gaps
                .iter()
                .map(|gap| gap.nutrient.as_str())
                .take(2)
                .collect();
            insights.push(Insight {
                kind: InsightKind::Info,
                category: InsightCategory::Nutrition,
                message: format!(
                    "Your nutrition score is {:.1}/100. Nutrient gaps detected: {}. Focus on foods rich in these nutrients.",
                    inputs.nutrition_score,
                    gap_names.join(", ")
                ),
                impact: Impact::Medium,
                improvement_potential: Some("8-12 points".to_string()),
            });
        }
    } else if inputs.nutrition_score >= 85.0 {
        insights.push(Insight {
            kind: InsightKind::Success,
            category: InsightCategory::Nutrition,
            message: format!(
                "Great nutrition balance! Your score is {:.1}/100.",
                inputs.nutrition_score
            ),
            impact: Impact::Positive,
            improvement_potential: None,
        });
    }

    if inputs.sustainability_score < 70.0 {
        insights.push(Insight {
            kind: InsightKind::Info,
            category: InsightCategory::Sustainability,
            message: format!(
                "Your sustainability score is {:.1}/100. Regular tracking and meal planning can help improve this.",
                inputs.sustainability_score
            ),
            impact: Impact::Medium,
            improvement_potential: Some("10-15 points".to_string()),
        });
    } else if inputs.sustainability_score >= 85.0 {
        insights.push(Insight {
            kind: InsightKind::Success,
            category: InsightCategory::Sustainability,
            message: format!(
                "Excellent sustainability practices! Your score is {:.1}/100.",
                inputs.sustainability_score
            ),
            impact: Impact::Positive,
            improvement_potential: None,
        });
    }

    insights
}

pub(crate) struct StepInputs<'a> {
    pub waste_score: f64,
    pub nutrition_score: f64,
    pub sustainability_score: f64,
    pub weekly_waste: &'a WasteEstimate,
    pub expiring_items: &'a [&'a InventoryRecord],
    pub imbalances: &'a [CategoryImbalance],
    pub nutrient_gaps: &'a [NutrientGap],
    pub week_log_count: usize,
    pub unique_categories: usize,
}

pub(crate) fn generate_actionable_steps(inputs: &StepInputs<'_>) -> Vec<ActionStep> {
    let mut steps = Vec::new();

    if inputs.waste_score < 75.0 {
        if !inputs.expiring_items.is_empty() {
            let names: Vec<&str> = inputs
                .expiring_items
                .iter()
                .map(|item| item.item_name.as_str())
                .take(3)
                .collect();
            steps.push(ActionStep {
                priority: StepPriority::High,
                action: format!("Use expiring items first: {}", names.join(", ")),
                expected_improvement: "12-18 points".to_string(),
                category: InsightCategory::Waste,
                specific: true,
            });
        }

        if inputs.weekly_waste.total_waste_grams > 300.0 {
            steps.push(ActionStep {
                priority: StepPriority::High,
                action: "Plan meals around your inventory to reduce waste".to_string(),
                expected_improvement: "10-15 points".to_string(),
                category: InsightCategory::Waste,
                specific: false,
            });
        }

        steps.push(ActionStep {
            priority: StepPriority::Medium,
            action: "Check expiration dates regularly and use FIFO (First In, First Out)"
                .to_string(),
            expected_improvement: "8-12 points".to_string(),
            category: InsightCategory::Waste,
            specific: false,
        });
    }

    if inputs.nutrition_score < 80.0 {
        let under_consumed: Vec<&CategoryImbalance> = inputs
            .imbalances
            .iter()
            .filter(|imbalance| imbalance.kind == ImbalanceKind::UnderConsumption)
            .take(2)
            .collect();

        for imbalance in under_consumed {
            steps.push(ActionStep {
                priority: StepPriority::High,
                action: format!(
                    "Focus on adding more {} to your meals",
                    imbalance.category.label()
                ),
                expected_improvement: "10-15 points".to_string(),
                category: InsightCategory::Nutrition,
                specific: true,
            });
        }

        for gap in inputs.nutrient_gaps.iter().take(2) {
            if gap.gap_percentage > 30.0 {
                let improvement_points = ((gap.gap_percentage * 0.3) as i64).min(15);
                steps.push(ActionStep {
                    priority: StepPriority::High,
                    action: format!(
                        "Increase {} intake - you have a {:.0}% gap",
                        gap.nutrient, gap.gap_percentage
                    ),
                    expected_improvement: format!("{improvement_points} points"),
                    category: InsightCategory::Nutrition,
                    specific: true,
                });
            }
        }

        if inputs.unique_categories < 4 {
            steps.push(ActionStep {
                priority: StepPriority::Medium,
                action:
                    "Add more variety to your diet - aim for 5+ different food categories per week"
                        .to_string(),
                expected_improvement: "8-12 points".to_string(),
                category: InsightCategory::Nutrition,
                specific: false,
            });
        }
    }

    if inputs.sustainability_score < 75.0 {
        if inputs.week_log_count < 7 {
            steps.push(ActionStep {
                priority: StepPriority::Medium,
                action: "Log your food consumption daily for better tracking and awareness"
                    .to_string(),
                expected_improvement: "5-10 points".to_string(),
                category: InsightCategory::Sustainability,
                specific: false,
            });
        }

        steps.push(ActionStep {
            priority: StepPriority::Medium,
            action: "Use the meal planner to plan sustainable, waste-reducing meals".to_string(),
            expected_improvement: "8-12 points".to_string(),
            category: InsightCategory::Sustainability,
            specific: false,
        });
    }

    steps.sort_by_key(|step| step.priority);
    steps.truncate(MAX_STEPS);
    steps
}
