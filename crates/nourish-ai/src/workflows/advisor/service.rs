use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use super::mealplan::{MealPlan, MealPlanner};
use super::patterns::{
    self, CategoryShare, ConsumptionPatterns, WeekdayHeatmap, WeekdayPattern,
};
use super::risk::{Priority, RiskEngine, RiskPrediction};
use super::sdg::{
    week_start_monday, Impact, Insight, InsightCategory, InsightKind, ScoreStore, SdgInputs,
    SdgScore, SdgScoreRecord, SdgScorer,
};
use super::textgen::{DisabledTextGenerator, TextGenerator};
use super::waste::{CommunityComparison, WasteEngine, WasteEstimate, WastePeriod,
    WasteProjectionPoint};
use crate::workflows::ledger::domain::{
    ConsumptionRecord, FoodCatalogEntry, FoodCategory, HouseholdProfile, InventoryId, OwnerId,
};
use crate::workflows::ledger::stores::{
    ConsumptionStore, FoodCatalog, InventoryStore, ProfileDirectory, StoreError,
};

const PATTERN_LOOKBACK_DAYS: i64 = 30;
const DEFAULT_DAYS_AHEAD: i64 = 7;
const PROJECTION_WEEKS: u32 = 4;

/// Engine configuration bundle. Every table ships with the documented
/// defaults; tests and deployments inject alternates here.
#[derive(Debug, Clone, Default)]
pub struct AdvisorConfig {
    pub risk: super::risk::RiskConfig,
    pub waste: super::waste::WasteConfig,
    pub nutrition: patterns::NutritionConfig,
    pub mealplan: super::mealplan::MealPlanConfig,
}

/// Collaborator stores the advisor reads. All of them are owner-scoped and
/// read-only here except the score store, which takes weekly upserts.
pub struct AdvisorStores {
    pub inventory: Arc<dyn InventoryStore>,
    pub consumption: Arc<dyn ConsumptionStore>,
    pub catalog: Arc<dyn FoodCatalog>,
    pub profiles: Arc<dyn ProfileDirectory>,
    pub scores: Arc<dyn ScoreStore>,
}

/// Error raised by the advisor facade. Engines are infallible by design;
/// only collaborator stores can fail.
#[derive(Debug, thiserror::Error)]
pub enum AdvisorServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// High-priority alert row for in-app display.
#[derive(Debug, Clone, Serialize)]
pub struct RiskAlert {
    pub kind: Priority,
    pub inventory_id: InventoryId,
    pub item_name: String,
    pub category: FoodCategory,
    pub expiration_date: NaiveDate,
    pub days_until_expiry: i64,
    pub risk_score: f64,
    pub recommended_action: String,
    pub reasoning: String,
}

#[derive(Debug, Serialize)]
pub struct ConsumptionReport {
    pub by_category: ConsumptionPatterns,
    pub weekly_patterns: Vec<WeekdayPattern>,
    pub heatmap: WeekdayHeatmap,
    pub distribution: Vec<CategoryShare>,
    pub summary: String,
}

#[derive(Debug, Serialize)]
pub struct WasteReport {
    pub weekly: WasteEstimate,
    pub monthly: WasteEstimate,
    pub yearly: WasteEstimate,
    pub comparisons: Vec<CommunityComparison>,
    pub projection: Vec<WasteProjectionPoint>,
}

/// Facade composing the ledger stores with the scoring engines. One instance
/// serves every owner; all state lives in the collaborators.
pub struct AdvisorService {
    stores: AdvisorStores,
    risk: RiskEngine,
    waste: WasteEngine,
    sdg: SdgScorer,
    planner: MealPlanner,
    textgen: Arc<dyn TextGenerator>,
}

impl AdvisorService {
    pub fn new(stores: AdvisorStores, config: AdvisorConfig) -> Self {
        Self::with_text_generator(stores, config, Arc::new(DisabledTextGenerator))
    }

    pub fn with_text_generator(
        stores: AdvisorStores,
        config: AdvisorConfig,
        textgen: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            stores,
            risk: RiskEngine::new(config.risk),
            waste: WasteEngine::new(config.waste),
            sdg: SdgScorer::new(config.nutrition),
            planner: MealPlanner::new(config.mealplan),
            textgen,
        }
    }

    /// Score every at-risk inventory item, ordered by ranking score.
    pub fn score_expiration_risks(
        &self,
        owner: &OwnerId,
        days_ahead: Option<i64>,
        today: NaiveDate,
    ) -> Result<Vec<RiskPrediction>, AdvisorServiceError> {
        let inventory = self.stores.inventory.list_for_owner(owner)?;
        let patterns = self.patterns_for(owner, today)?;
        let profile = self.profile_for(owner)?;

        Ok(self.risk.predict(
            &inventory,
            &patterns,
            profile.household_size,
            today,
            days_ahead.unwrap_or(DEFAULT_DAYS_AHEAD),
        ))
    }

    /// Critical/high-priority subset of the risk predictions.
    pub fn high_risk_alerts(
        &self,
        owner: &OwnerId,
        limit: usize,
        today: NaiveDate,
    ) -> Result<Vec<RiskAlert>, AdvisorServiceError> {
        let predictions = self.score_expiration_risks(owner, None, today)?;

        Ok(predictions
            .into_iter()
            .filter(|prediction| prediction.priority.is_actionable())
            .take(limit)
            .map(|prediction| RiskAlert {
                kind: prediction.priority,
                reasoning: prediction.reasoning_sentence(),
                inventory_id: prediction.inventory_id,
                item_name: prediction.item_name,
                category: prediction.category,
                expiration_date: prediction.expiration_date,
                days_until_expiry: prediction.days_until_expiry,
                risk_score: prediction.risk_score,
                recommended_action: prediction.recommended_action,
            })
            .collect())
    }

    /// Consumption behavior report: per-category rates, weekday heatmap,
    /// dominant-day patterns, and distribution shares.
    pub fn consumption_patterns(
        &self,
        owner: &OwnerId,
        today: NaiveDate,
    ) -> Result<ConsumptionReport, AdvisorServiceError> {
        let logs = self.logs_window(owner, today, PATTERN_LOOKBACK_DAYS)?;
        let by_category = patterns::analyze(&logs, today, PATTERN_LOOKBACK_DAYS);
        let heatmap = patterns::weekday_heatmap(&logs, today);
        let weekly_patterns = patterns::detect_weekly_patterns(&heatmap);
        let distribution = patterns::category_distribution(&logs);

        let summary = if weekly_patterns.is_empty() {
            "No significant weekly trends detected. Your consumption is fairly consistent."
                .to_string()
        } else {
            weekly_patterns
                .iter()
                .take(3)
                .map(|pattern| pattern.description.as_str())
                .collect::<Vec<_>>()
                .join(" | ")
        };

        Ok(ConsumptionReport {
            by_category,
            weekly_patterns,
            heatmap,
            distribution,
            summary,
        })
    }

    /// Waste snapshot for one period.
    pub fn estimate_waste(
        &self,
        owner: &OwnerId,
        period: WastePeriod,
        today: NaiveDate,
    ) -> Result<WasteEstimate, AdvisorServiceError> {
        let inventory = self.stores.inventory.list_for_owner(owner)?;
        let patterns = self.patterns_for(owner, today)?;
        Ok(self.waste.estimate(&inventory, &patterns, period, today))
    }

    /// Full waste report: all periods, community comparisons, projection.
    pub fn waste_report(
        &self,
        owner: &OwnerId,
        today: NaiveDate,
    ) -> Result<WasteReport, AdvisorServiceError> {
        let inventory = self.stores.inventory.list_for_owner(owner)?;
        let patterns = self.patterns_for(owner, today)?;

        let weekly = self
            .waste
            .estimate(&inventory, &patterns, WastePeriod::Week, today);
        let monthly = self
            .waste
            .estimate(&inventory, &patterns, WastePeriod::Month, today);
        let yearly = self
            .waste
            .estimate(&inventory, &patterns, WastePeriod::Year, today);

        let comparisons = vec![
            self.waste.compare_to_community(&weekly),
            self.waste.compare_to_community(&monthly),
            self.waste.compare_to_community(&yearly),
        ];
        let projection = self.waste.project(&weekly, PROJECTION_WEEKS, today);

        Ok(WasteReport {
            weekly,
            monthly,
            yearly,
            comparisons,
            projection,
        })
    }

    /// Compute the weekly SDG score without persisting it. Pure: the same
    /// ledger, week, and date always produce the same output.
    pub fn compute_sdg_score(
        &self,
        owner: &OwnerId,
        week_start: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<SdgScore, AdvisorServiceError> {
        let week_start = week_start_monday(week_start.unwrap_or(today));

        let inventory = self.stores.inventory.list_for_owner(owner)?;
        let from = (today - chrono::Duration::days(PATTERN_LOOKBACK_DAYS)).min(week_start);
        let logs = self.stores.consumption.list_between(owner, from, today)?;
        let consumption_patterns = patterns::analyze(&logs, today, PATTERN_LOOKBACK_DAYS);

        let weekly_waste =
            self.waste
                .estimate(&inventory, &consumption_patterns, WastePeriod::Week, today);

        let previous = self
            .stores
            .scores
            .fetch_week(owner, week_start - chrono::Duration::days(7))?;

        let mut score = self.sdg.compute(&SdgInputs {
            owner,
            inventory: &inventory,
            logs: &logs,
            weekly_waste: &weekly_waste,
            community_weekly_grams: self.waste.config().community.weekly_grams,
            previous: previous.as_ref(),
            week_start,
            today,
        });

        if let Some(insights) = self.generated_insights(&score, &weekly_waste) {
            score.insights = insights;
        }

        Ok(score)
    }

    /// Compute and persist the weekly score. Upsert semantics: exactly one
    /// record per (owner, week_start), last write wins.
    pub fn save_weekly_score(
        &self,
        owner: &OwnerId,
        week_start: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<SdgScoreRecord, AdvisorServiceError> {
        let score = self.compute_sdg_score(owner, week_start, today)?;
        let record = self.stores.scores.upsert_week(SdgScoreRecord::from(&score))?;
        Ok(record)
    }

    /// Persisted weekly scores, most recent first.
    pub fn score_history(
        &self,
        owner: &OwnerId,
        limit: usize,
    ) -> Result<Vec<SdgScoreRecord>, AdvisorServiceError> {
        Ok(self.stores.scores.history(owner, limit)?)
    }

    /// Build the weekly meal plan. `use_llm` only affects the summary line;
    /// plan structure is always deterministic.
    pub fn optimize_meal_plan(
        &self,
        owner: &OwnerId,
        budget_limit: Option<f64>,
        use_llm: bool,
    ) -> Result<MealPlan, AdvisorServiceError> {
        let profile = self.profile_for(owner)?;
        let budget = budget_limit
            .unwrap_or_else(|| self.planner.config().budget_for(profile.budget_tier));

        let mut inventory = self.stores.inventory.list_for_owner(owner)?;
        // Expiring items first so the planner's linear scans rescue them
        // before reaching for fresh stock of the same category.
        inventory.sort_by_key(|item| item.expiration_date.unwrap_or(NaiveDate::MAX));

        let catalog = self.planning_catalog()?;
        let mut plan = self
            .planner
            .plan(&inventory, &catalog, budget, profile.household_size);

        if use_llm {
            if let Some(summary) = self.generated_plan_summary(&plan) {
                plan.summary = summary;
            }
        }

        Ok(plan)
    }

    fn profile_for(&self, owner: &OwnerId) -> Result<HouseholdProfile, AdvisorServiceError> {
        Ok(self
            .stores
            .profiles
            .household_profile(owner)?
            .unwrap_or_default())
    }

    fn logs_window(
        &self,
        owner: &OwnerId,
        today: NaiveDate,
        days: i64,
    ) -> Result<Vec<ConsumptionRecord>, AdvisorServiceError> {
        let from = today - chrono::Duration::days(days);
        Ok(self.stores.consumption.list_between(owner, from, today)?)
    }

    fn patterns_for(
        &self,
        owner: &OwnerId,
        today: NaiveDate,
    ) -> Result<ConsumptionPatterns, AdvisorServiceError> {
        let logs = self.logs_window(owner, today, PATTERN_LOOKBACK_DAYS)?;
        Ok(patterns::analyze(&logs, today, PATTERN_LOOKBACK_DAYS))
    }

    fn planning_catalog(&self) -> Result<Vec<FoodCatalogEntry>, AdvisorServiceError> {
        let mut categories: Vec<FoodCategory> = self
            .planner
            .config()
            .slot_preferences
            .values()
            .flatten()
            .copied()
            .collect();
        categories.sort();
        categories.dedup();

        let mut entries = Vec::new();
        for category in categories {
            entries.extend(self.stores.catalog.list_by_category(category)?);
        }
        Ok(entries)
    }

    /// Ask the optional text generator for insight prose. Any failure keeps
    /// the rule-based insights; the response shape never changes.
    fn generated_insights(
        &self,
        score: &SdgScore,
        weekly_waste: &WasteEstimate,
    ) -> Option<Vec<Insight>> {
        let context = format!(
            "Scores: overall {:.1}, waste {:.1}, nutrition {:.1}, sustainability {:.1}. \
             Weekly waste: {:.0}g (${:.2}).",
            score.overall_score,
            score.waste_score,
            score.nutrition_score,
            score.sustainability_score,
            weekly_waste.total_waste_grams,
            weekly_waste.total_waste_cost,
        );

        match self.textgen.generate(
            "You are an expert in sustainable food practices. Provide 3-5 short, specific insights.",
            &context,
            "Summarize this household's food impact for the week.",
        ) {
            Ok(text) => {
                let insights: Vec<Insight> = text
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(|line| Insight {
                        kind: InsightKind::Info,
                        category: InsightCategory::Overall,
                        message: line.to_string(),
                        impact: Impact::Medium,
                        improvement_potential: None,
                    })
                    .collect();
                (!insights.is_empty()).then_some(insights)
            }
            Err(err) => {
                debug!(error = %err, "text generation unavailable, using rule-based insights");
                None
            }
        }
    }

    fn generated_plan_summary(&self, plan: &MealPlan) -> Option<String> {
        let context = format!(
            "7-day plan: {} expiring items rescued, ${:.2} shopping cost of ${:.2} budget, {} shopping items.",
            plan.waste_reduction_count,
            plan.total_cost,
            plan.budget_limit,
            plan.shopping_list.len(),
        );

        match self.textgen.generate(
            "You write one-sentence meal plan summaries.",
            &context,
            "Summarize this weekly meal plan.",
        ) {
            Ok(text) => {
                let line = text.lines().map(str::trim).find(|line| !line.is_empty())?;
                Some(line.to_string())
            }
            Err(err) => {
                debug!(error = %err, "text generation unavailable, keeping rule-based summary");
                None
            }
        }
    }
}
