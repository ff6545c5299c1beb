//! Advisory pipeline: consumption pattern analysis feeding the expiration
//! risk scorer and waste estimator, the SDG composite built on top of both,
//! and the independent meal/budget planner.

pub mod mealplan;
pub mod patterns;
pub mod risk;
pub mod router;
pub mod sdg;
pub mod service;
pub mod textgen;
pub mod waste;

#[cfg(test)]
mod tests;

pub use mealplan::{MealPlan, MealPlanConfig, MealPlanner, MealSlot};
pub use risk::{Priority, RiskConfig, RiskEngine, RiskPrediction, Season};
pub use router::advisor_router;
pub use sdg::{ScoreStore, SdgScore, SdgScoreRecord, SdgScorer};
pub use service::{
    AdvisorConfig, AdvisorService, AdvisorServiceError, AdvisorStores, RiskAlert,
};
pub use textgen::{DisabledTextGenerator, GenerationError, TextGenerator};
pub use waste::{WasteConfig, WasteEngine, WasteEstimate, WastePeriod};
