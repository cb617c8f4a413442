use chrono::NaiveDate;
use reqwest::Method;
use serde_derive::{Deserialize, Serialize};

use super::{FitbitClient, Result};

pub trait Activities {
    /// Fetches the activity summary for `day`, given as `yyyy-MM-dd`. The day
    /// is passed through as-is; the API rejects malformed dates.
    fn activity_summary_for_day(&self, day: &str) -> Result<ActivitySummary>;

    fn daily_activity_summary(&self, date: NaiveDate) -> Result<ActivitySummary> {
        self.activity_summary_for_day(&date.format("%Y-%m-%d").to_string())
    }
}

impl Activities for FitbitClient {
    fn activity_summary_for_day(&self, day: &str) -> Result<ActivitySummary> {
        let path = format!("user/-/activities/date/{}.json", day);
        let req = self.new_request::<()>(Method::GET, &path, None)?;
        self.execute_json(req)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ActivitySummary {
    pub goals: Goals,
    pub summary: Summary,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Goals {
    pub active_minutes: i64,
    pub calories_out: i64,
    pub distance: f64,
    pub steps: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Summary {
    pub active_score: i64,
    pub activity_calories: i64,
    #[serde(rename = "caloriesBMR")]
    pub calories_bmr: i64,
    pub calories_out: i64,
    pub distances: Vec<Distance>,
    pub fairly_active_minutes: i64,
    pub lightly_active_minutes: i64,
    pub marginal_calories: i64,
    pub sedentary_minutes: i64,
    pub steps: i64,
    pub very_active_minutes: i64,
}

/// Distance covered by one activity type, e.g. `"total"` or `"tracker"`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Distance {
    pub activity: String,
    pub distance: f64,
}
