use serde::{Deserialize, Serialize};

/// A sales representative as stored in the `representatives` collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct Representative {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Sales territory, free text ("Interior SP", "Sul", ...)
    pub region: Option<String>,
    /// Commission percentage, e.g. 5.0 for 5%
    pub commission_rate: Option<f64>,
}

impl Representative {
    /// Commission owed on a closed quote of the given total.
    /// Reps without a registered rate earn nothing through this path.
    pub fn commission_on(&self, total: f64) -> f64 {
        self.commission_rate.unwrap_or(0.0) / 100.0 * total
    }
}
