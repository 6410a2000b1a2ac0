use serde::{Deserialize, Serialize};

/// A catalog item as stored in the `products` collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct Product {
    #[serde(default)]
    pub id: String,
    pub name: String,
    /// Internal SKU/reference code shown next to the name
    pub code: Option<String>,
    pub description: Option<String>,
    /// Sales unit: "un", "kg", "m", ...
    pub unit: Option<String>,
    #[serde(default)]
    pub unit_price: f64,
    pub category: Option<String>,
    /// Discontinued products stay in the store so old quotes keep
    /// resolving; the UI hides them from pickers.
    pub active: Option<bool>,
}

impl Product {
    pub fn is_active(&self) -> bool {
        self.active.unwrap_or(true)
    }

    /// "CODE - name" when a code exists, plain name otherwise
    pub fn label(&self) -> String {
        match self.code.as_deref().filter(|c| !c.is_empty()) {
            Some(code) => format!("{} - {}", code, self.name),
            None => self.name.clone(),
        }
    }
}
