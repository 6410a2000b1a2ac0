use serde::{Deserialize, Serialize};

/// Lifecycle of a quote document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub enum BudgetStatus {
    #[default]
    Draft,
    Sent,
    Approved,
    Rejected,
}

impl std::fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BudgetStatus::Draft => write!(f, "Draft"),
            BudgetStatus::Sent => write!(f, "Sent"),
            BudgetStatus::Approved => write!(f, "Approved"),
            BudgetStatus::Rejected => write!(f, "Rejected"),
        }
    }
}

/// One selected-product line on a quote. Price and description are
/// snapshotted at selection time so later catalog edits don't rewrite
/// history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct BudgetItem {
    pub product_id: String,
    pub description: String,
    pub unit: Option<String>,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub unit_price: f64,
    /// Per-line discount percentage, e.g. 10.0 for 10%
    pub discount_pct: Option<f64>,
}

impl BudgetItem {
    pub fn line_total(&self) -> f64 {
        let gross = self.quantity * self.unit_price;
        match self.discount_pct {
            Some(pct) => gross * (1.0 - pct / 100.0),
            None => gross,
        }
    }
}

/// A quote ("budget") as stored in the `budgets` collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct Budget {
    #[serde(default)]
    pub id: String,
    /// Sequential human-facing quote number
    #[serde(default)]
    pub number: i64,
    pub client_id: String,
    /// Denormalized for list views; the client document stays authoritative
    pub client_name: Option<String>,
    pub representative_id: Option<String>,
    pub representative_name: Option<String>,
    #[serde(default)]
    pub items: Vec<BudgetItem>,
    #[serde(default)]
    pub status: BudgetStatus,
    pub freight: Option<f64>,
    pub payment_terms: Option<String>,
    pub delivery_time: Option<String>,
    pub notes: Option<String>,
    pub created_at: Option<String>,
    pub valid_until: Option<String>,
}

impl Budget {
    /// Sum of all line totals, before freight.
    pub fn subtotal(&self) -> f64 {
        self.items.iter().map(BudgetItem::line_total).sum()
    }

    /// Grand total as printed on the quote.
    pub fn total(&self) -> f64 {
        self.subtotal() + self.freight.unwrap_or(0.0)
    }

    pub fn is_open(&self) -> bool {
        matches!(self.status, BudgetStatus::Draft | BudgetStatus::Sent)
    }
}
