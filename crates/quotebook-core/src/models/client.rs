use serde::{Deserialize, Serialize};

/// A customer record as stored in the `clients` collection.
///
/// Most fields are optional: older documents were created before the
/// registration form collected billing details, and the store keeps
/// whatever the form submitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct Client {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub company_name: Option<String>,
    /// CNPJ/CPF as entered, formatting included
    pub tax_id: Option<String>,
    pub state_registration: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub street: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub contact_name: Option<String>,
    pub notes: Option<String>,
    pub created_at: Option<String>,
}

impl Client {
    /// Name used in pickers and on printed quotes. Prefers the legal
    /// company name when one was registered.
    pub fn display_name(&self) -> &str {
        self.company_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.name)
    }

    pub fn city_state(&self) -> Option<String> {
        match (self.city.as_deref(), self.state.as_deref()) {
            (Some(city), Some(state)) => Some(format!("{}/{}", city, state)),
            (Some(city), None) => Some(city.to_string()),
            (None, Some(state)) => Some(state.to_string()),
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_prefers_company() {
        let client = Client {
            name: "João Silva".to_string(),
            company_name: Some("Silva Comércio Ltda".to_string()),
            ..Default::default()
        };
        assert_eq!(client.display_name(), "Silva Comércio Ltda");
    }

    #[test]
    fn test_display_name_falls_back_on_empty_company() {
        let client = Client {
            name: "João Silva".to_string(),
            company_name: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(client.display_name(), "João Silva");
    }

    #[test]
    fn test_city_state() {
        let client = Client {
            city: Some("Campinas".to_string()),
            state: Some("SP".to_string()),
            ..Default::default()
        };
        assert_eq!(client.city_state().as_deref(), Some("Campinas/SP"));
        assert_eq!(Client::default().city_state(), None);
    }
}
