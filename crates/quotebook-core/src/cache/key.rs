/// The four cached collections. The set is fixed: adding a collection
/// means adding a slot to the cache table and a field to the persisted
/// blob, so the compiler flags every site that needs updating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKey {
    Budgets,
    Clients,
    Products,
    Representatives,
}

impl CollectionKey {
    pub const ALL: [CollectionKey; 4] = [
        CollectionKey::Budgets,
        CollectionKey::Clients,
        CollectionKey::Products,
        CollectionKey::Representatives,
    ];

    /// Collection name as used by the remote store paths and the
    /// persisted blob fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionKey::Budgets => "budgets",
            CollectionKey::Clients => "clients",
            CollectionKey::Products => "products",
            CollectionKey::Representatives => "representatives",
        }
    }
}

impl std::fmt::Display for CollectionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_covers_every_key() {
        assert_eq!(CollectionKey::ALL.len(), 4);
        let names: Vec<&str> = CollectionKey::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(
            names,
            vec!["budgets", "clients", "products", "representatives"]
        );
    }

    #[test]
    fn test_display_matches_as_str() {
        assert_eq!(CollectionKey::Budgets.to_string(), "budgets");
    }
}
