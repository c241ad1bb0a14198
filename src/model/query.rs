/// Named request parameters passed verbatim to a `list` call.
///
/// Order is kept and keys may repeat (`sort=id,asc&sort=nombre,desc`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    params: Vec<(String, String)>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.params.push((name.into(), value.into()));
    }

    /// First value supplied for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_keys_keep_order() {
        let options = QueryOptions::new()
            .with("sort", "id,asc")
            .with("filter", "inventario-is-null")
            .with("sort", "nombre,desc");

        assert_eq!(options.get("sort"), Some("id,asc"));
        assert_eq!(options.get("filter"), Some("inventario-is-null"));
        assert_eq!(options.get("page"), None);
        assert_eq!(options.pairs().len(), 3);
        assert_eq!(options.pairs()[2].1, "nombre,desc");
    }
}
