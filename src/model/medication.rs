use serde::{Deserialize, Serialize};

use crate::model::{Entity, EntityRef, Field, Identity};

/// A medication catalog entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    #[serde(default)]
    pub id: Identity,
    #[serde(rename = "nombre", default, skip_serializing_if = "Field::is_absent")]
    pub name: Field<String>,
    #[serde(rename = "descripcion", default, skip_serializing_if = "Field::is_absent")]
    pub description: Field<String>,
    #[serde(rename = "precio", default, skip_serializing_if = "Field::is_absent")]
    pub price: Field<f64>,
    /// Inverse side of `Inventory::medication`; filled in by the backend, ignored on write.
    #[serde(rename = "inventario", default, skip_serializing_if = "Field::is_absent")]
    pub inventory: Field<EntityRef>,
}

impl Medication {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: Field::Value(name.into()),
            price: Field::Value(price),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Field::Value(description.into());
        self
    }
}

impl Entity for Medication {
    const RESOURCE: &'static str = "medicamentos";
    const ENTITY_NAME: &'static str = "medicamento";

    fn identity(&self) -> Identity {
        self.id
    }

    fn set_identity(&mut self, identity: Identity) {
        self.id = identity;
    }

    fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.value().map_or(true, |name| name.trim().is_empty()) {
            missing.push("nombre");
        }
        if self.price.value().is_none() {
            missing.push("precio");
        }
        missing
    }

    fn merge_patch(&mut self, patch: Self) {
        patch.name.apply_to(&mut self.name);
        patch.description.apply_to(&mut self.description);
        patch.price.apply_to(&mut self.price);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_names() {
        let medication = Medication::new("zesty", 26441.42).with_description("obesity arrogance");
        let json = serde_json::to_value(&medication).unwrap();
        assert_eq!(
            json,
            json!({
                "id": null,
                "nombre": "zesty",
                "descripcion": "obesity arrogance",
                "precio": 26441.42
            })
        );
    }

    #[test]
    fn test_required_fields() {
        assert_eq!(Medication::default().missing_required(), vec!["nombre", "precio"]);
        assert!(Medication::new("as", 10112.38).missing_required().is_empty());

        let mut blank = Medication::new("  ", 1.0);
        assert_eq!(blank.missing_required(), vec!["nombre"]);
        blank.id = Identity::Saved(3);
        assert_eq!(blank.missing_required(), vec!["nombre"]);
    }

    #[test]
    fn test_merge_patch_keeps_absent_and_clears_null() {
        let mut existing = Medication::new("surprisingly", 1622.92).with_description("old");
        let patch: Medication =
            serde_json::from_value(json!({ "id": 1, "precio": 2.0, "descripcion": null })).unwrap();
        existing.merge_patch(patch);

        assert_eq!(existing.name, Field::Value("surprisingly".to_string()));
        assert_eq!(existing.price, Field::Value(2.0));
        assert_eq!(existing.description, Field::Null);
    }
}
