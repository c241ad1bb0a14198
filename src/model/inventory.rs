use serde::{Deserialize, Serialize};

use crate::model::{Entity, EntityRef, Field, Identity, Key, Linked, Medication, QueryOptions};

/// Stock level for one medication. Owns the one-to-one link.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(default)]
    pub id: Identity,
    #[serde(rename = "cantidadStock", default, skip_serializing_if = "Field::is_absent")]
    pub stock_quantity: Field<i32>,
    #[serde(rename = "medicamento", default, skip_serializing_if = "Field::is_absent")]
    pub medication: Field<EntityRef>,
}

impl Inventory {
    pub fn new(stock_quantity: i32) -> Self {
        Self {
            stock_quantity: Field::Value(stock_quantity),
            ..Self::default()
        }
    }

    pub fn linked_to(mut self, medication: Key) -> Self {
        self.medication = Field::Value(EntityRef::new(medication));
        self
    }
}

impl Entity for Inventory {
    const RESOURCE: &'static str = "inventarios";
    const ENTITY_NAME: &'static str = "inventario";

    fn identity(&self) -> Identity {
        self.id
    }

    fn set_identity(&mut self, identity: Identity) {
        self.id = identity;
    }

    fn missing_required(&self) -> Vec<&'static str> {
        if self.stock_quantity.value().is_none() {
            vec!["cantidadStock"]
        } else {
            Vec::new()
        }
    }

    fn merge_patch(&mut self, patch: Self) {
        patch.stock_quantity.apply_to(&mut self.stock_quantity);
        patch.medication.apply_to(&mut self.medication);
    }
}

impl Linked<Medication> for Inventory {
    fn unlinked_query() -> QueryOptions {
        QueryOptions::new().with("filter", "inventario-is-null")
    }

    fn linked_key(&self) -> Option<Key> {
        self.medication.value().map(|link| link.id)
    }

    fn set_link(&mut self, key: Option<Key>) {
        self.medication = key.map(EntityRef::new).into();
    }
}
