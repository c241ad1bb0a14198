use anyhow::{anyhow, Result};
use itertools::Itertools;
use parking_lot::RwLock;
use std::collections::HashMap;

use crate::model::{EntityRef, Field, Identity, Inventory, Key, Linked, Medication};
use crate::store::traits::{EntityStore, StoreError};

/// Medications not linked by any inventory.
pub const FILTER_UNLINKED_MEDICATIONS: &str = "inventario-is-null";

#[derive(Debug, Default)]
struct Tables {
    medications: HashMap<Key, Medication>,
    inventories: HashMap<Key, Inventory>,
    medication_seq: Key,
    inventory_seq: Key,
}

impl Tables {
    fn inventory_linking(&self, medication: Key) -> Option<Key> {
        self.inventories
            .values()
            .find(|inventory| inventory.linked_key() == Some(medication))
            .and_then(|inventory| inventory.id.key())
    }

    /// Fills the inverse side of the link.
    fn with_inverse(&self, mut medication: Medication) -> Medication {
        medication.inventory = medication
            .id
            .key()
            .and_then(|id| self.inventory_linking(id))
            .map(EntityRef::new)
            .into();
        medication
    }

    /// Foreign-key and uniqueness checks for the link held by `inventory`.
    fn check_link(&self, inventory: &Inventory) -> Result<(), StoreError> {
        let Some(medication) = inventory.linked_key() else {
            return Ok(());
        };
        if !self.medications.contains_key(&medication) {
            return Err(StoreError::UnknownMedication(medication));
        }
        match self.inventory_linking(medication) {
            Some(owner) if Some(owner) != inventory.id.key() => {
                Err(StoreError::AlreadyLinked(medication))
            }
            _ => Ok(()),
        }
    }
}

/// In-process store backing the reference REST service.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl EntityStore<Medication> for MemoryStore {
    async fn insert(&self, mut medication: Medication) -> Result<Medication> {
        let mut tables = self.tables.write();
        tables.medication_seq += 1;
        let id = tables.medication_seq;
        medication.id = Identity::Saved(id);
        medication.inventory = Field::Absent;
        tables.medications.insert(id, medication.clone());
        Ok(tables.with_inverse(medication))
    }

    async fn get(&self, id: Key) -> Result<Option<Medication>> {
        let tables = self.tables.read();
        Ok(tables
            .medications
            .get(&id)
            .cloned()
            .map(|medication| tables.with_inverse(medication)))
    }

    async fn list(&self, filter: Option<&str>) -> Result<Vec<Medication>> {
        let tables = self.tables.read();
        let unlinked_only = filter == Some(FILTER_UNLINKED_MEDICATIONS);
        Ok(tables
            .medications
            .iter()
            .filter(|(id, _)| !unlinked_only || tables.inventory_linking(**id).is_none())
            .sorted_by_key(|(id, _)| **id)
            .map(|(_, medication)| tables.with_inverse(medication.clone()))
            .collect())
    }

    async fn exists(&self, id: Key) -> Result<bool> {
        Ok(self.tables.read().medications.contains_key(&id))
    }

    async fn replace(&self, mut medication: Medication) -> Result<Medication> {
        let id = medication
            .id
            .key()
            .ok_or_else(|| anyhow!("cannot replace an unsaved medicamento"))?;
        let mut tables = self.tables.write();
        if !tables.medications.contains_key(&id) {
            return Err(anyhow!("medicamento {} does not exist", id));
        }
        medication.inventory = Field::Absent;
        tables.medications.insert(id, medication.clone());
        Ok(tables.with_inverse(medication))
    }

    async fn delete(&self, id: Key) -> Result<bool> {
        let mut tables = self.tables.write();
        if !tables.medications.contains_key(&id) {
            return Ok(false);
        }
        if tables.inventory_linking(id).is_some() {
            return Err(StoreError::StillReferenced(id).into());
        }
        tables.medications.remove(&id);
        Ok(true)
    }
}

#[async_trait::async_trait]
impl EntityStore<Inventory> for MemoryStore {
    async fn insert(&self, mut inventory: Inventory) -> Result<Inventory> {
        let mut tables = self.tables.write();
        inventory.id = Identity::Unsaved;
        tables.check_link(&inventory)?;
        tables.inventory_seq += 1;
        let id = tables.inventory_seq;
        inventory.id = Identity::Saved(id);
        tables.inventories.insert(id, inventory.clone());
        Ok(inventory)
    }

    async fn get(&self, id: Key) -> Result<Option<Inventory>> {
        Ok(self.tables.read().inventories.get(&id).cloned())
    }

    async fn list(&self, _filter: Option<&str>) -> Result<Vec<Inventory>> {
        Ok(self
            .tables
            .read()
            .inventories
            .values()
            .sorted_by_key(|inventory| inventory.id.key())
            .cloned()
            .collect())
    }

    async fn exists(&self, id: Key) -> Result<bool> {
        Ok(self.tables.read().inventories.contains_key(&id))
    }

    async fn replace(&self, inventory: Inventory) -> Result<Inventory> {
        let id = inventory
            .id
            .key()
            .ok_or_else(|| anyhow!("cannot replace an unsaved inventario"))?;
        let mut tables = self.tables.write();
        if !tables.inventories.contains_key(&id) {
            return Err(anyhow!("inventario {} does not exist", id));
        }
        tables.check_link(&inventory)?;
        tables.inventories.insert(id, inventory.clone());
        Ok(inventory)
    }

    async fn delete(&self, id: Key) -> Result<bool> {
        Ok(self.tables.write().inventories.remove(&id).is_some())
    }
}
