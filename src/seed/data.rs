use crate::model::{Entity, Identity, Inventory, Medication};
use crate::store::traits::{EntityStore, Store};
use anyhow::{anyhow, Result};

fn sample_medications() -> Vec<Medication> {
    vec![
        Medication::new("zesty", 26441.42),
        Medication::new("as", 10112.38),
        Medication::new("surprisingly", 1622.92).with_description("obesity arrogance"),
        Medication::new("nor muted", 8259.98),
    ]
}

/// Loads a small catalog: four medications, the first two with stock records.
pub async fn load_seed_data<S: Store>(store: &S) -> Result<()> {
    log::info!("Creating sample medications...");
    let mut created = Vec::new();
    for medication in sample_medications() {
        let saved = EntityStore::<Medication>::insert(store, medication).await?;
        let name = saved.name.value().map(String::as_str).unwrap_or("");
        log::info!("  - {} ({})", saved.identity(), name);
        created.push(saved);
    }

    log::info!("Creating sample inventories...");
    for (medication, quantity) in created.iter().zip([22402, 30835]) {
        let key = match medication.identity() {
            Identity::Saved(key) => key,
            Identity::Unsaved => return Err(anyhow!("store returned an unsaved medicamento")),
        };
        let saved =
            EntityStore::<Inventory>::insert(store, Inventory::new(quantity).linked_to(key)).await?;
        log::info!("  - {} -> medicamento {}", saved.identity(), key);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::{MemoryStore, FILTER_UNLINKED_MEDICATIONS};

    #[tokio::test]
    async fn test_seed_leaves_two_medications_unlinked() {
        let store = MemoryStore::new();
        load_seed_data(&store).await.unwrap();

        let all = EntityStore::<Medication>::list(&store, None).await.unwrap();
        assert_eq!(all.len(), 4);
        let unlinked = EntityStore::<Medication>::list(&store, Some(FILTER_UNLINKED_MEDICATIONS))
            .await
            .unwrap();
        assert_eq!(unlinked.len(), 2);
        assert_eq!(EntityStore::<Inventory>::list(&store, None).await.unwrap().len(), 2);
    }
}
