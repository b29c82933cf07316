use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{PlayerStore, StoreError};
use crate::models::{Player, PlayerId};

/// Players collection held in process memory, in insertion order.
#[derive(Debug, Default)]
pub struct MemoryPlayerStore {
    players: RwLock<Vec<Player>>,
}

impl MemoryPlayerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PlayerStore for MemoryPlayerStore {
    async fn insert_one(&self, player: &Player) -> Result<(), StoreError> {
        let mut players = self.players.write().await;
        if players.iter().any(|existing| existing.id == player.id) {
            return Err(StoreError::Duplicate(player.id));
        }
        players.push(player.clone());
        Ok(())
    }

    async fn find_one(&self, id: PlayerId) -> Result<Option<Player>, StoreError> {
        let players = self.players.read().await;
        Ok(players.iter().find(|player| player.id == id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Player>, StoreError> {
        Ok(self.players.read().await.clone())
    }

    async fn find_one_and_replace(&self, player: &Player) -> Result<Option<Player>, StoreError> {
        let mut players = self.players.write().await;
        let Some(existing) = players.iter_mut().find(|existing| existing.id == player.id) else {
            return Ok(None);
        };

        existing.name.clone_from(&player.name);
        existing.region.clone_from(&player.region);
        existing.position.clone_from(&player.position);
        Ok(Some(existing.clone()))
    }

    async fn delete_one(&self, id: PlayerId) -> Result<u64, StoreError> {
        let mut players = self.players.write().await;
        let before = players.len();
        players.retain(|player| player.id != id);
        Ok((before - players.len()) as u64)
    }

    fn describe(&self) -> String {
        "in-memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(name: &str) -> Player {
        Player {
            id: PlayerId::new(),
            name: name.to_string(),
            region: "Brazil".to_string(),
            position: "FW".to_string(),
        }
    }

    #[tokio::test]
    async fn crud_cycle() {
        let store = MemoryPlayerStore::new();
        let mut pele = player("Pele");
        let ronaldo = player("Ronaldo");
        store.insert_one(&pele).await.unwrap();
        store.insert_one(&ronaldo).await.unwrap();
        assert!(matches!(store.insert_one(&pele).await, Err(StoreError::Duplicate(_))));

        assert_eq!(store.find_all().await.unwrap(), vec![pele.clone(), ronaldo.clone()]);

        pele.position = "AM".to_string();
        assert_eq!(store.find_one_and_replace(&pele).await.unwrap(), Some(pele.clone()));
        assert_eq!(store.find_one(pele.id).await.unwrap(), Some(pele.clone()));

        assert_eq!(store.delete_one(pele.id).await.unwrap(), 1);
        assert_eq!(store.delete_one(pele.id).await.unwrap(), 0);
        assert_eq!(store.find_one_and_replace(&pele).await.unwrap(), None);
        assert_eq!(store.find_all().await.unwrap(), vec![ronaldo]);
    }
}
