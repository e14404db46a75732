//! Persistence contracts for the domain records, plus the in-memory
//! store the server runs on.

use crate::domain::{Investment, Position};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Mutex;
use thiserror::Error;

/// Failures surfaced by store operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("no record with id {0}")]
    NotFound(i64),
    #[error("store lock poisoned")]
    Poisoned,
}

/// Storage for [`Investment`] records.
#[async_trait]
pub trait InvestmentStore: Send + Sync {
    /// Stores `investment` under a fresh id and returns the stored record.
    async fn add(&self, investment: Investment) -> Result<Investment, StoreError>;
    async fn all(&self) -> Result<Vec<Investment>, StoreError>;
    async fn get(&self, id: i64) -> Result<Investment, StoreError>;
    async fn update(&self, investment: Investment) -> Result<(), StoreError>;
    async fn delete(&self, id: i64) -> Result<(), StoreError>;
}

/// Storage for [`Position`] records.
#[async_trait]
pub trait PositionStore: Send + Sync {
    /// Stores `position` under a fresh id and returns the stored record.
    async fn add(&self, position: Position) -> Result<Position, StoreError>;
    async fn all(&self) -> Result<Vec<Position>, StoreError>;
    async fn get(&self, id: i64) -> Result<Position, StoreError>;
    async fn update(&self, position: Position) -> Result<(), StoreError>;
    async fn delete(&self, id: i64) -> Result<(), StoreError>;
    /// The positions opened under one investment.
    async fn by_investment(&self, investment_id: i64) -> Result<Vec<Position>, StoreError>;
}

#[derive(Debug)]
struct Table<R> {
    rows: BTreeMap<i64, R>,
    next_id: i64,
}

impl<R> Default for Table<R> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 0,
        }
    }
}

impl<R> Table<R> {
    fn assign_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory store backing the API when no database is wired up.
///
/// Rows live in ordered maps, so listings come back in id order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    investments: Mutex<Table<Investment>>,
    positions: Mutex<Table<Position>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InvestmentStore for MemoryStore {
    async fn add(&self, mut investment: Investment) -> Result<Investment, StoreError> {
        let mut table = self.investments.lock().map_err(|_| StoreError::Poisoned)?;
        investment.id = table.assign_id();
        table.rows.insert(investment.id, investment.clone());
        Ok(investment)
    }

    async fn all(&self) -> Result<Vec<Investment>, StoreError> {
        let table = self.investments.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(table.rows.values().cloned().collect())
    }

    async fn get(&self, id: i64) -> Result<Investment, StoreError> {
        let table = self.investments.lock().map_err(|_| StoreError::Poisoned)?;
        table.rows.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    async fn update(&self, investment: Investment) -> Result<(), StoreError> {
        let mut table = self.investments.lock().map_err(|_| StoreError::Poisoned)?;
        match table.rows.get_mut(&investment.id) {
            Some(row) => {
                *row = investment;
                Ok(())
            }
            None => Err(StoreError::NotFound(investment.id)),
        }
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let mut table = self.investments.lock().map_err(|_| StoreError::Poisoned)?;
        table.rows.remove(&id).map(|_| ()).ok_or(StoreError::NotFound(id))
    }
}

#[async_trait]
impl PositionStore for MemoryStore {
    async fn add(&self, mut position: Position) -> Result<Position, StoreError> {
        let mut table = self.positions.lock().map_err(|_| StoreError::Poisoned)?;
        position.id = table.assign_id();
        table.rows.insert(position.id, position.clone());
        Ok(position)
    }

    async fn all(&self) -> Result<Vec<Position>, StoreError> {
        let table = self.positions.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(table.rows.values().cloned().collect())
    }

    async fn get(&self, id: i64) -> Result<Position, StoreError> {
        let table = self.positions.lock().map_err(|_| StoreError::Poisoned)?;
        table.rows.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    async fn update(&self, position: Position) -> Result<(), StoreError> {
        let mut table = self.positions.lock().map_err(|_| StoreError::Poisoned)?;
        match table.rows.get_mut(&position.id) {
            Some(row) => {
                *row = position;
                Ok(())
            }
            None => Err(StoreError::NotFound(position.id)),
        }
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let mut table = self.positions.lock().map_err(|_| StoreError::Poisoned)?;
        table.rows.remove(&id).map(|_| ()).ok_or(StoreError::NotFound(id))
    }

    async fn by_investment(&self, investment_id: i64) -> Result<Vec<Position>, StoreError> {
        let table = self.positions.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(table
            .rows
            .values()
            .filter(|position| position.investment_id == investment_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(investment_id: i64) -> Position {
        Position {
            id: 0,
            investment_id,
            amount: 1.0,
            average_price: 1.681,
            profit: None,
        }
    }

    #[tokio::test]
    async fn ids_are_assigned_in_sequence() {
        let store = MemoryStore::new();
        let first = PositionStore::add(&store, position(1)).await.unwrap();
        let second = PositionStore::add(&store, position(1)).await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn missing_rows_are_not_found() {
        let store = MemoryStore::new();
        assert_eq!(
            PositionStore::get(&store, 7).await,
            Err(StoreError::NotFound(7))
        );
        assert_eq!(
            PositionStore::delete(&store, 7).await,
            Err(StoreError::NotFound(7))
        );
        assert_eq!(
            PositionStore::update(&store, position(1)).await,
            Err(StoreError::NotFound(0))
        );
    }

    #[tokio::test]
    async fn listing_filters_by_investment() {
        let store = MemoryStore::new();
        PositionStore::add(&store, position(1)).await.unwrap();
        PositionStore::add(&store, position(2)).await.unwrap();
        PositionStore::add(&store, position(1)).await.unwrap();

        let under_first = store.by_investment(1).await.unwrap();
        assert_eq!(under_first.len(), 2);
        assert!(under_first.iter().all(|p| p.investment_id == 1));
        assert_eq!(store.by_investment(9).await.unwrap(), vec![]);
    }

    #[tokio::test]
    async fn updates_replace_rows() {
        let store = MemoryStore::new();
        let mut stored = PositionStore::add(&store, position(1)).await.unwrap();
        stored.amount = 3.5;
        PositionStore::update(&store, stored.clone()).await.unwrap();
        assert_eq!(PositionStore::get(&store, stored.id).await.unwrap(), stored);
    }
}
