//! Manage Populations use case.
//!
//! Register, list and remove the populations questions can target, and reach
//! the remote service for population metadata and accuracy tests.

use crate::ports::simulation_gateway::{GatewayError, RemotePopulation, SimulationGateway};
use crate::ports::simulation_store::{SimulationStore, StoreError};
use serde_json::Value;
use std::sync::Arc;
use survey_sim_domain::{DomainError, ErrorKind, Population, PopulationId};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ManagePopulationsError {
    #[error("Invalid population: {0}")]
    Validation(#[from] DomainError),

    #[error("Population not found: {0}")]
    NotFound(String),

    #[error("Remote service error: {0}")]
    Gateway(#[source] GatewayError),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl ManagePopulationsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ManagePopulationsError::Validation(_) => ErrorKind::Validation,
            ManagePopulationsError::NotFound(_) => ErrorKind::NotFound,
            ManagePopulationsError::Gateway(GatewayError::Configuration(_)) => {
                ErrorKind::Configuration
            }
            ManagePopulationsError::Gateway(_) => ErrorKind::Transport,
            ManagePopulationsError::Storage(_) => ErrorKind::Persistence,
        }
    }
}

impl From<GatewayError> for ManagePopulationsError {
    fn from(error: GatewayError) -> Self {
        ManagePopulationsError::Gateway(error)
    }
}

/// Outcome of [`ManagePopulationsUseCase::register`]
#[derive(Debug, Clone)]
pub struct Registration {
    pub population: Population,
    pub created: bool,
}

pub struct ManagePopulationsUseCase {
    gateway: Arc<dyn SimulationGateway>,
    store: Arc<dyn SimulationStore>,
}

impl ManagePopulationsUseCase {
    pub fn new(gateway: Arc<dyn SimulationGateway>, store: Arc<dyn SimulationStore>) -> Self {
        Self { gateway, store }
    }

    /// Create the population, or update its name and description.
    pub async fn register(
        &self,
        id: &str,
        name: &str,
        description: Option<&str>,
    ) -> Result<Registration, ManagePopulationsError> {
        let id = PopulationId::new(id)?;
        let mut population = Population::new(id, name);
        if let Some(description) = description {
            population = population.with_description(description);
        }
        if let Some(existing) = self.store.get_population(&population.id).await? {
            population.created_at = existing.created_at;
        }

        let created = self.store.upsert_population(&population).await?;
        info!(
            "{} population {}",
            if created { "Registered" } else { "Updated" },
            population.label()
        );
        Ok(Registration {
            population,
            created,
        })
    }

    pub async fn list(&self) -> Result<Vec<Population>, ManagePopulationsError> {
        Ok(self.store.list_populations().await?)
    }

    pub async fn get(&self, id: &str) -> Result<Population, ManagePopulationsError> {
        let id = PopulationId::new(id)?;
        self.store
            .get_population(&id)
            .await?
            .ok_or_else(|| ManagePopulationsError::NotFound(id.to_string()))
    }

    /// Delete a population with its questions and results.
    ///
    /// Returns the number of questions removed with it.
    pub async fn remove(&self, id: &str) -> Result<usize, ManagePopulationsError> {
        let id = PopulationId::new(id)?;
        let removed = self
            .store
            .delete_population(&id)
            .await?
            .ok_or_else(|| ManagePopulationsError::NotFound(id.to_string()))?;
        info!("Removed population {} and {} questions", id, removed);
        Ok(removed)
    }

    /// Population metadata as known to the remote service.
    pub async fn remote_details(&self, id: &str) -> Result<RemotePopulation, ManagePopulationsError> {
        let id = PopulationId::new(id)?;
        self.gateway.check_configuration()?;
        self.gateway.get_population(&id).await.map_err(|e| {
            if e.is_not_found() {
                ManagePopulationsError::NotFound(id.to_string())
            } else {
                ManagePopulationsError::Gateway(e)
            }
        })
    }

    /// Start the remote accuracy test and return the raw response.
    pub async fn run_accuracy_test(&self, id: &str) -> Result<Value, ManagePopulationsError> {
        let id = PopulationId::new(id)?;
        self.gateway.check_configuration()?;
        info!("Starting accuracy test for population {}", id);
        Ok(self.gateway.test_population(&id).await?)
    }
}
