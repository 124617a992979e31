//! Point-in-time load of the full data set.
//!
//! Every dashboard read works from one immutable snapshot: the five
//! entity files are loaded concurrently and joined. If any single load
//! fails the whole snapshot fails and no aggregation runs on partial
//! data.

use thiserror::Error;

use crate::models::{Candidate, Programme, ProgrammeParticipant, ResultRecord, Team};
use crate::storage::{EntityType, JsonlStore, StorageConfig, StorageError};

/// Errors raised while loading a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to load {entity}: {source}")]
    Load {
        entity: &'static str,
        source: StorageError,
    },

    #[error("load task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// An immutable view of the whole store at one point in time.
#[derive(Debug, Default)]
pub struct Snapshot {
    pub teams: Vec<Team>,
    pub candidates: Vec<Candidate>,
    pub programmes: Vec<Programme>,
    pub participants: Vec<ProgrammeParticipant>,
    pub results: Vec<ResultRecord>,
}

/// Load all five collections concurrently; all-or-nothing.
pub async fn load(storage: &StorageConfig) -> Result<Snapshot, SnapshotError> {
    fn spawn_read<T>(
        storage: &StorageConfig,
        entity: EntityType,
    ) -> tokio::task::JoinHandle<Result<Vec<T>, StorageError>>
    where
        T: serde::de::DeserializeOwned + Send + 'static,
    {
        let store = JsonlStore::<T>::for_entity(storage, entity);
        tokio::task::spawn_blocking(move || store.read_all())
    }

    let (teams, candidates, programmes, participants, results) = tokio::try_join!(
        spawn_read::<Team>(storage, EntityType::Team),
        spawn_read::<Candidate>(storage, EntityType::Candidate),
        spawn_read::<Programme>(storage, EntityType::Programme),
        spawn_read::<ProgrammeParticipant>(storage, EntityType::ProgrammeParticipant),
        spawn_read::<ResultRecord>(storage, EntityType::Result),
    )?;

    Ok(Snapshot {
        teams: teams.map_err(|source| SnapshotError::Load {
            entity: "teams",
            source,
        })?,
        candidates: candidates.map_err(|source| SnapshotError::Load {
            entity: "candidates",
            source,
        })?,
        programmes: programmes.map_err(|source| SnapshotError::Load {
            entity: "programmes",
            source,
        })?,
        participants: participants.map_err(|source| SnapshotError::Load {
            entity: "programme participants",
            source,
        })?,
        results: results.map_err(|source| SnapshotError::Load {
            entity: "results",
            source,
        })?,
    })
}
