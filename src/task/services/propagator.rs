//! Parent status propagation.

use crate::task::{
    domain::{TaskDomainError, TaskId, TaskStatus, derive_parent_status},
    ports::{TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Result of a single propagation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropagationOutcome {
    /// The parent no longer exists.
    ParentMissing,
    /// The parent is deleted and keeps its status.
    ParentDeleted,
    /// The parent has no live children; its status stays user-controlled.
    NoChildren,
    /// The derived status equals the stored one; nothing was written.
    Unchanged(TaskStatus),
    /// The parent status was rewritten.
    Updated {
        /// Status before propagation.
        from: TaskStatus,
        /// Derived status now stored.
        to: TaskStatus,
    },
}

/// Errors raised while propagating a parent status.
#[derive(Debug, Error)]
pub enum PropagationError {
    /// Reading children or writing the parent failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// The parent rejected the derived status.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
}

/// Re-derives a parent's status from its direct children.
///
/// Only one level is handled: the parent's own parent is never read or
/// written, even when the parent's status changes.
#[derive(Debug)]
pub struct ParentStatusPropagator<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> Clone for ParentStatusPropagator<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R, C> ParentStatusPropagator<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a propagator over the given repository.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Recomputes and stores the status of `parent_id`.
    ///
    /// Running it twice over the same children yields the same status and
    /// performs no second write.
    ///
    /// # Errors
    ///
    /// Returns [`PropagationError`] when the repository fails.
    pub async fn propagate(
        &self,
        parent_id: TaskId,
    ) -> Result<PropagationOutcome, PropagationError> {
        let Some(mut parent) = self.repository.find_by_id(parent_id).await? else {
            return Ok(PropagationOutcome::ParentMissing);
        };
        if parent.is_deleted() {
            return Ok(PropagationOutcome::ParentDeleted);
        }

        let children = self.repository.find_children(parent_id).await?;
        let Some(derived) = derive_parent_status(&children) else {
            return Ok(PropagationOutcome::NoChildren);
        };

        let previous = parent.status();
        if !parent.set_status(derived, &*self.clock)? {
            return Ok(PropagationOutcome::Unchanged(previous));
        }
        self.repository.update(&parent).await?;
        Ok(PropagationOutcome::Updated {
            from: previous,
            to: derived,
        })
    }
}
