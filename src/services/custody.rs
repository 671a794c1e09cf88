use crate::{
    commands::custody::{
        CreateTransferCommand, CreateTransferResult, OpenShiftCommand, OpenShiftResult,
        ReceiveTransferCommand, ReceiveTransferResult, RecordCountCommand, RecordCountResult,
    },
    commands::Command,
    db::DbPool,
    entities::register,
    errors::ServiceError,
    events::EventSender,
    queries::{
        custody_queries::{
            ActiveOpening, ActiveOpeningQuery, LatestUntransferredCountQuery, PendingTransfer,
            PendingTransfersQuery, UntransferredCount,
        },
        Query,
    },
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use std::sync::Arc;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::models::RegisterKind;

/// Facade over the custody commands and queries.
///
/// Commands are retried exactly once when the store reports a connection
/// failure. The transaction either committed or it did not, so the retry
/// re-runs the full command including its guards.
#[derive(Clone)]
pub struct CustodyService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl CustodyService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    async fn run<C: Command>(&self, command: &C) -> Result<C::Result, ServiceError> {
        match command
            .execute(self.db_pool.clone(), self.event_sender.clone())
            .await
        {
            Err(e) if e.is_transient() => {
                warn!("Transient store failure, retrying once: {}", e);
                command
                    .execute(self.db_pool.clone(), self.event_sender.clone())
                    .await
            }
            other => other,
        }
    }

    #[instrument(skip(self, command))]
    pub async fn open_shift(
        &self,
        command: OpenShiftCommand,
    ) -> Result<OpenShiftResult, ServiceError> {
        self.run(&command).await
    }

    #[instrument(skip(self, command))]
    pub async fn record_count(
        &self,
        command: RecordCountCommand,
    ) -> Result<RecordCountResult, ServiceError> {
        self.run(&command).await
    }

    #[instrument(skip(self, command))]
    pub async fn create_transfer(
        &self,
        command: CreateTransferCommand,
    ) -> Result<CreateTransferResult, ServiceError> {
        self.run(&command).await
    }

    #[instrument(skip(self, command))]
    pub async fn receive_transfer(
        &self,
        command: ReceiveTransferCommand,
    ) -> Result<ReceiveTransferResult, ServiceError> {
        self.run(&command).await
    }

    #[instrument(skip(self))]
    pub async fn active_opening(
        &self,
        register_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<ActiveOpening>, ServiceError> {
        ActiveOpeningQuery {
            register_id,
            user_id,
        }
        .execute(&self.db_pool)
        .await
    }

    #[instrument(skip(self))]
    pub async fn latest_untransferred_count(
        &self,
    ) -> Result<Option<UntransferredCount>, ServiceError> {
        LatestUntransferredCountQuery.execute(&self.db_pool).await
    }

    #[instrument(skip(self))]
    pub async fn pending_transfers(&self) -> Result<Vec<PendingTransfer>, ServiceError> {
        PendingTransfersQuery.execute(&self.db_pool).await
    }

    /// Active registers for the opening and transfer screens, optionally
    /// filtered by kind.
    #[instrument(skip(self))]
    pub async fn list_registers(
        &self,
        kind: Option<RegisterKind>,
    ) -> Result<Vec<register::Model>, ServiceError> {
        let mut query = register::Entity::find().filter(register::Column::Active.eq(true));
        if let Some(kind) = kind {
            query = query.filter(register::Column::Kind.eq(kind));
        }
        query
            .order_by_asc(register::Column::Name)
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::DatabaseError)
    }
}
