use crate::{
    commands::Command,
    db::DbPool,
    entities::{cash_count, opening, register, shift, transfer},
    errors::{is_unique_violation, ServiceError},
    events::{Event, EventSender},
    models::{RegisterKind, TransferStatus},
};
use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use prometheus::IntCounter;
use rust_decimal::Decimal;
use sea_orm::{Set, *};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

lazy_static! {
    static ref TRANSFERS_CREATED: IntCounter = IntCounter::new(
        "cash_transfers_created_total",
        "Total number of cash transfers sent"
    )
    .expect("metric can be created");
    static ref TRANSFER_FAILURES: IntCounter = IntCounter::new(
        "cash_transfer_failures_total",
        "Total number of failed transfer creations"
    )
    .expect("metric can be created");
}

/// Sends the counted cash of a closed shift to the principal register.
/// The amount is always the count's counted amount; callers cannot override
/// it.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateTransferCommand {
    pub count_id: Uuid,
    pub destination_register_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateTransferResult {
    pub transfer_id: Uuid,
    pub count_id: Uuid,
    pub source_register_id: Uuid,
    pub destination_register_id: Uuid,
    pub amount: Decimal,
    pub status: TransferStatus,
    pub sent_at: DateTime<Utc>,
}

#[async_trait::async_trait]
impl Command for CreateTransferCommand {
    type Result = CreateTransferResult;

    #[instrument(skip(self, db_pool, event_sender), fields(count_id = %self.count_id))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        let db = db_pool.as_ref();
        let saved = self.create_transfer(db).await.inspect_err(|_| {
            TRANSFER_FAILURES.inc();
        })?;

        info!(
            transfer_id = %saved.id,
            amount = %saved.amount,
            "Transfer sent to principal register"
        );

        event_sender
            .send_or_log(Event::TransferCreated {
                transfer_id: saved.id,
                source_register_id: saved.source_register_id,
                destination_register_id: saved.destination_register_id,
            })
            .await;

        TRANSFERS_CREATED.inc();

        Ok(CreateTransferResult {
            transfer_id: saved.id,
            count_id: saved.count_id,
            source_register_id: saved.source_register_id,
            destination_register_id: saved.destination_register_id,
            amount: saved.amount,
            status: saved.status,
            sent_at: saved.sent_at,
        })
    }
}

impl CreateTransferCommand {
    async fn create_transfer(
        &self,
        db: &DatabaseConnection,
    ) -> Result<transfer::Model, ServiceError> {
        let count_id = self.count_id;
        let destination_register_id = self.destination_register_id;

        db.transaction::<_, transfer::Model, ServiceError>(move |txn| {
            Box::pin(async move {
                let count = cash_count::Entity::find_by_id(count_id)
                    .one(txn)
                    .await?
                    .ok_or_else(|| {
                        ServiceError::NotFound(format!("count {} not found", count_id))
                    })?;

                let destination = register::Entity::find_by_id(destination_register_id)
                    .one(txn)
                    .await?
                    .ok_or_else(|| {
                        ServiceError::NotFound(format!(
                            "destination register {} not found",
                            destination_register_id
                        ))
                    })?;
                if destination.kind != RegisterKind::Principal {
                    return Err(ServiceError::ValidationError(format!(
                        "destination register {} is not a principal register",
                        destination_register_id
                    )));
                }
                if !destination.active {
                    return Err(ServiceError::ValidationError(format!(
                        "destination register {} is not active",
                        destination_register_id
                    )));
                }

                // Source register is derived from the custody chain, never
                // taken from the caller.
                let source_register_id = source_register_of(txn, &count).await?;

                let existing = transfer::Entity::find()
                    .filter(transfer::Column::CountId.eq(count_id))
                    .one(txn)
                    .await?;
                if existing.is_some() {
                    return Err(ServiceError::Conflict(format!(
                        "count {} already has a transfer",
                        count_id
                    )));
                }

                let new_transfer = transfer::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    count_id: Set(count_id),
                    source_register_id: Set(source_register_id),
                    destination_register_id: Set(destination_register_id),
                    amount: Set(count.counted_amount),
                    status: Set(TransferStatus::InTransit),
                    sent_at: Set(Utc::now()),
                };

                new_transfer.insert(txn).await.map_err(|e| {
                    if is_unique_violation(&e) {
                        ServiceError::Conflict(format!(
                            "count {} already has a transfer",
                            count_id
                        ))
                    } else {
                        error!("Failed to insert transfer: {}", e);
                        ServiceError::DatabaseError(e)
                    }
                })
            })
        })
        .await
        .map_err(|e| match e {
            TransactionError::Connection(db_err) => ServiceError::DatabaseError(db_err),
            TransactionError::Transaction(service_err) => service_err,
        })
    }
}

/// Walks Count -> Opening -> Shift to find the register the cash came from.
async fn source_register_of<C: ConnectionTrait>(
    txn: &C,
    count: &cash_count::Model,
) -> Result<Uuid, ServiceError> {
    let owning_opening = opening::Entity::find_by_id(count.opening_id)
        .one(txn)
        .await?
        .ok_or_else(|| {
            ServiceError::InternalError(format!(
                "count {} references missing opening {}",
                count.id, count.opening_id
            ))
        })?;
    let owning_shift = shift::Entity::find_by_id(owning_opening.shift_id)
        .one(txn)
        .await?
        .ok_or_else(|| {
            ServiceError::InternalError(format!(
                "opening {} references missing shift {}",
                owning_opening.id, owning_opening.shift_id
            ))
        })?;
    Ok(owning_shift.register_id)
}
