use crate::{
    commands::Command,
    db::DbPool,
    entities::{reception, transfer},
    errors::{is_unique_violation, ServiceError},
    events::{Event, EventSender},
    models::TransferStatus,
    money::round2,
};
use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use prometheus::IntCounter;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{Set, *};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

lazy_static! {
    static ref TRANSFERS_RECEIVED: IntCounter = IntCounter::new(
        "cash_transfers_received_total",
        "Total number of transfers confirmed at the principal register"
    )
    .expect("metric can be created");
    static ref RECEPTION_FAILURES: IntCounter = IntCounter::new(
        "cash_reception_failures_total",
        "Total number of failed transfer receptions"
    )
    .expect("metric can be created");
}

/// Confirms arrival of an in-transit transfer at the principal register.
///
/// An exact amount settles the transfer as received; any mismatch settles it
/// as observed and demands a comment. Both outcomes are terminal.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct ReceiveTransferCommand {
    pub transfer_id: Uuid,
    pub receiving_user_id: Uuid,
    pub received_amount: Decimal,
    pub comment: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReceiveTransferResult {
    pub reception_id: Uuid,
    pub transfer_id: Uuid,
    pub received_amount: Decimal,
    pub difference: Decimal,
    pub status: TransferStatus,
    pub received_at: DateTime<Utc>,
}

#[async_trait::async_trait]
impl Command for ReceiveTransferCommand {
    type Result = ReceiveTransferResult;

    #[instrument(skip(self, db_pool, event_sender), fields(transfer_id = %self.transfer_id))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate_input().inspect_err(|_| {
            RECEPTION_FAILURES.inc();
        })?;

        let db = db_pool.as_ref();
        let result = self.receive(db).await.inspect_err(|_| {
            RECEPTION_FAILURES.inc();
        })?;

        info!(
            reception_id = %result.reception_id,
            status = ?result.status,
            difference = %result.difference,
            "Transfer reception recorded"
        );

        event_sender
            .send_or_log(Event::TransferReceived {
                transfer_id: result.transfer_id,
                reception_id: result.reception_id,
                observed: result.status == TransferStatus::Observed,
            })
            .await;

        TRANSFERS_RECEIVED.inc();

        Ok(result)
    }
}

impl ReceiveTransferCommand {
    fn validate_input(&self) -> Result<(), ServiceError> {
        self.validate()?;
        if self.received_amount < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "received amount must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    async fn receive(&self, db: &DatabaseConnection) -> Result<ReceiveTransferResult, ServiceError> {
        let transfer_id = self.transfer_id;
        let receiving_user_id = self.receiving_user_id;
        let received_amount = round2(self.received_amount);
        let comment = self.comment.clone();

        db.transaction::<_, ReceiveTransferResult, ServiceError>(move |txn| {
            Box::pin(async move {
                let current = transfer::Entity::find_by_id(transfer_id)
                    .one(txn)
                    .await?
                    .ok_or_else(|| {
                        ServiceError::NotFound(format!("transfer {} not found", transfer_id))
                    })?;
                if current.status != TransferStatus::InTransit {
                    return Err(ServiceError::InvalidState(format!(
                        "transfer {} is not in transit",
                        transfer_id
                    )));
                }

                let diff = round2(received_amount - current.amount);
                if diff != Decimal::ZERO
                    && comment.as_deref().map_or(true, |c| c.trim().is_empty())
                {
                    return Err(ServiceError::ValidationError(format!(
                        "received amount differs from the sent amount by {}; a comment is required",
                        diff
                    )));
                }

                let new_status = if diff == Decimal::ZERO {
                    TransferStatus::Received
                } else {
                    TransferStatus::Observed
                };

                // Filtered UPDATE settles the race between two concurrent
                // receptions: only one can move the row out of in_transit.
                let updated = transfer::Entity::update_many()
                    .col_expr(
                        transfer::Column::Status,
                        Expr::value(new_status.to_value()),
                    )
                    .filter(transfer::Column::Id.eq(transfer_id))
                    .filter(transfer::Column::Status.eq(TransferStatus::InTransit))
                    .exec(txn)
                    .await?;
                if updated.rows_affected == 0 {
                    return Err(ServiceError::InvalidState(format!(
                        "transfer {} is not in transit",
                        transfer_id
                    )));
                }

                let now = Utc::now();
                let new_reception = reception::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    transfer_id: Set(transfer_id),
                    receiving_user_id: Set(receiving_user_id),
                    received_amount: Set(received_amount),
                    difference: Set(diff),
                    comment: Set(comment),
                    received_at: Set(now),
                };
                let saved = new_reception.insert(txn).await.map_err(|e| {
                    if is_unique_violation(&e) {
                        ServiceError::InvalidState(format!(
                            "transfer {} was already received",
                            transfer_id
                        ))
                    } else {
                        error!("Failed to insert reception: {}", e);
                        ServiceError::DatabaseError(e)
                    }
                })?;

                Ok(ReceiveTransferResult {
                    reception_id: saved.id,
                    transfer_id,
                    received_amount,
                    difference: diff,
                    status: new_status,
                    received_at: now,
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
