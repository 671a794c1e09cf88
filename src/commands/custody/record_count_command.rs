use crate::{
    commands::Command,
    db::DbPool,
    entities::{cash_count, document_sequence, opening, shift, vendor_payment},
    errors::{is_unique_violation, ServiceError},
    events::{Event, EventSender},
    models::{DocumentKind, ShiftStatus},
    money::{difference, exceeds_threshold, round2},
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
    static ref COUNTS_RECORDED: IntCounter = IntCounter::new(
        "cash_counts_recorded_total",
        "Total number of cash counts recorded"
    )
    .expect("metric can be created");
    static ref COUNT_FAILURES: IntCounter = IntCounter::new(
        "cash_count_failures_total",
        "Total number of failed cash counts"
    )
    .expect("metric can be created");
}

/// One disbursement line attached to the count being recorded.
///
/// `document_number` must be present for invoices and sales notes; for the
/// auto-numbered kinds it is ignored and allocated server-side.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VendorPaymentInput {
    #[validate(length(min = 1, message = "Vendor name is required"))]
    pub vendor: String,
    pub document_kind: DocumentKind,
    pub document_number: Option<String>,
    pub value: Decimal,
    pub balance_due: Decimal,
    #[validate(length(min = 1, message = "Payer name is required"))]
    pub paid_by: String,
}

/// Records the end-of-shift count for an opening, closing the opening and
/// its shift in the same transaction.
///
/// `final_amount` is the shift's sales total as reported by the caller;
/// every payment's balance due must fit within it.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct RecordCountCommand {
    pub opening_id: Uuid,
    pub counted_amount: Decimal,
    pub final_amount: Decimal,
    pub comment: Option<String>,
    #[validate]
    pub vendor_payments: Vec<VendorPaymentInput>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecordCountResult {
    pub count_id: Uuid,
    pub opening_id: Uuid,
    pub shift_id: Uuid,
    pub counted_amount: Decimal,
    pub expected_amount: Decimal,
    pub final_amount: Decimal,
    pub difference: Decimal,
    pub document_numbers: Vec<String>,
    pub counted_at: DateTime<Utc>,
}

#[async_trait::async_trait]
impl Command for RecordCountCommand {
    type Result = RecordCountResult;

    #[instrument(skip(self, db_pool, event_sender), fields(opening_id = %self.opening_id))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate_input().inspect_err(|_| {
            COUNT_FAILURES.inc();
        })?;

        let db = db_pool.as_ref();
        let threshold = crate::services::parameters::difference_threshold(db).await?;

        let result = self.record_count(db, threshold).await.inspect_err(|_| {
            COUNT_FAILURES.inc();
        })?;

        info!(
            count_id = %result.count_id,
            difference = %result.difference,
            "Cash count recorded; opening and shift closed"
        );

        event_sender
            .send_or_log(Event::CountRecorded {
                count_id: result.count_id,
                opening_id: result.opening_id,
                exceeds_threshold: exceeds_threshold(result.difference, threshold),
            })
            .await;

        COUNTS_RECORDED.inc();

        Ok(result)
    }
}

impl RecordCountCommand {
    fn validate_input(&self) -> Result<(), ServiceError> {
        self.validate()?;
        if self.counted_amount < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "counted amount must not be negative".to_string(),
            ));
        }
        if self.final_amount < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "final amount must not be negative".to_string(),
            ));
        }
        for payment in &self.vendor_payments {
            if payment.value < Decimal::ZERO || payment.balance_due < Decimal::ZERO {
                return Err(ServiceError::ValidationError(format!(
                    "payment amounts for vendor {} must not be negative",
                    payment.vendor
                )));
            }
            if !payment.document_kind.is_auto_numbered()
                && payment
                    .document_number
                    .as_deref()
                    .map_or(true, |n| n.trim().is_empty())
            {
                return Err(ServiceError::ValidationError(format!(
                    "document number is required for vendor {}",
                    payment.vendor
                )));
            }
        }
        Ok(())
    }

    async fn record_count(
        &self,
        db: &DatabaseConnection,
        threshold: Decimal,
    ) -> Result<RecordCountResult, ServiceError> {
        let opening_id = self.opening_id;
        let counted_amount = round2(self.counted_amount);
        let comment = self.comment.clone();
        let payments = self.vendor_payments.clone();

        let total_value: Decimal = payments.iter().map(|p| p.value).sum();
        let total_balance_due: Decimal = payments.iter().map(|p| p.balance_due).sum();
        let diff = difference(total_balance_due, total_value);
        let final_amount = round2(self.final_amount);

        if exceeds_threshold(diff, threshold)
            && comment.as_deref().map_or(true, |c| c.trim().is_empty())
        {
            return Err(ServiceError::ValidationError(format!(
                "difference {} exceeds the threshold {}; a comment is required",
                diff, threshold
            )));
        }
        for payment in &payments {
            if payment.balance_due > final_amount {
                return Err(ServiceError::ValidationError(format!(
                    "balance due for vendor {} exceeds the final counted amount",
                    payment.vendor
                )));
            }
        }

        db.transaction::<_, RecordCountResult, ServiceError>(move |txn| {
            Box::pin(async move {
                let current_opening = opening::Entity::find_by_id(opening_id)
                    .one(txn)
                    .await?
                    .ok_or_else(|| {
                        ServiceError::NotFound(format!("opening {} not found", opening_id))
                    })?;
                if current_opening.closed {
                    return Err(ServiceError::InvalidState(format!(
                        "opening {} is already closed",
                        opening_id
                    )));
                }

                let expected_amount = current_opening.initial_amount;
                let now = Utc::now();

                let new_count = cash_count::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    opening_id: Set(opening_id),
                    counted_amount: Set(counted_amount),
                    expected_amount: Set(expected_amount),
                    final_amount: Set(final_amount),
                    difference: Set(diff),
                    comment: Set(comment),
                    counted_at: Set(now),
                };

                // A lost race on UNIQUE(opening_id) means another count
                // already closed this opening.
                let saved_count = new_count.insert(txn).await.map_err(|e| {
                    if is_unique_violation(&e) {
                        ServiceError::InvalidState(format!(
                            "opening {} was already counted",
                            opening_id
                        ))
                    } else {
                        error!("Failed to insert cash count: {}", e);
                        ServiceError::DatabaseError(e)
                    }
                })?;

                let mut document_numbers = Vec::with_capacity(payments.len());
                for payment in &payments {
                    let document_number = match payment.document_kind.sequence_prefix() {
                        Some(prefix) => {
                            let allocated =
                                allocate_document_number(txn, payment.document_kind).await?;
                            format!("{}-{:04}", prefix, allocated)
                        }
                        None => payment
                            .document_number
                            .clone()
                            .unwrap_or_default()
                            .trim()
                            .to_string(),
                    };
                    document_numbers.push(document_number.clone());

                    let new_payment = vendor_payment::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        count_id: Set(saved_count.id),
                        vendor: Set(payment.vendor.clone()),
                        document_kind: Set(payment.document_kind),
                        document_number: Set(document_number),
                        value: Set(round2(payment.value)),
                        balance_due: Set(round2(payment.balance_due)),
                        paid_by: Set(payment.paid_by.clone()),
                        created_at: Set(now),
                    };
                    new_payment.insert(txn).await?;
                }

                let mut opening_update: opening::ActiveModel = current_opening.clone().into();
                opening_update.closed = Set(true);
                opening_update.update(txn).await?;

                let current_shift = shift::Entity::find_by_id(current_opening.shift_id)
                    .one(txn)
                    .await?
                    .ok_or_else(|| {
                        ServiceError::InternalError(format!(
                            "opening {} references missing shift {}",
                            opening_id, current_opening.shift_id
                        ))
                    })?;
                let mut shift_update: shift::ActiveModel = current_shift.into();
                shift_update.status = Set(ShiftStatus::Closed);
                shift_update.end_time = Set(Some(now.time()));
                shift_update.open_scope = Set(None);
                shift_update.update(txn).await?;

                Ok(RecordCountResult {
                    count_id: saved_count.id,
                    opening_id,
                    shift_id: current_opening.shift_id,
                    counted_amount,
                    expected_amount,
                    final_amount,
                    difference: diff,
                    document_numbers,
                    counted_at: now,
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

/// Allocates the next document number for an auto-numbered kind.
///
/// Increment-then-read inside the caller's transaction: the UPDATE takes the
/// row lock, so concurrent counts serialize on the sequence row and never
/// observe the same value. The allocated number is the value before the
/// increment.
async fn allocate_document_number<C: ConnectionTrait>(
    txn: &C,
    kind: DocumentKind,
) -> Result<i64, ServiceError> {
    if !kind.is_auto_numbered() {
        return Err(ServiceError::InternalError(format!(
            "document kind {:?} is not auto-numbered",
            kind
        )));
    }
    let kind_key = kind.to_value();

    let updated = document_sequence::Entity::update_many()
        .col_expr(
            document_sequence::Column::NextValue,
            Expr::col(document_sequence::Column::NextValue).add(1),
        )
        .filter(document_sequence::Column::DocumentKind.eq(kind_key.clone()))
        .exec(txn)
        .await?;
    if updated.rows_affected == 0 {
        return Err(ServiceError::InternalError(format!(
            "document sequence {} is not seeded",
            kind_key
        )));
    }

    let row = document_sequence::Entity::find_by_id(kind_key.clone())
        .one(txn)
        .await?
        .ok_or_else(|| {
            ServiceError::InternalError(format!("document sequence {} disappeared", kind_key))
        })?;

    Ok(row.next_value - 1)
}
