use crate::{
    commands::Command,
    db::DbPool,
    entities::{opening, register, shift},
    errors::{is_unique_violation, ServiceError},
    events::{Event, EventSender},
    models::ShiftStatus,
    money::round2,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
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
    static ref SHIFT_OPENINGS: IntCounter =
        IntCounter::new("shift_openings_total", "Total number of shifts opened")
            .expect("metric can be created");
    static ref SHIFT_OPENING_FAILURES: IntCounter = IntCounter::new(
        "shift_opening_failures_total",
        "Total number of failed shift openings"
    )
    .expect("metric can be created");
}

/// Opens a shift on a register for a user and records its starting float.
///
/// `date` and `start_time` default to the server clock when omitted; callers
/// may supply them for back-dated openings.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct OpenShiftCommand {
    pub register_id: Uuid,
    pub user_id: Uuid,
    pub employee_id: Option<Uuid>,
    pub initial_amount: Decimal,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OpenShiftResult {
    pub shift_id: Uuid,
    pub opening_id: Uuid,
    pub register_id: Uuid,
    pub user_id: Uuid,
    pub initial_amount: Decimal,
    pub opened_at: DateTime<Utc>,
}

#[async_trait::async_trait]
impl Command for OpenShiftCommand {
    type Result = OpenShiftResult;

    #[instrument(skip(self, db_pool, event_sender), fields(register_id = %self.register_id, user_id = %self.user_id))]
    async fn execute(
        &self,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
    ) -> Result<Self::Result, ServiceError> {
        self.validate_input().inspect_err(|_| {
            SHIFT_OPENING_FAILURES.inc();
        })?;

        let db = db_pool.as_ref();
        let (saved_shift, saved_opening) = self.open_shift(db).await.inspect_err(|_| {
            SHIFT_OPENING_FAILURES.inc();
        })?;

        info!(
            shift_id = %saved_shift.id,
            opening_id = %saved_opening.id,
            initial_amount = %saved_opening.initial_amount,
            "Shift opened"
        );

        event_sender
            .send_or_log(Event::ShiftOpened {
                shift_id: saved_shift.id,
                register_id: saved_shift.register_id,
                user_id: saved_shift.user_id,
            })
            .await;

        SHIFT_OPENINGS.inc();

        Ok(OpenShiftResult {
            shift_id: saved_shift.id,
            opening_id: saved_opening.id,
            register_id: saved_shift.register_id,
            user_id: saved_shift.user_id,
            initial_amount: saved_opening.initial_amount,
            opened_at: saved_opening.opened_at,
        })
    }
}

impl OpenShiftCommand {
    fn validate_input(&self) -> Result<(), ServiceError> {
        self.validate()?;
        if self.initial_amount < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "initial amount must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    async fn open_shift(
        &self,
        db: &DatabaseConnection,
    ) -> Result<(shift::Model, opening::Model), ServiceError> {
        let register_id = self.register_id;
        let user_id = self.user_id;
        let employee_id = self.employee_id;
        let initial_amount = round2(self.initial_amount);
        let date = self.date;
        let start_time = self.start_time;
        let notes = self.notes.clone();

        db.transaction::<_, (shift::Model, opening::Model), ServiceError>(move |txn| {
            Box::pin(async move {
                let reg = register::Entity::find_by_id(register_id)
                    .one(txn)
                    .await?
                    .ok_or_else(|| {
                        ServiceError::NotFound(format!("register {} not found", register_id))
                    })?;
                if !reg.active {
                    return Err(ServiceError::ValidationError(format!(
                        "register {} is not active",
                        register_id
                    )));
                }

                let scope = shift::Model::scope_key(register_id, user_id);

                // Guard read inside the transaction; the UNIQUE index on
                // open_scope still decides the race between two concurrent
                // opens.
                let already_open = shift::Entity::find()
                    .filter(shift::Column::OpenScope.eq(scope.clone()))
                    .one(txn)
                    .await?;
                if already_open.is_some() {
                    return Err(ServiceError::Conflict(format!(
                        "user {} already has an open shift on register {}",
                        user_id, register_id
                    )));
                }

                let now = Utc::now();
                let new_shift = shift::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    register_id: Set(register_id),
                    user_id: Set(user_id),
                    employee_id: Set(employee_id),
                    date: Set(date.unwrap_or_else(|| now.date_naive())),
                    start_time: Set(start_time.unwrap_or_else(|| now.time())),
                    end_time: Set(None),
                    status: Set(ShiftStatus::Open),
                    open_scope: Set(Some(scope)),
                    created_at: Set(now),
                };

                let saved_shift = new_shift.insert(txn).await.map_err(|e| {
                    if is_unique_violation(&e) {
                        ServiceError::Conflict(format!(
                            "user {} already has an open shift on register {}",
                            user_id, register_id
                        ))
                    } else {
                        error!("Failed to insert shift: {}", e);
                        ServiceError::DatabaseError(e)
                    }
                })?;

                let new_opening = opening::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    shift_id: Set(saved_shift.id),
                    initial_amount: Set(initial_amount),
                    notes: Set(notes),
                    closed: Set(false),
                    opened_at: Set(now),
                };
                let saved_opening = new_opening.insert(txn).await?;

                Ok((saved_shift, saved_opening))
            })
        })
        .await
        .map_err(|e| match e {
            TransactionError::Connection(db_err) => ServiceError::DatabaseError(db_err),
            TransactionError::Transaction(service_err) => service_err,
        })
    }
}
