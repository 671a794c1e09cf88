use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::{
    db::DbPool,
    entities::{cash_count, opening, register, shift, transfer},
    errors::ServiceError,
    models::TransferStatus,
    queries::Query,
};

/// Transit time above which a pending transfer is flagged for attention.
pub const TRANSIT_ATTENTION_MINUTES: i64 = 30;

/// Whole minutes a transfer has been in transit. Clock skew can put `sent_at`
/// marginally in the future; the result is clamped at zero.
pub fn transit_minutes(sent_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - sent_at).num_minutes().max(0)
}

/// The opening a (register, user) pair currently works under, if any.
#[derive(Debug, Serialize, Deserialize)]
pub struct ActiveOpening {
    pub opening_id: Uuid,
    pub shift_id: Uuid,
    pub register_id: Uuid,
    pub user_id: Uuid,
    pub initial_amount: Decimal,
    pub notes: Option<String>,
    pub opened_at: DateTime<Utc>,
}

/// Finds the open shift of a (register, user) pair and its unclosed opening.
#[derive(Debug, Serialize, Deserialize)]
pub struct ActiveOpeningQuery {
    pub register_id: Uuid,
    pub user_id: Uuid,
}

#[async_trait]
impl Query for ActiveOpeningQuery {
    type Result = Option<ActiveOpening>;

    #[instrument(skip(self, db), fields(register_id = %self.register_id, user_id = %self.user_id))]
    async fn execute(&self, db: &DbPool) -> Result<Self::Result, ServiceError> {
        debug!("Executing ActiveOpeningQuery");

        let scope = shift::Model::scope_key(self.register_id, self.user_id);
        let open_shifts = shift::Entity::find()
            .filter(shift::Column::OpenScope.eq(scope))
            .all(db)
            .await?;

        // The unique index makes a second row impossible; finding one anyway
        // means the store is corrupt and must not be silently picked from.
        if open_shifts.len() > 1 {
            return Err(ServiceError::InternalError(format!(
                "multiple open shifts for register {} and user {}",
                self.register_id, self.user_id
            )));
        }
        let Some(open_shift) = open_shifts.into_iter().next() else {
            return Ok(None);
        };

        let current_opening = opening::Entity::find()
            .filter(opening::Column::ShiftId.eq(open_shift.id))
            .filter(opening::Column::Closed.eq(false))
            .one(db)
            .await?;

        Ok(current_opening.map(|o| ActiveOpening {
            opening_id: o.id,
            shift_id: open_shift.id,
            register_id: open_shift.register_id,
            user_id: open_shift.user_id,
            initial_amount: o.initial_amount,
            notes: o.notes,
            opened_at: o.opened_at,
        }))
    }
}

/// A count that closed its shift but has not been sent to the principal
/// register yet, with enough context to seed the transfer form.
#[derive(Debug, Serialize, Deserialize)]
pub struct UntransferredCount {
    pub count_id: Uuid,
    pub opening_id: Uuid,
    pub shift_id: Uuid,
    pub register_id: Uuid,
    pub register_name: String,
    pub user_id: Uuid,
    pub employee_id: Option<Uuid>,
    pub counted_amount: Decimal,
    pub difference: Decimal,
    pub counted_at: DateTime<Utc>,
}

/// Finds the most recent count with no transfer, via an anti-join.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LatestUntransferredCountQuery;

#[async_trait]
impl Query for LatestUntransferredCountQuery {
    type Result = Option<UntransferredCount>;

    #[instrument(skip(self, db))]
    async fn execute(&self, db: &DbPool) -> Result<Self::Result, ServiceError> {
        debug!("Executing LatestUntransferredCountQuery");

        let found = cash_count::Entity::find()
            .left_join(transfer::Entity)
            .filter(transfer::Column::Id.is_null())
            .order_by_desc(cash_count::Column::CountedAt)
            .one(db)
            .await?;
        let Some(count) = found else {
            return Ok(None);
        };

        let owning_opening = opening::Entity::find_by_id(count.opening_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::InternalError(format!(
                    "count {} references missing opening {}",
                    count.id, count.opening_id
                ))
            })?;
        let owning_shift = shift::Entity::find_by_id(owning_opening.shift_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::InternalError(format!(
                    "opening {} references missing shift {}",
                    owning_opening.id, owning_opening.shift_id
                ))
            })?;
        let source_register = register::Entity::find_by_id(owning_shift.register_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::InternalError(format!(
                    "shift {} references missing register {}",
                    owning_shift.id, owning_shift.register_id
                ))
            })?;

        Ok(Some(UntransferredCount {
            count_id: count.id,
            opening_id: count.opening_id,
            shift_id: owning_shift.id,
            register_id: source_register.id,
            register_name: source_register.name,
            user_id: owning_shift.user_id,
            employee_id: owning_shift.employee_id,
            counted_amount: count.counted_amount,
            difference: count.difference,
            counted_at: count.counted_at,
        }))
    }
}

/// An in-transit transfer annotated for the reception screen.
#[derive(Debug, Serialize, Deserialize)]
pub struct PendingTransfer {
    pub transfer_id: Uuid,
    pub count_id: Uuid,
    pub source_register_id: Uuid,
    pub source_register_name: String,
    pub sending_user_id: Uuid,
    pub employee_id: Option<Uuid>,
    pub amount: Decimal,
    pub sent_at: DateTime<Utc>,
    pub transit_minutes: i64,
    pub needs_attention: bool,
}

/// Lists in-transit transfers oldest first, flagging long transits.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PendingTransfersQuery;

#[async_trait]
impl Query for PendingTransfersQuery {
    type Result = Vec<PendingTransfer>;

    #[instrument(skip(self, db))]
    async fn execute(&self, db: &DbPool) -> Result<Self::Result, ServiceError> {
        debug!("Executing PendingTransfersQuery");

        let transfers = transfer::Entity::find()
            .filter(transfer::Column::Status.eq(TransferStatus::InTransit))
            .order_by_asc(transfer::Column::SentAt)
            .all(db)
            .await?;
        if transfers.is_empty() {
            return Ok(Vec::new());
        }

        let register_ids: Vec<Uuid> = transfers.iter().map(|t| t.source_register_id).collect();
        let registers: HashMap<Uuid, String> = register::Entity::find()
            .filter(register::Column::Id.is_in(register_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|r| (r.id, r.name))
            .collect();

        let count_ids: Vec<Uuid> = transfers.iter().map(|t| t.count_id).collect();
        let counts: HashMap<Uuid, Uuid> = cash_count::Entity::find()
            .filter(cash_count::Column::Id.is_in(count_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|c| (c.id, c.opening_id))
            .collect();
        let opening_ids: Vec<Uuid> = counts.values().copied().collect();
        let openings: HashMap<Uuid, Uuid> = opening::Entity::find()
            .filter(opening::Column::Id.is_in(opening_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|o| (o.id, o.shift_id))
            .collect();
        let shift_ids: Vec<Uuid> = openings.values().copied().collect();
        let shifts: HashMap<Uuid, (Uuid, Option<Uuid>)> = shift::Entity::find()
            .filter(shift::Column::Id.is_in(shift_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|s| (s.id, (s.user_id, s.employee_id)))
            .collect();

        let now = Utc::now();
        let mut pending = Vec::with_capacity(transfers.len());
        for t in transfers {
            let (sending_user_id, employee_id) = counts
                .get(&t.count_id)
                .and_then(|opening_id| openings.get(opening_id))
                .and_then(|shift_id| shifts.get(shift_id))
                .copied()
                .ok_or_else(|| {
                    ServiceError::InternalError(format!(
                        "transfer {} has a broken custody chain",
                        t.id
                    ))
                })?;
            let source_register_name = registers
                .get(&t.source_register_id)
                .cloned()
                .ok_or_else(|| {
                    ServiceError::InternalError(format!(
                        "transfer {} references missing register {}",
                        t.id, t.source_register_id
                    ))
                })?;
            let minutes = transit_minutes(t.sent_at, now);
            pending.push(PendingTransfer {
                transfer_id: t.id,
                count_id: t.count_id,
                source_register_id: t.source_register_id,
                source_register_name,
                sending_user_id,
                employee_id,
                amount: t.amount,
                sent_at: t.sent_at,
                transit_minutes: minutes,
                needs_attention: minutes > TRANSIT_ATTENTION_MINUTES,
            });
        }

        Ok(pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn transit_minutes_floors_and_clamps() {
        let now = Utc::now();
        assert_eq!(transit_minutes(now - Duration::seconds(90), now), 1);
        assert_eq!(transit_minutes(now - Duration::seconds(59), now), 0);
        assert_eq!(transit_minutes(now + Duration::seconds(30), now), 0);
        assert_eq!(transit_minutes(now - Duration::minutes(31), now), 31);
    }

    #[test]
    fn attention_flag_is_strictly_above_thirty() {
        assert!(!(30 > TRANSIT_ATTENTION_MINUTES));
        assert!(31 > TRANSIT_ATTENTION_MINUTES);
    }
}
