use crate::{
    db::DbPool,
    entities::parameter::{self, DIFFERENCE_THRESHOLD_KEY},
    errors::ServiceError,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use tracing::warn;

/// Tolerance applied when the parameter row is missing.
pub const DEFAULT_DIFFERENCE_THRESHOLD: Decimal = dec!(2.00);

/// Reads the monetary difference tolerance from the parameters table.
///
/// A missing row or an unparseable value falls back to the default rather
/// than blocking counts.
pub async fn difference_threshold(db: &DbPool) -> Result<Decimal, ServiceError> {
    let row = parameter::Entity::find()
        .filter(parameter::Column::Key.eq(DIFFERENCE_THRESHOLD_KEY))
        .one(db)
        .await?;

    match row {
        Some(p) => match p.value.trim().parse::<Decimal>() {
            Ok(v) => Ok(v),
            Err(e) => {
                warn!(
                    key = DIFFERENCE_THRESHOLD_KEY,
                    value = %p.value,
                    "Parameter value is not a decimal ({}); using default",
                    e
                );
                Ok(DEFAULT_DIFFERENCE_THRESHOLD)
            }
        },
        None => Ok(DEFAULT_DIFFERENCE_THRESHOLD),
    }
}
