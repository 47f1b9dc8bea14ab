//! SeaORM adapter for the payments table.

use sea_orm::{ActiveModelTrait, ConnectionTrait, NotSet, Set};
use time::OffsetDateTime;

use crate::entities::payments::{self, PaymentStatus, PaymentType};

#[derive(Debug, Clone)]
pub struct PaymentCreate {
    pub user_id: i64,
    pub payment_type: PaymentType,
    pub status: PaymentStatus,
    /// Minor units
    pub amount: i64,
    pub currency: String,
    pub description: Option<String>,
    pub item_name: Option<String>,
    pub checkout_session_id: Option<String>,
}

pub async fn create_payment<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: PaymentCreate,
) -> Result<payments::Model, sea_orm::DbErr> {
    let now = OffsetDateTime::now_utc();
    let paid_at = (dto.status == PaymentStatus::Succeeded).then_some(now);

    payments::ActiveModel {
        id: NotSet,
        user_id: Set(dto.user_id),
        payment_type: Set(dto.payment_type),
        status: Set(dto.status),
        amount: Set(dto.amount),
        currency: Set(dto.currency),
        amount_refunded: Set(0),
        description: Set(dto.description),
        item_name: Set(dto.item_name),
        checkout_session_id: Set(dto.checkout_session_id),
        paid_at: Set(paid_at),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
}
