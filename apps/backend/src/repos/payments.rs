//! Payment repository functions and the payment domain model.

use sea_orm::ConnectionTrait;
use time::OffsetDateTime;

use crate::adapters::payments_sea as payments_adapter;
use crate::entities::payments::{self, PaymentStatus, PaymentType};
use crate::errors::domain::DomainError;

pub use payments_adapter::PaymentCreate;

/// Payment domain model
#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    pub id: i64,
    pub user_id: i64,
    pub payment_type: PaymentType,
    pub status: PaymentStatus,
    /// Minor units (cents for USD)
    pub amount: i64,
    pub currency: String,
    pub amount_refunded: i64,
    pub description: Option<String>,
    pub item_name: Option<String>,
    pub checkout_session_id: Option<String>,
    pub paid_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
}

impl Payment {
    /// Major units for USD; other currencies are returned as stored.
    pub fn amount_in_dollars(&self) -> f64 {
        if self.currency == "USD" {
            self.amount as f64 / 100.0
        } else {
            self.amount as f64
        }
    }
}

pub async fn create_payment<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: PaymentCreate,
) -> Result<Payment, DomainError> {
    let payment = payments_adapter::create_payment(conn, dto).await?;
    Ok(Payment::from(payment))
}

impl From<payments::Model> for Payment {
    fn from(model: payments::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            payment_type: model.payment_type,
            status: model.status,
            amount: model.amount,
            currency: model.currency,
            amount_refunded: model.amount_refunded,
            description: model.description,
            item_name: model.item_name,
            checkout_session_id: model.checkout_session_id,
            paid_at: model.paid_at,
            created_at: model.created_at,
        }
    }
}
