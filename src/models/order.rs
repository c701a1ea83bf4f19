use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::AppError;
use crate::schema::orders;

#[derive(Debug, Clone, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub shipping_address_id: Uuid,
    pub payment_method: String,
    pub total_amount: BigDecimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrder {
    pub id: Uuid,
    pub user_id: Uuid,
    pub shipping_address_id: Uuid,
    pub payment_method: String,
    pub total_amount: BigDecimal,
    pub created_at: DateTime<Utc>,
}

/// Payment methods accepted at checkout. Stored on the order row as the
/// upper-snake string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
pub enum PaymentMethod {
    CreditCard,
    Paypal,
    CashOnDelivery,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "CREDIT_CARD",
            PaymentMethod::Paypal => "PAYPAL",
            PaymentMethod::CashOnDelivery => "CASH_ON_DELIVERY",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREDIT_CARD" => Ok(PaymentMethod::CreditCard),
            "PAYPAL" => Ok(PaymentMethod::Paypal),
            "CASH_ON_DELIVERY" => Ok(PaymentMethod::CashOnDelivery),
            _ => Err(AppError::Validation(
                "paymentMethod must be one of CREDIT_CARD, PAYPAL, CASH_ON_DELIVERY".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_method_round_trips_through_str() {
        for method in [
            PaymentMethod::CreditCard,
            PaymentMethod::Paypal,
            PaymentMethod::CashOnDelivery,
        ] {
            assert_eq!(method.as_str().parse::<PaymentMethod>().unwrap(), method);
        }
    }

    #[test]
    fn unknown_payment_method_is_a_validation_error() {
        let err = "BITCOIN".parse::<PaymentMethod>().unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(err.to_string().contains("paymentMethod"));
    }

    #[test]
    fn payment_method_parse_is_case_sensitive() {
        assert!("credit_card".parse::<PaymentMethod>().is_err());
    }
}
