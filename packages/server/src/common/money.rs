//! Money amounts at the storage/serialization boundary.
//!
//! Fine amounts are `NUMERIC(10,2)` in Postgres and `rust_decimal::Decimal` in
//! every model. They become `f64` only when a response body is written, through
//! the serde adapters below, never by inspecting values at runtime.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serializer;

/// Convert a stored amount to the JSON number clients expect.
///
/// Returns `None` only when the decimal cannot be represented as an `f64`.
pub fn to_f64(amount: Decimal) -> Option<f64> {
    amount.to_f64()
}

/// `#[serde(serialize_with = "money::as_f64")]` for `Decimal` fields.
pub fn as_f64<S: Serializer>(amount: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
    match to_f64(*amount) {
        Some(value) => serializer.serialize_f64(value),
        None => Err(serde::ser::Error::custom(format!(
            "amount {} is not representable as a number",
            amount
        ))),
    }
}

/// `#[serde(serialize_with = "money::option_as_f64")]` for `Option<Decimal>` fields.
pub fn option_as_f64<S: Serializer>(
    amount: &Option<Decimal>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match amount {
        Some(amount) => as_f64(amount, serializer),
        None => serializer.serialize_none(),
    }
}
