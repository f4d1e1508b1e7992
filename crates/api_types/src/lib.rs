//! JSON bodies of the `/api/v1` endpoints.
//!
//! Field names follow the point-of-sale frontend (`category_name`,
//! `item_id`, `sub_total`, ...). Money is a decimal number of currency units
//! on the wire (`12.5`) and integer cents everywhere else.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Success envelope: `{"data": ...}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Data<T> {
    pub data: T,
}

impl<T> Data<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Confirmation envelope returned by deletions: `{"message": ...}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

/// `#[serde(with)]` adapter between integer cents and a JSON decimal amount.
///
/// Incoming amounts are rounded half away from zero to the cent, so `0.1 + 0.2`
/// reads as 30 cents.
pub mod decimal_cents {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    const CENTS_PER_UNIT: f64 = 100.0;
    // Largest amount an f64 still carries to the exact cent (2^53 cents).
    const MAX_EXACT_CENTS: f64 = 9_007_199_254_740_992.0;

    pub fn serialize<S: Serializer>(cents: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(*cents as f64 / CENTS_PER_UNIT)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        if !amount.is_finite() {
            return Err(D::Error::custom("amount must be a finite number"));
        }
        let cents = (amount * CENTS_PER_UNIT).round();
        if cents.abs() > MAX_EXACT_CENTS {
            return Err(D::Error::custom("amount out of range"));
        }
        Ok(cents as i64)
    }
}

pub mod category {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryInput {
        #[serde(rename = "category_name")]
        pub name: String,
        #[serde(default)]
        pub description: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        #[serde(rename = "category_id")]
        pub id: i32,
        #[serde(rename = "category_name")]
        pub name: String,
        pub description: Option<String>,
    }
}

pub mod item {
    use super::*;
    use crate::category::CategoryView;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ItemInput {
        #[serde(rename = "item_name")]
        pub name: String,
        pub category_id: i32,
        /// Must be >= 0.
        #[serde(rename = "base_price", with = "crate::decimal_cents")]
        pub base_price_minor: i64,
        #[serde(default)]
        pub description: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ItemView {
        #[serde(rename = "item_id")]
        pub id: i32,
        #[serde(rename = "item_name")]
        pub name: String,
        pub category_id: i32,
        #[serde(rename = "base_price", with = "crate::decimal_cents")]
        pub base_price_minor: i64,
        pub description: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub category: Option<CategoryView>,
    }
}

pub mod customer {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CustomerInput {
        #[serde(rename = "customer_name")]
        pub name: String,
        #[serde(default)]
        pub phone: Option<String>,
        #[serde(default)]
        pub email: Option<String>,
        #[serde(default)]
        pub address: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CustomerView {
        #[serde(rename = "customer_id")]
        pub id: i32,
        #[serde(rename = "customer_name")]
        pub name: String,
        pub phone: Option<String>,
        pub email: Option<String>,
        pub address: Option<String>,
    }
}

pub mod invoice {
    use super::*;
    use crate::{customer::CustomerView, item::ItemView};

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvoiceLineNew {
        pub item_id: i32,
        pub quantity: i32,
    }

    /// Request body for creating an invoice.
    ///
    /// Amounts are never accepted from the client: every line is priced from
    /// the item's current `base_price`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvoiceNew {
        pub customer_id: i32,
        /// Percentage between 0 and 100, e.g. `8.875`.
        #[serde(default)]
        pub tax_rate: f64,
        pub items: Vec<InvoiceLineNew>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvoiceLineView {
        #[serde(rename = "invoice_item_id")]
        pub id: i32,
        pub invoice_id: i32,
        pub item_id: i32,
        pub quantity: i32,
        /// Unit price captured when the invoice was created.
        #[serde(rename = "unit_price", with = "crate::decimal_cents")]
        pub unit_price_minor: i64,
        #[serde(rename = "total_price", with = "crate::decimal_cents")]
        pub total_price_minor: i64,
        /// The item as it is now.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub item: Option<ItemView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvoiceView {
        #[serde(rename = "invoice_id")]
        pub id: i32,
        #[serde(rename = "invoice_number")]
        pub number: String,
        pub customer_id: i32,
        #[serde(rename = "invoice_date")]
        pub date: DateTime<Utc>,
        #[serde(rename = "sub_total", with = "crate::decimal_cents")]
        pub sub_total_minor: i64,
        pub tax_rate: f64,
        #[serde(rename = "tax_amount", with = "crate::decimal_cents")]
        pub tax_amount_minor: i64,
        #[serde(rename = "total_amount", with = "crate::decimal_cents")]
        pub total_amount_minor: i64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub customer: Option<CustomerView>,
        pub items: Vec<InvoiceLineView>,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{category::CategoryInput, item::ItemInput, item::ItemView};

    #[test]
    fn reads_frontend_payloads() {
        let category: CategoryInput =
            serde_json::from_value(json!({"category_name": "Pizzas"})).unwrap();
        assert_eq!(category.name, "Pizzas");
        assert_eq!(category.description, None);

        let item: ItemInput = serde_json::from_value(json!({
            "item_name": "Margherita",
            "category_id": 1,
            "base_price": 12.5,
            "description": "Tomato, mozzarella"
        }))
        .unwrap();
        assert_eq!(item.name, "Margherita");
        assert_eq!(item.base_price_minor, 1250);
    }

    #[test]
    fn amounts_round_to_the_cent() {
        let parse = |price: serde_json::Value| {
            serde_json::from_value::<ItemInput>(
                json!({"item_name": "x", "category_id": 1, "base_price": price}),
            )
        };
        assert_eq!(parse(json!(0.1 + 0.2)).unwrap().base_price_minor, 30);
        assert_eq!(parse(json!(19.999)).unwrap().base_price_minor, 2000);
        assert_eq!(parse(json!(7)).unwrap().base_price_minor, 700);
        assert_eq!(parse(json!(-1.5)).unwrap().base_price_minor, -150);
        assert!(parse(json!(1e300)).is_err());
        assert!(parse(json!("12.50")).is_err());
    }

    #[test]
    fn writes_decimal_amounts() {
        let view = ItemView {
            id: 3,
            name: "Cola".to_string(),
            category_id: 1,
            base_price_minor: 1050,
            description: None,
            category: None,
        };
        assert_eq!(
            serde_json::to_value(view).unwrap(),
            json!({
                "item_id": 3,
                "item_name": "Cola",
                "category_id": 1,
                "base_price": 10.5,
                "description": null
            })
        );
    }
}
