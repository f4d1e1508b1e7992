use sea_orm::{
    ActiveValue, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};

use crate::{
    Customer, CustomerInput, EntityKind, ResultEngine, customers, invoices,
    util::{normalize_optional_text, normalize_required_name},
};

use super::{Engine, Missing, ensure_no_dependents, require_customer, with_tx};

impl customers::ActiveModel {
    fn from_input(id: ActiveValue<i32>, input: &CustomerInput) -> ResultEngine<Self> {
        Ok(Self {
            id,
            name: ActiveValue::Set(normalize_required_name(&input.name, "customer")?),
            phone: ActiveValue::Set(normalize_optional_text(input.phone.as_deref())),
            email: ActiveValue::Set(normalize_optional_text(input.email.as_deref())),
            address: ActiveValue::Set(normalize_optional_text(input.address.as_deref())),
        })
    }
}

impl Engine {
    /// List all customers, ordered by name.
    pub async fn list_customers(&self) -> ResultEngine<Vec<Customer>> {
        self.bounded(async {
            let models = customers::Entity::find()
                .order_by_asc(customers::Column::Name)
                .order_by_asc(customers::Column::Id)
                .all(&self.database)
                .await?;
            Ok(models.into_iter().map(Customer::from).collect())
        })
        .await
    }

    pub async fn customer(&self, customer_id: i32) -> ResultEngine<Customer> {
        self.bounded(async {
            let model = require_customer(&self.database, customer_id, Missing::NotFound).await?;
            Ok(Customer::from(model))
        })
        .await
    }

    pub async fn create_customer(&self, input: CustomerInput) -> ResultEngine<Customer> {
        let active = customers::ActiveModel::from_input(ActiveValue::NotSet, &input)?;

        self.bounded(async {
            let model = active.insert(&self.database).await?;
            tracing::debug!(customer_id = model.id, "customer created");
            Ok(Customer::from(model))
        })
        .await
    }

    /// Replace every mutable field of an existing customer.
    pub async fn update_customer(
        &self,
        customer_id: i32,
        input: CustomerInput,
    ) -> ResultEngine<Customer> {
        let active = customers::ActiveModel::from_input(ActiveValue::Unchanged(customer_id), &input)?;

        with_tx!(self, |db_tx| {
            require_customer(&db_tx, customer_id, Missing::NotFound).await?;
            let model = active.update(&db_tx).await?;
            Ok(Customer::from(model))
        })
    }

    /// Delete a customer without invoices.
    pub async fn delete_customer(&self, customer_id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            require_customer(&db_tx, customer_id, Missing::NotFound).await?;

            let count = invoices::Entity::find()
                .filter(invoices::Column::CustomerId.eq(customer_id))
                .count(&db_tx)
                .await?;
            ensure_no_dependents(
                EntityKind::Customer,
                customer_id,
                EntityKind::Invoice,
                count,
            )?;

            customers::Entity::delete_by_id(customer_id)
                .exec(&db_tx)
                .await?;
            tracing::debug!(customer_id, "customer deleted");
            Ok(())
        })
    }
}
