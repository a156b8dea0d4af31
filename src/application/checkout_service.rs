use futures::future::{join, OptionFuture};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use uuid::Uuid;

use super::documents;
use super::endpoints::shop_endpoint;
use super::validation::validate;
use crate::domain::checkout::{
    sanitize_ship_method_ids, Address, CheckoutRequest, CheckoutResult, DeliveryType,
    PaymentMethod,
};
use crate::domain::errors::{CheckoutError, CheckoutStep, GraphqlError};
use crate::domain::order::{MutationResult, Order, ShippingMethod};
use crate::domain::ports::{GraphqlRequest, GraphqlTransport};

/// Endpoint and customer token shared by every call of one checkout run.
struct Session {
    run_id: Uuid,
    endpoint: String,
    token: String,
}

/// Runs the checkout saga: validate, resolve shipping, set addresses,
/// transition to `ArrangingPayment`, add payment.
///
/// Steps run strictly in that order. The first failing step ends the run;
/// mutations already applied on the remote order are left in place.
pub struct CheckoutService<T> {
    transport: T,
}

impl<T: GraphqlTransport> CheckoutService<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub async fn checkout(&self, request: &CheckoutRequest) -> CheckoutResult {
        let run_id = Uuid::new_v4();
        match self.run(run_id, request).await {
            Ok(order) => {
                log::info!(
                    "checkout {}: completed order {} ({})",
                    run_id,
                    order.id,
                    order.state.as_deref().unwrap_or("unknown state")
                );
                CheckoutResult::completed(order)
            }
            Err(e) => {
                log::warn!("checkout {}: {}", run_id, e);
                e.into()
            }
        }
    }

    async fn run(&self, run_id: Uuid, request: &CheckoutRequest) -> Result<Order, CheckoutError> {
        let errors = validate(request);
        if !errors.is_empty() {
            return Err(CheckoutError::Validation(errors));
        }

        let session = Session {
            run_id,
            endpoint: shop_endpoint(&request.vendure_domain),
            token: request.access_token.trim().to_string(),
        };

        if request.is_multi_vendor {
            self.resolve_multi_vendor_shipping(&session, request).await?;
        } else {
            self.resolve_single_vendor_shipping(&session).await?;
        }
        self.set_addresses(&session, &Address::from_request(request))
            .await?;
        self.transition_to_arranging_payment(&session).await?;
        self.add_payment(&session, PaymentMethod::for_vendor_mode(request.is_multi_vendor))
            .await
    }

    // ── Shipping ─────────────────────────────────────────────────────────────

    /// Selects every eligible method. The remote decides which one applies.
    async fn resolve_single_vendor_shipping(&self, session: &Session) -> Result<(), CheckoutError> {
        log::info!("checkout {}: fetching eligible shipping methods", session.run_id);
        let data = self
            .call(session, documents::ELIGIBLE_SHIPPING_METHODS, json!({}))
            .await
            .map_err(|e| CheckoutError::at(CheckoutStep::ShippingLookup, e))?;

        let methods: Option<Vec<ShippingMethod>> = field(&data, "eligibleShippingMethods")
            .map_err(|e| CheckoutError::at(CheckoutStep::ShippingLookup, e))?;
        let methods = methods.unwrap_or_default();
        if methods.is_empty() {
            return Err(CheckoutError::NoEligibleShippingMethods);
        }

        let ids: Vec<String> = methods.into_iter().map(|m| m.id).collect();
        self.mutate::<Order>(
            session,
            CheckoutStep::ShippingMethod,
            documents::SET_SHIPPING_METHOD,
            "setOrderShippingMethod",
            json!({ "shippingMethodIds": ids }),
        )
        .await?;
        Ok(())
    }

    async fn resolve_multi_vendor_shipping(
        &self,
        session: &Session,
        request: &CheckoutRequest,
    ) -> Result<(), CheckoutError> {
        let ids = request
            .ship_method_id_list()
            .map(sanitize_ship_method_ids)
            .unwrap_or_default();
        let delivery_type = request.delivery_type.as_deref().and_then(DeliveryType::parse);

        let set_shipping = (!ids.is_empty()).then(|| {
            self.mutate::<Order>(
                session,
                CheckoutStep::ShippingMethod,
                documents::SET_SHIPPING_METHOD,
                "setOrderShippingMethod",
                json!({ "shippingMethodIds": ids }),
            )
        });
        let set_delivery = delivery_type.map(|delivery| {
            self.mutate::<Order>(
                session,
                CheckoutStep::DeliveryType,
                documents::SET_DELIVERY_TYPE,
                "setOrderCustomFields",
                json!({ "customFields": { "deliveryType": delivery.as_str() } }),
            )
        });

        log::info!(
            "checkout {}: multi-vendor shipping (methods: {}, delivery type: {})",
            session.run_id,
            set_shipping.is_some(),
            set_delivery.is_some()
        );

        // Both calls are driven to completion before either result is inspected.
        let (shipping, delivery) =
            join(OptionFuture::from(set_shipping), OptionFuture::from(set_delivery)).await;
        shipping.transpose()?;
        delivery.transpose()?;
        Ok(())
    }

    // ── Addresses, state, payment ────────────────────────────────────────────

    async fn set_addresses(&self, session: &Session, address: &Address) -> Result<(), CheckoutError> {
        log::info!("checkout {}: setting billing and shipping address", session.run_id);
        let billing = self.mutate::<Order>(
            session,
            CheckoutStep::BillingAddress,
            documents::SET_BILLING_ADDRESS,
            "setOrderBillingAddress",
            json!({ "input": address }),
        );
        let shipping = self.mutate::<Order>(
            session,
            CheckoutStep::ShippingAddress,
            documents::SET_SHIPPING_ADDRESS,
            "setOrderShippingAddress",
            json!({ "input": address }),
        );

        let (billing, shipping) = join(billing, shipping).await;
        billing?;
        shipping?;
        Ok(())
    }

    async fn transition_to_arranging_payment(&self, session: &Session) -> Result<(), CheckoutError> {
        log::info!("checkout {}: transitioning to ArrangingPayment", session.run_id);
        self.mutate::<Order>(
            session,
            CheckoutStep::StateTransition,
            documents::TRANSITION_TO_ARRANGING_PAYMENT,
            "transitionOrderToState",
            json!({}),
        )
        .await?;
        Ok(())
    }

    async fn add_payment(&self, session: &Session, method: PaymentMethod) -> Result<Order, CheckoutError> {
        log::info!("checkout {}: adding payment via {}", session.run_id, method.code());
        self.mutate::<Order>(
            session,
            CheckoutStep::Payment,
            documents::ADD_PAYMENT,
            "addPaymentToOrder",
            json!({ "method": method.code(), "metadata": {} }),
        )
        .await
    }

    // ── Plumbing ─────────────────────────────────────────────────────────────

    async fn call(&self, session: &Session, query: &str, variables: Value) -> Result<Value, GraphqlError> {
        let request = GraphqlRequest::new(session.endpoint.as_str(), query)
            .bearer(session.token.as_str())
            .variables(variables);
        self.transport.execute(request).await.map(|reply| reply.data)
    }

    /// Issue a mutation and narrow its union result, attributing any failure
    /// to `step`.
    async fn mutate<R: DeserializeOwned>(
        &self,
        session: &Session,
        step: CheckoutStep,
        query: &str,
        result_field: &str,
        variables: Value,
    ) -> Result<R, CheckoutError> {
        let data = self
            .call(session, query, variables)
            .await
            .map_err(|e| CheckoutError::at(step, e))?;
        let payload = data.get(result_field).cloned().unwrap_or(Value::Null);
        let outcome = MutationResult::<R>::narrow(payload)
            .map_err(|e| CheckoutError::at(step, GraphqlError::from(e)))?;
        outcome
            .into_result()
            .map_err(|error| CheckoutError::rejected(step, error))
    }
}

fn field<R: DeserializeOwned>(data: &Value, name: &str) -> Result<R, GraphqlError> {
    let value = data.get(name).cloned().unwrap_or(Value::Null);
    Ok(serde_json::from_value(value)?)
}
