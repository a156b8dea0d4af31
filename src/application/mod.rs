pub mod checkout_service;
pub mod documents;
pub mod endpoints;
pub mod shop_service;
pub mod validation;

#[cfg(test)]
pub(crate) mod testing;

pub use checkout_service::CheckoutService;
pub use shop_service::{NewCustomer, ShopService};
