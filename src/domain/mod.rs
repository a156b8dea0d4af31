pub mod action;
pub mod catalog;
pub mod checkout;
pub mod customer;
pub mod errors;
pub mod order;
pub mod ports;
