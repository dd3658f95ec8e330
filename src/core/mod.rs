pub mod admin;
pub mod cart;
pub mod checkout;
pub mod endpoint;
pub mod forms;
pub mod records;

#[cfg(test)]
pub(crate) mod testing;

pub use crate::domain::model::{CartItem, CheckoutPlan};
pub use crate::domain::ports::{ConfigProvider, Database, Mailer, PaymentGateway, Storage};
pub use crate::utils::error::Result;
