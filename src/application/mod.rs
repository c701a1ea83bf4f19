pub mod checkout;
pub mod settings;
