pub mod cash_count;
pub mod document_sequence;
pub mod opening;
pub mod parameter;
pub mod reception;
pub mod register;
pub mod shift;
pub mod transfer;
pub mod vendor_payment;
