pub mod create_transfer_command;
pub mod open_shift_command;
pub mod receive_transfer_command;
pub mod record_count_command;

pub use create_transfer_command::{CreateTransferCommand, CreateTransferResult};
pub use open_shift_command::{OpenShiftCommand, OpenShiftResult};
pub use receive_transfer_command::{ReceiveTransferCommand, ReceiveTransferResult};
pub use record_count_command::{RecordCountCommand, RecordCountResult, VendorPaymentInput};
