pub mod custody;
pub mod parameters;

pub use custody::CustodyService;
