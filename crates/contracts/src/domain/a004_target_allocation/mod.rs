pub mod aggregate;

pub use aggregate::{AllocationSaveRequest, AllocationShare};
