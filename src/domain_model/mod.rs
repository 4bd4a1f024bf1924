mod ids;
mod loan_status;

pub use ids::*;
pub use loan_status::*;
