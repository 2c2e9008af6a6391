mod chi;
mod pair_correlation;
mod pmf;
mod second_virial;
mod spinodal_condition;
mod structure_factor;

pub use chi::chi;
pub use pair_correlation::pair_correlation;
pub use pmf::pmf;
pub use second_virial::second_virial;
pub use spinodal_condition::spinodal_condition;
pub use structure_factor::structure_factor;

use crate::core::domain::DomainError;
use crate::core::table::TableError;

#[derive(Debug, thiserror::Error)]
pub enum CalculateError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Table(#[from] TableError),
    #[error("{calculation} requires a system of rank {required}, got rank {actual}")]
    RankUnsupported {
        calculation: &'static str,
        required: usize,
        actual: usize,
    },
}
