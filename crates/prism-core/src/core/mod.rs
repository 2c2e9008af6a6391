pub mod density;
pub mod diameter;
pub mod domain;
pub mod matrix_array;
pub mod prism;
pub mod space;
pub mod system;
pub mod table;

pub use density::Density;
pub use diameter::Diameter;
pub use domain::{Domain, DomainError};
pub use matrix_array::{MatrixArray, MatrixArrayError};
pub use prism::{Prism, PrismError};
pub use space::Space;
pub use system::{System, SystemError};
pub use table::{PairTable, TableError, ValueTable};
