pub mod ars;
pub mod cwd;
pub mod frequencies;

pub use ars::ArsTable;
pub use cwd::CwdTable;
pub use frequencies::FrequencyTable;
