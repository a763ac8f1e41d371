pub mod catalog;
pub mod ledger;
pub mod matcher;
pub mod normalizer;
pub mod prediction;
pub mod providers;
pub mod session;

pub use catalog::Catalog;
pub use ledger::{Ledger, LedgerError};
pub use prediction::PredictionClient;
pub use session::{RatingInput, Session};
