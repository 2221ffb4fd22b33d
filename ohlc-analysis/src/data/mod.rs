pub mod loader;
pub mod types;

pub use loader::{LoaderConfig, LoaderError, PriceLoader};
pub use types::{PriceBar, PriceDataError, PriceTable};
