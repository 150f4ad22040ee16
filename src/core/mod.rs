pub mod lookup;
pub mod report;

pub use crate::domain::model::{ContaminantId, LookupReport, WaterFilter};
pub use crate::domain::ports::{ConfigProvider, FilterSource, Storage};
pub use crate::utils::error::Result;
