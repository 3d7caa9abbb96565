pub mod convert;
pub mod dashboard;
pub mod features;
pub mod forecast;
pub mod inspect;
pub mod merge;
