pub mod cash;
pub mod dividend;
pub mod fetched;
pub mod fx;
pub mod holding;
pub mod instrument;
pub mod quantity;
pub mod quotation;
pub mod report;
pub mod series;
pub mod settings;
pub mod snapshot;
pub mod split;
pub mod summary;
pub mod transaction;
