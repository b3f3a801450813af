pub mod enrichment;
pub mod profile;
pub mod repository;
