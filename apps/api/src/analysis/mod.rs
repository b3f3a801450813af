pub mod readme;
