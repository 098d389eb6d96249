pub mod analyze;
pub mod describe;
pub mod run;
pub mod validate;
