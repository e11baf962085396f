pub mod run;
pub mod scan;
