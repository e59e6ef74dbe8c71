pub mod config;
pub mod doctor;
pub mod preview;
pub mod run;
