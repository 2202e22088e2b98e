pub mod clock;
pub mod input;
pub mod metrics;
pub mod mistakes;
pub mod result;
pub mod run;
pub mod state;
