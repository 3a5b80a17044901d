pub mod cleanup;
pub mod logging;
pub mod startup;
