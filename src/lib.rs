pub mod config;
pub mod daily;
pub mod intake;
pub mod metrics;
pub mod prompt;
pub mod record;
pub mod sheets;
pub mod upload;

#[cfg(test)]
mod daily_tests;
#[cfg(test)]
mod test_support;
#[cfg(test)]
mod upload_tests;
