pub mod manager;
pub mod session;
#[cfg(test)]
mod session_test;
pub mod target;
pub mod translator;
#[cfg(test)]
mod translator_test;
