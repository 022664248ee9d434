//! Commands module - service layer for stack deployment operations

mod deploy;
mod outputs;
pub(crate) mod service;
#[cfg(test)]
pub(crate) mod test_support;
mod validate;

pub use service::StackDeployer;
