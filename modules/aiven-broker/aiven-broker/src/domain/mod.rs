pub(crate) mod converger;
pub(crate) mod credentials;
pub(crate) mod error;
pub(crate) mod model;
pub(crate) mod naming;
pub(crate) mod provider;
pub(crate) mod services;
pub(crate) mod status;
