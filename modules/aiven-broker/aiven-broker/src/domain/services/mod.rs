pub(crate) mod broker;

pub(crate) use broker::BrokerService;
