use super::traits::BrokerSource;

/// Explicit set of broker accounts the engine values.
///
/// Built by the caller and handed to the engine; there is no global
/// registry. Registration order is the merge order.
pub struct BrokerRegistry {
    brokers: Vec<Box<dyn BrokerSource>>,
}

impl BrokerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            brokers: Vec::new(),
        }
    }

    /// Register a broker. A broker with the same name (case-insensitive, as
    /// in [`BrokerRegistry::get`]) replaces the old one in place, keeping its
    /// position.
    pub fn register(&mut self, broker: Box<dyn BrokerSource>) {
        if let Some(slot) = self
            .brokers
            .iter_mut()
            .find(|b| b.name().eq_ignore_ascii_case(broker.name()))
        {
            *slot = broker;
        } else {
            self.brokers.push(broker);
        }
    }

    /// Builder-style variant of [`BrokerRegistry::register`].
    pub fn with(mut self, broker: Box<dyn BrokerSource>) -> Self {
        self.register(broker);
        self
    }

    /// Find a broker by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&dyn BrokerSource> {
        self.brokers
            .iter()
            .find(|b| b.name().eq_ignore_ascii_case(name))
            .map(|b| b.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn BrokerSource> {
        self.brokers.iter().map(|b| b.as_ref())
    }

    pub fn names(&self) -> Vec<String> {
        self.brokers.iter().map(|b| b.name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.brokers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brokers.is_empty()
    }
}

impl Default for BrokerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
