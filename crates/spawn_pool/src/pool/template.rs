//! Named prototypes

/// A named prototype that pools instantiate from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template<P> {
    name: String,
    prototype: P,
}

impl<P> Template<P> {
    /// Create a template
    pub fn new(name: impl Into<String>, prototype: P) -> Self {
        Self {
            name: name.into(),
            prototype,
        }
    }

    /// Template name, also the pool key
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Prototype instances are created from
    pub fn prototype(&self) -> &P {
        &self.prototype
    }
}
