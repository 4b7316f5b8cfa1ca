//! Host-level validation over every bound attribute.

use arvo_struct::FieldError;
use tracing::debug;

use crate::binding::{AttributeBinding, Bound, BoundType};
use crate::config::BindingConfig;
use crate::error::{BindingError, Result};
use crate::traits::HostRecord;

/// Result of validating the bound attributes of one record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationReport {
    /// Number of bindings inspected.
    pub attribute_count: usize,
    /// Every nested field failure, addressed from the record's namespace.
    pub errors: Vec<FieldError>,
}

impl ValidationReport {
    /// Returns `true` if no binding reported a failure.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// The set of bindings declared for one host type.
#[derive(Clone, Debug, Default)]
pub struct Bindings {
    config: BindingConfig,
    bindings: Vec<AttributeBinding>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bindings declared after this call use `config`.
    pub fn with_config(config: BindingConfig) -> Self {
        Self {
            config,
            bindings: Vec::new(),
        }
    }

    /// Declare a binding. Each attribute can be bound once.
    pub fn bind(mut self, attribute: impl Into<String>, ty: BoundType) -> Result<Self> {
        let attribute = attribute.into();
        if self.get(&attribute).is_some() {
            return Err(BindingError::DuplicateBinding(attribute));
        }
        self.bindings
            .push(AttributeBinding::with_config(attribute, ty, self.config.clone()));
        Ok(self)
    }

    pub fn get(&self, attribute: &str) -> Option<&AttributeBinding> {
        self.bindings.iter().find(|b| b.attribute() == attribute)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttributeBinding> {
        self.bindings.iter()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    fn require(&self, attribute: &str) -> Result<&AttributeBinding> {
        self.get(attribute)
            .ok_or_else(|| BindingError::NotBound(attribute.to_string()))
    }

    /// Read a bound attribute.
    pub fn read<H: HostRecord + ?Sized>(&self, host: &mut H, attribute: &str) -> Result<Option<Bound>> {
        self.require(attribute)?.get(host)
    }

    /// Write a bound attribute.
    pub fn write<H: HostRecord + ?Sized>(
        &self,
        host: &mut H,
        attribute: &str,
        value: Option<Bound>,
    ) -> Result<()> {
        self.require(attribute)?.set(host, value)
    }

    /// Collect nested field failures of every binding without touching the
    /// host's error sink.
    pub fn report<H: HostRecord + ?Sized>(&self, host: &mut H) -> Result<ValidationReport> {
        let mut errors = Vec::new();
        for binding in &self.bindings {
            errors.extend(binding.nested_errors(host)?);
        }
        Ok(ValidationReport {
            attribute_count: self.bindings.len(),
            errors,
        })
    }

    /// Register nested failures on the host's sink without clearing it.
    /// Returns how many were registered.
    pub fn propagate_errors<H: HostRecord + ?Sized>(&self, host: &mut H) -> Result<usize> {
        let report = self.report(host)?;
        let sink = host.error_sink();
        for error in &report.errors {
            sink.register(&error.attribute, &error.message);
        }
        Ok(report.errors.len())
    }

    /// Clear the host's sink, register every nested failure, and return
    /// whether the sink is empty.
    ///
    /// A binding whose raw value cannot be constructed fails the call; that
    /// is a programming error, not a validation failure.
    pub fn validate<H: HostRecord + ?Sized>(&self, host: &mut H) -> Result<bool> {
        host.error_sink().clear();
        let registered = self.propagate_errors(host)?;
        debug!(bindings = self.bindings.len(), registered, "validated bound attributes");
        Ok(host.error_sink().is_empty())
    }
}
