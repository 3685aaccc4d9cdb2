//! The value converter.
//!
//! [`ValueConverter`] bundles a [`ConversionPolicy`], one custom converter
//! registry per direction and an optional [`FunctionCompiler`]. The
//! conversion entry points live next to their dispatch code in
//! [`forward`](crate::forward) and [`reverse`](crate::reverse).

use crate::error::PolicyError;
use crate::policy::ConversionPolicy;
use crate::registry::{Conversion, ConverterRegistry};
use std::fmt;
use std::sync::Arc;
use value_core::{FunctionValue, TypeTag, Value};

/// Turns stored function source back into an application value.
///
/// Installing a compiler means stored text is executed (or at least
/// interpreted) on read. Only install one for stores whose contents you
/// trust.
pub trait FunctionCompiler: Send + Sync {
    /// Build a value from a stored function's name and source text.
    fn compile(&self, function: &FunctionValue) -> anyhow::Result<Value>;
}

impl<F> FunctionCompiler for F
where
    F: Fn(&FunctionValue) -> anyhow::Result<Value> + Send + Sync,
{
    fn compile(&self, function: &FunctionValue) -> anyhow::Result<Value> {
        self(function)
    }
}

/// Bidirectional converter between application values and storable values.
///
/// Cheap to clone; converters and the compiler are shared.
#[derive(Clone)]
pub struct ValueConverter {
    pub(crate) policy: ConversionPolicy,
    pub(crate) to_store_converters: ConverterRegistry,
    pub(crate) from_store_converters: ConverterRegistry,
    pub(crate) function_compiler: Option<Arc<dyn FunctionCompiler>>,
}

impl fmt::Debug for ValueConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueConverter")
            .field("policy", &self.policy)
            .field("to_store_converters", &self.to_store_converters)
            .field("from_store_converters", &self.from_store_converters)
            .field("function_compiler", &self.function_compiler.is_some())
            .finish()
    }
}

impl Default for ValueConverter {
    fn default() -> Self {
        Self {
            policy: ConversionPolicy::default(),
            to_store_converters: ConverterRegistry::new(),
            from_store_converters: ConverterRegistry::new(),
            function_compiler: None,
        }
    }
}

impl ValueConverter {
    /// Create a converter with the given policy and no custom converters.
    pub fn new(policy: ConversionPolicy) -> Result<Self, PolicyError> {
        Self::builder().policy(policy).build()
    }

    /// Start building a converter.
    pub fn builder() -> ValueConverterBuilder {
        ValueConverterBuilder::default()
    }

    /// The policy this converter applies.
    pub fn policy(&self) -> &ConversionPolicy {
        &self.policy
    }

    /// Whether stored functions are compiled on read.
    pub fn compiles_functions(&self) -> bool {
        self.function_compiler.is_some()
    }
}

/// Builder for [`ValueConverter`].
#[derive(Default)]
pub struct ValueConverterBuilder {
    policy: ConversionPolicy,
    to_store_converters: ConverterRegistry,
    from_store_converters: ConverterRegistry,
    function_compiler: Option<Arc<dyn FunctionCompiler>>,
}

impl ValueConverterBuilder {
    /// Set the conversion policy.
    pub fn policy(mut self, policy: ConversionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The policy the converter will be built with.
    pub fn current_policy(&self) -> &ConversionPolicy {
        &self.policy
    }

    /// Replace the outbound converter registry.
    pub fn to_store_converters(mut self, registry: ConverterRegistry) -> Self {
        self.to_store_converters = registry;
        self
    }

    /// Replace the inbound converter registry.
    pub fn from_store_converters(mut self, registry: ConverterRegistry) -> Self {
        self.from_store_converters = registry;
        self
    }

    /// Register an outbound converter for a runtime type tag.
    pub fn to_store_tag<F>(mut self, tag: TypeTag, converter: F) -> Self
    where
        F: Fn(&Value) -> anyhow::Result<Conversion> + Send + Sync + 'static,
    {
        self.to_store_converters.register_tag(tag, converter);
        self
    }

    /// Register an outbound converter for a constructor name.
    pub fn to_store_class<F>(mut self, class_name: impl Into<String>, converter: F) -> Self
    where
        F: Fn(&Value) -> anyhow::Result<Conversion> + Send + Sync + 'static,
    {
        self.to_store_converters.register_class(class_name, converter);
        self
    }

    /// Register an inbound converter for a runtime type tag.
    pub fn from_store_tag<F>(mut self, tag: TypeTag, converter: F) -> Self
    where
        F: Fn(&Value) -> anyhow::Result<Conversion> + Send + Sync + 'static,
    {
        self.from_store_converters.register_tag(tag, converter);
        self
    }

    /// Register an inbound converter for a constructor name.
    pub fn from_store_class<F>(mut self, class_name: impl Into<String>, converter: F) -> Self
    where
        F: Fn(&Value) -> anyhow::Result<Conversion> + Send + Sync + 'static,
    {
        self.from_store_converters
            .register_class(class_name, converter);
        self
    }

    /// Install a compiler for stored function source.
    ///
    /// Only consulted when the `functions` policy is `convert`.
    pub fn function_compiler<C>(mut self, compiler: C) -> Self
    where
        C: FunctionCompiler + 'static,
    {
        self.function_compiler = Some(Arc::new(compiler));
        self
    }

    /// Validate the policy and build the converter.
    pub fn build(self) -> Result<ValueConverter, PolicyError> {
        self.policy.validate()?;
        tracing::debug!(
            undefined_values = %self.policy.undefined_values,
            multidimensional_arrays = %self.policy.multidimensional_arrays,
            functions = %self.policy.functions,
            fallback = %self.policy.fallback,
            constructor_key = %self.policy.constructor_key,
            "Built value converter"
        );
        Ok(ValueConverter {
            policy: self.policy,
            to_store_converters: self.to_store_converters,
            from_store_converters: self.from_store_converters,
            function_compiler: self.function_compiler,
        })
    }
}
