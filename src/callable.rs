#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Function-like values and how graders call them.

use std::{
    any::Any,
    collections::BTreeMap,
    fmt::{self, Display},
    panic::{self, AssertUnwindSafe},
    sync::Arc,
};

use itertools::Itertools;

use crate::{
    console::{Console, quiet_panics},
    value::Value,
};

/// Errors raised while calling a subject or a reference function.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CallError {
    /// The arguments do not fit the callable's parameters.
    #[error("{0}")]
    BadArguments(String),
    /// The callable is a stub.
    #[error("{0} is not implemented")]
    NotImplemented(String),
    /// The callable signalled an error of its own.
    #[error("{0}")]
    Failed(String),
    /// The callable panicked.
    #[error("{0}")]
    Panicked(String),
    /// Writing subject output failed.
    #[error("could not write output: {0}")]
    Output(String),
}

impl CallError {
    /// Shorthand for [`CallError::Failed`].
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// The arguments of a single call: exactly one of a single positional value,
/// a positional sequence, or named arguments.
#[derive(Clone, Debug, PartialEq)]
pub enum Arguments {
    /// One positional argument.
    Arg(Value),
    /// Several positional arguments, splatted in order.
    Args(Vec<Value>),
    /// Named arguments.
    Kwargs(BTreeMap<String, Value>),
}

impl Arguments {
    /// A single positional argument.
    pub fn arg(value: impl Into<Value>) -> Self {
        Self::Arg(value.into())
    }

    /// A sequence of positional arguments.
    pub fn args<I>(values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Self::Args(values.into_iter().map(Into::into).collect())
    }

    /// A set of named arguments.
    pub fn kwargs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self::Kwargs(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl Display for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arguments::Arg(value) => write!(f, "arg = {value}"),
            Arguments::Args(values) => {
                write!(f, "args = [{}]", values.iter().map(Value::repr).join(", "))
            }
            Arguments::Kwargs(map) => write!(
                f,
                "kwargs = {{{}}}",
                map.iter()
                    .map(|(k, v)| format!("'{k}': {}", v.repr()))
                    .join(", ")
            ),
        }
    }
}

/// Handed to a callable while it runs. Anything it prints goes through here
/// so graders can hide it.
pub struct CallContext<'a> {
    /// Console the call prints to.
    console: &'a Console,
}

impl<'a> CallContext<'a> {
    /// Creates a context printing to `console`.
    pub fn new(console: &'a Console) -> Self {
        Self { console }
    }

    /// Prints a line of output.
    pub fn println(&mut self, line: impl Display) -> Result<(), CallError> {
        self.console
            .subject_writeln(line)
            .map_err(|e| CallError::Output(e.to_string()))
    }
}

/// Something a grader can call.
pub trait Callable {
    /// Name used in diagnostics.
    fn name(&self) -> &str;

    /// Whether the callable is declared to produce a value. A callable that
    /// only prints or mutates should return `false`.
    fn returns_value(&self) -> bool {
        true
    }

    /// Calls with the given arguments.
    fn call(&self, args: &Arguments, ctx: &mut CallContext<'_>) -> Result<Value, CallError>;
}

/// Arguments bound to a [`Function`]'s parameters.
pub struct Params<'a> {
    /// Name of the function being called, for error messages.
    function: &'a str,
    /// Parameter names, empty for variadic functions.
    names:    &'a [String],
    /// Bound values, in parameter order.
    values:   Vec<&'a Value>,
}

impl<'a> Params<'a> {
    /// Binds `args` to `names`. With `names` absent every positional argument
    /// is accepted, and named arguments are taken in key order.
    fn bind(
        function: &'a str,
        names: Option<&'a [String]>,
        args: &'a Arguments,
    ) -> Result<Self, CallError> {
        let positional: Vec<&Value> = match args {
            Arguments::Arg(value) => vec![value],
            Arguments::Args(values) => values.iter().collect(),
            Arguments::Kwargs(map) => {
                let Some(names) = names else {
                    return Ok(Self {
                        function,
                        names: &[],
                        values: map.values().collect(),
                    });
                };
                if let Some(unknown) = map.keys().find(|k| !names.contains(*k)) {
                    return Err(CallError::BadArguments(format!(
                        "{function}() got an unexpected keyword argument '{unknown}'"
                    )));
                }
                let values = names
                    .iter()
                    .map(|name| {
                        map.get(name).ok_or_else(|| {
                            CallError::BadArguments(format!(
                                "{function}() missing required argument: '{name}'"
                            ))
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                return Ok(Self {
                    function,
                    names,
                    values,
                });
            }
        };

        match names {
            Some(names) if names.len() != positional.len() => {
                Err(CallError::BadArguments(format!(
                    "{function}() takes {} positional arguments but {} were given",
                    names.len(),
                    positional.len()
                )))
            }
            _ => Ok(Self {
                function,
                names: names.unwrap_or(&[]),
                values: positional,
            }),
        }
    }

    /// The argument at `index`.
    pub fn get(&self, index: usize) -> Result<&'a Value, CallError> {
        self.values.get(index).copied().ok_or_else(|| {
            CallError::BadArguments(format!(
                "{}() has no argument at position {index}",
                self.function
            ))
        })
    }

    /// The argument bound to parameter `name`.
    pub fn named(&self, name: &str) -> Result<&'a Value, CallError> {
        self.names
            .iter()
            .position(|n| n == name)
            .and_then(|i| self.values.get(i).copied())
            .ok_or_else(|| {
                CallError::BadArguments(format!("{}() has no parameter '{name}'", self.function))
            })
    }

    /// The argument at `index` as a number.
    pub fn f64(&self, index: usize) -> Result<f64, CallError> {
        let value = self.get(index)?;
        value.as_f64().ok_or_else(|| {
            CallError::BadArguments(format!(
                "{}() expected a number at position {index}, got {}",
                self.function,
                value.repr()
            ))
        })
    }

    /// All bound values in order.
    pub fn iter(&self) -> impl Iterator<Item = &'a Value> + '_ {
        self.values.iter().copied()
    }
}

/// Signature of a [`Function`] body.
type Body = dyn Fn(&Params<'_>, &mut CallContext<'_>) -> Result<Value, CallError>;

/// A callable backed by a Rust closure.
#[derive(Clone)]
pub struct Function {
    /// Name used in diagnostics.
    name:          String,
    /// Parameter names, or `None` for a variadic function.
    params:        Option<Vec<String>>,
    /// Whether the function declares a result.
    returns_value: bool,
    /// The implementation.
    body:          Arc<Body>,
}

impl Function {
    /// A function with named parameters, all required.
    pub fn new<P, F>(name: impl Into<String>, params: P, body: F) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        F: Fn(&Params<'_>, &mut CallContext<'_>) -> Result<Value, CallError> + 'static,
    {
        Self {
            name:          name.into(),
            params:        Some(params.into_iter().map(Into::into).collect()),
            returns_value: true,
            body:          Arc::new(body),
        }
    }

    /// A function accepting any number of arguments.
    pub fn variadic<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&Params<'_>, &mut CallContext<'_>) -> Result<Value, CallError> + 'static,
    {
        Self {
            name:          name.into(),
            params:        None,
            returns_value: true,
            body:          Arc::new(body),
        }
    }

    /// Marks the function as not producing a value.
    pub fn without_return(mut self) -> Self {
        self.returns_value = false;
        self
    }

    /// Wraps the function in a [`Value`].
    pub fn into_value(self) -> Value {
        Value::Callable(Arc::new(self))
    }
}

impl Callable for Function {
    fn name(&self) -> &str {
        &self.name
    }

    fn returns_value(&self) -> bool {
        self.returns_value
    }

    fn call(&self, args: &Arguments, ctx: &mut CallContext<'_>) -> Result<Value, CallError> {
        let params = Params::bind(&self.name, self.params.as_deref(), args)?;
        (self.body)(&params, ctx)
    }
}

impl From<Function> for Value {
    fn from(f: Function) -> Self {
        f.into_value()
    }
}

/// Calls `f`, converting a panic into [`CallError::Panicked`]. The panic hook
/// stays silent for the duration of the call.
pub fn invoke(f: &dyn Callable, args: &Arguments, console: &Console) -> Result<Value, CallError> {
    let mut ctx = CallContext::new(console);
    let _quiet = quiet_panics();
    panic::catch_unwind(AssertUnwindSafe(|| f.call(args, &mut ctx)))
        .unwrap_or_else(|payload| Err(CallError::Panicked(panic_message(payload.as_ref()))))
}

/// Extracts the message of a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panicked with a non-string payload".to_string()
    }
}
