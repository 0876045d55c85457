//! A parameter whose value can be overridden through an environment variable.
//!
//! Declared as a `static`, read lazily through [`EnvParam::get`]:
//!
//! ```
//! use env_param::EnvParam;
//!
//! static MY_FLAG: EnvParam<bool> = EnvParam::new("MY_FLAG", "false");
//! assert!(!MY_FLAG.get());
//! ```

use std::fmt::Debug;
use std::str::FromStr;

/// A named parameter with a default value, resolved from the environment at read time.
pub struct EnvParam<T> {
    key: &'static str,
    default: &'static str,
    _marker: std::marker::PhantomData<T>,
}

impl<T> EnvParam<T> {
    pub const fn new(key: &'static str, default: &'static str) -> Self {
        EnvParam {
            key,
            default,
            _marker: std::marker::PhantomData,
        }
    }

    /// Name of the environment variable backing this parameter.
    pub fn key(&self) -> &'static str {
        self.key
    }
}

impl<T> EnvParam<T>
where
    T: FromStr,
    T::Err: Debug,
{
    /// Reads the environment variable, falling back to the default if unset.
    ///
    /// Panics if either the environment value or the default fails to parse: both are
    /// programmer errors (a malformed default is a bug in the `static` declaration; a
    /// malformed environment value is reported this way rather than silently ignored).
    pub fn get(&self) -> T {
        match std::env::var(self.key) {
            Ok(value) => value
                .parse()
                .unwrap_or_else(|e| panic!("invalid value for {}: {:?} ({:?})", self.key, value, e)),
            Err(_) => self
                .default
                .parse()
                .unwrap_or_else(|e| panic!("invalid default for {}: {:?} ({:?})", self.key, self.default, e)),
        }
    }

    /// True if the variable is set in the environment, regardless of its value.
    pub fn is_set(&self) -> bool {
        std::env::var(self.key).is_ok()
    }
}
