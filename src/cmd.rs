use std::{collections::HashMap, fmt::Display, str::FromStr};

/// Command-line arguments split into bare symbols and `key=value` pairs.
#[derive(Debug, Default)]
pub struct ArgVals {
    pub simple_vals: Vec<String>,
    pub mapped_vals: HashMap<String, String>,
}

impl ArgVals {
    pub fn from_env() -> Self {
        Self::from_args(std::env::args().skip(1))
    }

    pub fn from_args<I: IntoIterator<Item = String>>(args: I) -> Self {
        let mut result = Self::default();
        for arg in args {
            match arg.split_once('=') {
                Some((key, value)) if !key.is_empty() && !value.contains('=') => {
                    result.mapped_vals.insert(key.to_string(), value.to_string());
                }
                _ => result.simple_vals.push(arg),
            }
        }
        result
    }

    pub fn len(&self) -> usize {
        self.simple_vals.len() + self.mapped_vals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get_symbol(&self, i: usize) -> Option<&str> {
        self.simple_vals.get(i).map(String::as_str)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.mapped_vals.get(key).map(String::as_str)
    }

    pub fn get_value<T>(&self, key: &str) -> anyhow::Result<Option<T>>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.get_str(key)
            .map(|v| {
                v.parse::<T>()
                    .map_err(|e| anyhow::Error::msg(format!("Error in {key}={v}: {e}")))
            })
            .transpose()
    }

    pub fn require<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.get_value(key)?
            .ok_or_else(|| anyhow::Error::msg(format!("Missing {key}=value")))
    }
}
