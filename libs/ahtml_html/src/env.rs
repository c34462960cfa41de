//! Reading settings from environment variables.

use std::{env, fmt::Display, str::FromStr};
use anyhow::{anyhow, bail, Result};

pub fn opt_get_env<T: FromStr>(varname: &str) -> Result<Option<T>>
    where T::Err: Display
{
    match env::var(varname) {
        Ok(s) => {
            Ok(Some(s.parse().map_err(
                |e| anyhow!("could not parse {varname:?} env var with contents {s:?}: {e}"))?))
        },
        Err(e) => match e {
            env::VarError::NotPresent => Ok(None),
            env::VarError::NotUnicode(_) => bail!("could not decode {varname:?} env var: {e}")
        }
    }
}

/// Accepts the usual spellings, not just what `bool::from_str` takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvBool(pub bool);

impl FromStr for EnvBool {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(EnvBool(true)),
            "" | "0" | "false" | "no" | "off" => Ok(EnvBool(false)),
            _ => bail!("expecting a boolean (1/0, true/false, yes/no, on/off)")
        }
    }
}

/// Unset means false.
pub fn get_env_bool(varname: &str) -> Result<bool> {
    Ok(opt_get_env::<EnvBool>(varname)?.map(|b| b.0).unwrap_or(false))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_env_bool() {
        assert_eq!("yes".parse::<EnvBool>().unwrap(), EnvBool(true));
        assert_eq!(" 1 ".parse::<EnvBool>().unwrap(), EnvBool(true));
        assert_eq!("Off".parse::<EnvBool>().unwrap(), EnvBool(false));
        assert!("maybe".parse::<EnvBool>().is_err());
    }

    #[test]
    fn t_get_env() {
        env::set_var("AHTML_HTML_T_GET_ENV_A", "true");
        env::set_var("AHTML_HTML_T_GET_ENV_B", "12");
        assert!(get_env_bool("AHTML_HTML_T_GET_ENV_A").unwrap());
        assert!(!get_env_bool("AHTML_HTML_T_GET_ENV_UNSET").unwrap());
        assert_eq!(opt_get_env::<u32>("AHTML_HTML_T_GET_ENV_B").unwrap(), Some(12));
        assert!(opt_get_env::<u32>("AHTML_HTML_T_GET_ENV_A").is_err());
    }
}
