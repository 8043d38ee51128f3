//! Environment access behind a trait so configuration can be tested.

use std::env;

#[cfg_attr(test, mockall::automock)]
pub trait Runtime: Send + Sync {
    fn env_var(&self, key: &str) -> Result<String, env::VarError>;
}

pub struct RealRuntime;

impl Runtime for RealRuntime {
    #[tracing::instrument(skip(self))]
    fn env_var(&self, key: &str) -> Result<String, env::VarError> {
        env::var(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_real_runtime_env_var() {
        let runtime = RealRuntime;
        assert!(runtime.env_var("PATH").is_ok());
        assert!(
            runtime
                .env_var("ALMI_TEST_SURELY_UNSET_VARIABLE")
                .is_err()
        );
    }
}
