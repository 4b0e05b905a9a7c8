//! Temporary environments.
//!
//! A temporary environment lives in the registry root under a random name,
//! is marked `temporary` in its metadata, and is deleted by the
//! deactivation hook of the activation that follows its creation.

use crate::builder::EnvironmentBuilder;
use crate::error::{Result, VemanError};
use crate::store::{CreateOptions, Environment, EnvironmentName, EnvironmentStore};

/// Prefix of generated temporary environment names.
pub const TEMP_PREFIX: &str = "veman-temp-";

/// Attempts before giving up on finding a free name.
const MAX_ATTEMPTS: usize = 16;

/// A fresh candidate name: `veman-temp-` followed by 8 hex characters.
pub fn generate_name() -> Result<EnvironmentName> {
    let mut random = [0u8; 4];
    getrandom::getrandom(&mut random)
        .map_err(|e| VemanError::Other(anyhow::anyhow!("failed to generate random name: {}", e)))?;
    EnvironmentName::parse(&format!("{}{}", TEMP_PREFIX, hex::encode(random)))
}

/// Creates temporary environments.
pub struct TempEnvironmentManager<'a> {
    store: &'a EnvironmentStore,
    builder: &'a EnvironmentBuilder<'a>,
}

impl<'a> TempEnvironmentManager<'a> {
    pub fn new(store: &'a EnvironmentStore, builder: &'a EnvironmentBuilder<'a>) -> Self {
        Self { store, builder }
    }

    /// Build a temporary environment under a fresh name.
    ///
    /// Names are claimed with the store's exclusive create, so concurrent
    /// sessions never share one.
    pub fn create_temp(&self, options: &CreateOptions) -> Result<Environment> {
        self.create_temp_with(options, generate_name)
    }

    fn create_temp_with<G>(&self, options: &CreateOptions, mut next_name: G) -> Result<Environment>
    where
        G: FnMut() -> Result<EnvironmentName>,
    {
        for _ in 0..MAX_ATTEMPTS {
            let name = next_name()?;
            match self
                .store
                .create_with(&name, options, false, true, self.builder)
            {
                Err(VemanError::AlreadyExists { .. }) => {
                    tracing::debug!("temporary name {} taken, retrying", name);
                    continue;
                }
                other => return other,
            }
        }
        Err(VemanError::Other(anyhow::anyhow!(
            "could not find a free temporary environment name in {}",
            self.store.root().display()
        )))
    }
}
