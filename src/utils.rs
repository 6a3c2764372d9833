use std::fmt::Debug;

use kube::api::{Api, PostParams};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Outcome of a create-or-replace submission.
#[derive(Debug, PartialEq, Eq)]
pub enum Upserted {
    Created,
    Replaced,
}

/// Which half of a create-or-replace submission failed.
#[derive(Debug)]
pub enum UpsertError {
    Create(kube::Error),
    Replace(kube::Error),
}

/// Create `resource` under `name`, falling back to a full replace if the API
/// server reports it already exists (HTTP 409). The conflict is the only error
/// handled here; everything else passes through to the caller untouched, tagged
/// with the phase it came from.
pub async fn create_or_replace<K>(
    api: &Api<K>,
    name: &str,
    resource: &K,
) -> Result<Upserted, UpsertError>
where
    K: Clone + Debug + DeserializeOwned + Serialize,
{
    match api.create(&PostParams::default(), resource).await {
        Ok(_) => Ok(Upserted::Created),
        Err(kube::Error::Api(ae)) if ae.code == 409 => {
            debug!("{} already exists, replacing", name);
            api.replace(name, &PostParams::default(), resource)
                .await
                .map_err(UpsertError::Replace)?;
            Ok(Upserted::Replaced)
        }
        Err(e) => Err(UpsertError::Create(e)),
    }
}

pub fn get_version_string() -> String {
    format!("{}-{}", env!("GIT_COUNT"), env!("GIT_HASH"))
}
