use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};

use crate::errors::Error;

/// Pick the kubeconfig to use: an explicit override wins, otherwise the
/// conventional `<home>/.kube/config`. Pure so the precedence can be tested
/// without touching the environment.
pub fn resolve_path(flag: Option<PathBuf>, home: Option<PathBuf>) -> Result<PathBuf, Error> {
    if let Some(path) = flag {
        return Ok(path);
    }
    home.map(|home| home.join(".kube").join("config"))
        .ok_or_else(|| {
            Error::KubeconfigPath(String::from(
                "no --kubeconfig given and no home directory set",
            ))
        })
}

/// Home directory from `HOME`, with `USERPROFILE` as the windows fallback. A
/// variable that is set but empty counts as unset.
pub fn home_dir() -> Option<PathBuf> {
    home_from(env::var_os("HOME"), env::var_os("USERPROFILE"))
}

fn home_from(home: Option<OsString>, userprofile: Option<OsString>) -> Option<PathBuf> {
    home.filter(|value| !value.is_empty())
        .or_else(|| userprofile.filter(|value| !value.is_empty()))
        .map(PathBuf::from)
}

/// Build an authenticated client from the kubeconfig at `path`, honoring its
/// current context.
pub async fn build_client(path: &Path) -> Result<Client, Error> {
    let kubeconfig = Kubeconfig::read_from(path)?;
    let config = Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default()).await?;
    Client::try_from(config).map_err(Error::ClientConstruction)
}
