use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use k8s_openapi::api::core::v1::ConfigMap;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::{Api, Client};
use tracing::{info, instrument};

use crate::errors::Error;
use crate::utils::{UpsertError, Upserted, create_or_replace};

/// Key the inventory text is stored under. The job's configmap volume projects
/// it as a file of the same name.
const INVENTORY_KEY: &str = "hosts";

/// Read the inventory file. The content is passed through to the cluster
/// verbatim, ansible does the parsing.
pub fn read(path: &Path) -> Result<String, Error> {
    fs::read_to_string(path).map_err(|source| Error::FileRead {
        path: path.display().to_string(),
        source,
    })
}

fn make_configmap(namespace: &str, name: &str, inventory: &str) -> ConfigMap {
    ConfigMap {
        metadata: ObjectMeta {
            name: Some(String::from(name)),
            namespace: Some(String::from(namespace)),
            ..Default::default()
        },
        data: Some(BTreeMap::from([(
            String::from(INVENTORY_KEY),
            String::from(inventory),
        )])),
        ..Default::default()
    }
}

/// Make the inventory available to the job under the given configmap name,
/// wholesale replacing whatever a previous run left behind.
#[instrument(skip(client, inventory))]
pub async fn publish(
    client: Client,
    namespace: &str,
    name: &str,
    inventory: &str,
) -> Result<(), Error> {
    let configmaps: Api<ConfigMap> = Api::namespaced(client, namespace);
    let configmap = make_configmap(namespace, name, inventory);

    match create_or_replace(&configmaps, name, &configmap).await {
        Ok(Upserted::Created) => info!("inventory configmap {} created", name),
        Ok(Upserted::Replaced) => info!("inventory configmap {} already existed, replaced", name),
        Err(UpsertError::Create(e)) => return Err(Error::CreateFailed(e)),
        Err(UpsertError::Replace(e)) => return Err(Error::UpdateFailed(e)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn configmap_carries_the_inventory_under_the_hosts_key() {
        let configmap = make_configmap("ansible-test", "ansible-inventory", "[masters]\nhost1\n");

        assert_eq!(configmap.metadata.name.as_deref(), Some("ansible-inventory"));
        assert_eq!(configmap.metadata.namespace.as_deref(), Some("ansible-test"));

        let data = configmap.data.unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(
            data.get("hosts").map(String::as_str),
            Some("[masters]\nhost1\n")
        );
    }

    #[test]
    fn configmap_is_rebuilt_from_scratch_each_run() {
        // publish() sends this object wholesale, so a replace cannot leak keys
        // from an earlier run
        let configmap = make_configmap("ansible-test", "ansible-inventory", "[nodes]\nhost2\n");

        assert!(configmap.binary_data.is_none());
        assert_eq!(
            configmap.data.unwrap(),
            BTreeMap::from([(String::from("hosts"), String::from("[nodes]\nhost2\n"))])
        );
    }

    #[test]
    fn read_passes_file_contents_through_verbatim() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[masters]\nhost1 ansible_user=root\n").unwrap();

        assert_eq!(
            read(file.path()).unwrap(),
            "[masters]\nhost1 ansible_user=root\n"
        );
    }

    #[test]
    fn read_reports_a_missing_inventory_file() {
        let err = read(Path::new("/nonexistent/inventory")).unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
    }
}
