pub mod inventory;
mod job;

use kube::Client;
use tracing::info;

use crate::errors::Error;

/// Name the inventory configmap is published under; the job's inventory volume
/// references it by the same name.
const INVENTORY_CONFIGMAP: &str = "ansible-inventory";
/// Fixed job name: at most one playbook run exists per namespace, and a rerun
/// overwrites the previous one.
const JOB_NAME: &str = "openshift-ansible-test-job";
const ANSIBLE_IMAGE: &str = "openshift/origin-ansible:v3.7";

pub struct AnsibleRunner {
    client: Client,
    namespace: String,
    image: String,
}

impl AnsibleRunner {
    pub fn new(client: Client, namespace: &str) -> Self {
        AnsibleRunner {
            client,
            namespace: String::from(namespace),
            image: String::from(ANSIBLE_IMAGE),
        }
    }

    /// Publish the inventory, then hand the playbook run over to the cluster.
    /// The job is not watched afterwards: its retries and lifecycle belong to
    /// the cluster's job controller.
    pub async fn run_playbook(&self, inventory: &str, playbook: &str) -> Result<(), Error> {
        info!("running playbook {} in namespace {}", playbook, self.namespace);
        inventory::publish(
            self.client.clone(),
            &self.namespace,
            INVENTORY_CONFIGMAP,
            inventory,
        )
        .await?;
        job::submit(
            self.client.clone(),
            &self.namespace,
            JOB_NAME,
            &self.image,
            playbook,
        )
        .await?;
        Ok(())
    }
}
