use k8s_openapi::api::batch::v1::Job;
use kube::{Api, Client};
use serde_json::json;
use tracing::{info, instrument};

use super::INVENTORY_CONFIGMAP;
use crate::errors::Error;
use crate::utils::{UpsertError, Upserted, create_or_replace};

/// Service account the playbook pod runs under. Expected to exist in the
/// namespace with enough privilege for the playbook's cluster operations.
const SERVICE_ACCOUNT: &str = "openshift-ansible";
/// Secret holding the SSH private key under the `ssh-privatekey` key.
/// Pre-existing, never created or modified here.
const SSH_KEY_SECRET: &str = "ssh-private-key";

/// Paths at which the volumes surface their files inside the container.
const INVENTORY_FILE: &str = "/ansible/inventory/hosts";
const SSH_KEY_FILE: &str = "/ansible/ssh/privatekey.pem";

/// A run still going after this long is terminated and marked failed by the
/// job controller.
const DEADLINE_SECONDS: i64 = 3600;

fn make_job(namespace: &str, name: &str, image: &str, playbook: &str) -> Result<Job, Error> {
    let job: Job = serde_json::from_value(json!({
        "apiVersion": "batch/v1",
        "kind": "Job",
        "metadata": {
            "name": name,
            "namespace": namespace,
        },
        "spec": {
            "completions": 1,
            "activeDeadlineSeconds": DEADLINE_SECONDS,
            "template": {
                "spec": {
                    "dnsPolicy": "ClusterFirst",
                    "restartPolicy": "Never",
                    "serviceAccountName": SERVICE_ACCOUNT,
                    // The playbook configures host-level networking on the
                    // nodes it reaches
                    "hostNetwork": true,
                    "containers": [{
                        "name": name,
                        "image": image,
                        "command": [
                            "ansible-playbook",
                            "-i", INVENTORY_FILE,
                            "--private-key", SSH_KEY_FILE,
                            playbook,
                        ],
                        "env": [
                            { "name": "INVENTORY_FILE", "value": INVENTORY_FILE },
                            { "name": "PLAYBOOK_FILE", "value": playbook },
                            { "name": "ANSIBLE_HOST_KEY_CHECKING", "value": "False" },
                            {
                                "name": "OPTS",
                                "value": format!("-vvv --private-key={SSH_KEY_FILE}"),
                            },
                        ],
                        "securityContext": {
                            // TODO: the origin-ansible image still requires
                            // uid 0, drop this once it runs unprivileged
                            "runAsUser": 0,
                        },
                        "volumeMounts": [
                            {
                                "name": "inventory",
                                "mountPath": "/ansible/inventory/",
                                "readOnly": true,
                            },
                            {
                                "name": "sshkey",
                                "mountPath": "/ansible/ssh/",
                                "readOnly": true,
                            },
                        ],
                    }],
                    "volumes": [
                        {
                            "name": "inventory",
                            "configMap": { "name": INVENTORY_CONFIGMAP },
                        },
                        {
                            "name": "sshkey",
                            "secret": {
                                "secretName": SSH_KEY_SECRET,
                                "items": [{
                                    "key": "ssh-privatekey",
                                    "path": "privatekey.pem",
                                    "mode": 0o600,
                                }],
                            },
                        },
                    ],
                },
            },
        },
    }))?;
    Ok(job)
}

/// Submit the playbook run as a one-shot job under the given fixed name,
/// wholesale replacing a leftover job from an earlier run.
#[instrument(skip(client))]
pub async fn submit(
    client: Client,
    namespace: &str,
    name: &str,
    image: &str,
    playbook: &str,
) -> Result<(), Error> {
    let jobs: Api<Job> = Api::namespaced(client, namespace);
    let job = make_job(namespace, name, image, playbook)?;

    match create_or_replace(&jobs, name, &job).await {
        Ok(Upserted::Created) => info!("playbook job {} submitted", name),
        Ok(Upserted::Replaced) => info!("playbook job {} already existed, replaced", name),
        Err(UpsertError::Create(e)) => return Err(Error::SubmitFailed(e)),
        Err(UpsertError::Replace(e)) => return Err(Error::ReplaceFailed(e)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build() -> Job {
        make_job(
            "ansible-test",
            "openshift-ansible-test-job",
            "openshift/origin-ansible:v3.7",
            "/usr/share/ansible/openshift-ansible/playbooks/byo/config.yml",
        )
        .unwrap()
    }

    #[test]
    fn descriptor_has_the_fixed_one_shot_shape() {
        let job = build();

        assert_eq!(
            job.metadata.name.as_deref(),
            Some("openshift-ansible-test-job")
        );
        assert_eq!(job.metadata.namespace.as_deref(), Some("ansible-test"));

        let spec = job.spec.unwrap();
        assert_eq!(spec.completions, Some(1));
        assert_eq!(spec.active_deadline_seconds, Some(3600));

        let pod = spec.template.spec.unwrap();
        assert_eq!(pod.restart_policy.as_deref(), Some("Never"));
        assert_eq!(pod.dns_policy.as_deref(), Some("ClusterFirst"));
        assert_eq!(pod.service_account_name.as_deref(), Some("openshift-ansible"));
        assert_eq!(pod.host_network, Some(true));
        assert_eq!(pod.containers.len(), 1);
        assert_eq!(
            pod.containers[0].image.as_deref(),
            Some("openshift/origin-ansible:v3.7")
        );
    }

    #[test]
    fn command_and_env_target_the_requested_playbook() {
        let job = build();
        let pod = job.spec.unwrap().template.spec.unwrap();
        let container = &pod.containers[0];

        let command = container.command.as_ref().unwrap();
        assert_eq!(command[0], "ansible-playbook");
        assert!(command.contains(&String::from(INVENTORY_FILE)));
        assert_eq!(
            command.last().map(String::as_str),
            Some("/usr/share/ansible/openshift-ansible/playbooks/byo/config.yml")
        );

        let env = container.env.as_ref().unwrap();
        let value_of = |name: &str| {
            env.iter()
                .find(|e| e.name == name)
                .and_then(|e| e.value.as_deref())
        };
        assert_eq!(
            value_of("PLAYBOOK_FILE"),
            Some("/usr/share/ansible/openshift-ansible/playbooks/byo/config.yml")
        );
        assert_eq!(value_of("INVENTORY_FILE"), Some("/ansible/inventory/hosts"));
        assert_eq!(value_of("ANSIBLE_HOST_KEY_CHECKING"), Some("False"));
        assert_eq!(
            value_of("OPTS"),
            Some("-vvv --private-key=/ansible/ssh/privatekey.pem")
        );
    }

    #[test]
    fn volumes_project_inventory_and_ssh_key_read_only() {
        let job = build();
        let pod = job.spec.unwrap().template.spec.unwrap();

        let mounts = pod.containers[0].volume_mounts.as_ref().unwrap();
        assert!(mounts.iter().all(|m| m.read_only == Some(true)));
        assert!(
            mounts
                .iter()
                .any(|m| m.name == "inventory" && m.mount_path == "/ansible/inventory/")
        );
        assert!(
            mounts
                .iter()
                .any(|m| m.name == "sshkey" && m.mount_path == "/ansible/ssh/")
        );

        let volumes = pod.volumes.unwrap();
        let inventory = volumes.iter().find(|v| v.name == "inventory").unwrap();
        assert_eq!(
            inventory.config_map.as_ref().unwrap().name.as_deref(),
            Some(INVENTORY_CONFIGMAP)
        );

        let sshkey = volumes.iter().find(|v| v.name == "sshkey").unwrap();
        let secret = sshkey.secret.as_ref().unwrap();
        assert_eq!(secret.secret_name.as_deref(), Some("ssh-private-key"));

        let items = secret.items.as_ref().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].key, "ssh-privatekey");
        assert_eq!(items[0].path, "privatekey.pem");
        assert_eq!(items[0].mode, Some(0o600));
    }

    #[test]
    fn container_runs_as_uid_zero() {
        let job = build();
        let pod = job.spec.unwrap().template.spec.unwrap();

        let security = pod.containers[0].security_context.as_ref().unwrap();
        assert_eq!(security.run_as_user, Some(0));
    }
}
