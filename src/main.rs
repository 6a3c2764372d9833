mod errors;
mod kubeconfig;
mod logging;
mod runner;
mod utils;

use std::path::PathBuf;

use clap::Parser;

use crate::errors::Error;
use crate::runner::AnsibleRunner;
use crate::utils::get_version_string;

/// Namespace the inventory configmap and playbook job are managed in.
const NAMESPACE: &str = "ansible-test";
/// Playbook to run, resolved inside the ansible image.
const PLAYBOOK: &str = "/usr/share/ansible/openshift-ansible/playbooks/byo/config.yml";

#[derive(Parser)]
#[command(
    about = "Publish an ansible inventory and run a playbook against it as a kubernetes job",
    version = get_version_string()
)]
struct Cli {
    /// Path to the ansible inventory file
    inventory: PathBuf,

    /// Path to the kubeconfig file (defaults to ~/.kube/config)
    #[arg(long)]
    kubeconfig: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let cli = Cli::parse();
    logging::setup_tracing()?;

    // Read the inventory before touching the cluster, so a bad path fails
    // without leaving anything behind
    let inventory = runner::inventory::read(&cli.inventory)?;

    let path = kubeconfig::resolve_path(cli.kubeconfig, kubeconfig::home_dir())?;
    let client = kubeconfig::build_client(&path).await?;

    AnsibleRunner::new(client, NAMESPACE)
        .run_playbook(&inventory, PLAYBOOK)
        .await?;
    Ok(())
}
