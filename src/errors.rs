#[derive(thiserror::Error, Debug)]
pub enum Error {
    // Inventory file
    #[error("failed to read inventory file {path}: {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },

    // Cluster client setup
    #[error("could not resolve a kubeconfig path: {0}")]
    KubeconfigPath(String),
    #[error("kubeconfig error: {0}")]
    ClientConfig(#[from] kube::config::KubeconfigError),
    #[error("failed to build Kubernetes client: {0}")]
    ClientConstruction(#[source] kube::Error),

    // Inventory configmap
    #[error("failed to create inventory configmap: {0}")]
    CreateFailed(#[source] kube::Error),
    #[error("inventory configmap exists but could not be replaced: {0}")]
    UpdateFailed(#[source] kube::Error),

    // Playbook job
    #[error("failed to submit playbook job: {0}")]
    SubmitFailed(#[source] kube::Error),
    #[error("playbook job exists but could not be replaced: {0}")]
    ReplaceFailed(#[source] kube::Error),

    // Misc libs
    #[error("JSON error {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to initialise tracing: {0}")]
    Tracing(#[from] tracing::subscriber::SetGlobalDefaultError),
}
