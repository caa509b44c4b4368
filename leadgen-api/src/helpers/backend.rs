use crate::backend::schema::{discover_contacts_schema, TableSchema};
use crate::backend::BackendClient;
use crate::config::ApiConfig;

/// A connected backend and what startup discovery learned about it.
#[derive(Clone)]
pub struct BackendHandle {
    pub client: BackendClient,
    pub contacts_schema: Option<TableSchema>,
}

/// Builds the backend client from config and discovers the contacts schema.
///
/// Returns `None` when the URL or key is unusable; the service still starts so the
/// settings endpoints can fix it.
pub async fn connect(config: &ApiConfig) -> Option<BackendHandle> {
    let Some(backend) = config.backend.as_ref() else {
        tracing::warn!("No [backend] section in config, contacts are unavailable");
        return None;
    };
    if backend.url.is_empty() {
        tracing::warn!("Backend URL is empty, contacts are unavailable");
        return None;
    }

    let client = match BackendClient::new(&backend.url, &backend.key) {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!("Backend disabled: {}", e);
            return None;
        }
    };

    tracing::info!("Connecting to backend at {}", client.base_url());
    let contacts_schema = discover_contacts_schema(&client).await;

    Some(BackendHandle {
        client,
        contacts_schema,
    })
}
