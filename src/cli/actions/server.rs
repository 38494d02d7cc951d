use crate::api;
use crate::auth::{AuthGateway, OAuthConfig, CALLBACK_PATH};
use crate::cli::actions::Action;
use crate::directory::{BambooClient, DirectoryCache};
use anyhow::{anyhow, Result};
use std::sync::Arc;
use tracing::warn;
use url::Url;

/// Handle the server action
pub async fn handle(action: Action) -> Result<()> {
    let Action::Server {
        port,
        external_url,
        static_dir,
        oauth,
        bamboo_subdomain,
        bamboo_api_key,
    } = action
    else {
        return Err(anyhow!("not a server action"));
    };

    let gateway = match oauth {
        Some(oauth) => {
            let redirect_url = Url::parse(&format!(
                "{}{CALLBACK_PATH}",
                external_url.trim_end_matches('/')
            ))?;
            let config = OAuthConfig::new(oauth.client_id, oauth.client_secret, redirect_url);
            Some(Arc::new(AuthGateway::new(config, oauth.email_domain)?))
        }
        None => {
            warn!("No OAuth client configured, serving without authentication");
            None
        }
    };

    let directory = BambooClient::new(bamboo_subdomain, bamboo_api_key)?;
    let cache = Arc::new(DirectoryCache::new(Arc::new(directory)));

    api::new(port, gateway, cache, &static_dir).await
}
