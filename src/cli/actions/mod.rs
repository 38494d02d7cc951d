pub mod cert;
pub mod server;

use secrecy::SecretString;
use std::path::PathBuf;

/// What the process was asked to do.
#[derive(Debug)]
pub enum Action {
    Server {
        port: u16,
        external_url: String,
        static_dir: String,
        oauth: Option<OauthArgs>,
        bamboo_subdomain: String,
        bamboo_api_key: SecretString,
    },
    Cert {
        dsn: String,
        op: CertOp,
    },
}

#[derive(Debug)]
pub struct OauthArgs {
    pub client_id: String,
    pub client_secret: SecretString,
    pub email_domain: String,
}

#[derive(Debug)]
pub enum CertOp {
    Get { key: String },
    Put { key: String, file: PathBuf },
    Delete { key: String },
}
