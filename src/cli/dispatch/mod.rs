use crate::cli::actions::{Action, CertOp, OauthArgs};
use anyhow::{anyhow, Context, Result};
use secrecy::SecretString;
use std::path::PathBuf;

pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    if let Some(matches) = matches.subcommand_matches("cert") {
        return cert(matches);
    }

    server(matches)
}

fn server(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(4001);

    // Without an external URL the callback can only work on the local port.
    let external_url = matches
        .get_one::<String>("external-url")
        .cloned()
        .unwrap_or_else(|| format!("http://localhost:{port}"));

    let oauth = match matches.get_one::<String>("oauth-client-id") {
        Some(client_id) => Some(OauthArgs {
            client_id: client_id.clone(),
            client_secret: matches
                .get_one::<String>("oauth-client-secret")
                .map(|s| SecretString::from(s.clone()))
                .context("missing required argument: --oauth-client-secret")?,
            email_domain: matches
                .get_one::<String>("email-domain")
                .cloned()
                .context("missing required argument: --email-domain")?,
        }),
        None => None,
    };

    Ok(Action::Server {
        port,
        external_url,
        static_dir: matches
            .get_one::<String>("static-dir")
            .cloned()
            .unwrap_or_else(|| "frontend/build".to_string()),
        oauth,
        bamboo_subdomain: matches
            .get_one::<String>("bamboo-subdomain")
            .cloned()
            .context("missing required argument: --bamboo-subdomain")?,
        bamboo_api_key: matches
            .get_one::<String>("bamboo-api-key")
            .map(|s| SecretString::from(s.clone()))
            .context("missing required argument: --bamboo-api-key")?,
    })
}

fn cert(matches: &clap::ArgMatches) -> Result<Action> {
    let dsn = matches
        .get_one::<String>("dsn")
        .cloned()
        .context("missing required argument: --dsn")?;

    let key = |m: &clap::ArgMatches| -> Result<String> {
        m.get_one::<String>("key")
            .cloned()
            .context("missing required argument: key")
    };

    let op = match matches.subcommand() {
        Some(("get", m)) => CertOp::Get { key: key(m)? },
        Some(("put", m)) => CertOp::Put {
            key: key(m)?,
            file: m
                .get_one::<String>("file")
                .map(PathBuf::from)
                .context("missing required argument: file")?,
        },
        Some(("del", m)) => CertOp::Delete { key: key(m)? },
        _ => return Err(anyhow!("missing cert operation")),
    };

    Ok(Action::Cert { dsn, op })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;
    use secrecy::ExposeSecret;

    #[test]
    fn test_server_action() {
        // FACEWALL_PORT would override the asserted default
        temp_env::with_vars([("FACEWALL_PORT", None::<String>)], || {
            let matches = commands::new().get_matches_from(vec![
                "facewall",
                "--external-url",
                "https://wall.example.com/",
                "--oauth-client-id",
                "client-id",
                "--oauth-client-secret",
                "client-secret",
                "--email-domain",
                "example.com",
                "--bamboo-subdomain",
                "example",
                "--bamboo-api-key",
                "key",
            ]);

            let Ok(Action::Server {
                port,
                external_url,
                static_dir,
                oauth,
                bamboo_subdomain,
                bamboo_api_key,
            }) = handler(&matches)
            else {
                panic!("expected a server action");
            };

            assert_eq!(port, 4001);
            assert_eq!(external_url, "https://wall.example.com/");
            assert_eq!(static_dir, "frontend/build");
            assert_eq!(bamboo_subdomain, "example");
            assert_eq!(bamboo_api_key.expose_secret(), "key");

            let oauth = oauth.expect("oauth args");
            assert_eq!(oauth.client_id, "client-id");
            assert_eq!(oauth.client_secret.expose_secret(), "client-secret");
            assert_eq!(oauth.email_domain, "example.com");
        });
    }

    #[test]
    fn test_server_action_without_oauth() {
        temp_env::with_vars(
            [
                ("FACEWALL_PORT", None::<String>),
                ("FACEWALL_EXTERNAL_URL", None),
                ("FACEWALL_OAUTH_CLIENT_ID", None),
            ],
            || {
                let matches = commands::new().get_matches_from(vec![
                    "facewall",
                    "--bamboo-subdomain",
                    "example",
                    "--bamboo-api-key",
                    "key",
                ]);

                let Ok(Action::Server {
                    external_url,
                    oauth,
                    ..
                }) = handler(&matches)
                else {
                    panic!("expected a server action");
                };

                assert_eq!(external_url, "http://localhost:4001");
                assert!(oauth.is_none());
            },
        );
    }

    #[test]
    fn test_server_action_requires_bamboo() {
        temp_env::with_vars(
            [
                ("FACEWALL_BAMBOO_SUBDOMAIN", None::<String>),
                ("FACEWALL_BAMBOO_API_KEY", None),
            ],
            || {
                let matches = commands::new().get_matches_from(vec!["facewall"]);
                let err = handler(&matches).unwrap_err();
                assert!(err.to_string().contains("--bamboo-subdomain"));
            },
        );
    }

    #[test]
    fn test_cert_action() {
        let matches = commands::new().get_matches_from(vec![
            "facewall",
            "cert",
            "--dsn",
            "postgres://localhost:5432/facewall",
            "put",
            "wall.example.com",
            "bundle.pem",
        ]);

        let Ok(Action::Cert { dsn, op }) = handler(&matches) else {
            panic!("expected a cert action");
        };

        assert_eq!(dsn, "postgres://localhost:5432/facewall");
        let CertOp::Put { key, file } = op else {
            panic!("expected a put operation");
        };
        assert_eq!(key, "wall.example.com");
        assert_eq!(file, PathBuf::from("bundle.pem"));
    }
}
