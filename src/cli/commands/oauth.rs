use clap::{Arg, Command};

/// Google OAuth options. All three travel together: leaving them out runs
/// the server without the login gateway, for local development.
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("oauth-client-id")
                .long("oauth-client-id")
                .help("Google OAuth client id")
                .env("FACEWALL_OAUTH_CLIENT_ID")
                .requires("oauth-client-secret")
                .requires("email-domain"),
        )
        .arg(
            Arg::new("oauth-client-secret")
                .long("oauth-client-secret")
                .help("Google OAuth client secret")
                .env("FACEWALL_OAUTH_CLIENT_SECRET")
                .requires("oauth-client-id"),
        )
        .arg(
            Arg::new("email-domain")
                .long("email-domain")
                .help("Email domain allowed to log in, example: example.com")
                .env("FACEWALL_EMAIL_DOMAIN")
                .requires("oauth-client-id"),
        )
}
