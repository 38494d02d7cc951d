mod bamboo;
mod cert;
mod oauth;

use clap::{
    builder::{
        styling::{AnsiColor, Effects, Styles},
        ValueParser,
    },
    Arg, ColorChoice, Command,
};

pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            // Successfully parsed as a number
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let command = Command::new("facewall")
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("4001")
                .env("FACEWALL_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("external-url")
                .long("external-url")
                .help("Externally visible base URL, excluding the callback path, example: https://wall.example.com")
                .env("FACEWALL_EXTERNAL_URL"),
        )
        .arg(
            Arg::new("static-dir")
                .long("static-dir")
                .help("Directory with the built frontend assets")
                .default_value("frontend/build")
                .env("FACEWALL_STATIC_DIR"),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("FACEWALL_LOG_LEVEL")
                .global(true)
                .action(clap::ArgAction::Count)
                .value_parser(validator_log_level()),
        )
        .subcommand(cert::command());

    let command = oauth::with_args(command);
    bamboo::with_args(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "facewall");
        assert_eq!(
            command.get_about().map(ToString::to_string),
            Some(env!("CARGO_PKG_DESCRIPTION").to_string())
        );
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
    }

    #[test]
    fn test_server_args() {
        let command = new();
        let matches = command.get_matches_from(vec![
            "facewall",
            "--port",
            "4001",
            "--external-url",
            "https://wall.example.com",
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

        assert_eq!(matches.get_one::<u16>("port").copied(), Some(4001));
        assert_eq!(
            matches.get_one::<String>("external-url").map(String::as_str),
            Some("https://wall.example.com")
        );
        assert_eq!(
            matches.get_one::<String>("email-domain").map(String::as_str),
            Some("example.com")
        );
        assert_eq!(
            matches.get_one::<String>("static-dir").map(String::as_str),
            Some("frontend/build")
        );
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("FACEWALL_PORT", Some("443")),
                ("FACEWALL_EXTERNAL_URL", Some("https://wall.example.com")),
                ("FACEWALL_OAUTH_CLIENT_ID", Some("client-id")),
                ("FACEWALL_OAUTH_CLIENT_SECRET", Some("client-secret")),
                ("FACEWALL_EMAIL_DOMAIN", Some("example.com")),
                ("FACEWALL_BAMBOO_SUBDOMAIN", Some("example")),
                ("FACEWALL_BAMBOO_API_KEY", Some("key")),
                ("FACEWALL_LOG_LEVEL", Some("info")),
            ],
            || {
                let command = new();
                let matches = command.get_matches_from(vec!["facewall"]);
                assert_eq!(matches.get_one::<u16>("port").copied(), Some(443));
                assert_eq!(
                    matches
                        .get_one::<String>("oauth-client-id")
                        .map(String::as_str),
                    Some("client-id")
                );
                assert_eq!(
                    matches
                        .get_one::<String>("bamboo-subdomain")
                        .map(String::as_str),
                    Some("example")
                );
                assert_eq!(matches.get_one::<u8>("verbosity").copied(), Some(2));
            },
        );
    }

    #[test]
    fn test_check_log_level_env() {
        // loop cover all possible value_parse
        let levels = vec!["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            temp_env::with_vars([("FACEWALL_LOG_LEVEL", Some(level))], || {
                let command = new();
                let matches = command.get_matches_from(vec!["facewall"]);
                assert_eq!(
                    matches.get_one::<u8>("verbosity").copied(),
                    Some(index as u8)
                );
            });
        }
    }

    #[test]
    fn test_check_log_level_verbosity() {
        let levels = vec!["error", "warn", "info", "debug", "trace"];
        for (index, _) in levels.iter().enumerate() {
            temp_env::with_vars([("FACEWALL_LOG_LEVEL", None::<String>)], || {
                let mut args = vec!["facewall".to_string()];

                // Add the appropriate number of "-v" flags based on the index
                if index > 0 {
                    let v = format!("-{}", "v".repeat(index));
                    args.push(v);
                }

                let command = new();
                let matches = command.get_matches_from(args);

                assert_eq!(
                    matches.get_one::<u8>("verbosity").copied(),
                    Some(index as u8)
                );
            });
        }
    }

    #[test]
    fn test_cert_subcommand() {
        let command = new();
        let matches = command.get_matches_from(vec![
            "facewall",
            "cert",
            "--dsn",
            "postgres://localhost:5432/facewall",
            "get",
            "wall.example.com",
        ]);

        let sub = matches.subcommand_matches("cert").unwrap();
        assert_eq!(
            sub.get_one::<String>("dsn").map(String::as_str),
            Some("postgres://localhost:5432/facewall")
        );
        let (name, op) = sub.subcommand().unwrap();
        assert_eq!(name, "get");
        assert_eq!(
            op.get_one::<String>("key").map(String::as_str),
            Some("wall.example.com")
        );
    }
}
