use crate::users::User;
use clap::Parser;
use std::net::SocketAddr;

/// Lander persistence server
#[derive(Parser, Debug, Clone)]
#[command(name = "lander-server")]
#[command(author, version, about, long_about = None)]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, env = "LANDER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "LANDER_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Email of the seeded login user
    #[arg(long = "seed-email", env = "EMAIL")]
    pub seed_email: Option<String>,

    /// Display name of the seeded login user
    #[arg(long = "seed-name", env = "NAME")]
    pub seed_name: Option<String>,

    /// Password of the seeded login user
    #[arg(long = "seed-password", env = "PASSWORD", hide_env_values = true)]
    pub seed_password: Option<String>,
}

impl ServerConfig {
    pub fn addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }

    /// The seed user, present only when both email and password are set
    pub fn seed_user(&self) -> Option<User> {
        let email = self.seed_email.as_deref()?;
        let password = self.seed_password.as_deref()?;
        let user = User::new(email, password);
        Some(match &self.seed_name {
            Some(name) => user.with_name(name.as_str()),
            None => user,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_and_seed_user() {
        let config = ServerConfig::parse_from([
            "lander-server",
            "--port",
            "8080",
            "--seed-email",
            "owner@example.com",
            "--seed-password",
            "pw",
        ]);
        assert_eq!(config.addr().unwrap().port(), 8080);

        let user = config.seed_user().unwrap();
        assert_eq!(user.email, "owner@example.com");
    }

    #[test]
    fn test_seed_user_needs_password() {
        let config = ServerConfig {
            host: "127.0.0.1".into(),
            port: 3000,
            seed_email: Some("owner@example.com".into()),
            seed_name: None,
            seed_password: None,
        };
        assert!(config.seed_user().is_none());
    }
}
