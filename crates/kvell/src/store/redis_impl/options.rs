use kvell_core::Ttl;

/// Options for [`RedisStore`](super::RedisStore).
#[derive(Debug, Clone)]
pub struct RedisOptions {
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
    /// Logical database index.
    pub db: i64,
    pub ttl: Ttl,
    /// Connection attempts after the first failed one, when connecting and
    /// when reconnecting after the server dropped the connection.
    pub reconnect_retries: usize,
}

impl RedisOptions {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            password: None,
            db: 0,
            ttl: Ttl::DISABLED,
            reconnect_retries: 6,
        }
    }

    /// Connection URL, e.g. `redis://:secret@localhost:6379/0`.
    pub fn connection_url(&self) -> String {
        let auth = match self.password.as_deref() {
            Some(password) if !password.is_empty() => {
                format!(":{}@", urlencoding::encode(password))
            }
            _ => String::new(),
        };
        format!("redis://{}{}:{}/{}", auth, self.host, self.port, self.db)
    }
}

impl Default for RedisOptions {
    fn default() -> Self {
        Self::new("localhost", 6379)
    }
}
