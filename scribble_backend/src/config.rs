use clap::Parser;
use std::net::SocketAddr;

/// Realtime stroke store for the Scribble whiteboard.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Address to listen on.
    #[arg(long, env = "SCRIBBLE_BIND", default_value = "0.0.0.0:3000")]
    pub bind: SocketAddr,

    /// Redis connection URL. Strokes are kept in memory when omitted.
    #[arg(long, env = "REDIS_URL")]
    pub redis_url: Option<String>,

    /// Buffered messages per channel before slow subscribers start skipping.
    #[arg(long, env = "SCRIBBLE_ROOM_CAPACITY", default_value_t = 100)]
    pub room_capacity: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_flags() {
        let config = Config::try_parse_from(["scribble-backend"]).expect("parse");
        assert_eq!(config.bind, "0.0.0.0:3000".parse().expect("addr"));
        assert_eq!(config.room_capacity, 100);
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "scribble-backend",
            "--bind",
            "127.0.0.1:8080",
            "--redis-url",
            "redis://cache/",
            "--room-capacity",
            "8",
        ])
        .expect("parse");
        assert_eq!(config.bind.port(), 8080);
        assert_eq!(config.redis_url.as_deref(), Some("redis://cache/"));
        assert_eq!(config.room_capacity, 8);
    }
}
