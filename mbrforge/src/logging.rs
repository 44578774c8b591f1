//! Logging setup. Everything goes to stderr so `dump` can stream raw
//! sector bytes on stdout.

pub fn init() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();
}
