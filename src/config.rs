use dotenvy::dotenv;
use rust_decimal::Decimal;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    /// Seed values for the attendance deduction policy; editable at runtime
    /// through the policies endpoint.
    pub late_rate_per_hour: Decimal,
    pub absence_rate_per_day: Decimal,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("SERVER_PORT must be a valid port number"),
            late_rate_per_hour: env::var("LATE_RATE_PER_HOUR")
                .unwrap_or_else(|_| "0".to_string())
                .parse()
                .expect("LATE_RATE_PER_HOUR must be a decimal amount"),
            absence_rate_per_day: env::var("ABSENCE_RATE_PER_DAY")
                .unwrap_or_else(|_| "0".to_string())
                .parse()
                .expect("ABSENCE_RATE_PER_DAY must be a decimal amount"),
        }
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
