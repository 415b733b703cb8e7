use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub data_path: PathBuf,
    pub sql_echo: bool,
    pub reset_database: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://mbrowser.db?mode=rwc".to_string());

        let data_path =
            std::env::var("DATA_PATH").map(PathBuf::from).unwrap_or_else(|_| PathBuf::from("data"));

        let sql_echo = env_flag("SQL_ECHO");
        let reset_database = env_flag("RESET_DATABASE");

        Ok(Self { database_url, data_path, sql_echo, reset_database })
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name).ok().map(|s| parse_flag(&s)).unwrap_or(false)
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use super::parse_flag;

    #[test]
    fn flags_accept_common_truthy_spellings() {
        for v in ["1", "true", "TRUE", " yes ", "on"] {
            assert!(parse_flag(v), "{v}");
        }
        for v in ["", "0", "false", "no", "nope"] {
            assert!(!parse_flag(v), "{v}");
        }
    }
}
