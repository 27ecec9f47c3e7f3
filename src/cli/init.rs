//! Init command implementation
//!
//! Writes a starter `bookshelf.toml` plus a `.env.example` holding a freshly
//! generated JWT secret.

use super::output::Output;
use rand::RngCore;
use std::fs;
use std::path::PathBuf;

/// Result of the init operation
#[derive(Debug)]
pub enum InitResult {
    Success,
    /// bookshelf.toml exists and `--force` was not given
    AlreadyExists,
    Error(String),
}

pub struct InitConfig {
    /// Directory to initialize
    pub path: PathBuf,
    /// Overwrite existing files
    pub force: bool,
}

pub fn run(config: InitConfig, output: &Output) -> InitResult {
    let base_path = &config.path;
    output.init_banner(base_path);

    if let Err(e) = fs::create_dir_all(base_path.join("data")) {
        output.error(&format!("Failed to create data directory: {}", e));
        return InitResult::Error(e.to_string());
    }

    let config_path = base_path.join("bookshelf.toml");
    if config_path.exists() && !config.force {
        output.warning("bookshelf.toml already exists, pass --force to overwrite it");
        return InitResult::AlreadyExists;
    }

    if let Err(e) = fs::write(&config_path, generate_bookshelf_toml()) {
        output.error(&format!("Failed to create bookshelf.toml: {}", e));
        return InitResult::Error(e.to_string());
    }
    output.wrote("bookshelf.toml");

    let env_path = base_path.join(".env.example");
    if env_path.exists() && !config.force {
        output.kept(".env.example", "already exists");
    } else if let Err(e) = fs::write(&env_path, generate_env_example(&generate_secret())) {
        output.error(&format!("Failed to create .env.example: {}", e));
        return InitResult::Error(e.to_string());
    } else {
        output.wrote(".env.example");
    }

    output.success("Bookshelf initialized, to start the server:");
    output.next_steps(
        &["cp .env.example .env", "bookshelf-server config --validate", "bookshelf-server"],
        Some("The OpenAPI document is served at /api-docs/openapi.json"),
    );

    InitResult::Success
}

/// 48 random bytes, hex encoded (96 characters).
pub fn generate_secret() -> String {
    let mut bytes = [0u8; 48];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

fn generate_bookshelf_toml() -> String {
    r#"# Bookshelf configuration

[server]
host = "127.0.0.1"
port = 5000
log_level = "info"
# "text" or "json"
log_format = "text"
cors_origins = ["http://localhost:4200"]

[auth]
# Name of the environment variable holding the signing secret (>= 32 bytes)
jwt_secret_env = "BOOKSHELF_JWT_SECRET"
issuer = "bookshelf-api"
audience = "bookshelf-web"
token_lifetime_minutes = 180

[database]
# Local file path, or ":memory:"
url = "./data/bookshelf.db"
# Insert a demo user (testuser / Test123!) into an empty database
seed_demo_data = true

[policy]
# "claim_on_touch": editing someone else's book makes you its owner
# "strict": only the owner may edit or delete a book
book_ownership = "claim_on_touch"
"#
    .to_string()
}

fn generate_env_example(secret: &str) -> String {
    format!(
        "# Bookshelf environment\n\
         BOOKSHELF_JWT_SECRET={}\n\
         # RUST_LOG=bookshelf=debug,tower_http=debug\n",
        secret
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::toml_config::BookshelfConfig;
    use tempfile::TempDir;

    fn create_test_config(temp_dir: &TempDir, force: bool) -> InitConfig {
        InitConfig {
            path: temp_dir.path().to_path_buf(),
            force,
        }
    }

    #[test]
    fn test_generated_toml_parses() {
        let config = BookshelfConfig::parse(&generate_bookshelf_toml()).expect("should parse");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.auth.token_lifetime_minutes, 180);
        assert!(config.database.seed_demo_data);
    }

    #[test]
    fn test_generate_secret() {
        let a = generate_secret();
        let b = generate_secret();
        assert_eq!(a.len(), 96);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_run_creates_files() {
        let temp_dir = TempDir::new().expect("tempdir");

        let result = run(create_test_config(&temp_dir, false), &Output::new(false));

        assert!(matches!(result, InitResult::Success));
        assert!(temp_dir.path().join("bookshelf.toml").is_file());
        assert!(temp_dir.path().join("data").is_dir());
        let env = fs::read_to_string(temp_dir.path().join(".env.example")).expect("env file");
        assert!(env.contains("BOOKSHELF_JWT_SECRET="));
    }

    #[test]
    fn test_run_already_exists_without_force() {
        let temp_dir = TempDir::new().expect("tempdir");
        fs::write(temp_dir.path().join("bookshelf.toml"), "# mine").expect("write");

        let result = run(create_test_config(&temp_dir, false), &Output::new(false));

        assert!(matches!(result, InitResult::AlreadyExists));
        let content = fs::read_to_string(temp_dir.path().join("bookshelf.toml")).expect("read");
        assert_eq!(content, "# mine");
    }

    #[test]
    fn test_run_force_overwrites() {
        let temp_dir = TempDir::new().expect("tempdir");
        fs::write(temp_dir.path().join("bookshelf.toml"), "# mine").expect("write");

        let result = run(create_test_config(&temp_dir, true), &Output::new(false));

        assert!(matches!(result, InitResult::Success));
        let content = fs::read_to_string(temp_dir.path().join("bookshelf.toml")).expect("read");
        assert!(content.contains("[auth]"));
    }
}
