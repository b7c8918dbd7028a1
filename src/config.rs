use crate::api::DEFAULT_API_BASE;
use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub access_token: String,
    pub api_base: String,
    pub student_id: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let access_token = lookup("CLASSROOM_ACCESS_TOKEN").context(
            "CLASSROOM_ACCESS_TOKEN not found. Please set it in .env file or environment",
        )?;

        if access_token.trim().is_empty() {
            anyhow::bail!("CLASSROOM_ACCESS_TOKEN is empty");
        }

        let api_base = lookup("CLASSROOM_API_BASE")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let student_id = lookup("CLASSROOM_STUDENT_ID")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "me".to_string());

        Ok(Config {
            access_token,
            api_base,
            student_id,
        })
    }
}
