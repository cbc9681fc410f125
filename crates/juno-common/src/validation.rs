use crate::models::account_request::NewAccountRequest;
use crate::models::analytics::AnalyticsQuery;
use crate::models::api_key::NewApiKey;
use crate::models::project::{NewProject, ProjectUpdate};
use crate::models::services::{
    DomainRegistration, EmailConfig, SenderRegistration, StorageConfig, EMAIL_PROVIDERS,
    STORAGE_PROVIDERS,
};
use crate::models::user::{NewUser, UserUpdate};
use anyhow::{bail, Result};

const MAX_NAME_LEN: usize = 100;
const MIN_PASSWORD_LEN: usize = 8;
const MAX_ANALYTICS_LIMIT: u32 = 1000;

/// Non-empty after trimming and at most 100 characters.
pub fn validate_name(field: &str, value: &str) -> Result<()> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        bail!("{} is required", field);
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        bail!("{} must be at most {} characters", field, MAX_NAME_LEN);
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<()> {
    let email = email.trim();
    let (local, domain) = match email.split_once('@') {
        Some(parts) => parts,
        None => bail!("Invalid email address: '{}'", email),
    };
    if local.is_empty() || domain.contains('@') || email.chars().any(char::is_whitespace) {
        bail!("Invalid email address: '{}'", email);
    }
    validate_domain(domain).map_err(|_| anyhow::anyhow!("Invalid email address: '{}'", email))
}

pub fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        bail!("Password must be at least {} characters", MIN_PASSWORD_LEN);
    }
    Ok(())
}

/// Hostname check: dot-separated labels of alphanumerics and inner hyphens.
pub fn validate_domain(domain: &str) -> Result<()> {
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || domain.len() > 253 {
        bail!("Invalid domain: '{}'", domain);
    }
    for label in labels {
        let valid = !label.is_empty()
            && label.len() <= 63
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
            && !label.starts_with('-')
            && !label.ends_with('-');
        if !valid {
            bail!("Invalid domain: '{}'", domain);
        }
    }
    Ok(())
}

/// S3-style bucket names: 3-63 chars of lowercase letters, digits, '-' and '.',
/// starting and ending with a letter or digit.
pub fn validate_bucket_name(name: &str) -> Result<()> {
    let len = name.len();
    if !(3..=63).contains(&len) {
        bail!("Bucket name must be between 3 and 63 characters");
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
    {
        bail!("Bucket name may only contain lowercase letters, digits, '-' and '.'");
    }
    let edge_ok = |c: Option<char>| c.is_some_and(|c| c.is_ascii_alphanumeric());
    if !edge_ok(name.chars().next()) || !edge_ok(name.chars().last()) {
        bail!("Bucket name must start and end with a letter or digit");
    }
    if name.contains("..") {
        bail!("Bucket name must not contain consecutive dots");
    }
    Ok(())
}

pub fn validate_new_user(user: &NewUser) -> Result<()> {
    validate_name("Name", &user.name)?;
    validate_email(&user.email)?;
    validate_password(&user.password)?;
    Ok(())
}

pub fn validate_user_update(update: &UserUpdate) -> Result<()> {
    if update.is_empty() {
        bail!("Nothing to update");
    }
    if let Some(name) = &update.name {
        validate_name("Name", name)?;
    }
    if let Some(email) = &update.email {
        validate_email(email)?;
    }
    Ok(())
}

pub fn validate_new_project(project: &NewProject) -> Result<()> {
    validate_name("Project name", &project.name)
}

pub fn validate_project_update(update: &ProjectUpdate) -> Result<()> {
    if update.name.is_none() && update.description.is_none() {
        bail!("Nothing to update");
    }
    if let Some(name) = &update.name {
        validate_name("Project name", name)?;
    }
    Ok(())
}

pub fn validate_new_api_key(key: &NewApiKey) -> Result<()> {
    validate_name("Description", &key.description)
}

pub fn validate_email_config(config: &EmailConfig) -> Result<()> {
    if !EMAIL_PROVIDERS.contains(&config.provider.as_str()) {
        bail!(
            "Unknown email provider '{}' (expected one of: {})",
            config.provider,
            EMAIL_PROVIDERS.join(", ")
        );
    }
    for sender in &config.sender_addresses {
        validate_email(sender)?;
    }
    for domain in &config.domains {
        validate_domain(domain)?;
    }
    Ok(())
}

pub fn validate_domain_registration(reg: &DomainRegistration) -> Result<()> {
    validate_domain(reg.domain.trim())
}

pub fn validate_sender_registration(reg: &SenderRegistration) -> Result<()> {
    validate_email(&reg.email)?;
    if let Some(name) = &reg.name {
        validate_name("Sender name", name)?;
    }
    Ok(())
}

pub fn validate_storage_config(config: &StorageConfig) -> Result<()> {
    if !STORAGE_PROVIDERS.contains(&config.provider.as_str()) {
        bail!(
            "Unknown storage provider '{}' (expected one of: {})",
            config.provider,
            STORAGE_PROVIDERS.join(", ")
        );
    }
    Ok(())
}

pub fn validate_analytics_query(query: &AnalyticsQuery) -> Result<()> {
    if query.start_date > query.end_date {
        bail!("startDate must not be after endDate");
    }
    if query.limit == 0 || query.limit > MAX_ANALYTICS_LIMIT {
        bail!("limit must be between 1 and {}", MAX_ANALYTICS_LIMIT);
    }
    Ok(())
}

pub fn validate_account_request(req: &NewAccountRequest) -> Result<()> {
    validate_name("Name", &req.name)?;
    validate_email(&req.email)?;
    validate_password(&req.password)?;
    if let Some(project) = &req.project_name {
        validate_name("Project name", project)?;
    }
    Ok(())
}
