//! Cache key layout for day buckets.

use std::fmt;

const DAY_PLACEHOLDER: &str = "{day}";

/// Template rejected at construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cache key template must contain {DAY_PLACEHOLDER} exactly once: {template}")]
pub struct CacheKeyTemplateError {
    template: String,
}

/// Key template with a single `{day}` placeholder.
///
/// # Examples
/// ```
/// use tasks_backend::outbound::cache::CacheKeyTemplate;
///
/// let template = CacheKeyTemplate::new("tasks:day:{day}").expect("valid template");
/// assert_eq!(template.key_for(2), "tasks:day:2");
/// assert_eq!(template.day_of("tasks:day:3"), Some(3));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKeyTemplate {
    prefix: String,
    suffix: String,
}

impl CacheKeyTemplate {
    pub fn new(template: &str) -> Result<Self, CacheKeyTemplateError> {
        match template.split_once(DAY_PLACEHOLDER) {
            Some((prefix, suffix)) if !suffix.contains(DAY_PLACEHOLDER) => Ok(Self {
                prefix: prefix.to_owned(),
                suffix: suffix.to_owned(),
            }),
            _ => Err(CacheKeyTemplateError {
                template: template.to_owned(),
            }),
        }
    }

    /// Key holding the bucket for `day`.
    pub fn key_for(&self, day: u32) -> String {
        format!("{}{day}{}", self.prefix, self.suffix)
    }

    /// Glob matching every bucket key.
    pub fn pattern(&self) -> String {
        format!("{}*{}", self.prefix, self.suffix)
    }

    /// Day encoded in `key`, if it follows the template.
    pub fn day_of(&self, key: &str) -> Option<u32> {
        key.strip_prefix(&self.prefix)?
            .strip_suffix(&self.suffix)?
            .parse()
            .ok()
    }
}

impl fmt::Display for CacheKeyTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{DAY_PLACEHOLDER}{}", self.prefix, self.suffix)
    }
}
