//! Bridge configuration loaded from environment variables.
//!
//! Everything has a default matching the Android app, so the library works
//! with zero configuration; the overrides exist for host-side tooling and
//! forks that relocate the Kotlin classes.

use std::sync::OnceLock;

/// Default package holding the Kotlin value classes.
pub const DEFAULT_UTIL_PACKAGE: &str = "network/loki/messenger/libsession_util/util";

/// Default session id wrapper class.
pub const DEFAULT_ACCOUNT_ID_CLASS: &str = "org/session/libsignal/utilities/AccountId";

/// JNI class names of every boundary type, in `a/b/C` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassNames {
    pub user_pic: String,
    pub base_community: String,
    pub expiry_mode: String,
    pub expiry_none: String,
    pub expiry_after_send: String,
    pub expiry_after_read: String,
    pub group_member: String,
    pub account_id: String,
}

impl ClassNames {
    pub fn new(util_package: &str, account_id_class: &str) -> Self {
        let pkg = util_package.trim_end_matches('/');
        Self {
            user_pic: format!("{pkg}/UserPic"),
            base_community: format!("{pkg}/BaseCommunityInfo"),
            expiry_mode: format!("{pkg}/ExpiryMode"),
            expiry_none: format!("{pkg}/ExpiryMode$NONE"),
            expiry_after_send: format!("{pkg}/ExpiryMode$AfterSend"),
            expiry_after_read: format!("{pkg}/ExpiryMode$AfterRead"),
            group_member: format!("{pkg}/GroupMember"),
            account_id: account_id_class.to_string(),
        }
    }

    /// `Lpkg/Class;` field descriptor for a class name.
    pub fn descriptor(class: &str) -> String {
        format!("L{class};")
    }
}

impl Default for ClassNames {
    fn default() -> Self {
        Self::new(DEFAULT_UTIL_PACKAGE, DEFAULT_ACCOUNT_ID_CLASS)
    }
}

/// Bridge configuration.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Package of the Kotlin value classes (slash separated).
    /// Env: `SESSION_JNI_UTIL_PACKAGE`
    /// Default: `network/loki/messenger/libsession_util/util`
    pub util_package: String,

    /// Session id wrapper class.
    /// Env: `SESSION_JNI_ACCOUNT_ID_CLASS`
    /// Default: `org/session/libsignal/utilities/AccountId`
    pub account_id_class: String,

    /// Tag used for logcat output on Android.
    /// Env: `SESSION_JNI_LOG_TAG`
    /// Default: `libsession-jni`
    pub log_tag: String,

    /// Filter applied when `RUST_LOG` is unset.
    /// Env: `SESSION_JNI_LOG_FILTER`
    /// Default: `info,session_jni=debug`
    pub log_filter: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            util_package: DEFAULT_UTIL_PACKAGE.to_string(),
            account_id_class: DEFAULT_ACCOUNT_ID_CLASS.to_string(),
            log_tag: "libsession-jni".to_string(),
            log_filter: "info,session_jni=debug".to_string(),
        }
    }
}

impl BridgeConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(pkg) = lookup("SESSION_JNI_UTIL_PACKAGE") {
            if is_class_path(&pkg) {
                config.util_package = pkg.replace('.', "/");
            } else {
                tracing::warn!(value = %pkg, "Invalid SESSION_JNI_UTIL_PACKAGE, using default");
            }
        }

        if let Some(class) = lookup("SESSION_JNI_ACCOUNT_ID_CLASS") {
            if is_class_path(&class) {
                config.account_id_class = class.replace('.', "/");
            } else {
                tracing::warn!(value = %class, "Invalid SESSION_JNI_ACCOUNT_ID_CLASS, using default");
            }
        }

        if let Some(tag) = lookup("SESSION_JNI_LOG_TAG") {
            if !tag.is_empty() {
                config.log_tag = tag;
            }
        }

        // RUST_LOG wins over this when set; see logging::init.
        if let Some(filter) = lookup("SESSION_JNI_LOG_FILTER") {
            if !filter.is_empty() {
                config.log_filter = filter;
            }
        }

        config
    }

    pub fn class_names(&self) -> ClassNames {
        ClassNames::new(&self.util_package, &self.account_id_class)
    }
}

fn is_class_path(s: &str) -> bool {
    !s.is_empty()
        && s.split(['/', '.']).all(|part| {
            !part.is_empty()
                && part
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        })
}

static CONFIG: OnceLock<(BridgeConfig, ClassNames)> = OnceLock::new();

/// Install the process configuration. Later calls are ignored.
pub fn install(config: BridgeConfig) -> &'static BridgeConfig {
    &CONFIG
        .get_or_init(|| {
            let classes = config.class_names();
            (config, classes)
        })
        .0
}

/// Class names in effect (defaults until [`install`] runs).
pub fn classes() -> &'static ClassNames {
    &CONFIG
        .get_or_init(|| {
            let config = BridgeConfig::default();
            let classes = config.class_names();
            (config, classes)
        })
        .1
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = BridgeConfig::from_lookup(lookup(&[]));
        assert_eq!(config.util_package, DEFAULT_UTIL_PACKAGE);
        assert_eq!(config.log_tag, "libsession-jni");

        let classes = config.class_names();
        assert_eq!(
            classes.expiry_after_read,
            "network/loki/messenger/libsession_util/util/ExpiryMode$AfterRead"
        );
        assert_eq!(classes.account_id, DEFAULT_ACCOUNT_ID_CLASS);
    }

    #[test]
    fn test_dotted_package_accepted() {
        let config = BridgeConfig::from_lookup(lookup(&[(
            "SESSION_JNI_UTIL_PACKAGE",
            "com.example.session.util",
        )]));
        assert_eq!(config.util_package, "com/example/session/util");
        assert_eq!(
            config.class_names().user_pic,
            "com/example/session/util/UserPic"
        );
    }

    #[test]
    fn test_invalid_values_ignored() {
        let config = BridgeConfig::from_lookup(lookup(&[
            ("SESSION_JNI_UTIL_PACKAGE", "not a//package"),
            ("SESSION_JNI_LOG_TAG", ""),
        ]));
        assert_eq!(config.util_package, DEFAULT_UTIL_PACKAGE);
        assert_eq!(config.log_tag, "libsession-jni");
    }

    #[test]
    fn test_descriptor() {
        assert_eq!(ClassNames::descriptor("java/lang/String"), "Ljava/lang/String;");
    }
}
