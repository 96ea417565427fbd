//! Known setting keys with their defaults.

pub const BLOG_NAME: &str = "blog_name";
pub const BLOG_DESCRIPTION: &str = "blog_description";
pub const BLOG_INTRODUCTION: &str = "blog_introduction";
pub const LANGUAGE: &str = "language";
pub const BLOG_TIMEZONE: &str = "blog_timezone";
pub const CUSTOM_CSS: &str = "custom_css";
pub const FOOTER_LINKS: &str = "footer_links";
pub const JWT_SECRET: &str = "jwt_secret";

pub const DEFAULT_FOOTER_LINKS: &str =
    r#"[{"name":"Home","url":"/"},{"name":"Tags","url":"/tags"},{"name":"RSS","url":"/feed"}]"#;

#[derive(Debug, Clone, Copy)]
pub struct SettingDef {
    pub key: &'static str,
    /// `None` means the value has no compiled-in default
    pub default: Option<&'static str>,
    pub description: &'static str,
    /// Whether admins may change it through the settings endpoint
    pub editable: bool,
}

pub const KNOWN: &[SettingDef] = &[
    SettingDef {
        key: BLOG_NAME,
        default: Some("My Blog"),
        description: "The name of the blog displayed in the header",
        editable: true,
    },
    SettingDef {
        key: BLOG_DESCRIPTION,
        default: Some("A simple and elegant blog"),
        description: "A brief description of the blog",
        editable: true,
    },
    SettingDef {
        key: BLOG_INTRODUCTION,
        default: Some(""),
        description: "Introduction text shown on the home page",
        editable: true,
    },
    SettingDef {
        key: LANGUAGE,
        default: Some("en"),
        description: "Interface language code",
        editable: true,
    },
    SettingDef {
        key: BLOG_TIMEZONE,
        default: Some("UTC"),
        description: "Timezone used when displaying dates",
        editable: true,
    },
    SettingDef {
        key: CUSTOM_CSS,
        default: Some(""),
        description: "Custom CSS injected into every page",
        editable: true,
    },
    SettingDef {
        key: FOOTER_LINKS,
        default: Some(DEFAULT_FOOTER_LINKS),
        description: "Footer links as a JSON list of {name, url}",
        editable: true,
    },
    SettingDef {
        key: JWT_SECRET,
        default: None,
        description: "Secret key used for session token signing",
        editable: false,
    },
];

pub fn lookup(key: &str) -> Option<&'static SettingDef> {
    KNOWN.iter().find(|def| def.key == key)
}

pub fn default_for(key: &str) -> Option<&'static str> {
    lookup(key).and_then(|def| def.default)
}

pub fn is_editable(key: &str) -> bool {
    lookup(key).is_some_and(|def| def.editable)
}
