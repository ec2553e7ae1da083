//! Editable content definitions and their built-in default shapes.

use crate::attachments::AttachmentNaming;
use crate::document::Document;
use crate::merge::{MergePolicy, merge_with_default};
use folio_rs_protocol::ContentKind;
use serde_json::{Value, json};

/// Names of the built-in content definitions.
pub const BUILTIN_NAMES: &[&str] = &[
    "header",
    "footer",
    "hero",
    "dna",
    "diagnostic",
    "services",
];

/// Everything an edit session needs to know about one kind of document.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentDefinition {
    /// Short name used on the command line and in config.
    pub name: String,
    /// Endpoint resource that stores the document.
    pub api_path: String,
    /// Type and subtype sent with every save.
    pub kind: ContentKind,
    /// Complete document used as placeholder and merge target.
    pub default_shape: Document,
    /// Per-field merge overrides.
    pub policy: MergePolicy,
    /// Multipart naming for attachments.
    pub naming: AttachmentNaming,
}

impl ContentDefinition {
    /// Build a definition with an empty merge policy and path-prefixed attachments.
    pub fn new(
        name: impl Into<String>,
        api_path: impl Into<String>,
        kind: ContentKind,
        default_shape: Document,
    ) -> Self {
        Self {
            name: name.into(),
            api_path: api_path.into(),
            kind,
            default_shape,
            policy: MergePolicy::new(),
            naming: AttachmentNaming::default(),
        }
    }

    /// Replace the merge policy.
    pub fn with_policy(mut self, policy: MergePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the attachment naming.
    pub fn with_naming(mut self, naming: AttachmentNaming) -> Self {
        self.naming = naming;
        self
    }

    /// Merge a raw document against this definition's default shape.
    pub fn merge(&self, raw: Option<&Value>) -> Document {
        Document::new(merge_with_default(
            raw,
            self.default_shape.as_value(),
            &self.policy,
        ))
    }
}

/// Built-in definition by name.
pub fn builtin(name: &str) -> Option<ContentDefinition> {
    let definition = match name {
        "header" => ContentDefinition::new(
            "header",
            "/api/content/header",
            ContentKind::new("layout", "header"),
            header_shape(),
        ),
        "footer" => ContentDefinition::new(
            "footer",
            "/api/content/footer",
            ContentKind::new("layout", "footer"),
            footer_shape(),
        ),
        "hero" => ContentDefinition::new(
            "hero",
            "/api/content/hero",
            ContentKind::new("home", "hero"),
            hero_shape(),
        ),
        "dna" => ContentDefinition::new(
            "dna",
            "/api/content/dna",
            ContentKind::new("home", "dna"),
            dna_shape(),
        )
        .with_naming(AttachmentNaming::IndexedField),
        "diagnostic" => ContentDefinition::new(
            "diagnostic",
            "/api/content/diagnostic",
            ContentKind::new("home", "diagnostic"),
            diagnostic_shape(),
        ),
        "services" => ContentDefinition::new(
            "services",
            "/api/content/services",
            ContentKind::new("home", "services"),
            services_shape(),
        )
        .with_policy(MergePolicy::new().fallback_when_empty("home.services"))
        .with_naming(AttachmentNaming::IndexedField),
        _ => return None,
    };
    Some(definition)
}

/// All built-in definitions in display order.
pub fn builtins() -> Vec<ContentDefinition> {
    BUILTIN_NAMES.iter().filter_map(|name| builtin(name)).collect()
}

/// Default shape of a built-in definition.
pub fn default_shape(name: &str) -> Option<Document> {
    builtin(name).map(|definition| definition.default_shape)
}

fn header_shape() -> Document {
    Document::new(json!({
        "general": {
            "logo": "",
            "phone": "",
            "email": "",
            "socials": {
                "instagram": "",
                "facebook": "",
                "linkedin": "",
                "youtube": "",
            },
        },
        "navigation": [
            { "name": "Home", "href": "/" },
            { "name": "Services", "href": "/services" },
            { "name": "About", "href": "/about" },
            { "name": "Contact", "href": "/contact" },
        ],
        "cta": {
            "label": "Book a call",
            "href": "/contact",
            "color": "#1d4ed8",
            "textColor": "#ffffff",
        },
    }))
}

fn footer_shape() -> Document {
    Document::new(json!({
        "general": {
            "logo": "",
            "description": "",
            "copyright": "",
        },
        "columns": [
            {
                "title": "Company",
                "links": [
                    { "name": "About", "href": "/about" },
                    { "name": "Careers", "href": "/careers" },
                ],
            },
            {
                "title": "Resources",
                "links": [
                    { "name": "Blog", "href": "/blog" },
                    { "name": "Contact", "href": "/contact" },
                ],
            },
        ],
        "contact": {
            "phone": "",
            "email": "",
            "address": "",
        },
        "socials": {
            "instagram": "",
            "facebook": "",
            "linkedin": "",
        },
        "background": "#0f172a",
    }))
}

fn hero_shape() -> Document {
    Document::new(json!({
        "headline": {
            "title": "Grow with clarity",
            "highlight": "clarity",
            "subtitle": "",
            "color": "#111827",
            "highlightColor": "#1d4ed8",
        },
        "cta": {
            "label": "Get started",
            "href": "/contact",
            "icon": "arrow-right",
        },
        "media": {
            "image": "",
            "video": "",
            "alt": "",
        },
    }))
}

fn dna_shape() -> Document {
    Document::new(json!({
        "title": "Our DNA",
        "subtitle": "",
        "autoplay": true,
        "interval": 5,
        "cards": [
            { "title": "Curiosity", "description": "", "image": "", "alt": "", "icon": "search" },
            { "title": "Craft", "description": "", "image": "", "alt": "", "icon": "pen" },
            { "title": "Candor", "description": "", "image": "", "alt": "", "icon": "chat" },
        ],
    }))
}

fn diagnostic_shape() -> Document {
    Document::new(json!({
        "content": {
            "diagnostic": {
                "title": "Free diagnostic",
                "description": "",
                "cta": { "label": "Request a diagnostic", "href": "/diagnostic" },
            },
            "ecommerce": {
                "title": "Ecommerce in numbers",
                "stats1": { "val": "", "label": "", "icon": "" },
                "stats2": { "val": "", "label": "", "icon": "" },
                "stats3": { "val": "", "label": "", "icon": "" },
            },
        },
        "colors": {
            "background": "#f8fafc",
            "accent": "#1d4ed8",
        },
    }))
}

fn services_shape() -> Document {
    Document::new(json!({
        "home": {
            "title": "What we do",
            "subtitle": "",
            "services": [
                {
                    "title": "Strategy",
                    "description": "Positioning, research, and roadmaps.",
                    "icon": "compass",
                    "image": "",
                    "href": "/services/strategy",
                },
                {
                    "title": "Design",
                    "description": "Brand systems and product design.",
                    "icon": "palette",
                    "image": "",
                    "href": "/services/design",
                },
                {
                    "title": "Growth",
                    "description": "Campaigns, analytics, and conversion.",
                    "icon": "chart",
                    "image": "",
                    "href": "/services/growth",
                },
            ],
        },
    }))
}
