//! Resource registry for the backend proxy.
//!
//! Each proxied resource is one [`ResourceSpec`] row: which verbs it
//! accepts, when a bearer token is mandatory, which fields the backend stores
//! as JSON-encoded arrays, which fields hold storage-relative image paths,
//! and which form (if any) write bodies are validated against.

use crate::error::CoreError;
use crate::forms::FormKind;

// ---------------------------------------------------------------------------
// Methods and auth policy
// ---------------------------------------------------------------------------

/// HTTP verbs the proxy forwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl ProxyMethod {
    /// Parse an upper-case HTTP method name. Returns `None` for verbs the
    /// proxy never forwards (PATCH, HEAD, ...).
    pub fn parse(method: &str) -> Option<Self> {
        match method {
            "GET" => Some(Self::Get),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "DELETE" => Some(Self::Delete),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    /// POST and PUT carry a request body.
    pub fn has_body(self) -> bool {
        matches!(self, Self::Post | Self::Put)
    }

    pub fn is_write(self) -> bool {
        !matches!(self, Self::Get)
    }
}

impl std::fmt::Display for ProxyMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// When an `auth_token` cookie must be present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPolicy {
    /// Every verb needs a token.
    Always,
    /// Reads are public; POST/PUT/DELETE need a token.
    WritesOnly,
    /// Public resource. A token is still forwarded when present.
    Never,
}

impl AuthPolicy {
    pub fn requires_token(self, method: ProxyMethod) -> bool {
        match self {
            Self::Always => true,
            Self::WritesOnly => method.is_write(),
            Self::Never => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Registry rows
// ---------------------------------------------------------------------------

/// Static configuration for one proxied resource.
#[derive(Debug)]
pub struct ResourceSpec {
    /// Path segment under `/api` on the gateway.
    pub name: &'static str,
    /// Path segment under the backend base URL.
    pub backend_path: &'static str,
    pub methods: &'static [ProxyMethod],
    pub auth: AuthPolicy,
    /// Fields the backend persists as JSON-encoded string arrays.
    pub array_fields: &'static [&'static str],
    /// Fields holding storage-relative image paths.
    pub media_fields: &'static [&'static str],
    /// Form that JSON write bodies must satisfy before forwarding.
    pub form: Option<FormKind>,
}

impl ResourceSpec {
    pub fn supports(&self, method: ProxyMethod) -> bool {
        self.methods.contains(&method)
    }

    pub fn requires_token(&self, method: ProxyMethod) -> bool {
        self.auth.requires_token(method)
    }
}

const ALL_METHODS: &[ProxyMethod] = &[
    ProxyMethod::Get,
    ProxyMethod::Post,
    ProxyMethod::Put,
    ProxyMethod::Delete,
];

/// Every resource the gateway proxies.
pub const RESOURCES: &[ResourceSpec] = &[
    ResourceSpec {
        name: "mission-and-vision",
        backend_path: "mission-and-vision",
        methods: ALL_METHODS,
        auth: AuthPolicy::Always,
        array_fields: &[],
        media_fields: &[],
        form: None,
    },
    ResourceSpec {
        name: "office-contact",
        backend_path: "office-contact",
        methods: ALL_METHODS,
        auth: AuthPolicy::Always,
        array_fields: &[],
        media_fields: &[],
        form: Some(FormKind::OfficeContact),
    },
    ResourceSpec {
        name: "our-community",
        backend_path: "our-community",
        methods: ALL_METHODS,
        auth: AuthPolicy::Always,
        array_fields: &[
            "community_list",
            "community_card_icon",
            "community_card_title",
            "community_card_description",
        ],
        media_fields: &[],
        form: None,
    },
    ResourceSpec {
        name: "goals",
        backend_path: "goals",
        methods: ALL_METHODS,
        auth: AuthPolicy::Always,
        array_fields: &[
            "goal_list",
            "goal_card_icon",
            "goal_card_title",
            "goal_card_description",
        ],
        media_fields: &[],
        form: None,
    },
    ResourceSpec {
        name: "objectives",
        backend_path: "objectives",
        methods: ALL_METHODS,
        auth: AuthPolicy::Always,
        array_fields: &[
            "objective_list",
            "objective_card_icon",
            "objective_card_title",
            "objective_card_description",
        ],
        media_fields: &[],
        form: None,
    },
    ResourceSpec {
        name: "alerts",
        backend_path: "alerts",
        methods: ALL_METHODS,
        auth: AuthPolicy::WritesOnly,
        array_fields: &[],
        media_fields: &[],
        form: None,
    },
    ResourceSpec {
        name: "business-partners",
        backend_path: "business-partners",
        methods: ALL_METHODS,
        auth: AuthPolicy::WritesOnly,
        array_fields: &[],
        media_fields: &["photo"],
        form: None,
    },
    ResourceSpec {
        name: "legitimacy",
        backend_path: "legitimacy",
        methods: ALL_METHODS,
        auth: AuthPolicy::WritesOnly,
        array_fields: &[],
        media_fields: &["signature", "logo"],
        form: None,
    },
    ResourceSpec {
        name: "announcements",
        backend_path: "announcements",
        methods: ALL_METHODS,
        auth: AuthPolicy::WritesOnly,
        array_fields: &[],
        media_fields: &["image"],
        form: None,
    },
    ResourceSpec {
        name: "news",
        backend_path: "news",
        methods: ALL_METHODS,
        auth: AuthPolicy::WritesOnly,
        array_fields: &[],
        media_fields: &["image"],
        form: None,
    },
    ResourceSpec {
        name: "cedula",
        backend_path: "cedula",
        methods: ALL_METHODS,
        auth: AuthPolicy::Always,
        array_fields: &[],
        media_fields: &[],
        form: Some(FormKind::Cedula),
    },
    ResourceSpec {
        name: "health-certificate",
        backend_path: "health-certificate",
        methods: ALL_METHODS,
        auth: AuthPolicy::Always,
        array_fields: &[],
        media_fields: &[],
        form: Some(FormKind::HealthCertificate),
    },
    ResourceSpec {
        name: "report-issue",
        backend_path: "report-issue",
        methods: &[ProxyMethod::Get, ProxyMethod::Post],
        auth: AuthPolicy::Never,
        array_fields: &[],
        media_fields: &[],
        form: Some(FormKind::IssueReport),
    },
    ResourceSpec {
        name: "contact",
        backend_path: "contact",
        methods: &[ProxyMethod::Post],
        auth: AuthPolicy::Never,
        array_fields: &[],
        media_fields: &[],
        form: Some(FormKind::ContactMessage),
    },
];

/// Look up a resource by its gateway path segment.
pub fn find(name: &str) -> Option<&'static ResourceSpec> {
    RESOURCES.iter().find(|r| r.name == name)
}

/// Resolve a resource and check that it accepts `method`.
pub fn resolve(name: &str, method: &str) -> Result<(&'static ResourceSpec, ProxyMethod), CoreError> {
    let spec = find(name).ok_or_else(|| CoreError::NotFound(format!("/api/{name}")))?;
    match ProxyMethod::parse(method) {
        Some(m) if spec.supports(m) => Ok((spec, m)),
        _ => Err(CoreError::MethodNotAllowed {
            resource: spec.name.to_string(),
            method: method.to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
