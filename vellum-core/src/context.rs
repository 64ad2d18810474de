//! Request and traversal contexts

use crate::document::Document;

/// Locale value meaning "return every locale untouched"
pub const ALL_LOCALES: &str = "all";

/// Acting user, as seen by access checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestUser {
    pub id: String,
    pub roles: Vec<String>,
}

impl RequestUser {
    pub fn new<I, S>(id: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { id: id.into(), roles: roles.into_iter().map(Into::into).collect() }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// Per-request settings passed through resolution and population
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Requested locale for localized fields (`all` keeps every locale)
    pub locale: Option<String>,
    /// Locale used when the requested one has no value
    pub fallback_locale: Option<String>,
    /// Skip collection and field access checks
    pub override_access: bool,
    /// Keep fields marked `hidden`
    pub show_hidden_fields: bool,
    pub user: Option<RequestUser>,
    /// Requested population depth (configured default when None)
    pub depth: Option<u32>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trusted internal context: access checks are skipped
    pub fn system() -> Self {
        Self { override_access: true, ..Self::default() }
    }

    pub fn with_user(mut self, user: RequestUser) -> Self {
        self.user = Some(user);
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn with_fallback_locale(mut self, locale: impl Into<String>) -> Self {
        self.fallback_locale = Some(locale.into());
        self
    }

    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = Some(depth);
        self
    }

    pub fn with_hidden_fields(mut self) -> Self {
        self.show_hidden_fields = true;
        self
    }

    pub fn with_override_access(mut self) -> Self {
        self.override_access = true;
        self
    }

    /// Role check: an empty requirement is public, otherwise any matching role grants access
    pub fn can_read(&self, required_roles: &[String]) -> bool {
        if self.override_access || required_roles.is_empty() {
            return true;
        }
        match &self.user {
            Some(user) => required_roles.iter().any(|role| user.has_role(role)),
            None => false,
        }
    }
}

/// State threaded through one traversal of a document
#[derive(Debug, Clone, Copy)]
pub struct PopulateContext<'a> {
    /// Number of references dereferenced to reach this document
    pub current_depth: u32,
    /// Maximum number of references to dereference
    pub depth: u32,
    pub override_access: bool,
    pub show_hidden_fields: bool,
    /// Object owning the fields currently visited
    pub sibling_doc: &'a Document,
}

impl<'a> PopulateContext<'a> {
    pub fn new(current_depth: u32, depth: u32, request: &RequestContext, doc: &'a Document) -> Self {
        Self {
            current_depth,
            depth,
            override_access: request.override_access,
            show_hidden_fields: request.show_hidden_fields,
            sibling_doc: doc,
        }
    }

    /// Same traversal, one nesting level down (array row, group, block)
    pub fn with_sibling(&self, sibling_doc: &'a Document) -> Self {
        Self { sibling_doc, ..*self }
    }

    /// Can a reference at this level still be dereferenced?
    ///
    /// `field_max_depth` is the per-field cap, if any.
    pub fn can_populate(&self, field_max_depth: Option<u32>) -> bool {
        let limit = match field_max_depth {
            Some(cap) => cap.min(self.depth),
            None => self.depth,
        };
        self.current_depth < limit
    }
}
