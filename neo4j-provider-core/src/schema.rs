//! Attribute schemas for the provider block and its resources.
//!
//! The schema drives two things: which values the orchestrator may set and
//! how they are validated before any statement runs.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value as Json;

use crate::error::ProviderError;

/// Reject strings that are empty once surrounding whitespace is trimmed.
///
/// ```rust
/// # use neo4j_provider_core::schema::validate_not_blank;
/// assert!(validate_not_blank("neo4j://localhost:7687", "connection_uri").is_ok());
/// assert!(validate_not_blank("   ", "connection_uri").is_err());
/// ```
pub fn validate_not_blank(value: &str, path: &str) -> Result<(), ProviderError> {
    if value.trim().is_empty() {
        return Err(ProviderError::validation(path, "empty string"));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    String,
    Number,
}

/// Closed set of per-attribute validators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Validator {
    NotBlank,
    AtLeastOne,
}

impl Validator {
    pub fn check(self, value: &Json, path: &str) -> Result<(), ProviderError> {
        match (self, value) {
            (Validator::NotBlank, Json::String(s)) => validate_not_blank(s, path),
            (Validator::AtLeastOne, Json::Number(n)) if n.as_u64() == Some(0) => {
                Err(ProviderError::validation(path, "must be at least 1"))
            }
            _ => Ok(()),
        }
    }

    /// The attribute type this validator can be attached to.
    pub fn applies_to(self) -> AttributeType {
        match self {
            Validator::NotBlank => AttributeType::String,
            Validator::AtLeastOne => AttributeType::Number,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: AttributeType,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub sensitive: bool,
    pub force_new: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env_default: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validator: Option<Validator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
}

impl Attribute {
    fn new(name: &'static str, kind: AttributeType) -> Self {
        Self {
            name,
            kind,
            required: false,
            optional: false,
            computed: false,
            sensitive: false,
            force_new: false,
            env_default: None,
            validator: None,
            description: None,
        }
    }

    pub fn required_string(name: &'static str) -> Self {
        Self {
            required: true,
            ..Self::new(name, AttributeType::String)
        }
    }

    pub fn optional_string(name: &'static str) -> Self {
        Self {
            optional: true,
            ..Self::new(name, AttributeType::String)
        }
    }

    pub fn optional_number(name: &'static str) -> Self {
        Self {
            optional: true,
            ..Self::new(name, AttributeType::Number)
        }
    }

    pub fn computed_string(name: &'static str) -> Self {
        Self {
            computed: true,
            ..Self::new(name, AttributeType::String)
        }
    }

    pub fn env_default(mut self, var: &'static str) -> Self {
        self.env_default = Some(var);
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    /// Changing this attribute replaces the resource instead of updating it.
    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    pub fn validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn description(mut self, text: &'static str) -> Self {
        self.description = Some(text);
        self
    }
}

/// The attribute set of one configuration block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub attributes: Vec<Attribute>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Validate a config object against the declared attributes.
    ///
    /// `prefix` is prepended to attribute names in error paths, e.g.
    /// `neo4j_user.username`. Required attributes with an env default are
    /// resolved later and may be absent here.
    pub fn validate(&self, prefix: &str, config: &Json) -> Result<(), ProviderError> {
        let path = |name: &str| {
            if prefix.is_empty() {
                name.to_owned()
            } else {
                format!("{prefix}.{name}")
            }
        };
        let empty = serde_json::Map::new();
        let object = match config {
            Json::Object(map) => map,
            Json::Null => &empty,
            _ => return Err(ProviderError::validation(prefix, "expected an object")),
        };

        for attr in &self.attributes {
            match object.get(attr.name) {
                None | Some(Json::Null) => {
                    if attr.required && attr.env_default.is_none() {
                        return Err(ProviderError::validation(
                            path(attr.name),
                            "required attribute is missing",
                        ));
                    }
                }
                Some(value) => {
                    if attr.computed && !attr.optional && !attr.required {
                        return Err(ProviderError::validation(
                            path(attr.name),
                            "computed attribute cannot be set",
                        ));
                    }
                    match (attr.kind, value) {
                        (AttributeType::String, Json::String(_)) => {}
                        (AttributeType::Number, Json::Number(n)) if n.is_u64() => {}
                        (AttributeType::String, _) => {
                            return Err(ProviderError::validation(
                                path(attr.name),
                                "expected a string",
                            ));
                        }
                        (AttributeType::Number, _) => {
                            return Err(ProviderError::validation(
                                path(attr.name),
                                "expected a non-negative integer",
                            ));
                        }
                    }
                    if let Some(validator) = attr.validator {
                        validator.check(value, &path(attr.name))?;
                    }
                }
            }
        }

        for key in object.keys() {
            if self.attribute(key).is_none() {
                return Err(ProviderError::validation(path(key), "unsupported attribute"));
            }
        }
        Ok(())
    }

    /// Check the schema itself for contradictory declarations.
    pub fn internal_validate(&self, prefix: &str) -> Result<(), ProviderError> {
        let mut seen = HashSet::new();
        for attr in &self.attributes {
            let path = format!("{prefix}.{}", attr.name);
            if !seen.insert(attr.name) {
                return Err(ProviderError::validation(path, "attribute declared twice"));
            }
            let modes = [attr.required, attr.optional, attr.computed]
                .iter()
                .filter(|m| **m)
                .count();
            if modes == 0 {
                return Err(ProviderError::validation(
                    path,
                    "one of required, optional or computed must be set",
                ));
            }
            if attr.required && (attr.optional || attr.computed) {
                return Err(ProviderError::validation(
                    path,
                    "required cannot be combined with optional or computed",
                ));
            }
            if attr.computed && !attr.optional && attr.env_default.is_some() {
                return Err(ProviderError::validation(
                    path,
                    "computed-only attributes cannot have a default",
                ));
            }
            if attr.computed && !attr.optional && attr.validator.is_some() {
                return Err(ProviderError::validation(
                    path,
                    "computed-only attributes cannot have a validator",
                ));
            }
            if attr.validator.is_some_and(|v| v.applies_to() != attr.kind) {
                return Err(ProviderError::validation(
                    path,
                    "validator does not match the attribute type",
                ));
            }
            if attr.force_new && attr.computed && !attr.optional {
                return Err(ProviderError::validation(
                    path,
                    "force_new has no effect on computed-only attributes",
                ));
            }
        }
        Ok(())
    }
}

/// Schema and capabilities of a managed resource type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceSchema {
    pub name: &'static str,
    pub importable: bool,
    pub schema: Schema,
}

/// Everything the provider declares: its own config block plus resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderSchema {
    pub provider: Schema,
    pub resources: Vec<ResourceSchema>,
}

impl ProviderSchema {
    pub fn resource(&self, name: &str) -> Option<&ResourceSchema> {
        self.resources.iter().find(|r| r.name == name)
    }

    pub fn internal_validate(&self) -> Result<(), ProviderError> {
        self.provider.internal_validate("provider")?;
        let mut names = HashSet::new();
        for resource in &self.resources {
            if !names.insert(resource.name) {
                return Err(ProviderError::validation(resource.name, "resource declared twice"));
            }
            resource.schema.internal_validate(resource.name)?;
        }
        Ok(())
    }
}
