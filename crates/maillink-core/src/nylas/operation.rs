//! Typed request forwarding.
//!
//! A `parent.child` selector such as `threads.list` parses into an
//! [`Operation`]. Each [`Action`] has one handler in [`HANDLERS`] that plans
//! the HTTP call; the session then runs the plan.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use reqwest::Method;
use serde_json::{Value, json};

use super::error::NylasError;

/// Collection exposed by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    /// Conversation threads.
    Threads,
    /// Individual messages.
    Messages,
    /// Unsent drafts.
    Drafts,
    /// Gmail labels.
    Labels,
    /// Office365 folders.
    Folders,
    /// Address book entries.
    Contacts,
    /// Calendars.
    Calendars,
    /// Calendar events.
    Events,
    /// Attachments.
    Files,
    /// The linked account itself.
    Account,
}

impl Resource {
    /// Every resource.
    pub const ALL: [Self; 10] = [
        Self::Threads,
        Self::Messages,
        Self::Drafts,
        Self::Labels,
        Self::Folders,
        Self::Contacts,
        Self::Calendars,
        Self::Events,
        Self::Files,
        Self::Account,
    ];

    /// Selector name, also the API path segment.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Threads => "threads",
            Self::Messages => "messages",
            Self::Drafts => "drafts",
            Self::Labels => "labels",
            Self::Folders => "folders",
            Self::Contacts => "contacts",
            Self::Calendars => "calendars",
            Self::Events => "events",
            Self::Files => "files",
            Self::Account => "account",
        }
    }

    /// Whether the service accepts `action` on this resource.
    #[must_use]
    pub const fn supports(self, action: Action) -> bool {
        match self {
            Self::Account => matches!(action, Action::Find),
            Self::Threads | Self::Messages => !matches!(action, Action::Delete),
            _ => true,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|resource| resource.as_str() == s)
            .ok_or(())
    }
}

/// Method invoked on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// All objects matching the filter.
    List,
    /// Number of matching objects.
    Count,
    /// First matching object.
    First,
    /// One object by id.
    Find,
    /// Delete one object by id.
    Delete,
}

impl Action {
    /// Every action.
    pub const ALL: [Self; 5] = [
        Self::List,
        Self::Count,
        Self::First,
        Self::Find,
        Self::Delete,
    ];

    /// Selector name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Count => "count",
            Self::First => "first",
            Self::Find => "find",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or(())
    }
}

/// A resource and the action to run on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Operation {
    /// Target collection.
    pub resource: Resource,
    /// Method to invoke.
    pub action: Action,
}

impl Operation {
    /// Creates an operation.
    #[must_use]
    pub const fn new(resource: Resource, action: Action) -> Self {
        Self { resource, action }
    }

    /// Parses a `parent`/`child` selector pair.
    ///
    /// # Errors
    ///
    /// Returns [`NylasError::UnknownOperation`] if either name is unknown,
    /// or [`NylasError::Unsupported`] if the resource lacks the action.
    pub fn parse(parent: &str, child: &str) -> Result<Self, NylasError> {
        let unknown = || NylasError::UnknownOperation {
            parent: parent.to_string(),
            child: child.to_string(),
        };
        let resource = parent.parse::<Resource>().map_err(|()| unknown())?;
        let action = child.parse::<Action>().map_err(|()| unknown())?;

        let operation = Self::new(resource, action);
        if resource.supports(action) {
            Ok(operation)
        } else {
            Err(NylasError::Unsupported(operation))
        }
    }

    /// Plans the HTTP call for this operation.
    pub(crate) fn plan(self, filter: &Filter) -> Result<Call, NylasError> {
        if !self.resource.supports(self.action) {
            return Err(NylasError::Unsupported(self));
        }

        let handler = HANDLERS
            .iter()
            .find(|(action, _)| *action == self.action)
            .map(|(_, handler)| *handler)
            .ok_or(NylasError::Unsupported(self))?;

        handler(self.resource, filter)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.resource, self.action)
    }
}

impl FromStr for Operation {
    type Err = NylasError;

    /// Parses `parent.child`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (parent, child) = s.split_once('.').unwrap_or((s, ""));
        Self::parse(parent, child)
    }
}

/// Object id and query parameters for an operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    /// Object id for `find` and `delete`.
    pub id: Option<String>,
    /// Query parameters, e.g. `in=inbox` or `limit=10`.
    pub params: BTreeMap<String, String>,
}

impl Filter {
    /// Empty filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the object id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Adds a query parameter.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    fn query(&self) -> Vec<(String, String)> {
        self.params
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    fn require_id(&self, resource: Resource) -> Result<&str, NylasError> {
        self.id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or(NylasError::MissingId(resource))
    }
}

/// How the response body becomes the operation's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Extract {
    Whole,
    First,
    Count,
}

impl Extract {
    pub(crate) fn apply(self, body: Value) -> Value {
        match self {
            Self::Whole => body,
            Self::First => match body {
                Value::Array(items) => items.into_iter().next().unwrap_or(Value::Null),
                other => other,
            },
            Self::Count => body.get("count").cloned().unwrap_or(Value::Null),
        }
    }
}

/// A planned HTTP call.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Call {
    pub(crate) method: Method,
    pub(crate) path: Vec<String>,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) body: Option<Value>,
    pub(crate) extract: Extract,
}

impl Call {
    fn get(path: Vec<String>, query: Vec<(String, String)>, extract: Extract) -> Self {
        Self {
            method: Method::GET,
            path,
            query,
            body: None,
            extract,
        }
    }
}

type Handler = fn(Resource, &Filter) -> Result<Call, NylasError>;

/// Handler for each action.
const HANDLERS: &[(Action, Handler)] = &[
    (Action::List, list),
    (Action::Count, count),
    (Action::First, first),
    (Action::Find, find),
    (Action::Delete, delete),
];

#[allow(clippy::unnecessary_wraps)]
fn list(resource: Resource, filter: &Filter) -> Result<Call, NylasError> {
    Ok(Call::get(
        vec![resource.as_str().to_string()],
        filter.query(),
        Extract::Whole,
    ))
}

#[allow(clippy::unnecessary_wraps)]
fn count(resource: Resource, filter: &Filter) -> Result<Call, NylasError> {
    let mut query = filter.query();
    query.retain(|(name, _)| name != "view");
    query.push(("view".into(), "count".into()));
    Ok(Call::get(
        vec![resource.as_str().to_string()],
        query,
        Extract::Count,
    ))
}

#[allow(clippy::unnecessary_wraps)]
fn first(resource: Resource, filter: &Filter) -> Result<Call, NylasError> {
    let mut query = filter.query();
    query.retain(|(name, _)| name != "limit");
    query.push(("limit".into(), "1".into()));
    Ok(Call::get(
        vec![resource.as_str().to_string()],
        query,
        Extract::First,
    ))
}

fn find(resource: Resource, filter: &Filter) -> Result<Call, NylasError> {
    let path = if resource == Resource::Account {
        vec![resource.as_str().to_string()]
    } else {
        let id = filter.require_id(resource)?;
        vec![resource.as_str().to_string(), id.to_string()]
    };
    Ok(Call::get(path, filter.query(), Extract::Whole))
}

fn delete(resource: Resource, filter: &Filter) -> Result<Call, NylasError> {
    let id = filter.require_id(resource)?;

    let (query, body) = if resource == Resource::Drafts {
        // Drafts are deleted by version; the remaining params stay in the query.
        let raw = filter
            .params
            .get("version")
            .ok_or(NylasError::MissingParam("version"))?;
        let version: u64 = raw.parse().map_err(|_| NylasError::InvalidParam {
            name: "version",
            value: raw.clone(),
        })?;
        let mut query = filter.query();
        query.retain(|(name, _)| name != "version");
        (query, Some(json!({ "version": version })))
    } else {
        (filter.query(), None)
    };

    Ok(Call {
        method: Method::DELETE,
        path: vec![resource.as_str().to_string(), id.to_string()],
        query,
        body,
        extract: Extract::Whole,
    })
}
